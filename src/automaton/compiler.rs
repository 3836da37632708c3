//! Automaton compilation: failure links, goto closure and merged outputs.
//!
//! Compilation runs once over a finished trie:
//!
//! 1. Breadth-first from the root. When a state `s` is dequeued its failure
//!    state has strictly smaller depth and was dequeued earlier, so the
//!    failure state's row is already complete. `s`'s row starts as a copy of
//!    that row and its explicit children are written over it. Before a child
//!    `c` on byte `b` overwrites `row[b]`, the old value is exactly the state
//!    reached by following failure links from `s` until one has an edge on
//!    `b` (or the root): that is `c`'s failure link.
//! 2. In the same order, `merged(s) = own(s) ++ merged(failure(s))`.
//!
//! The root's failure link is the root itself and is never followed.

use tracing::debug;

use super::arena::{StateArena, StateId};
use super::table::{DenseTable, PackedTable, Row, Table, Transitions, ALPHABET_LEN};
use super::trie::{OutputId, Trie};
use crate::config::TableLayout;

/// Half-open range into the merged output pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Span {
    start: u32,
    end: u32,
}

impl Span {
    #[inline]
    fn range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// The frozen query-side automaton: completed goto function plus merged
/// output lists. Output records themselves stay in the trie.
#[derive(Clone, Debug)]
pub struct Automaton {
    table: Table,
    merged: Vec<OutputId>,
    spans: Vec<Span>,
}

impl Automaton {
    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Every output that ends when the scan is in `state`: own entries first
    /// in entry order, then everything inherited along the failure chain.
    #[inline]
    pub fn outputs_at(&self, state: StateId) -> &[OutputId] {
        &self.merged[self.spans[state.index()].range()]
    }

    pub fn layout(&self) -> TableLayout {
        match self.table {
            Table::Dense(_) => TableLayout::Dense,
            Table::Packed(_) => TableLayout::Packed,
        }
    }

    /// Total length of all merged output lists.
    pub fn merged_output_count(&self) -> usize {
        self.merged.len()
    }

    /// Approximate heap usage of the compiled tables in bytes.
    pub fn memory_usage(&self) -> usize {
        self.table.memory_usage()
            + self.merged.capacity() * std::mem::size_of::<OutputId>()
            + self.spans.capacity() * std::mem::size_of::<Span>()
    }
}

/// Compile a trie into an automaton, writing failure links into its states.
pub fn compile<O>(trie: &mut Trie<O>, layout: TableLayout) -> Automaton {
    let state_count = trie.states().len();
    let mut table = match layout {
        TableLayout::Dense => Table::Dense(DenseTable::new(state_count)),
        TableLayout::Packed => Table::Packed(PackedTable::new(state_count)),
    };

    let order = link_states(trie.states_mut(), &mut table);
    let (merged, spans) = merge_outputs(trie.states(), &order);

    debug!(
        states = state_count,
        keywords = trie.keyword_count(),
        merged_outputs = merged.len(),
        ?layout,
        "compiled keyword automaton"
    );

    Automaton {
        table,
        merged,
        spans,
    }
}

/// Set failure links and completed rows for every state.
///
/// Returns the states in breadth-first order (root first).
fn link_states<T: Transitions>(states: &mut StateArena, table: &mut T) -> Vec<StateId> {
    let mut order = Vec::with_capacity(states.len());
    order.push(StateId::ROOT);
    states[StateId::ROOT].failure = StateId::ROOT;

    let mut head = 0;
    while head < order.len() {
        let state = order[head];
        head += 1;

        let mut row: Row = if state.is_root() {
            [StateId::ROOT; ALPHABET_LEN]
        } else {
            table.row(states[state].failure)
        };

        for i in 0..states[state].children().len() {
            let (byte, child) = states[state].children()[i];
            states[child].failure = row[byte as usize];
            row[byte as usize] = child;
            order.push(child);
        }

        table.set_row(state, &row);
    }

    order
}

/// Concatenate own outputs with the failure state's merged outputs.
///
/// Every state stores its full merged list, so the pool is the sum of the
/// failure-chain output counts over all states. That is quadratic in the
/// worst case: nested keywords `a`, `aa`, ..., `a`^n alone make a pool of
/// n(n+1)/2 entries.
///
/// # Panics
///
/// If the pool outgrows `u32` offsets.
fn merge_outputs(states: &StateArena, order: &[StateId]) -> (Vec<OutputId>, Vec<Span>) {
    let mut merged = Vec::with_capacity(order.len());
    let mut spans = vec![Span::default(); states.len()];

    for &id in order {
        let state = &states[id];
        let start = merged.len();
        merged.extend_from_slice(&state.own);
        if !id.is_root() {
            merged.extend_from_within(spans[state.failure.index()].range());
        }
        spans[id.index()] = Span {
            start: pool_offset(start),
            end: pool_offset(merged.len()),
        };
    }

    (merged, spans)
}

fn pool_offset(len: usize) -> u32 {
    u32::try_from(len)
        .unwrap_or_else(|_| panic!("merged output pool exceeds {} entries", u32::MAX))
}
