//! Keyword trie: the building phase of the automaton.
//!
//! Keywords are inserted byte by byte into an arena-backed trie. Shared
//! prefixes reuse existing states, so two keywords may end on the same state
//! (the same keyword entered twice) or on states that share a path. Because
//! of that sharing, each `insert` records its own output entry: teardown walks
//! output records, never states.

use super::arena::{StateArena, StateId};

/// Index of an output record in `Trie::outputs`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OutputId(u32);

impl OutputId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One accepted keyword: its length and the caller's object.
#[derive(Clone, Debug)]
pub struct Output<O> {
    pub len: usize,
    pub object: O,
}

/// Arena-based trie holding every entered keyword.
#[derive(Clone, Debug)]
pub struct Trie<O> {
    states: StateArena,
    outputs: Vec<Output<O>>,
    max_len: usize,
}

impl<O> Default for Trie<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Trie<O> {
    /// Create a trie with only the root state.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(states: usize) -> Self {
        Self {
            states: StateArena::with_capacity(states),
            outputs: Vec::new(),
            max_len: 0,
        }
    }

    /// Find or create a child for the given byte.
    fn get_or_create_child(&mut self, parent: StateId, byte: u8) -> StateId {
        if let Some(child) = self.states[parent].child(byte) {
            return child;
        }
        let depth = self.states[parent].depth + 1;
        let child = self.states.alloc(depth);
        self.states[parent].insert_child(byte, child);
        child
    }

    /// Insert a keyword, recording `object` at its terminal state.
    ///
    /// Returns the id of the new output record. An empty keyword records its
    /// output on the root; callers that do not want that must reject it first.
    pub fn insert(&mut self, keyword: &[u8], object: O) -> OutputId {
        let mut node = StateId::ROOT;
        for &byte in keyword {
            node = self.get_or_create_child(node, byte);
        }

        let id = OutputId(self.outputs.len() as u32);
        self.outputs.push(Output {
            len: keyword.len(),
            object,
        });
        self.states[node].own.push(id);
        self.max_len = self.max_len.max(keyword.len());
        id
    }

    /// Follow explicit trie edges only. Returns `None` when `path` leaves the trie.
    pub fn walk(&self, path: &[u8]) -> Option<StateId> {
        path.iter()
            .try_fold(StateId::ROOT, |node, &byte| self.states[node].child(byte))
    }

    pub fn states(&self) -> &StateArena {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut StateArena {
        &mut self.states
    }

    #[inline]
    pub fn output(&self, id: OutputId) -> &Output<O> {
        &self.outputs[id.index()]
    }

    /// Output records in insertion order.
    pub fn outputs(&self) -> &[Output<O>] {
        &self.outputs
    }

    /// Give up every output record, in insertion order.
    pub fn into_outputs(self) -> Vec<Output<O>> {
        self.outputs
    }

    /// Number of keywords inserted so far (duplicates counted).
    pub fn keyword_count(&self) -> usize {
        self.outputs.len()
    }

    /// Length of the longest keyword inserted so far.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// True if no keyword has been inserted.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
