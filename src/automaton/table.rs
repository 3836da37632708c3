//! Completed transition tables (the goto function after closure).
//!
//! After compilation every state has a defined successor for every byte, so
//! the query engine never walks failure links. Two layouts are offered:
//!
//! - `DenseTable`: one 256-entry row per state in a single flat `Vec`.
//!   Lookup is a single index computation.
//! - `PackedTable`: each row is compressed into runs of equal successors,
//!   encoded as ceilings/steps. Most rows of a large keyword set collapse to a
//!   handful of runs (nearly everything goes back to a shallow state).
//!
//! Packed example: bytes 0x00-0x67 go to the root, `h` (0x68) to state 5,
//! everything above back to the root:
//! ```text
//! ceilings: [0x68, 0x69, 0x100]
//! steps:    [root, S5,   root]
//! ```

use super::arena::StateId;

/// Number of distinct input bytes.
pub const ALPHABET_LEN: usize = 256;

/// One fully expanded row of the goto function.
pub type Row = [StateId; ALPHABET_LEN];

/// Read/write access to a completed goto function.
pub trait Transitions {
    /// Successor of `from` on `byte`. Total once the table is compiled.
    fn next_state(&self, from: StateId, byte: u8) -> StateId;

    /// Expand the row of `state` into a full array.
    fn row(&self, state: StateId) -> Row;

    /// Store the completed row of `state`.
    fn set_row(&mut self, state: StateId, row: &Row);

    /// Approximate heap usage in bytes.
    fn memory_usage(&self) -> usize;
}

/// Flat `states × 256` transition matrix.
#[derive(Clone, Debug)]
pub struct DenseTable {
    next: Vec<StateId>,
}

impl DenseTable {
    /// Create a table for `states` states, every entry pointing at the root.
    pub fn new(states: usize) -> Self {
        Self {
            next: vec![StateId::ROOT; states * ALPHABET_LEN],
        }
    }
}

impl Transitions for DenseTable {
    #[inline]
    fn next_state(&self, from: StateId, byte: u8) -> StateId {
        self.next[from.index() * ALPHABET_LEN + byte as usize]
    }

    fn row(&self, state: StateId) -> Row {
        let start = state.index() * ALPHABET_LEN;
        let mut row = [StateId::ROOT; ALPHABET_LEN];
        row.copy_from_slice(&self.next[start..start + ALPHABET_LEN]);
        row
    }

    fn set_row(&mut self, state: StateId, row: &Row) {
        let start = state.index() * ALPHABET_LEN;
        self.next[start..start + ALPHABET_LEN].copy_from_slice(row);
    }

    fn memory_usage(&self) -> usize {
        self.next.len() * std::mem::size_of::<StateId>()
    }
}

/// A compact row encoding byte ranges to successor states.
///
/// Each ceiling is the exclusive upper bound of a byte range that maps to the
/// step at the same position. The last ceiling is always `ALPHABET_LEN`.
#[derive(Clone, Debug)]
pub struct PackedRow {
    ceilings: Vec<u16>,
    steps: Vec<StateId>,
}

impl Default for PackedRow {
    fn default() -> Self {
        Self {
            ceilings: vec![ALPHABET_LEN as u16],
            steps: vec![StateId::ROOT],
        }
    }
}

impl PackedRow {
    /// Pack an unpacked row into runs.
    pub fn pack(unpacked: &Row) -> Self {
        let mut ceilings = Vec::with_capacity(4);
        let mut steps = Vec::with_capacity(4);

        let mut current = unpacked[0];
        for (i, &step) in unpacked.iter().enumerate() {
            if step != current {
                ceilings.push(i as u16);
                steps.push(current);
                current = step;
            }
        }
        ceilings.push(ALPHABET_LEN as u16);
        steps.push(current);

        Self { ceilings, steps }
    }

    /// Unpack the compact representation into a full array.
    pub fn unpack(&self) -> Row {
        let mut result = [StateId::ROOT; ALPHABET_LEN];
        let mut floor = 0usize;
        for (&ceiling, &step) in self.ceilings.iter().zip(&self.steps) {
            let ceiling = ceiling as usize;
            result[floor..ceiling].fill(step);
            floor = ceiling;
        }
        result
    }

    /// Successor for `byte`: the step of the first range whose ceiling lies above it.
    #[inline]
    pub fn step(&self, byte: u8) -> StateId {
        let pos = self.ceilings.partition_point(|&c| c <= byte as u16);
        self.steps[pos]
    }

    /// Number of runs in this row.
    pub fn runs(&self) -> usize {
        self.steps.len()
    }
}

/// Per-state packed rows.
#[derive(Clone, Debug)]
pub struct PackedTable {
    rows: Vec<PackedRow>,
}

impl PackedTable {
    pub fn new(states: usize) -> Self {
        Self {
            rows: vec![PackedRow::default(); states],
        }
    }

    /// Total number of runs across all rows.
    pub fn runs(&self) -> usize {
        self.rows.iter().map(PackedRow::runs).sum()
    }
}

impl Transitions for PackedTable {
    #[inline]
    fn next_state(&self, from: StateId, byte: u8) -> StateId {
        self.rows[from.index()].step(byte)
    }

    fn row(&self, state: StateId) -> Row {
        self.rows[state.index()].unpack()
    }

    fn set_row(&mut self, state: StateId, row: &Row) {
        self.rows[state.index()] = PackedRow::pack(row);
    }

    fn memory_usage(&self) -> usize {
        self.rows.len() * std::mem::size_of::<PackedRow>()
            + self
                .rows
                .iter()
                .map(|r| {
                    r.ceilings.capacity() * std::mem::size_of::<u16>()
                        + r.steps.capacity() * std::mem::size_of::<StateId>()
                })
                .sum::<usize>()
    }
}

/// A compiled goto function in one of the supported layouts.
#[derive(Clone, Debug)]
pub enum Table {
    Dense(DenseTable),
    Packed(PackedTable),
}

impl Transitions for Table {
    #[inline]
    fn next_state(&self, from: StateId, byte: u8) -> StateId {
        match self {
            Table::Dense(t) => t.next_state(from, byte),
            Table::Packed(t) => t.next_state(from, byte),
        }
    }

    fn row(&self, state: StateId) -> Row {
        match self {
            Table::Dense(t) => t.row(state),
            Table::Packed(t) => t.row(state),
        }
    }

    fn set_row(&mut self, state: StateId, row: &Row) {
        match self {
            Table::Dense(t) => t.set_row(state, row),
            Table::Packed(t) => t.set_row(state, row),
        }
    }

    fn memory_usage(&self) -> usize {
        match self {
            Table::Dense(t) => t.memory_usage(),
            Table::Packed(t) => t.memory_usage(),
        }
    }
}
