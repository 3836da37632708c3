/// Memory layout of the compiled goto function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TableLayout {
    /// One 256-entry row per state. Constant-time transitions.
    #[default]
    Dense,
    /// Rows compressed into runs of equal successors. Transitions cost a
    /// binary search over the runs of one row; far smaller for big keyword sets.
    Packed,
}

/// Index configuration
#[derive(Clone, Debug)]
pub struct IndexConfig {
    pub layout: TableLayout,
    /// Number of states to pre-allocate in the trie arena
    pub state_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            layout: TableLayout::Dense,
            state_capacity: 64,
        }
    }
}

impl IndexConfig {
    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_state_capacity(mut self, state_capacity: usize) -> Self {
        self.state_capacity = state_capacity;
        self
    }

    /// Compact profile for large keyword sets.
    pub fn compact() -> Self {
        Self::default().with_layout(TableLayout::Packed)
    }
}
