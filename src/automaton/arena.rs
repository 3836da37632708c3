//! Arena-based state storage for the keyword automaton.
//!
//! Every state lives in one contiguous `Vec` and is referenced by `StateId`.
//! Failure links point "backwards" across the trie, so states reference each
//! other freely without any ownership cycle: the arena owns all memory.
//!
//! ```text
//!   root ─h→ 1 ─e→ 2 ─r→ 3 ─s→ 4
//!     └─s→ 5 ─h→ 6 ─e→ 7
//!                       ┆ failure
//!                       └┄┄┄┄┄┄┄→ 2
//! ```

use smallvec::SmallVec;

use super::trie::OutputId;

/// A state identifier - just an index into the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// The start state. Always the first state allocated.
    pub const ROOT: StateId = StateId(0);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        StateId(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// A state in the automaton.
///
/// During building only `children`, `depth` and `own` are meaningful.
/// `failure` is filled in by the compiler.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Explicit trie edges as (byte, child), sorted by byte
    children: SmallVec<[(u8, StateId); 4]>,
    /// Longest proper suffix of this state's path that is also a trie path
    pub failure: StateId,
    /// Length of the byte path from the root
    pub depth: u32,
    /// Output records for keywords ending exactly here, in entry order
    pub own: SmallVec<[OutputId; 1]>,
}

impl State {
    fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Look up the explicit trie edge for `byte`.
    #[inline]
    pub fn child(&self, byte: u8) -> Option<StateId> {
        self.children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|pos| self.children[pos].1)
    }

    /// Add a trie edge, keeping children sorted. Replaces an existing edge on
    /// the same byte.
    pub fn insert_child(&mut self, byte: u8, child: StateId) {
        match self.children.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(pos) => self.children[pos].1 = child,
            Err(pos) => self.children.insert(pos, (byte, child)),
        }
    }

    /// Explicit trie edges in byte order.
    #[inline]
    pub fn children(&self) -> &[(u8, StateId)] {
        &self.children
    }
}

/// Arena for allocating automaton states.
///
/// States are allocated contiguously and referenced by `StateId`.
/// A fresh arena already contains the root.
#[derive(Clone)]
pub struct StateArena {
    states: Vec<State>,
}

impl std::fmt::Debug for StateArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateArena")
            .field("states_count", &self.states.len())
            .finish()
    }
}

impl Default for StateArena {
    fn default() -> Self {
        Self::new()
    }
}

impl StateArena {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut states = Vec::with_capacity(capacity.max(1));
        states.push(State::default());
        Self { states }
    }

    /// Allocate a new state at the given depth, returning its ID.
    pub fn alloc(&mut self, depth: u32) -> StateId {
        let id = StateId::new(self.states.len() as u32);
        self.states.push(State::with_depth(depth));
        id
    }

    #[inline]
    pub fn get(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Number of states in the arena, root included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: the root is allocated up front.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in allocation order together with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId::new(i as u32), s))
    }
}

impl std::ops::Index<StateId> for StateArena {
    type Output = State;

    #[inline]
    fn index(&self, id: StateId) -> &Self::Output {
        &self.states[id.index()]
    }
}

impl std::ops::IndexMut<StateId> for StateArena {
    #[inline]
    fn index_mut(&mut self, id: StateId) -> &mut Self::Output {
        &mut self.states[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena_has_root() {
        let arena = StateArena::new();
        assert_eq!(arena.len(), 1);
        assert!(!arena.is_empty());
        assert_eq!(arena[StateId::ROOT].depth, 0);
        assert!(arena[StateId::ROOT].children().is_empty());
    }

    #[test]
    fn test_arena_alloc() {
        let mut arena = StateArena::new();
        let id1 = arena.alloc(1);
        let id2 = arena.alloc(2);

        assert_eq!(id1.index(), 1);
        assert_eq!(id2.index(), 2);
        assert_eq!(arena.len(), 3);
        assert_eq!(arena[id2].depth, 2);
        assert!(arena.get(StateId::new(3)).is_none());
        let ids: Vec<StateId> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![StateId::ROOT, id1, id2]);
    }

    #[test]
    fn test_children_stay_sorted() {
        let mut arena = StateArena::new();
        let c = arena.alloc(1);
        let a = arena.alloc(1);
        let b = arena.alloc(1);

        let root = &mut arena[StateId::ROOT];
        root.insert_child(b'c', c);
        root.insert_child(b'a', a);
        root.insert_child(b'b', b);

        let bytes: Vec<u8> = arena[StateId::ROOT]
            .children()
            .iter()
            .map(|&(byte, _)| byte)
            .collect();
        assert_eq!(bytes, b"abc");
        assert_eq!(arena[StateId::ROOT].child(b'a'), Some(a));
        assert_eq!(arena[StateId::ROOT].child(b'z'), None);
    }

    #[test]
    fn test_failure_back_reference() {
        // Failure links are plain indices, so a deep state can point at a
        // shallower one without any ownership trouble.
        let mut arena = StateArena::new();
        let h = arena.alloc(1);
        let s = arena.alloc(1);
        let sh = arena.alloc(2);
        arena[StateId::ROOT].insert_child(b'h', h);
        arena[StateId::ROOT].insert_child(b's', s);
        arena[s].insert_child(b'h', sh);
        arena[sh].failure = h;

        assert_eq!(arena[sh].failure, h);
        assert!(arena[h].failure.is_root());
    }
}
