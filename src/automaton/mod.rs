//! Aho-Corasick keyword automaton
//!
//! The automaton is built in two phases. Keywords are first inserted into a
//! plain trie, then the trie is compiled once into a deterministic automaton
//! whose goto function is total, so scanning never backtracks. The key
//! components are:
//!
//! - `StateArena`: flat storage for all states, referenced by `StateId`
//! - `Trie`: keyword insertion and per-entry output records
//! - `Automaton`: completed transition table plus merged output lists
//! - `Match`: one keyword occurrence reported by a scan
//!
//! # Module Organization
//!
//! - `arena`: state storage (StateId, State, StateArena)
//! - `trie`: building phase (Trie, Output, OutputId)
//! - `table`: completed goto function layouts (DenseTable, PackedTable)
//! - `compiler`: failure links, goto closure, output merging
//! - `query`: the scan loop and `Match`

mod arena;
mod compiler;
mod query;
mod table;
mod trie;

pub use arena::{State, StateArena, StateId};
pub use compiler::{compile, Automaton};
pub use query::Match;
pub use table::{DenseTable, PackedRow, PackedTable, Row, Table, Transitions, ALPHABET_LEN};
pub use trie::{Output, OutputId, Trie};

#[cfg(test)]
mod tests;
