//! esm: multi-keyword matching with the Aho-Corasick automaton
//!
//! Keywords are entered together with an arbitrary object. Once every keyword
//! is in, the index is fixed (compiled) and can then be queried any number of
//! times. A query scans the text once and reports every occurrence of every
//! keyword, overlapping and nested ones included.
//!
//! ```
//! use esm::Index;
//!
//! let mut index = Index::new();
//! index.enter("he", "HE").unwrap();
//! index.enter("she", "SHE").unwrap();
//! index.enter("his", "HIS").unwrap();
//! index.enter("hers", "HERS").unwrap();
//! index.fix().unwrap();
//!
//! let found: Vec<_> = index
//!     .find_all(b"this here is history")
//!     .unwrap()
//!     .into_iter()
//!     .map(|m| (m.start, m.end, *m.object))
//!     .collect();
//! assert_eq!(found[..3], [(1, 4, "HIS"), (5, 7, "HE"), (13, 16, "HIS")]);
//! ```

pub mod automaton;
mod config;
mod error;
mod shared;

use std::convert::Infallible;

use tracing::{trace, warn};

use automaton::{compile, Automaton, Trie};

pub use automaton::Match;
pub use config::{IndexConfig, TableLayout};
pub use error::{BoxError, EsmError, Result};
pub use shared::SharedIndex;

/// Lifecycle phase of an `Index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Keywords may be entered, queries are rejected
    Building,
    /// Compiled: queries allowed, no more keywords
    Fixed,
}

/// A keyword index.
///
/// An index starts out in `Phase::Building` and moves to `Phase::Fixed`
/// exactly once, on `fix`. A fixed index is read-only, so it is `Sync` when
/// `O` is and can be shared behind an `Arc` for concurrent queries.
///
/// Objects are owned by the index. `free` hands each one back exactly once per
/// `enter` call; dropping the index drops them instead.
#[derive(Clone, Debug)]
pub struct Index<O> {
    trie: Trie<O>,
    automaton: Option<Automaton>,
    config: IndexConfig,
}

impl<O> Default for Index<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Index<O> {
    /// Create an empty index in the building phase.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Index {
            trie: Trie::with_capacity(config.state_capacity),
            automaton: None,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.automaton.is_some() {
            Phase::Fixed
        } else {
            Phase::Building
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.automaton.is_some()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Add a keyword with its object.
    ///
    /// Fails with `AlreadyFixed` once the index is fixed and with
    /// `EmptyKeyword` for a zero-length keyword. A rejected call leaves the
    /// index untouched and drops `object` on the spot: it is not stored, so
    /// `free` never hands it to its release callback.
    pub fn enter(&mut self, keyword: impl AsRef<[u8]>, object: O) -> Result<()> {
        if self.is_fixed() {
            return Err(EsmError::AlreadyFixed);
        }
        let keyword = keyword.as_ref();
        if keyword.is_empty() {
            return Err(EsmError::EmptyKeyword);
        }

        self.trie.insert(keyword, object);
        trace!(
            len = keyword.len(),
            states = self.trie.states().len(),
            "entered keyword"
        );
        Ok(())
    }

    /// Enter several keywords, stopping at the first rejected one.
    pub fn enter_all<I, K>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, O)>,
        K: AsRef<[u8]>,
    {
        for (keyword, object) in entries {
            self.enter(keyword, object)?;
        }
        Ok(())
    }

    /// Compile the index. After this no keyword can be added.
    pub fn fix(&mut self) -> Result<()> {
        if self.is_fixed() {
            return Err(EsmError::AlreadyFixed);
        }
        self.automaton = Some(compile(&mut self.trie, self.config.layout));
        Ok(())
    }

    /// Scan `text` and feed every match to `sink`.
    ///
    /// Matches arrive in order of increasing `end`. Matches with the same
    /// `end` arrive longest-path first: keywords ending on the scan state
    /// itself in entry order, then those inherited through its failure chain.
    ///
    /// Returning an error from `sink` stops the scan at once; the error comes
    /// back as `EsmError::Sink`. Fails with `NotFixed` before `fix`.
    pub fn query<'a, F, E>(&'a self, text: &[u8], mut sink: F) -> Result<()>
    where
        F: FnMut(Match<'a, O>) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        let automaton = self.automaton.as_ref().ok_or(EsmError::NotFixed)?;
        automaton.scan(self.trie.outputs(), text, &mut sink)
    }

    /// Like `query` with a sink that never fails.
    pub fn for_each_match<'a, F>(&'a self, text: &[u8], mut f: F) -> Result<()>
    where
        F: FnMut(Match<'a, O>),
    {
        self.query(text, |m| {
            f(m);
            Ok::<(), Infallible>(())
        })
    }

    /// Collect every match in query order.
    pub fn find_all(&self, text: &[u8]) -> Result<Vec<Match<'_, O>>> {
        let mut matches = Vec::new();
        self.for_each_match(text, |m| matches.push(m))?;
        Ok(matches)
    }

    /// Check whether any keyword occurs in `text`, stopping at the first match.
    pub fn is_match(&self, text: &[u8]) -> Result<bool> {
        match self.query(text, |_| Err("stop")) {
            Ok(()) => Ok(false),
            Err(EsmError::Sink(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Tear the index down, handing every stored object to `release`.
    ///
    /// `release` runs exactly once per successful `enter` call, in entry
    /// order, whether or not the index was fixed. Failures do not stop the
    /// teardown: every object is still visited, and the first failure is
    /// returned together with the failure count.
    pub fn free<F, E>(self, mut release: F) -> Result<()>
    where
        F: FnMut(O) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        let Index { trie, automaton, .. } = self;
        drop(automaton);

        let outputs = trie.into_outputs();
        let total = outputs.len();
        let mut failed = 0;
        let mut first_error = None;

        for output in outputs {
            if let Err(e) = release(output.object) {
                let e = e.into();
                warn!(error = %e, "release callback failed");
                failed += 1;
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(source) => Err(EsmError::Release {
                failed,
                total,
                source,
            }),
        }
    }

    /// Number of successful `enter` calls.
    pub fn keyword_count(&self) -> usize {
        self.trie.keyword_count()
    }

    /// Number of automaton states, root included.
    pub fn state_count(&self) -> usize {
        self.trie.states().len()
    }

    /// Length of the longest keyword entered.
    pub fn max_keyword_len(&self) -> usize {
        self.trie.max_len()
    }

    /// Compiled automaton, once fixed.
    ///
    /// Exposes the tables and merged outputs for inspection. Scanning only
    /// goes through `query`, which pairs the automaton with its own outputs:
    ///
    /// ```compile_fail
    /// # use std::convert::Infallible;
    /// let mut a = esm::Index::new();
    /// a.enter("abc", 1).unwrap();
    /// a.fix().unwrap();
    /// let b: esm::Index<i32> = esm::Index::new();
    /// let mut sink = |_m: esm::Match<'_, i32>| Ok::<(), Infallible>(());
    /// a.automaton().unwrap().scan(b.trie().outputs(), b"abc", &mut sink).unwrap();
    /// ```
    pub fn automaton(&self) -> Option<&Automaton> {
        self.automaton.as_ref()
    }

    /// The underlying trie (failure links are set once fixed).
    pub fn trie(&self) -> &Trie<O> {
        &self.trie
    }
}
