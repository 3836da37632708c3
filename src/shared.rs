//! Thread-safe keyword index.
//!
//! `SharedIndex` lets several threads enter keywords and query through a
//! shared reference:
//! - keyword entry and `fix` are serialized by a mutex around the building index
//! - `fix` publishes the compiled index through an `ArcSwapOption`
//! - queries load the published index without taking any lock

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use crate::error::{BoxError, EsmError, Result};
use crate::{Index, IndexConfig, Match, Phase};

/// Thread-safe index with lock-free queries once fixed.
///
/// This type is `Send + Sync` whenever `O` is.
pub struct SharedIndex<O> {
    /// Published after `fix`, lock-free reads
    fixed: ArcSwapOption<Index<O>>,
    /// The index under construction; `None` once fixed
    building: Mutex<Option<Index<O>>>,
}

impl<O> Default for SharedIndex<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> SharedIndex<O> {
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            fixed: ArcSwapOption::empty(),
            building: Mutex::new(Some(Index::with_config(config))),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.fixed.load().is_some() {
            Phase::Fixed
        } else {
            Phase::Building
        }
    }

    /// Add a keyword. Serialized with other `enter` and `fix` calls.
    pub fn enter(&self, keyword: impl AsRef<[u8]>, object: O) -> Result<()> {
        let mut building = self.building.lock();
        match building.as_mut() {
            Some(index) => index.enter(keyword, object),
            None => Err(EsmError::AlreadyFixed),
        }
    }

    /// Compile the index and publish it to readers.
    pub fn fix(&self) -> Result<()> {
        let mut building = self.building.lock();
        let mut index = building.take().ok_or(EsmError::AlreadyFixed)?;
        if let Err(e) = index.fix() {
            *building = Some(index);
            return Err(e);
        }
        self.fixed.store(Some(Arc::new(index)));
        Ok(())
    }

    /// The published index, for callers that want to hold on to it.
    pub fn snapshot(&self) -> Result<Arc<Index<O>>> {
        self.fixed.load_full().ok_or(EsmError::NotFixed)
    }

    /// Scan `text` against the published index. See `Index::query`.
    pub fn query<F, E>(&self, text: &[u8], sink: F) -> Result<()>
    where
        F: for<'m> FnMut(Match<'m, O>) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        let fixed = self.fixed.load();
        match fixed.as_deref() {
            Some(index) => index.query(text, sink),
            None => Err(EsmError::NotFixed),
        }
    }

    /// Number of keywords entered so far.
    pub fn keyword_count(&self) -> usize {
        if let Some(index) = self.fixed.load().as_deref() {
            return index.keyword_count();
        }
        self.building
            .lock()
            .as_ref()
            .map_or(0, Index::keyword_count)
    }

    /// Take the index back out, e.g. to `free` it.
    ///
    /// Fails with the shared handle if a snapshot is still alive elsewhere.
    pub fn into_inner(self) -> std::result::Result<Index<O>, Arc<Index<O>>> {
        if let Some(index) = self.building.into_inner() {
            return Ok(index);
        }
        match self.fixed.into_inner() {
            Some(shared) => Arc::try_unwrap(shared),
            // building is only emptied right before publishing
            None => Ok(Index::new()),
        }
    }
}
