//! Query engine: walks a compiled automaton over a text.

use super::arena::StateId;
use super::compiler::Automaton;
use super::table::{Table, Transitions};
use super::trie::Output;
use crate::error::{BoxError, EsmError, Result};

/// One keyword occurrence: the half-open byte range `[start, end)` in the
/// queried text and the object stored with the keyword.
#[derive(Debug, PartialEq, Eq)]
pub struct Match<'a, O> {
    pub start: usize,
    pub end: usize,
    pub object: &'a O,
}

impl<O> Clone for Match<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for Match<'_, O> {}

impl<O> Match<'_, O> {
    /// Length of the matched keyword.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length range. Scans never report one.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl Automaton {
    /// Scan `text`, feeding every match to `sink` in order of increasing end
    /// offset. Matches sharing an end offset come in merged-output order.
    ///
    /// `outputs` must be the output records of the trie this automaton was
    /// compiled from. The first sink error stops the scan and is returned as
    /// `EsmError::Sink`.
    pub(crate) fn scan<'a, O, F, E>(
        &self,
        outputs: &'a [Output<O>],
        text: &[u8],
        sink: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Match<'a, O>) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        match self.table() {
            Table::Dense(t) => self.walk(t, outputs, text, sink),
            Table::Packed(t) => self.walk(t, outputs, text, sink),
        }
    }

    #[inline]
    fn walk<'a, T, O, F, E>(
        &self,
        table: &T,
        outputs: &'a [Output<O>],
        text: &[u8],
        sink: &mut F,
    ) -> Result<()>
    where
        T: Transitions,
        F: FnMut(Match<'a, O>) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        let mut current = StateId::ROOT;
        for (i, &byte) in text.iter().enumerate() {
            current = table.next_state(current, byte);
            let end = i + 1;
            for &id in self.outputs_at(current) {
                let output = &outputs[id.index()];
                sink(Match {
                    start: end - output.len,
                    end,
                    object: &output.object,
                })
                .map_err(|e| EsmError::Sink(e.into()))?;
            }
        }
        Ok(())
    }
}
