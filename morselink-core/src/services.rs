//! Collaborators the core consumes but does not implement: phrase lookup
//! and text rendering.

use crate::hal::HalError;

/// Maps a completed symbol sequence to a phrase
pub trait PhraseTable {
    /// Exact-match lookup; partial or prefix matches are not supported
    fn lookup(&self, sequence: &str) -> Option<&str>;
}

impl<T: PhraseTable + ?Sized> PhraseTable for &T {
    fn lookup(&self, sequence: &str) -> Option<&str> {
        (**self).lookup(sequence)
    }
}

/// Phrase table over a static slice of `(sequence, phrase)` pairs
#[derive(Copy, Clone, Debug)]
pub struct StaticPhraseTable<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> StaticPhraseTable<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PhraseTable for StaticPhraseTable<'_> {
    fn lookup(&self, sequence: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == sequence)
            .map(|(_, phrase)| *phrase)
    }
}

/// Text display on the display node (an LCD in the reference hardware)
pub trait Screen {
    fn render(&mut self, text: &str) -> Result<(), HalError>;

    fn clear(&mut self) -> Result<(), HalError>;
}
