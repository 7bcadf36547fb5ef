use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// A key name such as `"E2"` or `"D#2"`. Matching is exact string equality.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Note(String);

impl Note {
    pub fn new(name: impl Into<String>) -> Self {
        Note(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sharps live on the black keys.
    pub fn is_black(&self) -> bool {
        self.0.contains('#')
    }
}

impl From<&str> for Note {
    fn from(name: &str) -> Self {
        Note::new(name)
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed, non-empty sequence of notes to reproduce. Only built through
/// [`Melody::new`] and friends, so the non-empty invariant always holds.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Melody {
    notes: Vec<Note>,
}

impl Melody {
    pub fn new(notes: Vec<Note>) -> Result<Self, ContentError> {
        if notes.is_empty() {
            return Err(ContentError::EmptyMelody);
        }
        Ok(Melody { notes })
    }

    pub fn from_names(names: &[&str]) -> Result<Self, ContentError> {
        Melody::new(names.iter().map(|n| Note::from(*n)).collect())
    }

    /// Built-in tables are never empty.
    pub(crate) fn from_table(names: &[&str]) -> Self {
        debug_assert!(!names.is_empty());
        Melody {
            notes: names.iter().map(|n| Note::from(*n)).collect(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    // A constructed melody always has notes; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    /// The melody played back to back `times` times (at least once).
    pub fn repeated(&self, times: usize) -> Melody {
        let times = times.max(1);
        let mut notes = Vec::with_capacity(self.notes.len() * times);
        for _ in 0..times {
            notes.extend(self.notes.iter().cloned());
        }
        Melody { notes }
    }
}

impl TryFrom<Vec<Note>> for Melody {
    type Error = ContentError;

    fn try_from(notes: Vec<Note>) -> Result<Self, Self::Error> {
        Melody::new(notes)
    }
}

/// Per-attempt progress through a melody.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub cursor: usize,
    pub mistakes: u32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub completed: bool,
}

impl SubmitOutcome {
    pub const IGNORED: SubmitOutcome = SubmitOutcome {
        accepted: false,
        completed: false,
    };
}

/// What the retry policy gets to see once an attempt is over.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionResult {
    pub mistakes: u32,
}
