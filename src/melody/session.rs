use crate::melody::types::{Melody, Note, SessionResult, SessionState, SubmitOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
    Completed,
}

/// Walks a cursor through a melody one correct note at a time.
///
/// Wrong notes count as mistakes but never end the attempt; the player can
/// keep trying the same note. Submitting before `start` or after completion
/// does nothing.
#[derive(Debug)]
pub struct MelodySession {
    melody: Option<Melody>,
    state: SessionState,
    phase: Phase,
}

impl Default for MelodySession {
    fn default() -> Self {
        Self::new()
    }
}

impl MelodySession {
    pub fn new() -> Self {
        MelodySession {
            melody: None,
            state: SessionState::default(),
            phase: Phase::Idle,
        }
    }

    pub fn start(&mut self, melody: Melody) {
        self.melody = Some(melody);
        self.state = SessionState::default();
        self.phase = Phase::Active;
    }

    pub fn submit(&mut self, note: &Note) -> SubmitOutcome {
        if self.phase != Phase::Active {
            return SubmitOutcome::IGNORED;
        }
        let Some(melody) = &self.melody else {
            return SubmitOutcome::IGNORED;
        };

        match melody.get(self.state.cursor) {
            Some(expected) if expected == note => {
                self.state.cursor += 1;
                let completed = self.state.cursor == melody.len();
                if completed {
                    self.phase = Phase::Completed;
                }
                SubmitOutcome {
                    accepted: true,
                    completed,
                }
            }
            _ => {
                self.state.mistakes += 1;
                SubmitOutcome::IGNORED
            }
        }
    }

    /// The key the player should press next, if an attempt is in progress.
    pub fn current_expected_note(&self) -> Option<&Note> {
        if self.phase != Phase::Active {
            return None;
        }
        self.melody.as_ref()?.get(self.state.cursor)
    }

    /// `cursor / len`, or 0.0 before the first `start`.
    pub fn progress(&self) -> f64 {
        match &self.melody {
            Some(melody) if !melody.is_empty() => {
                self.state.cursor as f64 / melody.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn mistakes(&self) -> u32 {
        self.state.mistakes
    }

    pub fn melody(&self) -> Option<&Melody> {
        self.melody.as_ref()
    }

    pub fn len(&self) -> usize {
        self.melody.as_ref().map_or(0, Melody::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            mistakes: self.state.mistakes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::melodies::fur_elise;

    fn melody(names: &[&str]) -> Melody {
        Melody::from_names(names).unwrap()
    }

    fn play(session: &mut MelodySession, names: &[&str]) -> Vec<(bool, bool)> {
        names
            .iter()
            .map(|n| {
                let out = session.submit(&Note::from(*n));
                (out.accepted, out.completed)
            })
            .collect()
    }

    #[test]
    fn test_exact_stream_completes_without_mistakes() {
        for names in [&["A"][..], &["C", "D", "E"], &["E2", "D#2", "E2", "D#2"]] {
            let mut session = MelodySession::new();
            session.start(melody(names));
            let results = play(&mut session, names);
            assert_eq!(results.last(), Some(&(true, true)));
            assert!(results[..results.len() - 1].iter().all(|r| *r == (true, false)));
            assert_eq!(session.mistakes(), 0);
            assert!(session.is_completed());
        }
    }

    #[test]
    fn test_progress_tracks_cursor_exactly() {
        let m = fur_elise();
        let mut session = MelodySession::new();
        session.start(m.clone());
        assert_eq!(session.progress(), 0.0);
        for (i, note) in m.notes().iter().enumerate() {
            session.submit(note);
            assert_eq!(session.cursor(), i + 1);
            assert_eq!(session.progress(), (i + 1) as f64 / m.len() as f64);
        }
        assert_eq!(session.progress(), 1.0);
    }

    #[test]
    fn test_wrong_note_counts_mistake_and_holds_cursor() {
        let mut session = MelodySession::new();
        session.start(melody(&["C", "D", "E"]));
        session.submit(&Note::from("C"));
        for expected_mistakes in 1..=4 {
            let out = session.submit(&Note::from("F#"));
            assert_eq!(out, SubmitOutcome::IGNORED);
            assert_eq!(session.cursor(), 1);
            assert_eq!(session.mistakes(), expected_mistakes);
            assert_eq!(session.current_expected_note(), Some(&Note::from("D")));
        }
    }

    #[test]
    fn test_toy_scenario() {
        let mut session = MelodySession::new();
        session.start(melody(&["C", "D", "E"]));
        let results = play(&mut session, &["C", "X", "D", "E"]);
        assert_eq!(
            results,
            vec![(true, false), (false, false), (true, false), (true, true)]
        );
        assert_eq!(session.mistakes(), 1);
    }

    #[test]
    fn test_terminal_and_idle_submissions_are_noops() {
        let mut session = MelodySession::new();
        assert_eq!(session.submit(&Note::from("C")), SubmitOutcome::IGNORED);
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.current_expected_note(), None);

        session.start(melody(&["C"]));
        assert_eq!(
            session.submit(&Note::from("C")),
            SubmitOutcome {
                accepted: true,
                completed: true
            }
        );
        assert_eq!(session.submit(&Note::from("C")), SubmitOutcome::IGNORED);
        assert_eq!(session.submit(&Note::from("D")), SubmitOutcome::IGNORED);
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.current_expected_note(), None);
    }

    #[test]
    fn test_start_resets_state() {
        let mut session = MelodySession::new();
        session.start(melody(&["C", "D"]));
        play(&mut session, &["X", "C", "Y"]);
        assert_eq!(session.state(), SessionState { cursor: 1, mistakes: 2 });
        session.start(melody(&["C", "D"]));
        assert_eq!(session.state(), SessionState::default());
        assert_eq!(session.current_expected_note(), Some(&Note::from("C")));
    }
}
