use serde::Serialize;

use crate::melody::SessionResult;

/// Mistakes allowed in a tutorial attempt before it has to be repeated.
pub const MISTAKE_ALLOWANCE: u32 = 5;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Proceed,
    Retry,
}

/// Stateless pass/fail policy applied when a tutorial attempt completes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetryGate;

impl RetryGate {
    pub fn evaluate(&self, result: &SessionResult) -> Decision {
        if result.mistakes <= MISTAKE_ALLOWANCE {
            Decision::Proceed
        } else {
            Decision::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::melodies::fur_elise;
    use crate::melody::{MelodySession, Note};

    #[test]
    fn test_boundary_at_allowance() {
        let gate = RetryGate;
        assert_eq!(gate.evaluate(&SessionResult { mistakes: 0 }), Decision::Proceed);
        assert_eq!(gate.evaluate(&SessionResult { mistakes: 5 }), Decision::Proceed);
        assert_eq!(gate.evaluate(&SessionResult { mistakes: 6 }), Decision::Retry);
        assert_eq!(gate.evaluate(&SessionResult { mistakes: 40 }), Decision::Retry);
    }

    #[test]
    fn test_full_melody_with_three_slips_proceeds() {
        let melody = fur_elise();
        let mut session = MelodySession::new();
        session.start(melody.clone());

        let mut completed = false;
        for (i, note) in melody.notes().iter().enumerate() {
            if i == 3 || i == 17 || i == 30 {
                assert!(!session.submit(&Note::from("F#")).accepted);
            }
            completed = session.submit(note).completed;
        }

        assert!(completed);
        assert_eq!(session.mistakes(), 3);
        assert_eq!(RetryGate.evaluate(&session.result()), Decision::Proceed);
    }
}
