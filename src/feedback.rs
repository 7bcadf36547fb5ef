use serde::{Deserialize, Serialize};

use crate::melody::MelodySession;

/// How much of the music still reaches the player. Declared from full
/// intensity to almost silent, so `Ord` follows increasing degradation.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    #[default]
    Normal,
    Low,
    VeryLow,
    Lower,
    AlmostGone,
}

/// Playback rate and volume the host applies to every sounding note.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AudioProfile {
    pub rate: f32,
    pub volume: f32,
}

impl FeedbackLevel {
    pub const ALL: [FeedbackLevel; 5] = [
        FeedbackLevel::Normal,
        FeedbackLevel::Low,
        FeedbackLevel::VeryLow,
        FeedbackLevel::Lower,
        FeedbackLevel::AlmostGone,
    ];

    /// Percent of the melody that must be played to reach this level.
    pub fn threshold_percent(self) -> u32 {
        match self {
            FeedbackLevel::Normal => 0,
            FeedbackLevel::Low => 25,
            FeedbackLevel::VeryLow => 50,
            FeedbackLevel::Lower => 75,
            FeedbackLevel::AlmostGone => 90,
        }
    }

    pub fn audio(self) -> AudioProfile {
        let (rate, volume) = match self {
            FeedbackLevel::Normal => (1.0, 1.0),
            FeedbackLevel::Low => (0.8, 0.7),
            FeedbackLevel::VeryLow => (0.6, 0.4),
            FeedbackLevel::Lower => (0.5, 0.2),
            FeedbackLevel::AlmostGone => (0.4, 0.1),
        };
        AudioProfile { rate, volume }
    }

    pub fn haptic(self) -> bool {
        self >= FeedbackLevel::VeryLow
    }

    /// Highest level whose threshold `cursor / len` has reached, compared in
    /// integers so 63 of 70 lands exactly on 90%.
    pub fn for_cursor(cursor: usize, len: usize) -> FeedbackLevel {
        if len == 0 {
            return FeedbackLevel::Normal;
        }
        let reached = |level: &FeedbackLevel| {
            (cursor as u64) * 100 >= (len as u64) * level.threshold_percent() as u64
        };
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(reached)
            .unwrap_or(FeedbackLevel::Normal)
    }
}

/// Result of consulting the controller after an accepted note.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedbackUpdate {
    pub previous: FeedbackLevel,
    pub level: FeedbackLevel,
    pub haptic_active: bool,
    /// True only on the advance that switched haptics on.
    pub haptic_started: bool,
}

impl FeedbackUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.level
    }

    /// Whether this advance moved the level across `level`'s threshold.
    pub fn crossed(&self, level: FeedbackLevel) -> bool {
        self.previous < level && self.level >= level
    }
}

/// Degrades audio as the performance progresses. Levels only ever get worse
/// within one attempt; `reset` starts the next attempt back at Normal.
#[derive(Debug, Default)]
pub struct ProgressFeedbackController {
    level: FeedbackLevel,
    haptic_active: bool,
}

impl ProgressFeedbackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure threshold lookup for a completion fraction.
    pub fn level_for(progress: f64) -> FeedbackLevel {
        FeedbackLevel::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| progress >= level.threshold_percent() as f64 / 100.0)
            .unwrap_or(FeedbackLevel::Normal)
    }

    pub fn on_advance(&mut self, session: &MelodySession) -> FeedbackUpdate {
        let previous = self.level;
        let reached = FeedbackLevel::for_cursor(session.cursor(), session.len());
        self.level = self.level.max(reached);

        let haptic_started = !self.haptic_active && self.level.haptic();
        self.haptic_active |= haptic_started;

        FeedbackUpdate {
            previous,
            level: self.level,
            haptic_active: self.haptic_active,
            haptic_started,
        }
    }

    /// Back to Normal with haptics off. Returns true if anything changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.level != FeedbackLevel::Normal || self.haptic_active;
        self.level = FeedbackLevel::Normal;
        self.haptic_active = false;
        changed
    }

    pub fn level(&self) -> FeedbackLevel {
        self.level
    }

    pub fn audio(&self) -> AudioProfile {
        self.level.audio()
    }

    pub fn haptic_active(&self) -> bool {
        self.haptic_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::melodies::{fur_elise, PERFORMANCE_REPEATS};
    use crate::melody::{Melody, Note};

    #[test]
    fn test_level_for_thresholds() {
        let cases = [
            (0.0, FeedbackLevel::Normal),
            (0.2499, FeedbackLevel::Normal),
            (0.25, FeedbackLevel::Low),
            (0.49, FeedbackLevel::Low),
            (0.5, FeedbackLevel::VeryLow),
            (0.75, FeedbackLevel::Lower),
            (0.8999, FeedbackLevel::Lower),
            (0.9, FeedbackLevel::AlmostGone),
            (1.0, FeedbackLevel::AlmostGone),
        ];
        for (progress, expected) in cases {
            assert_eq!(
                ProgressFeedbackController::level_for(progress),
                expected,
                "progress {}",
                progress
            );
        }
    }

    #[test]
    fn test_for_cursor_matches_fractions_on_performance_length() {
        // 70 notes: 18 is the first cursor at or past 25%, 63 hits 90% exactly
        assert_eq!(FeedbackLevel::for_cursor(17, 70), FeedbackLevel::Normal);
        assert_eq!(FeedbackLevel::for_cursor(18, 70), FeedbackLevel::Low);
        assert_eq!(FeedbackLevel::for_cursor(35, 70), FeedbackLevel::VeryLow);
        assert_eq!(FeedbackLevel::for_cursor(53, 70), FeedbackLevel::Lower);
        assert_eq!(FeedbackLevel::for_cursor(62, 70), FeedbackLevel::Lower);
        assert_eq!(FeedbackLevel::for_cursor(63, 70), FeedbackLevel::AlmostGone);
    }

    #[test]
    fn test_audio_table_and_haptics() {
        assert_eq!(FeedbackLevel::Normal.audio(), AudioProfile { rate: 1.0, volume: 1.0 });
        assert_eq!(FeedbackLevel::AlmostGone.audio(), AudioProfile { rate: 0.4, volume: 0.1 });
        let mut last = FeedbackLevel::Normal.audio();
        for level in &FeedbackLevel::ALL[1..] {
            let audio = level.audio();
            assert!(audio.rate < last.rate && audio.volume < last.volume);
            last = audio;
        }
        assert!(!FeedbackLevel::Low.haptic());
        assert!(FeedbackLevel::VeryLow.haptic());
    }

    #[test]
    fn test_monotonic_over_full_performance_with_single_transitions() {
        let melody = fur_elise().repeated(PERFORMANCE_REPEATS);
        let mut session = MelodySession::new();
        session.start(melody.clone());
        let mut controller = ProgressFeedbackController::new();

        let mut entered = Vec::new();
        let mut haptic_starts = 0;
        let mut last = FeedbackLevel::Normal;
        for note in melody.notes() {
            // A wrong note first: never moves the level
            session.submit(&Note::from("F"));
            session.submit(note);
            let update = controller.on_advance(&session);
            assert!(update.level >= last);
            last = update.level;
            if update.changed() {
                entered.push(update.level);
            }
            if update.haptic_started {
                haptic_starts += 1;
            }
        }

        assert_eq!(
            entered,
            vec![
                FeedbackLevel::Low,
                FeedbackLevel::VeryLow,
                FeedbackLevel::Lower,
                FeedbackLevel::AlmostGone
            ]
        );
        assert_eq!(haptic_starts, 1);
        assert!(controller.haptic_active());

        assert!(controller.reset());
        assert_eq!(controller.level(), FeedbackLevel::Normal);
        assert!(!controller.haptic_active());
        assert!(!controller.reset());
    }

    #[test]
    fn test_sticky_across_restart_until_reset() {
        let melody = Melody::from_names(&["C", "D", "E", "F"]).unwrap();
        let mut session = MelodySession::new();
        let mut controller = ProgressFeedbackController::new();
        session.start(melody.clone());
        session.submit(&Note::from("C"));
        session.submit(&Note::from("D"));
        assert_eq!(controller.on_advance(&session).level, FeedbackLevel::VeryLow);

        // A restarted session without reset keeps the sticky level
        session.start(melody);
        session.submit(&Note::from("C"));
        let update = controller.on_advance(&session);
        assert_eq!(update.level, FeedbackLevel::VeryLow);
        assert!(!update.changed());
        assert!(!update.haptic_started);
        assert!(update.haptic_active);
    }

    #[test]
    fn test_crossed_detects_skipped_levels() {
        let melody = Melody::from_names(&["C", "D"]).unwrap();
        let mut session = MelodySession::new();
        session.start(melody);
        let mut controller = ProgressFeedbackController::new();
        session.submit(&Note::from("C"));
        let update = controller.on_advance(&session);
        // 1 of 2 jumps straight past Low to VeryLow
        assert_eq!(update.level, FeedbackLevel::VeryLow);
        assert!(update.crossed(FeedbackLevel::Low));
        assert!(update.crossed(FeedbackLevel::VeryLow));
        assert!(!update.crossed(FeedbackLevel::Lower));
        assert!(update.haptic_started);
    }
}
