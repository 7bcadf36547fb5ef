use serde::{Deserialize, Serialize};

use crate::clock::Millis;

/// Timing of narration and effects. Hosts may override any field; missing
/// fields keep their defaults.
///
/// The narrative thresholds (mistake allowance, feedback levels) are part of
/// the story and deliberately live elsewhere as constants.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Pacing {
    /// Delay before each revealed character.
    pub char_interval_ms: Millis,
    /// Pause after a message is fully revealed.
    pub message_pause_ms: Millis,
    /// Hold on the last closing line before returning to the menu.
    pub closing_delay_ms: Millis,
    /// Cadence of the haptic pulse during the performance.
    pub haptic_period_ms: Millis,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            char_interval_ms: 50,
            message_pause_ms: 1000,
            closing_delay_ms: 3000,
            haptic_period_ms: 300,
        }
    }
}

impl Pacing {
    /// Zero intervals would reveal a whole script in one tick; clamp to 1 ms.
    pub fn sanitized(mut self) -> Self {
        self.char_interval_ms = self.char_interval_ms.max(1);
        self.haptic_period_ms = self.haptic_period_ms.max(1);
        self
    }
}
