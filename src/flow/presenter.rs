use serde::Serialize;

use crate::clock::Millis;
use crate::feedback::{AudioProfile, FeedbackLevel};
use crate::flow::stage::{Choice, Stage};
use crate::melody::Note;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HapticCommand {
    Start { period_ms: Millis },
    Pulse,
    Stop,
}

/// Everything the tutorial asks of the outside world: drawing text and keys,
/// sound, haptics and navigation. All methods default to doing nothing so a
/// host only implements the sinks it has.
pub trait Presenter {
    fn show_text(&mut self, _text: &str, _complete: bool) {}

    fn offer_choices(&mut self, _choices: &[Choice]) {}

    fn withdraw_choices(&mut self) {}

    /// `None` clears the highlight.
    fn highlight_key(&mut self, _note: Option<&Note>) {}

    /// Flash a pressed key as right or wrong.
    fn key_feedback(&mut self, _note: &Note, _accepted: bool) {}

    fn play_note(&mut self, _note: &Note, _audio: AudioProfile) {}

    /// Retune whatever is currently sounding.
    fn apply_audio(&mut self, _level: FeedbackLevel, _audio: AudioProfile) {}

    fn haptic(&mut self, _command: HapticCommand) {}

    fn stage_changed(&mut self, _stage: Stage) {}

    fn return_to_menu(&mut self) {}
}
