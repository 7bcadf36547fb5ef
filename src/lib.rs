//! Core of a narrated piano tutorial: a guide teaches a melody, checks the
//! attempt, then lets the player perform it while sound fades and haptics
//! take over.
//!
//! Rendering, audio and haptics belong to the host. From JavaScript:
//!
//! ```javascript
//! import init, { Tutor } from './echoes_rs.js';
//!
//! await init();
//! const tutor = new Tutor({
//!     show_text: (text, complete) => caption.textContent = text,
//!     offer_choices: (choices) => renderButtons(choices),
//!     play_note: (note, audio) => piano.play(note, audio.rate, audio.volume),
//!     return_to_menu: () => router.home(),
//! }, { char_interval_ms: 50 });
//! tutor.start(performance.now());
//! requestAnimationFrame(function frame(t) { tutor.tick(t); requestAnimationFrame(frame); });
//! ```

use wasm_bindgen::prelude::*;

/// Log to the browser console; compiled out off-wasm.
#[cfg(target_arch = "wasm32")]
macro_rules! console_log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&format!($($t)*).into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! console_log {
    ($($t:tt)*) => {{
        let _ = format_args!($($t)*);
    }}
}

#[cfg(target_arch = "wasm32")]
macro_rules! console_warn {
    ($($t:tt)*) => {
        web_sys::console::warn_1(&format!($($t)*).into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! console_warn {
    ($($t:tt)*) => {{
        let _ = format_args!($($t)*);
    }}
}

pub mod clock;
pub mod config;
pub mod content;
pub mod dialogue;
pub mod error;
pub mod feedback;
pub mod flow;
pub mod melody;
pub mod parser;
pub mod retry;

use serde::Serialize;
use wasm_bindgen::JsCast;

use clock::Millis;
use config::Pacing;
use content::Lesson;
use feedback::{AudioProfile, FeedbackLevel};
use flow::{Choice, HapticCommand, Presenter, Stage, StageFlowController};
use melody::Note;

pub use error::ContentError;

#[cfg(feature = "console_error_panic_hook")]
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(e: ContentError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn pacing_from_js(pacing: JsValue) -> Result<Pacing, JsValue> {
    if pacing.is_null() || pacing.is_undefined() {
        return Ok(Pacing::default());
    }
    serde_wasm_bindgen::from_value(pacing).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn millis(now: f64) -> Millis {
    if now.is_finite() && now > 0.0 {
        now as Millis
    } else {
        0
    }
}

/// Forwards presenter calls to optional functions on a JS object, keyed by
/// the trait method names. Missing callbacks are skipped.
struct JsPresenter {
    callbacks: JsValue,
}

impl JsPresenter {
    fn call(&self, name: &str, args: &[JsValue]) {
        let Ok(value) = js_sys::Reflect::get(&self.callbacks, &JsValue::from_str(name)) else {
            return;
        };
        let Some(function) = value.dyn_ref::<js_sys::Function>() else {
            return;
        };
        let args: js_sys::Array = args.iter().collect();
        if let Err(err) = function.apply(&self.callbacks, &args) {
            console_warn!("{} callback threw: {:?}", name, err);
        }
    }

    fn call_with<T: Serialize>(&self, name: &str, value: &T) {
        match to_js(value) {
            Ok(js) => self.call(name, &[js]),
            Err(err) => console_warn!("could not encode {} payload: {:?}", name, err),
        }
    }
}

impl Presenter for JsPresenter {
    fn show_text(&mut self, text: &str, complete: bool) {
        self.call("show_text", &[JsValue::from_str(text), JsValue::from_bool(complete)]);
    }

    fn offer_choices(&mut self, choices: &[Choice]) {
        let buttons: Vec<ChoiceButton> = choices.iter().map(|&c| ChoiceButton::from(c)).collect();
        self.call_with("offer_choices", &buttons);
    }

    fn withdraw_choices(&mut self) {
        self.call("withdraw_choices", &[]);
    }

    fn highlight_key(&mut self, note: Option<&Note>) {
        let arg = note.map_or(JsValue::NULL, |n| JsValue::from_str(n.as_str()));
        self.call("highlight_key", &[arg]);
    }

    fn key_feedback(&mut self, note: &Note, accepted: bool) {
        self.call(
            "key_feedback",
            &[JsValue::from_str(note.as_str()), JsValue::from_bool(accepted)],
        );
    }

    fn play_note(&mut self, note: &Note, audio: AudioProfile) {
        match to_js(&audio) {
            Ok(js) => self.call("play_note", &[JsValue::from_str(note.as_str()), js]),
            Err(err) => console_warn!("could not encode audio profile: {:?}", err),
        }
    }

    fn apply_audio(&mut self, level: FeedbackLevel, audio: AudioProfile) {
        match (to_js(&level), to_js(&audio)) {
            (Ok(level), Ok(audio)) => self.call("apply_audio", &[level, audio]),
            _ => console_warn!("could not encode feedback level {:?}", level),
        }
    }

    fn haptic(&mut self, command: HapticCommand) {
        self.call_with("haptic", &command);
    }

    fn stage_changed(&mut self, stage: Stage) {
        self.call("stage_changed", &[JsValue::from_str(stage.as_str())]);
    }

    fn return_to_menu(&mut self) {
        self.call("return_to_menu", &[]);
    }
}

#[derive(Serialize)]
struct ChoiceButton {
    id: &'static str,
    label: &'static str,
}

impl From<Choice> for ChoiceButton {
    fn from(choice: Choice) -> Self {
        ChoiceButton {
            id: choice.id(),
            label: choice.label(),
        }
    }
}

/// One run of the tutorial, driven by the host's clock and input.
#[wasm_bindgen]
pub struct Tutor {
    flow: StageFlowController<JsPresenter>,
}

impl Tutor {
    fn with_lesson(callbacks: JsValue, pacing: Pacing, lesson: Lesson) -> Tutor {
        Tutor {
            flow: StageFlowController::new(JsPresenter { callbacks }, pacing, lesson),
        }
    }
}

#[wasm_bindgen]
impl Tutor {
    /// `callbacks` is an object of optional presenter functions; `pacing` may
    /// be omitted or partial.
    #[wasm_bindgen(constructor)]
    pub fn new(callbacks: JsValue, pacing: JsValue) -> Result<Tutor, JsValue> {
        Ok(Self::with_lesson(callbacks, pacing_from_js(pacing)?, Lesson::default()))
    }

    /// Teach the first part of a MusicXML score instead of the built-in song.
    pub fn with_musicxml(
        callbacks: JsValue,
        pacing: JsValue,
        xml: &str,
        base_octave: i32,
    ) -> Result<Tutor, JsValue> {
        let pacing = pacing_from_js(pacing)?;
        let parsed = parser::musicxml::parse_melody(xml, base_octave).map_err(js_err)?;
        console_log!(
            "loaded {} ({} notes)",
            parsed.title.as_deref().unwrap_or("untitled score"),
            parsed.melody.len()
        );
        Ok(Self::with_lesson(callbacks, pacing, Lesson::from_melody(parsed.melody)))
    }

    pub fn start(&mut self, now: f64) {
        self.flow.start(millis(now));
    }

    pub fn tick(&mut self, now: f64) {
        self.flow.tick(millis(now));
    }

    /// Returns false if `id` is unknown or not currently offered.
    pub fn choose(&mut self, id: &str) -> bool {
        match id.parse::<Choice>() {
            Ok(choice) => self.flow.handle_user_choice(choice),
            Err(err) => {
                console_warn!("{}", err);
                false
            }
        }
    }

    pub fn press(&mut self, note: &str) {
        self.flow.handle_note_pressed(Note::from(note));
    }

    #[wasm_bindgen(getter)]
    pub fn stage(&self) -> Option<String> {
        self.flow.stage().map(|s| s.as_str().to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.flow.is_active()
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.flow.session().progress()
    }

    #[wasm_bindgen(getter)]
    pub fn mistakes(&self) -> u32 {
        self.flow.session().mistakes()
    }

    #[wasm_bindgen(getter)]
    pub fn expected_note(&self) -> Option<String> {
        self.flow
            .session()
            .current_expected_note()
            .map(|n| n.to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn level(&self) -> Result<JsValue, JsValue> {
        to_js(&self.flow.feedback_level())
    }

    #[wasm_bindgen(getter)]
    pub fn choices(&self) -> Vec<String> {
        self.flow
            .offered_choices()
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }
}

/// The on-screen keyboard: white keys in order, black keys with the white
/// slot they sit after.
#[wasm_bindgen]
pub fn keyboard_layout() -> Result<JsValue, JsValue> {
    to_js(&content::melodies::keyboard_layout())
}

#[wasm_bindgen]
pub fn tutorial_melody() -> Result<JsValue, JsValue> {
    to_js(&content::melodies::fur_elise())
}

#[derive(Serialize)]
struct FeedbackRow {
    level: FeedbackLevel,
    threshold_percent: u32,
    #[serde(flatten)]
    audio: AudioProfile,
    haptic: bool,
}

/// How the performance degrades as the melody progresses.
#[wasm_bindgen]
pub fn feedback_table() -> Result<JsValue, JsValue> {
    let rows: Vec<FeedbackRow> = FeedbackLevel::ALL
        .iter()
        .map(|&level| FeedbackRow {
            level,
            threshold_percent: level.threshold_percent(),
            audio: level.audio(),
            haptic: level.haptic(),
        })
        .collect();
    to_js(&rows)
}

#[wasm_bindgen]
pub fn dialogue_scripts() -> Result<JsValue, JsValue> {
    to_js(&content::scripts::all_scripts())
}

/// Parse a MusicXML document into keyboard note names.
#[wasm_bindgen]
pub fn parse_melody_musicxml(xml: &str, base_octave: i32) -> Result<JsValue, JsValue> {
    let parsed = parser::musicxml::parse_melody(xml, base_octave).map_err(js_err)?;
    to_js(&parsed)
}
