use std::mem;

use crate::clock::{Millis, Pulse, Timer};
use crate::config::Pacing;
use crate::content::scripts;
use crate::content::Lesson;
use crate::dialogue::{DialogueEvent, DialogueScript, DialogueSequencer};
use crate::feedback::{FeedbackLevel, FeedbackUpdate, ProgressFeedbackController};
use crate::flow::presenter::{HapticCommand, Presenter};
use crate::flow::stage::{Choice, Stage};
use crate::melody::{MelodySession, Note};
use crate::retry::{Decision, RetryGate};

const ACCEPT: &[Choice] = &[Choice::Accept];
const LEARN: &[Choice] = &[Choice::Learn];
const READY_OR_NOT: &[Choice] = &[Choice::Ready, Choice::NotReady];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    Fresh,
    Retry,
}

/// What happens once the running narration completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Then {
    Nothing,
    Offer(&'static [Choice]),
    StartSession,
    Enter(Stage, Entry),
    CloseOut,
}

// Declaration order breaks ties between timers due at the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    Dialogue,
    Closing,
    Haptic,
}

/// Runs the whole tutorial: Intro → Tutorial → Gate → Performance → End.
///
/// The host feeds in time (`tick`), key presses and button choices; the
/// controller answers through its [`Presenter`]. Leaving a stage always tears
/// down its narration, session, haptic pulse and pending timers before the
/// next stage schedules anything.
pub struct StageFlowController<P: Presenter> {
    presenter: P,
    pacing: Pacing,
    lesson: Lesson,
    now: Millis,
    stage: Option<Stage>,

    dialogue: DialogueSequencer,
    then: Then,
    prompt_on_interrupt: Option<&'static [Choice]>,
    offered: Vec<Choice>,

    session: MelodySession,
    feedback: ProgressFeedbackController,
    gate: RetryGate,
    haptic: Pulse,
    closing: Timer,
}

impl<P: Presenter> StageFlowController<P> {
    pub fn new(presenter: P, pacing: Pacing, lesson: Lesson) -> Self {
        let pacing = pacing.sanitized();
        StageFlowController {
            presenter,
            dialogue: DialogueSequencer::new(&pacing),
            haptic: Pulse::new(pacing.haptic_period_ms),
            pacing,
            lesson,
            now: 0,
            stage: None,
            then: Then::Nothing,
            prompt_on_interrupt: None,
            offered: Vec::new(),
            session: MelodySession::new(),
            feedback: ProgressFeedbackController::new(),
            gate: RetryGate,
            closing: Timer::new(),
        }
    }

    /// Begin (or restart) at the Intro stage.
    pub fn start(&mut self, now: Millis) {
        self.now = now;
        self.enter(Stage::Intro, Entry::Fresh);
    }

    /// Advance the virtual clock to `now`, firing every timer due on the way
    /// in chronological order. Time never runs backwards.
    pub fn tick(&mut self, now: Millis) {
        while let Some((due, source)) = self.next_timer() {
            if due > now {
                break;
            }
            self.now = self.now.max(due);
            match source {
                Source::Dialogue => self.fire_dialogue(due),
                Source::Closing => {
                    if self.closing.fire(due).is_some() {
                        self.finish();
                    }
                }
                Source::Haptic => {
                    if self.haptic.fire(due).is_some() {
                        self.presenter.haptic(HapticCommand::Pulse);
                    }
                }
            }
        }
        self.now = self.now.max(now);
    }

    /// Returns false when `choice` is not currently on offer.
    pub fn handle_user_choice(&mut self, choice: Choice) -> bool {
        if !self.offered.contains(&choice) {
            console_warn!("ignoring choice {:?}; offered {:?}", choice, self.offered);
            return false;
        }
        self.withdraw_choices();

        match (self.stage, choice) {
            (Some(Stage::Intro), Choice::Accept) => {
                // Cuts the greeting short if it is still running
                self.narrate(scripts::INTRO_WELCOME, Then::Offer(LEARN));
            }
            (Some(Stage::Intro), Choice::Learn) => self.enter(Stage::Tutorial, Entry::Fresh),
            (Some(Stage::Gate), Choice::Ready) => {
                self.narrate(scripts::GATE_READY, Then::Enter(Stage::Performance, Entry::Fresh))
            }
            (Some(Stage::Gate), Choice::NotReady) => {
                self.narrate(scripts::GATE_PRACTICE, Then::Enter(Stage::Tutorial, Entry::Fresh))
            }
            _ => return false,
        }
        true
    }

    pub fn handle_note_pressed(&mut self, note: Note) {
        if self.stage.is_none() {
            return;
        }
        self.presenter.play_note(&note, self.feedback.audio());
        if !self.session.is_active() {
            return;
        }

        let outcome = self.session.submit(&note);
        self.presenter.key_feedback(&note, outcome.accepted);
        if !outcome.accepted {
            return;
        }

        if self.stage == Some(Stage::Performance) {
            let update = self.feedback.on_advance(&self.session);
            self.apply_feedback(update);
        }

        if outcome.completed {
            self.session_completed();
        } else {
            self.presenter.highlight_key(self.session.current_expected_note());
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage.is_some()
    }

    pub fn is_narrating(&self) -> bool {
        self.dialogue.is_running()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn session(&self) -> &MelodySession {
        &self.session
    }

    pub fn feedback_level(&self) -> FeedbackLevel {
        self.feedback.level()
    }

    pub fn haptic_running(&self) -> bool {
        self.haptic.is_running()
    }

    pub fn offered_choices(&self) -> &[Choice] {
        &self.offered
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    fn next_timer(&self) -> Option<(Millis, Source)> {
        [
            (self.dialogue.next_due(), Source::Dialogue),
            (self.closing.due(), Source::Closing),
            (self.haptic.due(), Source::Haptic),
        ]
        .into_iter()
        .filter_map(|(due, source)| due.map(|d| (d, source)))
        .min()
    }

    fn fire_dialogue(&mut self, due: Millis) {
        let run = self.dialogue.run_id();
        let mut events = Vec::new();
        self.dialogue.fire(due, &mut events);

        for event in events {
            // A handler replaced the script; the rest of this batch is stale
            if self.dialogue.run_id() != run {
                break;
            }
            match event {
                DialogueEvent::Revealed { text, complete, .. } => {
                    self.presenter.show_text(&text, complete)
                }
                DialogueEvent::Interrupted { .. } => {
                    if let Some(choices) = self.prompt_on_interrupt.take() {
                        self.offer(choices);
                    }
                }
                DialogueEvent::PauseElapsed { .. } => {}
                DialogueEvent::Completed => {
                    let then = mem::replace(&mut self.then, Then::Nothing);
                    self.follow(then);
                }
            }
        }
    }

    fn follow(&mut self, then: Then) {
        match then {
            Then::Nothing => {}
            Then::Offer(choices) => self.offer(choices),
            Then::StartSession => self.start_session(),
            Then::Enter(stage, entry) => self.enter(stage, entry),
            Then::CloseOut => {
                self.closing.arm(self.now, self.pacing.closing_delay_ms);
            }
        }
    }

    fn narrate(&mut self, lines: &[&str], then: Then) {
        self.then = then;
        self.prompt_on_interrupt = None;
        self.dialogue.run(DialogueScript::from_lines(lines), self.now);
    }

    fn offer(&mut self, choices: &'static [Choice]) {
        self.offered = choices.to_vec();
        self.presenter.offer_choices(choices);
    }

    fn withdraw_choices(&mut self) {
        if !self.offered.is_empty() {
            self.offered.clear();
            self.presenter.withdraw_choices();
        }
    }

    fn stop_haptics(&mut self) {
        if self.haptic.stop() {
            self.presenter.haptic(HapticCommand::Stop);
        }
    }

    fn reset_audio(&mut self) {
        if self.feedback.reset() {
            let level = self.feedback.level();
            self.presenter.apply_audio(level, level.audio());
        }
    }

    /// Silence everything the current stage owns.
    fn teardown(&mut self) {
        self.dialogue.cancel();
        self.then = Then::Nothing;
        self.prompt_on_interrupt = None;
        self.closing.cancel();
        self.stop_haptics();
        self.withdraw_choices();
        if self.session.is_active() {
            self.presenter.highlight_key(None);
        }
        self.session = MelodySession::new();
        self.reset_audio();
    }

    fn enter(&mut self, stage: Stage, entry: Entry) {
        if let Some(current) = self.stage {
            if stage != Stage::Intro && !current.can_enter(stage) {
                console_warn!("unexpected transition {} -> {}", current, stage);
            }
        }
        self.teardown();
        console_log!("entering {} ({:?})", stage, entry);
        self.stage = Some(stage);
        self.presenter.stage_changed(stage);

        match stage {
            Stage::Intro => {
                self.narrate(scripts::INTRO_GREETING, Then::Nothing);
                self.dialogue.interrupt_at(scripts::INTRO_PROMPT_AT);
                self.prompt_on_interrupt = Some(ACCEPT);
            }
            Stage::Tutorial => {
                let lines = match entry {
                    Entry::Fresh => scripts::TUTORIAL_INTRO,
                    Entry::Retry => scripts::TUTORIAL_RETRY,
                };
                self.narrate(lines, Then::StartSession);
            }
            Stage::Gate => self.narrate(scripts::GATE_PASSED, Then::Offer(READY_OR_NOT)),
            Stage::Performance => {
                let level = self.feedback.level();
                self.presenter.apply_audio(level, level.audio());
                self.narrate(scripts::PERFORMANCE_INTRO, Then::StartSession);
            }
            Stage::End => self.narrate(scripts::CLOSING, Then::CloseOut),
        }
    }

    fn start_session(&mut self) {
        let melody = match self.stage {
            Some(Stage::Tutorial) => self.lesson.tutorial.clone(),
            Some(Stage::Performance) => {
                self.reset_audio();
                self.lesson.performance.clone()
            }
            _ => return,
        };
        console_log!("session started: {} notes", melody.len());
        self.session.start(melody);
        self.presenter.highlight_key(self.session.current_expected_note());
    }

    fn apply_feedback(&mut self, update: FeedbackUpdate) {
        if update.changed() {
            console_log!("feedback {:?} -> {:?}", update.previous, update.level);
            self.presenter.apply_audio(update.level, update.level.audio());
        }
        if update.crossed(FeedbackLevel::Low) {
            self.narrate(scripts::PERFORMANCE_FADING, Then::Nothing);
        }
        if update.haptic_started {
            console_log!("haptics on at {:?}", update.level);
        }
        if update.haptic_active && self.haptic.start(self.now) {
            self.presenter.haptic(HapticCommand::Start {
                period_ms: self.haptic.period(),
            });
        }
    }

    fn session_completed(&mut self) {
        self.presenter.highlight_key(None);
        let result = self.session.result();

        match self.stage {
            Some(Stage::Tutorial) => {
                let decision = self.gate.evaluate(&result);
                console_log!("tutorial finished with {} mistakes: {:?}", result.mistakes, decision);
                match decision {
                    Decision::Proceed => self.enter(Stage::Gate, Entry::Fresh),
                    Decision::Retry => self.enter(Stage::Tutorial, Entry::Retry),
                }
            }
            Some(Stage::Performance) => {
                console_log!("performance finished with {} mistakes", result.mistakes);
                self.stop_haptics();
                self.reset_audio();
                self.narrate(scripts::PERFORMANCE_OUTRO, Then::Enter(Stage::End, Entry::Fresh));
            }
            _ => {}
        }
    }

    fn finish(&mut self) {
        self.teardown();
        self.stage = None;
        console_log!("tutorial finished; returning to menu");
        self.presenter.return_to_menu();
    }
}
