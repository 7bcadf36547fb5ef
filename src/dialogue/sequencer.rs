use std::collections::BTreeSet;

use crate::clock::{Millis, Timer};
use crate::config::Pacing;
use crate::dialogue::DialogueScript;

/// Something the presentation layer (or the owning stage) should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueEvent {
    /// Text of message `index` revealed so far; `complete` on its last character.
    Revealed {
        index: usize,
        text: String,
        complete: bool,
    },
    /// Message `index` finished revealing and a hook was registered for it.
    Interrupted { index: usize },
    PauseElapsed { index: usize },
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Revealing { index: usize, shown: usize },
    Pausing { index: usize },
    Finishing,
}

/// Typewriter-style narration driven by a single owned timer.
///
/// Every step of a run is one timer firing: a character, the pause after a
/// message, and finally completion. Starting a new run or cancelling drops the
/// pending timer, so nothing from an abandoned run can be delivered later.
#[derive(Debug)]
pub struct DialogueSequencer {
    char_interval: Millis,
    message_pause: Millis,
    script: DialogueScript,
    state: State,
    timer: Timer,
    interrupts: BTreeSet<usize>,
    run_id: u64,
}

impl DialogueSequencer {
    pub fn new(pacing: &Pacing) -> Self {
        DialogueSequencer {
            char_interval: pacing.char_interval_ms.max(1),
            message_pause: pacing.message_pause_ms,
            script: DialogueScript::default(),
            state: State::Idle,
            timer: Timer::new(),
            interrupts: BTreeSet::new(),
            run_id: 0,
        }
    }

    /// Start `script` from its first message, abandoning any run in progress.
    pub fn run(&mut self, script: DialogueScript, now: Millis) {
        self.cancel();
        self.run_id += 1;
        self.script = script;
        if self.script.is_empty() {
            self.state = State::Finishing;
            self.timer.arm(now, 0);
        } else {
            self.state = State::Revealing { index: 0, shown: 0 };
            self.timer.arm(now, self.char_interval);
        }
    }

    /// Emit [`DialogueEvent::Interrupted`] once message `index` of the current
    /// run is fully shown. The run carries on regardless.
    pub fn interrupt_at(&mut self, index: usize) {
        if self.is_running() {
            self.interrupts.insert(index);
        }
    }

    /// Returns true if a run was in progress.
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel();
        self.interrupts.clear();
        let was_running = self.is_running();
        self.state = State::Idle;
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.state != State::Idle
    }

    /// Bumped by every `run`; lets an owner notice that handling an event
    /// replaced the script it came from.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn script(&self) -> &DialogueScript {
        &self.script
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timer.due()
    }

    /// Process the pending step if it is due at `now`, appending what happened
    /// to `events`. Returns the time the step was scheduled for.
    pub fn fire(&mut self, now: Millis, events: &mut Vec<DialogueEvent>) -> Option<Millis> {
        let at = self.timer.fire(now)?.due;

        match self.state {
            State::Idle => return None,
            State::Revealing { index, shown } => {
                let message = self.script.message(index).unwrap_or_default();
                let total = message.chars().count();
                let shown = (shown + 1).min(total);
                let complete = shown == total;
                events.push(DialogueEvent::Revealed {
                    index,
                    text: message.chars().take(shown).collect(),
                    complete,
                });
                if complete {
                    if self.interrupts.contains(&index) {
                        events.push(DialogueEvent::Interrupted { index });
                    }
                    self.state = State::Pausing { index };
                    self.timer.arm(at, self.message_pause);
                } else {
                    self.state = State::Revealing { index, shown };
                    self.timer.arm(at, self.char_interval);
                }
            }
            State::Pausing { index } => {
                events.push(DialogueEvent::PauseElapsed { index });
                if index + 1 < self.script.len() {
                    self.state = State::Revealing {
                        index: index + 1,
                        shown: 0,
                    };
                    self.timer.arm(at, self.char_interval);
                } else {
                    self.state = State::Finishing;
                    self.timer.arm(at, 0);
                }
            }
            State::Finishing => {
                events.push(DialogueEvent::Completed);
                self.state = State::Idle;
                self.interrupts.clear();
            }
        }

        Some(at)
    }

    /// Fire every step due up to `now`, tagging each event with its time.
    #[cfg(test)]
    fn advance_to(&mut self, now: Millis) -> Vec<(Millis, DialogueEvent)> {
        let mut timeline = Vec::new();
        let mut batch = Vec::new();
        while let Some(at) = self.fire(now, &mut batch) {
            timeline.extend(batch.drain(..).map(|e| (at, e)));
        }
        timeline
    }
}
