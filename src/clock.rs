/// Virtual milliseconds. The host owns the real clock and feeds it in through
/// `StageFlowController::tick`.
pub type Millis = u64;

/// Identifies one arming of a [`Timer`]. Re-arming or cancelling bumps the
/// generation, so a handle from an earlier arming never matches again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    pub generation: u64,
    pub due: Millis,
}

/// A one-shot timer owned by the component that schedules it.
#[derive(Debug, Default)]
pub struct Timer {
    generation: u64,
    pending: Option<TimerHandle>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the timer `delay` ms after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Millis, delay: Millis) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle {
            generation: self.generation,
            due: now.saturating_add(delay),
        };
        self.pending = Some(handle);
        handle
    }

    /// Returns true if a pending deadline was dropped.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.pending.take().is_some()
    }

    pub fn due(&self) -> Option<Millis> {
        self.pending.map(|h| h.due)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `handle` is the arming currently pending.
    #[cfg(test)]
    fn is_current(&self, handle: TimerHandle) -> bool {
        self.pending == Some(handle)
    }

    /// Disarm and return the pending handle if it is due at `now`.
    pub fn fire(&mut self, now: Millis) -> Option<TimerHandle> {
        match self.pending {
            Some(handle) if handle.due <= now => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

/// Fixed-period repeating timer. Each beat is scheduled from the previous
/// deadline, not from the time it was observed, so late ticks do not drift.
#[derive(Debug)]
pub struct Pulse {
    period: Millis,
    timer: Timer,
}

impl Pulse {
    pub fn new(period: Millis) -> Self {
        Self {
            period: period.max(1),
            timer: Timer::new(),
        }
    }

    pub fn period(&self) -> Millis {
        self.period
    }

    /// Start beating; the first beat lands one period after `now`.
    /// Returns false if the pulse was already running.
    pub fn start(&mut self, now: Millis) -> bool {
        if self.timer.is_armed() {
            return false;
        }
        self.timer.arm(now, self.period);
        true
    }

    /// Returns true if the pulse was running.
    pub fn stop(&mut self) -> bool {
        self.timer.cancel()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn due(&self) -> Option<Millis> {
        self.timer.due()
    }

    /// Fire one beat if due, re-arming for the next. Returns the beat's time.
    pub fn fire(&mut self, now: Millis) -> Option<Millis> {
        let handle = self.timer.fire(now)?;
        self.timer.arm(handle.due, self.period);
        Some(handle.due)
    }
}
