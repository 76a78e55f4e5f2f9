//! Countdown state machine for the work/break cycle.
//!
//! The engine is pure and persistence-free: it consumes one-second ticks
//! and reports phase completion through [`TickOutcome`]. Whoever drives it
//! decides what a work-phase completion means (persisting the session's
//! completion); break completions never leave the driver.

/// The two sub-intervals of the Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

/// Engine states.
///
/// `Expired` is the instant a countdown reaches zero; the engine leaves it
/// within the same tick by rolling to the next phase's `Idle`, so completion
/// is signalled on the transition edge exactly once no matter how often the
/// zero-remaining state is observed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Result of feeding one tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running (or disabled); nothing changed
    Noop,
    /// One second elapsed, countdown still in progress
    Ticked,
    /// The named phase just finished; fired exactly once per traversal
    /// from `Running` to `Expired`
    PhaseCompleted(Phase),
}

/// Single-session countdown engine cycling between work and break phases.
///
/// Phase durations are independent constants fixed at construction, so
/// pausing never loses elapsed progress and resuming a phase continues
/// from where it stopped.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    phase: Phase,
    state: TimerState,
    remaining_secs: u32,
    work_duration_secs: u32,
    break_duration_secs: u32,
    /// Set when the owning session completes externally; a disabled engine
    /// never ticks again and reports full progress.
    disabled: bool,
}

impl TimerEngine {
    /// Creates an engine at `Idle` in the work phase with the full work
    /// duration remaining. Zero durations are clamped to one second.
    pub fn new(work_duration_secs: u32, break_duration_secs: u32) -> Self {
        let work_duration_secs = work_duration_secs.max(1);
        Self {
            phase: Phase::Work,
            state: TimerState::Idle,
            remaining_secs: work_duration_secs,
            work_duration_secs,
            break_duration_secs: break_duration_secs.max(1),
            disabled: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    /// A disabled engine reports 1.0 (100% bar) regardless of remaining
    /// time.
    pub fn progress(&self) -> f32 {
        if self.disabled {
            return 1.0;
        }
        let duration = self.phase_duration(self.phase) as f32;
        (duration - self.remaining_secs as f32) / duration
    }

    /// Starts (or resumes) the countdown. Only `Idle` and `Paused` accept
    /// a start; a disabled engine ignores it.
    pub fn start(&mut self) {
        if self.disabled {
            return;
        }
        if matches!(self.state, TimerState::Idle | TimerState::Paused) {
            self.state = TimerState::Running;
        }
    }

    /// Freezes the countdown at the current remaining time.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Restores the full duration of the currently active phase, without
    /// changing phase, and stops the countdown.
    pub fn reset_stage(&mut self) {
        if self.disabled {
            return;
        }
        self.remaining_secs = self.phase_duration(self.phase);
        self.state = TimerState::Idle;
    }

    /// Stops the engine permanently. Used when the owning session is
    /// observed `Completed` externally: no further ticking is permitted
    /// and progress pins at 100%.
    pub fn disable(&mut self) {
        self.disabled = true;
        self.state = TimerState::Idle;
    }

    /// Advances the countdown by one second.
    ///
    /// The tick that reaches zero transitions `Running -> Expired`, emits
    /// `PhaseCompleted` for the phase that just ended, then rolls the
    /// engine to the next phase at `Idle` with that phase's full duration.
    pub fn tick(&mut self) -> TickOutcome {
        if self.disabled || self.state != TimerState::Running {
            return TickOutcome::Noop;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Ticked;
        }

        self.state = TimerState::Expired;
        let finished = self.phase;
        self.roll_phase();
        TickOutcome::PhaseCompleted(finished)
    }

    fn roll_phase(&mut self) {
        debug_assert_eq!(self.state, TimerState::Expired);
        self.phase = match self.phase {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        };
        self.remaining_secs = self.phase_duration(self.phase);
        self.state = TimerState::Idle;
    }

    fn phase_duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration_secs,
            Phase::Break => self.break_duration_secs,
        }
    }
}
