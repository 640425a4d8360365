//! Phase timer state machine.
//!
//! The engine is a pure state machine. It owns no thread and no clock - the
//! controller feeds it one-second ticks from a countdown driver and forwards
//! the returned events.
//!
//! ## State Transitions
//!
//! ```text
//! FocusPaused <-> FocusRunning --expiry--> BreakRunning <-> BreakPaused
//!      ^                                        |
//!      +-------- reset / skip / expiry ---------+
//! ```
//!
//! ## Driver epochs
//!
//! Every time the countdown is canceled or re-armed the epoch advances. Ticks
//! carry the epoch of the driver that produced them, and a tick from any other
//! epoch is discarded, so a canceled driver can never decrement the clock.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(PhaseDurations::default());
//! timer.start_focus_session();
//! // On every driver tick:
//! let events = timer.tick(timer.epoch(), TICK_INTERVAL_MS);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::display::format_remaining;
use super::messages::MessagePicker;
use super::phase::{Phase, PhaseDurations};
use crate::events::Event;
use crate::notify::NotificationRequest;

/// The four observable states; the running flag splits each phase in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    FocusRunning,
    FocusPaused,
    BreakRunning,
    BreakPaused,
}

/// Immutable snapshot published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_ms: u64,
    pub is_running: bool,
    pub skip_visible: bool,
    /// `remaining_ms` rendered as `MM:SS`.
    pub display: String,
}

impl TimerState {
    pub fn status(&self) -> TimerStatus {
        match (self.phase, self.is_running) {
            (Phase::Focus, true) => TimerStatus::FocusRunning,
            (Phase::Focus, false) => TimerStatus::FocusPaused,
            (Phase::Break, true) => TimerStatus::BreakRunning,
            (Phase::Break, false) => TimerStatus::BreakPaused,
        }
    }
}

/// Core phase timer.
#[derive(Debug)]
pub struct PhaseTimer {
    durations: PhaseDurations,
    phase: Phase,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    running: bool,
    skip_visible: bool,
    /// Identifies the one countdown driver allowed to tick.
    epoch: u64,
    messages: MessagePicker,
}

impl PhaseTimer {
    /// Create a paused timer at the start of a focus phase.
    ///
    /// Durations that are zero or not a whole number of ticks are replaced by
    /// [`PhaseDurations::default`].
    pub fn new(durations: PhaseDurations) -> Self {
        Self::with_messages(durations, MessagePicker::new())
    }

    pub fn with_messages(durations: PhaseDurations, messages: MessagePicker) -> Self {
        let durations = if durations.is_valid() {
            durations
        } else {
            tracing::warn!(?durations, "invalid phase durations; using defaults");
            PhaseDurations::default()
        };
        let mut timer = Self {
            durations,
            phase: Phase::Focus,
            remaining_ms: durations.focus_ms(),
            running: false,
            skip_visible: false,
            epoch: 0,
            messages,
        };
        timer.enter_phase(Phase::Focus);
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn skip_visible(&self) -> bool {
        self.skip_visible
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn display(&self) -> String {
        format_remaining(self.remaining_ms)
    }

    pub fn status(&self) -> TimerStatus {
        self.state().status()
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            is_running: self.running,
            skip_visible: self.skip_visible,
            display: self.display(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter a fresh focus phase and start counting down.
    ///
    /// Valid from any state.
    pub fn start_focus_session(&mut self) -> Vec<Event> {
        self.cancel_countdown();
        let mut events = vec![self.enter_phase_with_notification(Phase::Focus)];
        events.extend(self.start_timer());
        events
    }

    /// Start or resume the countdown from the current remaining time.
    pub fn start_timer(&mut self) -> Vec<Event> {
        self.epoch = self.epoch.wrapping_add(1);
        self.running = true;
        vec![Event::TimerStarted {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        }]
    }

    /// Stop the countdown, keeping the remaining time for an exact resume.
    pub fn pause_timer(&mut self) -> Vec<Event> {
        if !self.cancel_countdown() {
            return Vec::new();
        }
        vec![Event::TimerPaused {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        }]
    }

    /// Back to a paused focus phase. Raises no notification.
    pub fn reset_timer(&mut self) -> Vec<Event> {
        self.cancel_countdown();
        self.enter_phase(Phase::Focus);
        vec![Event::TimerReset { at: Utc::now() }]
    }

    /// Cut a break short. Does nothing outside a break.
    pub fn skip_break(&mut self) -> Vec<Event> {
        if self.phase != Phase::Break {
            return Vec::new();
        }
        let mut events = vec![Event::BreakSkipped {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        }];
        events.extend(self.start_focus_session());
        events
    }

    /// Apply one driver tick.
    ///
    /// Ticks from a stale epoch, or while paused, are ignored. Reaching zero
    /// transitions to the next phase within the same call.
    pub fn tick(&mut self, epoch: u64, elapsed_ms: u64) -> Vec<Event> {
        if epoch != self.epoch || !self.running {
            tracing::trace!(epoch, current = self.epoch, "discarding stale tick");
            return Vec::new();
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms > 0 {
            return vec![Event::Tick {
                phase: self.phase,
                remaining_ms: self.remaining_ms,
                display: self.display(),
                at: Utc::now(),
            }];
        }

        self.expire()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expire(&mut self) -> Vec<Event> {
        self.running = false;
        let finished = self.phase;
        tracing::debug!(phase = %finished, "phase expired");

        let mut events = vec![Event::PhaseExpired {
            phase: finished,
            at: Utc::now(),
        }];
        events.extend(match finished.next() {
            Phase::Break => self.start_break_session(),
            Phase::Focus => self.start_focus_session(),
        });
        events
    }

    fn start_break_session(&mut self) -> Vec<Event> {
        self.cancel_countdown();
        let mut events = vec![self.enter_phase_with_notification(Phase::Break)];
        events.extend(self.start_timer());
        events
    }

    /// Returns whether a countdown was actually running.
    fn cancel_countdown(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.running = false;
        true
    }

    /// Sole place where phase, remaining time and skip visibility are set.
    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining_ms = self.durations.for_phase(phase);
        self.skip_visible = phase == Phase::Break;
    }

    fn enter_phase_with_notification(&mut self, phase: Phase) -> Event {
        self.enter_phase(phase);
        let notification = NotificationRequest::for_phase(phase, self.messages.pick(phase));
        Event::PhaseStarted {
            phase,
            duration_ms: self.remaining_ms,
            notification,
            at: Utc::now(),
        }
    }
}
