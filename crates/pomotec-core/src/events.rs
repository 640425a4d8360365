use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::NotificationRequest;
use crate::timer::Phase;

/// Every state change of the phase timer produces an Event.
/// The UI subscribes to them; the notification sink consumes `PhaseStarted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseStarted {
        phase: Phase,
        duration_ms: u64,
        notification: NotificationRequest,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Break cut short by the user; a focus phase follows immediately.
    BreakSkipped {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Tick {
        phase: Phase,
        remaining_ms: u64,
        display: String,
        at: DateTime<Utc>,
    },
    PhaseExpired {
        phase: Phase,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn notification(&self) -> Option<&NotificationRequest> {
        match self {
            Event::PhaseStarted { notification, .. } => Some(notification),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::PhaseStarted { .. } => "phase_started",
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::BreakSkipped { .. } => "break_skipped",
            Event::Tick { .. } => "tick",
            Event::PhaseExpired { .. } => "phase_expired",
        }
    }
}
