use serde::{Deserialize, Serialize};

/// Cadence of the countdown driver.
pub const TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// The phase entered when this one expires.
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "FOCUS",
            Phase::Break => "BREAK",
        }
    }

    /// Title of the notification raised when the phase starts.
    pub fn title(self) -> &'static str {
        match self {
            Phase::Focus => "Focus Start",
            Phase::Break => "Break Start",
        }
    }

    /// How a notification sink should present alerts for this phase.
    pub fn appearance(self) -> Appearance {
        match self {
            Phase::Focus => Appearance {
                icon: "focus",
                sound: Sound::Alarm,
            },
            Phase::Break => Appearance {
                icon: "break",
                sound: Sound::Notification,
            },
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    Alarm,
    Notification,
}

/// Icon and sound a sink resolves for a phase alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub icon: &'static str,
    pub sound: Sound,
}

/// Default length of each phase.
///
/// Fixed for the lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    focus_ms: u64,
    break_ms: u64,
}

impl PhaseDurations {
    pub const DEFAULT_FOCUS_MS: u64 = 25 * 60 * 1000;
    pub const DEFAULT_BREAK_MS: u64 = 5 * 60 * 1000;

    /// Build from whole minutes.
    ///
    /// Uses saturating arithmetic so absurd values cannot overflow.
    pub fn from_minutes(focus_min: u64, break_min: u64) -> Self {
        Self {
            focus_ms: focus_min.saturating_mul(60).saturating_mul(1000),
            break_ms: break_min.saturating_mul(60).saturating_mul(1000),
        }
    }

    /// Build from milliseconds. Check the result with [`is_valid`](Self::is_valid);
    /// [`PhaseTimer`](super::PhaseTimer) refuses invalid lengths.
    pub fn from_millis(focus_ms: u64, break_ms: u64) -> Self {
        Self { focus_ms, break_ms }
    }

    pub fn focus_ms(&self) -> u64 {
        self.focus_ms
    }

    pub fn break_ms(&self) -> u64 {
        self.break_ms
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_ms,
            Phase::Break => self.break_ms,
        }
    }

    /// Both durations must be a positive whole number of ticks.
    pub fn is_valid(&self) -> bool {
        [self.focus_ms, self.break_ms]
            .iter()
            .all(|&ms| ms > 0 && ms % TICK_INTERVAL_MS == 0)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            focus_ms: Self::DEFAULT_FOCUS_MS,
            break_ms: Self::DEFAULT_BREAK_MS,
        }
    }
}
