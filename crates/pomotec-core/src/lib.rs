//! # Pomotec Core Library
//!
//! Core logic for the Pomotec Pomodoro timer: a phase timer that alternates
//! between a focus and a break phase, counts down in one-second steps and
//! raises an alert at every phase start. UI layers drive it through a
//! [`TimerHandle`] and observe it through published [`TimerState`] snapshots.
//!
//! ## Architecture
//!
//! - **Phase timer**: a pure state machine ([`PhaseTimer`]) fed by ticks
//! - **Countdown driver**: an interval task that produces those ticks
//!   ([`TokioScheduler`]); at most one is armed at any time
//! - **Controller**: a single tokio task that serializes commands and ticks
//!   and publishes snapshots and [`Event`]s ([`TimerController`])
//! - **Notifications**: a [`NotificationSink`] boundary that may refuse or
//!   fail without affecting the timer
//! - **Storage**: TOML-based configuration ([`Config`]); timer state itself
//!   is kept in memory only

pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use notify::{
    ChannelSink, LogSink, NotificationRequest, NotificationSink, NotifyError, Permission,
    PermissionGate,
};
pub use storage::Config;
pub use timer::{
    format_remaining, Appearance, CountdownScheduler, MessagePicker, Phase, PhaseDurations,
    PhaseTimer, Sound, TimerController, TimerHandle, TimerState, TimerStatus, TokioScheduler,
    TICK_INTERVAL_MS,
};
