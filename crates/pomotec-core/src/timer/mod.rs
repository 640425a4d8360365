mod controller;
mod display;
mod driver;
mod engine;
mod messages;
mod phase;

pub use controller::{TimerController, TimerHandle};
pub use display::format_remaining;
pub use driver::{CountdownScheduler, DriverTick, TokioScheduler};
pub use engine::{PhaseTimer, TimerState, TimerStatus};
pub use messages::{messages_for, MessagePicker};
pub use phase::{Appearance, Phase, PhaseDurations, Sound, TICK_INTERVAL_MS};
