//! Countdown driver.
//!
//! A scheduler emits one [`DriverTick`] per interval until the armed duration
//! has elapsed. The controller holds exactly one scheduler and re-arms it on
//! every epoch change, so at most one countdown task exists at a time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTick {
    /// Epoch of the engine when this driver was armed.
    pub epoch: u64,
    pub elapsed_ms: u64,
}

pub trait CountdownScheduler: Send {
    /// Cancel any running countdown, then start a new one.
    fn arm(
        &mut self,
        epoch: u64,
        duration_ms: u64,
        tick_ms: u64,
        ticks: mpsc::UnboundedSender<DriverTick>,
    );

    /// Stop the countdown. Canceling an idle scheduler does nothing.
    fn cancel(&mut self);

    fn is_armed(&self) -> bool;
}

/// Interval task on the tokio runtime. Must be armed from within a runtime.
#[derive(Debug, Default)]
pub struct TokioScheduler {
    task: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CountdownScheduler for TokioScheduler {
    fn arm(
        &mut self,
        epoch: u64,
        duration_ms: u64,
        tick_ms: u64,
        ticks: mpsc::UnboundedSender<DriverTick>,
    ) {
        self.cancel();

        let tick_ms = tick_ms.max(1);
        let count = duration_ms.div_ceil(tick_ms);
        let period = Duration::from_millis(tick_ms);

        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            for _ in 0..count {
                interval.tick().await;
                if ticks
                    .send(DriverTick {
                        epoch,
                        elapsed_ms: tick_ms,
                    })
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
