//! Timer controller.
//!
//! Runs the [`PhaseTimer`] on a single tokio task. Control commands from any
//! number of [`TimerHandle`]s and ticks from the countdown driver are
//! serialized through that task, so the engine is only ever touched from one
//! place. After every command or tick the controller re-arms the driver if the
//! engine's epoch moved, queues notification requests for delivery, broadcasts
//! events and publishes one [`TimerState`] snapshot.
//!
//! Sinks may block (a desktop notification is a D-Bus round trip), so they run
//! on a separate dispatcher task that calls each one through
//! [`tokio::task::spawn_blocking`], in order. A slow sink delays later alerts
//! but never a command reply or a tick.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::driver::{CountdownScheduler, DriverTick, TokioScheduler};
use super::engine::{PhaseTimer, TimerState};
use super::phase::TICK_INTERVAL_MS;
use crate::events::Event;
use crate::notify::{NotificationRequest, NotificationSink};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    StartFocusSession,
    StartTimer,
    PauseTimer,
    ResetTimer,
    SkipBreak,
    Shutdown,
}

struct Request {
    command: Command,
    reply: oneshot::Sender<TimerState>,
}

pub struct TimerController {
    timer: PhaseTimer,
    scheduler: Box<dyn CountdownScheduler>,
    alerts_tx: mpsc::UnboundedSender<NotificationRequest>,
    armed_epoch: Option<u64>,
    ticks_tx: mpsc::UnboundedSender<DriverTick>,
    state_tx: watch::Sender<TimerState>,
    events_tx: broadcast::Sender<Event>,
}

impl TimerController {
    /// Spawn the controller on the current tokio runtime.
    pub fn spawn(timer: PhaseTimer, sink: Arc<dyn NotificationSink>) -> TimerHandle {
        Self::spawn_with_scheduler(timer, sink, Box::new(TokioScheduler::new()))
    }

    pub fn spawn_with_scheduler(
        timer: PhaseTimer,
        sink: Arc<dyn NotificationSink>,
        scheduler: Box<dyn CountdownScheduler>,
    ) -> TimerHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(timer.state());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let (alerts_tx, alerts_rx) = mpsc::unbounded_channel();

        let controller = Self {
            timer,
            scheduler,
            alerts_tx,
            armed_epoch: None,
            ticks_tx,
            state_tx,
            events_tx: events_tx.clone(),
        };
        tokio::spawn(dispatch_notifications(sink, alerts_rx));
        tokio::spawn(controller.run(commands_rx, ticks_rx));

        TimerHandle {
            commands: commands_tx,
            state: state_rx,
            events: events_tx,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Request>,
        mut ticks: mpsc::UnboundedReceiver<DriverTick>,
    ) {
        tracing::debug!(durations = ?self.timer.durations(), "timer controller started");
        loop {
            tokio::select! {
                biased;
                request = commands.recv() => {
                    let Some(Request { command, reply }) = request else {
                        break;
                    };
                    if command == Command::Shutdown {
                        let _ = reply.send(self.timer.state());
                        break;
                    }
                    let events = self.execute(command);
                    self.commit(events);
                    let _ = reply.send(self.timer.state());
                }
                Some(tick) = ticks.recv() => {
                    let events = self.timer.tick(tick.epoch, tick.elapsed_ms);
                    if !events.is_empty() {
                        self.commit(events);
                    }
                }
            }
        }
        self.scheduler.cancel();
        tracing::debug!("timer controller stopped");
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        tracing::debug!(?command, status = ?self.timer.status(), "timer command");
        match command {
            Command::StartFocusSession => self.timer.start_focus_session(),
            Command::StartTimer => self.timer.start_timer(),
            Command::PauseTimer => self.timer.pause_timer(),
            Command::ResetTimer => self.timer.reset_timer(),
            Command::SkipBreak => self.timer.skip_break(),
            Command::Shutdown => Vec::new(),
        }
    }

    fn commit(&mut self, events: Vec<Event>) {
        self.sync_driver();
        for event in events {
            if let Some(request) = event.notification() {
                if self.alerts_tx.send(request.clone()).is_err() {
                    tracing::warn!(title = %request.title, "notification dispatcher is gone");
                }
            }
            // No subscribers is fine.
            let _ = self.events_tx.send(event);
        }
        self.state_tx.send_replace(self.timer.state());
    }

    /// Cancel, then re-arm, whenever the engine's epoch moved.
    fn sync_driver(&mut self) {
        let epoch = self.timer.epoch();
        if self.armed_epoch == Some(epoch) {
            return;
        }
        self.scheduler.cancel();
        self.armed_epoch = None;
        if self.timer.is_running() {
            self.scheduler.arm(
                epoch,
                self.timer.remaining_ms(),
                TICK_INTERVAL_MS,
                self.ticks_tx.clone(),
            );
            self.armed_epoch = Some(epoch);
        }
    }
}

/// Delivers queued requests one at a time until the controller goes away.
async fn dispatch_notifications(
    sink: Arc<dyn NotificationSink>,
    mut alerts: mpsc::UnboundedReceiver<NotificationRequest>,
) {
    while let Some(request) = alerts.recv().await {
        let sink = Arc::clone(&sink);
        let title = request.title.clone();
        match tokio::task::spawn_blocking(move || sink.deliver(&request)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, %title, "notification not delivered"),
            Err(e) => tracing::warn!(error = %e, %title, "notification sink panicked"),
        }
    }
}

/// UI-facing handle to the one controller.
///
/// Control methods resolve to the snapshot taken right after the command was
/// applied, or `None` when the controller no longer exists.
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<Request>,
    state: watch::Receiver<TimerState>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    pub async fn start_focus_session(&self) -> Option<TimerState> {
        self.send(Command::StartFocusSession).await
    }

    pub async fn start_timer(&self) -> Option<TimerState> {
        self.send(Command::StartTimer).await
    }

    pub async fn pause_timer(&self) -> Option<TimerState> {
        self.send(Command::PauseTimer).await
    }

    pub async fn reset_timer(&self) -> Option<TimerState> {
        self.send(Command::ResetTimer).await
    }

    pub async fn skip_break(&self) -> Option<TimerState> {
        self.send(Command::SkipBreak).await
    }

    /// Stop the controller and its countdown. Later commands are no-ops.
    pub async fn shutdown(&self) -> Option<TimerState> {
        self.send(Command::Shutdown).await
    }

    /// Latest published snapshot.
    pub fn state(&self) -> TimerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state.clone()
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: Command) -> Option<TimerState> {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Request { command, reply }).is_err() {
            tracing::debug!(?command, "timer controller is gone; ignoring command");
            return None;
        }
        rx.await.ok()
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
