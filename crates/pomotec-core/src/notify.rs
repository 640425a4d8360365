//! Notification boundary.
//!
//! The timer hands a [`NotificationRequest`] to a [`NotificationSink`] at every
//! phase start. Sinks own presentation (icon, color, sound) and permission
//! handling. Whatever a sink returns, the timer keeps running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::timer::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    pub phase: Phase,
}

impl NotificationRequest {
    pub fn for_phase(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            title: phase.title().to_string(),
            message: message.into(),
            phase,
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification backend failed: {0}")]
    Backend(String),
}

pub trait NotificationSink: Send + Sync {
    fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        (**self).deliver(request)
    }
}

/// Shared, toggleable delivery permission.
#[derive(Debug, Clone)]
pub struct Permission(Arc<AtomicBool>);

impl Permission {
    pub fn new(granted: bool) -> Self {
        Self(Arc::new(AtomicBool::new(granted)))
    }

    pub fn is_granted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, granted: bool) {
        self.0.store(granted, Ordering::Release);
    }
}

/// Drops requests silently while permission is absent.
pub struct PermissionGate<S> {
    inner: S,
    permission: Permission,
}

impl<S: NotificationSink> PermissionGate<S> {
    pub fn new(inner: S, permission: Permission) -> Self {
        Self { inner, permission }
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }
}

impl<S: NotificationSink> NotificationSink for PermissionGate<S> {
    fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        if !self.permission.is_granted() {
            tracing::debug!(title = %request.title, "notification permission absent; dropping");
            return Ok(());
        }
        self.inner.deliver(request)
    }
}

/// Writes each request to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        tracing::info!(
            phase = %request.phase,
            title = %request.title,
            "{}",
            request.message
        );
        Ok(())
    }
}

/// Forwards requests to a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NotificationRequest>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        self.tx
            .send(request.clone())
            .map_err(|_| NotifyError::Backend("receiver dropped".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_title_follows_phase() {
        let req = NotificationRequest::for_phase(Phase::Break, "rest");
        assert_eq!(req.title, "Break Start");
        assert_eq!(req.phase, Phase::Break);
    }

    #[test]
    fn gate_drops_without_permission() {
        let (sink, mut rx) = ChannelSink::new();
        let gate = PermissionGate::new(sink, Permission::new(false));
        let req = NotificationRequest::for_phase(Phase::Focus, "go");

        assert!(gate.deliver(&req).is_ok());
        assert!(rx.try_recv().is_err());

        gate.permission().set(true);
        gate.deliver(&req).unwrap();
        assert_eq!(rx.try_recv().unwrap(), req);
    }

    #[test]
    fn channel_sink_reports_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        let err = sink
            .deliver(&NotificationRequest::for_phase(Phase::Focus, "go"))
            .unwrap_err();
        assert!(matches!(err, NotifyError::Backend(_)));
    }
}
