//! Transient user notifications.

use std::time::{Duration, Instant};

/// How long a notification stays on screen unless dismissed.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

/// Notification severity.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Message shown in the notification bar until it expires.
///
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    raised_at: Instant,
    ttl: Duration,
}

impl Notification {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            severity,
            raised_at: Instant::now(),
            ttl: NOTIFICATION_TTL,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Override the time to live.
    ///
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Whether the notification should be dropped at `now`.
    ///
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.ttl
    }
}
