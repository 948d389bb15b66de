//! Toast notifications: transient status messages for the view layer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

struct Toast {
    message: String,
    severity: Severity,
    created_at: DateTime<Local>,
    expires: Instant,
}

/// What the view layer renders.  `pending` marks the spinner entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastView {
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Local>,
    pub pending: bool,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    /// Persistent "work in progress" toast, shown until resolved.
    spinner: Option<(String, DateTime<Local>)>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            spinner: None,
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        // Remove duplicates (same message)
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            created_at: Local::now(),
            expires: Instant::now() + duration,
        });
        // Cap queue
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning, Duration::from_secs(4));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Start or replace the spinner toast.  It does not expire until
    /// `resolve_spinner` or `dismiss_spinner` is called.
    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner = Some((message.into(), Local::now()));
    }

    /// Dismiss the spinner and push a normal expiring toast in its place.
    pub fn resolve_spinner(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        duration: Duration,
    ) {
        self.spinner = None;
        self.push(message, severity, duration);
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner = None;
    }

    /// Remove expired toasts. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
    }

    /// Spinner first, then live toasts newest first, capped at `max_visible`.
    pub fn visible(&self) -> Vec<ToastView> {
        let now = Instant::now();
        let spinner = self.spinner.iter().map(|(message, created_at)| ToastView {
            message: message.clone(),
            severity: Severity::Info,
            created_at: *created_at,
            pending: true,
        });
        let toasts = self
            .toasts
            .iter()
            .rev()
            .filter(|t| t.expires > now)
            .take(self.max_visible)
            .map(|t| ToastView {
                message: t.message.clone(),
                severity: t.severity,
                created_at: t.created_at,
                pending: false,
            });
        spinner.chain(toasts).collect()
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
