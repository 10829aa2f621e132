//! Toast notifications
//!
//! Short-lived messages raised by the shell (artifact failures, reloads) or
//! by artifacts themselves. Each toast expires after a fixed number of UI
//! ticks.

use std::collections::VecDeque;

/// At most this many toasts are kept; the oldest is dropped first
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    remaining_ticks: u32,
}

/// Queue of visible toasts
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl_ticks: u32,
}

impl ToastQueue {
    pub fn new(ttl_ticks: u32) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl_ticks: ttl_ticks.max(1),
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            level,
            message: message.into(),
            remaining_ticks: self.ttl_ticks,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// Ages every toast by one tick and drops the expired ones
    pub fn tick(&mut self) {
        for toast in &mut self.toasts {
            toast.remaining_ticks = toast.remaining_ticks.saturating_sub(1);
        }
        self.toasts.retain(|t| t.remaining_ticks > 0);
    }

    /// Visible toasts, newest first
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().rev()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
