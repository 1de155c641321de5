//! Flash-message queue with timed auto-dismissal.
//!
//! Messages live for a fixed time, then play a short dismissing animation
//! before removal. Manual dismissal enters the same animation path early.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ToastState {
    Shown { dismiss_at: Instant },
    Dismissing { remove_at: Instant },
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    state: ToastState,
}

impl Toast {
    pub fn is_dismissing(&self) -> bool {
        matches!(self.state, ToastState::Dismissing { .. })
    }

    /// Fade-out opacity while dismissing; 1.0 while shown.
    pub fn opacity(&self, now: Instant, fade: Duration) -> f32 {
        match self.state {
            ToastState::Shown { .. } => 1.0,
            ToastState::Dismissing { remove_at } => {
                if fade.is_zero() || now >= remove_at {
                    return 0.0;
                }
                let remaining = remove_at.saturating_duration_since(now);
                (remaining.as_secs_f32() / fade.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message; it auto-dismisses once `dismiss_after` has elapsed.
    pub fn push(
        &mut self,
        level: ToastLevel,
        message: impl Into<String>,
        now: Instant,
        dismiss_after: Duration,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            level,
            message: message.into(),
            state: ToastState::Shown {
                dismiss_at: now + dismiss_after,
            },
        });
        id
    }

    /// Start dismissing a toast early (close button). Unknown ids and toasts
    /// already dismissing are no-ops.
    pub fn dismiss(&mut self, id: u64, now: Instant, fade: Duration) {
        if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id) {
            if let ToastState::Shown { .. } = toast.state {
                toast.state = ToastState::Dismissing {
                    remove_at: now + fade,
                };
            }
        }
    }

    /// Advance auto-dismiss deadlines and drop fully dismissed toasts.
    pub fn tick(&mut self, now: Instant, fade: Duration) {
        for toast in &mut self.toasts {
            if let ToastState::Shown { dismiss_at } = toast.state {
                if now >= dismiss_at {
                    toast.state = ToastState::Dismissing {
                        remove_at: now + fade,
                    };
                }
            }
        }
        self.toasts.retain(|t| match t.state {
            ToastState::Shown { .. } => true,
            ToastState::Dismissing { remove_at } => now < remove_at,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}
