use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    /// Milliseconds before auto-dismissal; `None` keeps the toast up.
    pub duration: Option<u32>,
}

impl Toast {
    pub fn new(message: String, kind: ToastKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            kind,
            duration: Some(5000),
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(message, ToastKind::Error)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn info(message: String) -> Self {
        Self::new(message, ToastKind::Info)
    }
}

/// Handle to the notification channel. The core only ever pushes; the
/// surrounding UI owns rendering and dismissal. Tests read back what was
/// pushed via `snapshot`/`drain`.
#[derive(Clone, Default)]
pub struct Toasts {
    queue: Arc<Mutex<Vec<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, toast: Toast) {
        self.queue.lock().unwrap().push(toast);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Toast::success(message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Toast::error(message.into()));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Toast::info(message.into()));
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.queue.lock().unwrap().clone()
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.queue.lock().unwrap())
    }
}
