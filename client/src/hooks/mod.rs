//! Async operation state machines.
//!
//! Each hook owns the lifecycle of one kind of asynchronous operation —
//! a single call, a paginated list, an upload, or a batch — and exposes
//! cheap clonable handles carrying {data, loading, error} state, toast
//! side effects, and re-entry guards. Hooks never rely on any UI
//! framework's state batching: the "already running" guard is a plain
//! atomic flag flipped before the first suspension point.

pub mod api;
pub mod batch;
pub mod paginated;
pub mod upload;

pub use api::{ApiHook, ApiHookOptions, HookState};
pub use batch::{
    BatchFailure, BatchHook, BatchHookOptions, BatchOutcome, BatchSuccess,
};
pub use paginated::{PaginatedHook, PaginatedHookOptions, PaginationState};
pub use upload::{UploadHook, UploadHookOptions};

use crate::error::ApiError;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;

/// Boxed future returned by the bound service function of a hook.
pub type ServiceFuture<T> =
    Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send>>;

/// Lifecycle of a hook-driven call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Resolved,
    Rejected,
}

/// Run a caller-supplied callback, containing any panic it raises. A bug
/// in callback code must not corrupt hook state or poison the caller.
pub(crate) fn run_isolated(label: &str, callback: impl FnOnce()) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(callback)) {
        let detail = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        tracing::error!(callback = label, panic = %detail, "hook callback panicked");
    }
}
