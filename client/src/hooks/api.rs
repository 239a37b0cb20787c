use super::{Phase, ServiceFuture, run_isolated};
use crate::error::ApiError;
use crate::toast::Toasts;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Configuration for a single-call hook. Success toasts are opt-in,
/// error toasts opt-out, mirroring how operations are usually surfaced.
pub struct ApiHookOptions<T> {
    /// Data to report while Idle and after `reset()`.
    pub default_data: Option<T>,
    pub show_success_toast: bool,
    pub show_error_toast: bool,
    pub success_message: String,
    /// Fallback toast text when a failure carries no message of its own.
    pub error_message: String,
    pub on_success: Option<Arc<dyn Fn(&T) + Send + Sync>>,
    pub on_error: Option<Arc<dyn Fn(&ApiError) + Send + Sync>>,
}

impl<T> Default for ApiHookOptions<T> {
    fn default() -> Self {
        Self {
            default_data: None,
            show_success_toast: false,
            show_error_toast: true,
            success_message: "Operation succeeded".to_string(),
            error_message: "Operation failed".to_string(),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for ApiHookOptions<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            default_data: self.default_data.clone(),
            show_success_toast: self.show_success_toast,
            show_error_toast: self.show_error_toast,
            success_message: self.success_message.clone(),
            error_message: self.error_message.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HookState<T> {
    pub phase: Phase,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

struct Shared<T> {
    state: Mutex<HookState<T>>,
    /// Re-entry guard, flipped synchronously before any await.
    in_flight: AtomicBool,
    /// When set, in-flight results are discarded instead of stored.
    discarded: AtomicBool,
}

/// State machine around one service function:
/// Idle → Pending → {Resolved, Rejected} → Idle (on reset).
///
/// At most one call runs per hook instance; a second `execute` issued
/// while the first is still pending is a no-op returning `Ok(None)`.
/// Handles are cheap to clone and share state.
pub struct ApiHook<Args, T> {
    func: Arc<dyn Fn(Args) -> ServiceFuture<T> + Send + Sync>,
    options: ApiHookOptions<T>,
    toasts: Toasts,
    shared: Arc<Shared<T>>,
}

impl<Args, T> Clone for ApiHook<Args, T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            options: self.options.clone(),
            toasts: self.toasts.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<Args, T> ApiHook<Args, T>
where
    Args: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(
        func: F,
        toasts: Toasts,
        options: ApiHookOptions<T>,
    ) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let state = HookState {
            phase: Phase::Idle,
            data: options.default_data.clone(),
            error: None,
        };
        Self {
            func: Arc::new(move |args| -> ServiceFuture<T> {
                Box::pin(func(args))
            }),
            options,
            toasts,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                in_flight: AtomicBool::new(false),
                discarded: AtomicBool::new(false),
            }),
        }
    }

    /// Like [`new`](Self::new), but fires one initial execution in the
    /// background. Any error from that run has already been surfaced via
    /// hook state and toasts, so it is swallowed rather than left as an
    /// unobserved failure. Must be called within a Tokio runtime.
    pub fn immediate<F, Fut>(
        func: F,
        toasts: Toasts,
        options: ApiHookOptions<T>,
    ) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        Args: Default,
    {
        let hook = Self::new(func, toasts, options);
        hook.spawn_execute(Args::default());
        hook
    }

    /// Run the bound service function once.
    ///
    /// Returns `Ok(None)` without doing anything when a call is already
    /// pending for this instance, or when the hook has been cancelled.
    /// On failure the error is stored, surfaced, and re-thrown so call
    /// sites can still handle it locally.
    pub async fn execute(&self, args: Args) -> Result<Option<T>, ApiError> {
        if self.shared.discarded.load(Ordering::SeqCst) {
            return Ok(None);
        }
        // Checked-and-set before the first await: two synchronous calls
        // cannot both observe "not running"
        if self
            .shared
            .in_flight
            .compare_exchange(
                false,
                true,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return Ok(None);
        }

        {
            let mut state = self.shared.state.lock().unwrap();
            state.phase = Phase::Pending;
            state.error = None;
        }

        let result = (self.func)(args).await;

        let discarded = self.shared.discarded.load(Ordering::SeqCst);
        let outcome = match result {
            Ok(data) => {
                if !discarded {
                    {
                        let mut state = self.shared.state.lock().unwrap();
                        state.phase = Phase::Resolved;
                        state.data = Some(data.clone());
                        state.error = None;
                    }
                    if self.options.show_success_toast {
                        self.toasts.success(&self.options.success_message);
                    }
                    if let Some(on_success) = &self.options.on_success {
                        run_isolated("on_success", || on_success(&data));
                    }
                }
                Ok(Some(data))
            }
            Err(err) => {
                if !discarded {
                    {
                        let mut state = self.shared.state.lock().unwrap();
                        state.phase = Phase::Rejected;
                        state.error = Some(err.clone());
                    }
                    // Superseded requests settle silently: no toast, no
                    // error callback
                    if !err.is_superseded() {
                        if self.options.show_error_toast {
                            let message = err.to_string();
                            if message.is_empty() {
                                self.toasts
                                    .error(&self.options.error_message);
                            } else {
                                self.toasts.error(message);
                            }
                        }
                        if let Some(on_error) = &self.options.on_error {
                            run_isolated("on_error", || on_error(&err));
                        }
                    }
                }
                Err(err)
            }
        };

        // Unconditional, even when the owning scope cancelled mid-flight
        self.shared.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    /// Fire-and-forget execution; errors are logged, not propagated.
    pub fn spawn_execute(&self, args: Args) {
        let hook = self.clone();
        tokio::spawn(async move {
            if let Err(err) = hook.execute(args).await {
                tracing::debug!(%err, "background execution failed");
            }
        });
    }

    /// Restore Idle with the configured default data.
    pub fn reset(&self) {
        self.shared.discarded.store(false, Ordering::SeqCst);
        let mut state = self.shared.state.lock().unwrap();
        state.phase = Phase::Idle;
        state.data = self.options.default_data.clone();
        state.error = None;
    }

    /// Discard the result of any in-flight call. Best-effort UI-level
    /// cancellation: the underlying operation is not aborted, but its
    /// result will not touch hook state. `reset()` re-arms the hook.
    pub fn cancel(&self) {
        self.shared.discarded.store(true, Ordering::SeqCst);
    }

    pub fn state(&self) -> HookState<T> {
        self.shared.state.lock().unwrap().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.shared.state.lock().unwrap().data.clone()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.shared.state.lock().unwrap().error.clone()
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.lock().unwrap().phase
    }

    pub fn loading(&self) -> bool {
        self.phase() == Phase::Pending
    }
}
