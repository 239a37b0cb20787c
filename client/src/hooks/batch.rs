use super::{ServiceFuture, run_isolated};
use crate::error::ApiError;
use crate::toast::Toasts;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct BatchSuccess<I, R> {
    pub index: usize,
    pub item: I,
    pub result: R,
}

#[derive(Debug, Clone)]
pub struct BatchFailure<I> {
    pub index: usize,
    pub item: I,
    pub error: ApiError,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome<I, R> {
    pub results: Vec<BatchSuccess<I, R>>,
    pub errors: Vec<BatchFailure<I>>,
}

pub struct BatchHookOptions<I, R> {
    pub show_success_toast: bool,
    pub show_error_toast: bool,
    pub success_message: String,
    /// Label for the aggregate failure toast:
    /// "<label>: <errors>/<total> failed".
    pub error_message: String,
    pub on_success: Option<
        Arc<dyn Fn(&[BatchSuccess<I, R>], &[BatchFailure<I>]) + Send + Sync>,
    >,
    pub on_error: Option<Arc<dyn Fn(&ApiError) + Send + Sync>>,
}

impl<I, R> Default for BatchHookOptions<I, R> {
    fn default() -> Self {
        Self {
            show_success_toast: true,
            show_error_toast: true,
            success_message: "Batch operation complete".to_string(),
            error_message: "Batch operation failed".to_string(),
            on_success: None,
            on_error: None,
        }
    }
}

impl<I, R> Clone for BatchHookOptions<I, R> {
    fn clone(&self) -> Self {
        Self {
            show_success_toast: self.show_success_toast,
            show_error_toast: self.show_error_toast,
            success_message: self.success_message.clone(),
            error_message: self.error_message.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

struct Shared<I, R> {
    loading: AtomicBool,
    /// Deliberately left at its final value after a run so callers can
    /// show the last-reached percentage.
    progress: AtomicU8,
    results: Mutex<Vec<BatchSuccess<I, R>>>,
    errors: Mutex<Vec<BatchFailure<I>>>,
}

/// Sequential batch executor with per-item failure isolation: one item
/// failing never aborts the rest, and every entry keeps its original
/// index.
pub struct BatchHook<I, R> {
    func: Arc<dyn Fn(I, usize) -> ServiceFuture<R> + Send + Sync>,
    options: BatchHookOptions<I, R>,
    toasts: Toasts,
    shared: Arc<Shared<I, R>>,
}

impl<I, R> Clone for BatchHook<I, R> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            options: self.options.clone(),
            toasts: self.toasts.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<I, R> BatchHook<I, R>
where
    I: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(
        func: F,
        toasts: Toasts,
        options: BatchHookOptions<I, R>,
    ) -> Self
    where
        F: Fn(I, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    {
        Self {
            func: Arc::new(move |item, index| -> ServiceFuture<R> {
                Box::pin(func(item, index))
            }),
            options,
            toasts,
            shared: Arc::new(Shared {
                loading: AtomicBool::new(false),
                progress: AtomicU8::new(0),
                results: Mutex::new(Vec::new()),
                errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Process `items` in order, one at a time. Rejects an empty input
    /// up front. Each item runs on its own task so that a panicking
    /// operation surfaces as a hard batch failure instead of unwinding
    /// through the caller.
    pub async fn execute(
        &self,
        items: Vec<I>,
    ) -> Result<BatchOutcome<I, R>, ApiError> {
        if items.is_empty() {
            let err =
                ApiError::validation("Nothing to process: the batch is empty");
            if self.options.show_error_toast {
                self.toasts.error(err.to_string());
            }
            return Err(err);
        }

        self.shared.loading.store(true, Ordering::SeqCst);
        self.shared.progress.store(0, Ordering::SeqCst);
        self.shared.results.lock().unwrap().clear();
        self.shared.errors.lock().unwrap().clear();

        let total = items.len();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            let attempt =
                tokio::spawn((self.func)(item.clone(), index)).await;
            match attempt {
                Ok(Ok(result)) => results.push(BatchSuccess {
                    index,
                    item,
                    result,
                }),
                Ok(Err(error)) => errors.push(BatchFailure {
                    index,
                    item,
                    error,
                }),
                Err(join_error) => {
                    // The driving loop itself failed; record one
                    // synthetic entry and abort
                    let error = ApiError::unknown(format!(
                        "Batch operation aborted: {join_error}"
                    ));
                    errors.push(BatchFailure {
                        index,
                        item,
                        error: error.clone(),
                    });
                    self.store(results, errors);
                    if self.options.show_error_toast {
                        self.toasts.error(error.to_string());
                    }
                    if let Some(on_error) = &self.options.on_error {
                        run_isolated("on_error", || on_error(&error));
                    }
                    self.shared.loading.store(false, Ordering::SeqCst);
                    return Err(error);
                }
            }
            let percent =
                (((index + 1) * 100) as f64 / total as f64).round() as u8;
            self.shared.progress.store(percent, Ordering::SeqCst);
        }

        let error_count = errors.len();
        self.store(results.clone(), errors.clone());

        if error_count == 0 {
            if self.options.show_success_toast {
                self.toasts.success(&self.options.success_message);
            }
        } else if self.options.show_error_toast {
            self.toasts.error(format!(
                "{}: {error_count}/{total} failed",
                self.options.error_message
            ));
        }
        // Runs whenever the loop completed, partial failures included
        if let Some(on_success) = &self.options.on_success {
            run_isolated("on_success", || on_success(&results, &errors));
        }

        self.shared.loading.store(false, Ordering::SeqCst);
        Ok(BatchOutcome { results, errors })
    }

    fn store(
        &self,
        results: Vec<BatchSuccess<I, R>>,
        errors: Vec<BatchFailure<I>>,
    ) {
        *self.shared.results.lock().unwrap() = results;
        *self.shared.errors.lock().unwrap() = errors;
    }

    /// Clear the loading flag only. The sequential loop does not poll
    /// this flag, so a run already in progress completes anyway; this is
    /// a cosmetic cancel for the owning UI.
    pub fn cancel(&self) {
        self.shared.loading.store(false, Ordering::SeqCst);
    }

    /// Clear progress, results, errors, and the loading flag.
    pub fn reset(&self) {
        self.shared.loading.store(false, Ordering::SeqCst);
        self.shared.progress.store(0, Ordering::SeqCst);
        self.shared.results.lock().unwrap().clear();
        self.shared.errors.lock().unwrap().clear();
    }

    pub fn loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> u8 {
        self.shared.progress.load(Ordering::SeqCst)
    }

    pub fn results(&self) -> Vec<BatchSuccess<I, R>> {
        self.shared.results.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<BatchFailure<I>> {
        self.shared.errors.lock().unwrap().clone()
    }
}
