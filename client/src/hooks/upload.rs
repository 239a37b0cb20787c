use super::{ServiceFuture, run_isolated};
use crate::error::ApiError;
use crate::services::ProgressFn;
use crate::toast::Toasts;
use payloads::requests::FileUpload;
use payloads::responses::UploadedFile;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

pub struct UploadHookOptions {
    pub show_success_toast: bool,
    pub show_error_toast: bool,
    pub success_message: String,
    pub error_message: String,
    pub on_success: Option<Arc<dyn Fn(&UploadedFile, &FileUpload) + Send + Sync>>,
    pub on_error: Option<Arc<dyn Fn(&ApiError) + Send + Sync>>,
}

impl Default for UploadHookOptions {
    fn default() -> Self {
        Self {
            show_success_toast: true,
            show_error_toast: true,
            success_message: "Upload complete".to_string(),
            error_message: "Upload failed".to_string(),
            on_success: None,
            on_error: None,
        }
    }
}

impl Clone for UploadHookOptions {
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

struct Shared {
    uploading: AtomicBool,
    /// 0–100; presentation-transient, reset once the upload settles.
    progress: AtomicU8,
    error: Mutex<Option<ApiError>>,
}

/// State machine for one upload slot: {uploading, progress, error}.
/// Progress reported by the bound upload function is clamped into
/// [0, 100] before it is stored.
pub struct UploadHook {
    func: Arc<
        dyn Fn(FileUpload, ProgressFn) -> ServiceFuture<UploadedFile>
            + Send
            + Sync,
    >,
    options: UploadHookOptions,
    toasts: Toasts,
    shared: Arc<Shared>,
}

impl Clone for UploadHook {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            options: self.options.clone(),
            toasts: self.toasts.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl UploadHook {
    pub fn new<F, Fut>(
        func: F,
        toasts: Toasts,
        options: UploadHookOptions,
    ) -> Self
    where
        F: Fn(FileUpload, ProgressFn) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<UploadedFile, ApiError>> + Send + 'static,
    {
        Self {
            func: Arc::new(
                move |file, progress| -> ServiceFuture<UploadedFile> {
                    Box::pin(func(file, progress))
                },
            ),
            options,
            toasts,
            shared: Arc::new(Shared {
                uploading: AtomicBool::new(false),
                progress: AtomicU8::new(0),
                error: Mutex::new(None),
            }),
        }
    }

    /// Upload one file. A no-op returning `Ok(None)` while another
    /// upload is in progress on this hook.
    pub async fn upload(
        &self,
        file: FileUpload,
    ) -> Result<Option<UploadedFile>, ApiError> {
        if self
            .shared
            .uploading
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
        self.shared.progress.store(0, Ordering::SeqCst);
        *self.shared.error.lock().unwrap() = None;

        let progress_sink: ProgressFn = {
            let shared = self.shared.clone();
            Arc::new(move |percent: i32| {
                shared
                    .progress
                    .store(percent.clamp(0, 100) as u8, Ordering::SeqCst);
            })
        };

        let result = (self.func)(file.clone(), progress_sink).await;

        let outcome = match result {
            Ok(uploaded) => {
                if self.options.show_success_toast {
                    self.toasts.success(&self.options.success_message);
                }
                if let Some(on_success) = &self.options.on_success {
                    run_isolated("on_success", || {
                        on_success(&uploaded, &file)
                    });
                }
                Ok(Some(uploaded))
            }
            Err(err) => {
                *self.shared.error.lock().unwrap() = Some(err.clone());
                if self.options.show_error_toast {
                    self.toasts.error(self.toast_message(&err));
                }
                if let Some(on_error) = &self.options.on_error {
                    run_isolated("on_error", || on_error(&err));
                }
                Err(err)
            }
        };

        // Progress is not a result artifact; both fields reset whatever
        // the outcome
        self.shared.uploading.store(false, Ordering::SeqCst);
        self.shared.progress.store(0, Ordering::SeqCst);
        outcome
    }

    /// Message precedence: the error's own message, then any message the
    /// server embedded in the response body, then the configured
    /// fallback.
    fn toast_message(&self, err: &ApiError) -> String {
        let message = err.to_string();
        if !message.is_empty() {
            return message;
        }
        err.server_message()
            .map(str::to_owned)
            .unwrap_or_else(|| self.options.error_message.clone())
    }

    /// Force-reset every field to idle. Best-effort: network I/O already
    /// in flight is not aborted.
    pub fn cancel_upload(&self) {
        self.shared.uploading.store(false, Ordering::SeqCst);
        self.shared.progress.store(0, Ordering::SeqCst);
        *self.shared.error.lock().unwrap() = None;
    }

    pub fn uploading(&self) -> bool {
        self.shared.uploading.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> u8 {
        self.shared.progress.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> Option<ApiError> {
        self.shared.error.lock().unwrap().clone()
    }
}
