use client::ApiError;
use client::hooks::{BatchHook, BatchHookOptions};
use client::toast::{ToastKind, Toasts};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Doubles its input, except 13 always fails.
fn doubling_hook(toasts: Toasts) -> BatchHook<u32, u32> {
    BatchHook::new(
        |item: u32, _index| async move {
            if item == 13 {
                Err(ApiError::validation("unlucky"))
            } else {
                Ok(item * 2)
            }
        },
        toasts,
        BatchHookOptions::default(),
    )
}

#[tokio::test]
async fn failures_are_isolated_per_item() -> anyhow::Result<()> {
    let toasts = Toasts::new();
    let hook = doubling_hook(toasts.clone());

    let outcome = hook.execute(vec![1, 13, 3]).await?;

    // a failing item never aborts the rest; indices are preserved
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].index, 0);
    assert_eq!(outcome.results[0].result, 2);
    assert_eq!(outcome.results[1].index, 2);
    assert_eq!(outcome.results[1].result, 6);

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert_eq!(outcome.errors[0].item, 13);

    assert!(!hook.loading());
    assert_eq!(hook.progress(), 100);

    let seen = toasts.drain();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, ToastKind::Error);
    assert_eq!(seen[0].message, "Batch operation failed: 1/3 failed");

    Ok(())
}

#[tokio::test]
async fn clean_runs_toast_success() -> anyhow::Result<()> {
    let toasts = Toasts::new();
    let hook = doubling_hook(toasts.clone());

    let outcome = hook.execute(vec![2, 4]).await?;

    assert_eq!(outcome.errors.len(), 0);
    assert_eq!(
        outcome.results.iter().map(|s| s.result).collect::<Vec<_>>(),
        vec![4, 8]
    );

    let seen = toasts.drain();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, ToastKind::Success);

    Ok(())
}

#[tokio::test]
async fn empty_batches_are_rejected() {
    let toasts = Toasts::new();
    let hook = doubling_hook(toasts.clone());

    let result = hook.execute(Vec::new()).await;

    assert!(matches!(result, Err(ApiError::Validation { .. })));
    assert!(!hook.loading());
    assert_eq!(toasts.drain().len(), 1);
}

#[tokio::test]
async fn callback_runs_even_with_partial_failures() -> anyhow::Result<()> {
    let observed = Arc::new(AtomicU32::new(0));
    let hook: BatchHook<u32, u32> = BatchHook::new(
        |item: u32, _| async move {
            if item == 13 {
                Err(ApiError::validation("unlucky"))
            } else {
                Ok(item)
            }
        },
        Toasts::new(),
        BatchHookOptions {
            on_success: Some(Arc::new({
                let observed = observed.clone();
                move |results, errors| {
                    observed.store(
                        (results.len() * 10 + errors.len()) as u32,
                        Ordering::SeqCst,
                    );
                }
            })),
            ..BatchHookOptions::default()
        },
    );

    hook.execute(vec![1, 13, 3]).await?;
    assert_eq!(observed.load(Ordering::SeqCst), 21);

    Ok(())
}

#[tokio::test]
async fn progress_survives_completion_until_reset() -> anyhow::Result<()> {
    let hook = doubling_hook(Toasts::new());

    hook.execute(vec![1, 2]).await?;
    // deliberately left at the last-reached percentage
    assert_eq!(hook.progress(), 100);
    assert_eq!(hook.results().len(), 2);

    hook.reset();
    assert_eq!(hook.progress(), 0);
    assert!(hook.results().is_empty());
    assert!(hook.errors().is_empty());

    Ok(())
}

#[tokio::test]
async fn panicking_operation_aborts_as_a_hard_failure() {
    let toasts = Toasts::new();
    let hook: BatchHook<u32, u32> = BatchHook::new(
        |item: u32, _| async move {
            if item == 2 {
                panic!("programming error");
            }
            Ok(item)
        },
        toasts.clone(),
        BatchHookOptions::default(),
    );

    let result = hook.execute(vec![1, 2, 3]).await;

    assert!(matches!(result, Err(ApiError::Unknown { .. })));
    assert!(!hook.loading());
    // the first item settled, the panicking one is recorded, the third
    // never ran
    assert_eq!(hook.results().len(), 1);
    assert_eq!(hook.errors().len(), 1);
    assert_eq!(hook.errors()[0].index, 1);
    assert_eq!(toasts.drain().len(), 1);
}
