use client::hooks::{UploadHook, UploadHookOptions};
use client::mock::{MockApi, MockSettings};
use client::services::ProgressFn;
use client::toast::ToastKind;
use client::{ApiConfig, ApiContext, ApiError};
use payloads::requests::{AVATAR_MAX_BYTES, FileUpload, IMAGE_MAX_BYTES};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn mock_context(settings: MockSettings) -> ApiContext {
    ApiContext::with_mock(
        ApiConfig {
            use_mock: true,
            ..ApiConfig::default()
        },
        MockApi::with_settings(settings),
    )
}

fn image_hook(ctx: &ApiContext) -> UploadHook {
    let services = ctx.services.clone();
    UploadHook::new(
        move |file, progress| {
            let services = services.clone();
            async move { services.upload_image(&file, progress).await }
        },
        ctx.toasts.clone(),
        UploadHookOptions::default(),
    )
}

fn png(name: &str, bytes: usize) -> FileUpload {
    FileUpload {
        file_name: name.into(),
        content_type: "image/png".into(),
        bytes: vec![0; bytes],
    }
}

#[tokio::test]
async fn upload_reports_result_and_resets_progress() -> anyhow::Result<()> {
    let ctx = mock_context(MockSettings::instant());
    let hook = image_hook(&ctx);

    let uploaded = hook.upload(png("photo.png", 1024)).await?.unwrap();

    assert_eq!(uploaded.size, 1024);
    assert!(uploaded.url.ends_with("photo.png"));
    assert!(!hook.uploading());
    // progress is presentation-transient, not a result artifact
    assert_eq!(hook.progress(), 0);

    let seen = ctx.toasts.drain();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, ToastKind::Success);

    Ok(())
}

#[tokio::test]
async fn oversized_image_rejected_before_any_transfer() {
    let ctx = mock_context(MockSettings::instant());
    let hook = image_hook(&ctx);

    let result = hook
        .upload(png("huge.png", IMAGE_MAX_BYTES as usize + 1))
        .await;

    assert!(matches!(result, Err(ApiError::Validation { .. })));
    assert!(!hook.uploading());
    assert!(matches!(hook.error(), Some(ApiError::Validation { .. })));

    let seen = ctx.toasts.drain();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, ToastKind::Error);
    assert!(seen[0].message.contains("5 MB"));
}

#[tokio::test]
async fn non_image_rejected_for_image_upload() {
    let ctx = mock_context(MockSettings::instant());
    let hook = image_hook(&ctx);

    let result = hook
        .upload(FileUpload {
            file_name: "notes.txt".into(),
            content_type: "text/plain".into(),
            bytes: vec![0; 64],
        })
        .await;

    assert!(matches!(result, Err(ApiError::Validation { .. })));
    assert!(!hook.uploading());
}

#[tokio::test]
async fn avatar_uploads_report_progress_and_thumbnails()
-> anyhow::Result<()> {
    let ctx = mock_context(MockSettings::instant());
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink: ProgressFn = {
        let reported = reported.clone();
        Arc::new(move |percent| reported.lock().unwrap().push(percent))
    };

    let uploaded = ctx
        .services
        .upload_avatar(&png("me.png", 512), sink)
        .await?;

    assert!(uploaded.thumbnails.is_some());
    let reported = reported.lock().unwrap();
    assert_eq!(*reported.first().unwrap(), 0);
    assert_eq!(*reported.last().unwrap(), 100);
    assert!(reported.windows(2).all(|pair| pair[0] <= pair[1]));

    Ok(())
}

#[tokio::test]
async fn oversized_avatar_has_a_tighter_limit() {
    let ctx = mock_context(MockSettings::instant());
    let sink: ProgressFn = Arc::new(|_| {});

    // over the avatar cap but under the image cap
    let result = ctx
        .services
        .upload_avatar(&png("me.png", AVATAR_MAX_BYTES as usize + 1), sink)
        .await;
    assert!(matches!(result, Err(ApiError::Validation { .. })));
}

#[tokio::test]
async fn second_upload_is_a_noop_while_first_runs() -> anyhow::Result<()> {
    // a little simulated latency so the uploads overlap
    let ctx = mock_context(MockSettings {
        latency_scale: 0.05,
        failure_scale: 0.0,
    });
    let hook = image_hook(&ctx);

    let first = {
        let hook = hook.clone();
        tokio::spawn(async move { hook.upload(png("a.png", 64)).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = hook.upload(png("b.png", 64)).await?;
    assert!(second.is_none());

    let first = first.await.unwrap()?;
    assert!(first.is_some());

    Ok(())
}
