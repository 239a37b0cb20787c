use super::{Backend, ProgressFn, Services};
use crate::config::endpoints;
use crate::error::ApiError;
use payloads::requests::{FileUpload, UploadKind, validate_upload};
use payloads::responses::UploadedFile;

fn upload_path(kind: UploadKind) -> &'static str {
    match kind {
        UploadKind::Image => endpoints::UPLOAD_IMAGE,
        UploadKind::File => endpoints::UPLOAD_FILE,
        UploadKind::Avatar => endpoints::UPLOAD_AVATAR,
    }
}

impl Services {
    pub async fn upload_image(
        &self,
        file: &FileUpload,
        progress: ProgressFn,
    ) -> Result<UploadedFile, ApiError> {
        self.upload(UploadKind::Image, file, progress).await
    }

    pub async fn upload_file(
        &self,
        file: &FileUpload,
        progress: ProgressFn,
    ) -> Result<UploadedFile, ApiError> {
        self.upload(UploadKind::File, file, progress).await
    }

    pub async fn upload_avatar(
        &self,
        file: &FileUpload,
        progress: ProgressFn,
    ) -> Result<UploadedFile, ApiError> {
        self.upload(UploadKind::Avatar, file, progress).await
    }

    /// Shared upload path. Validation happens here, before any network
    /// or mock activity, so an oversized or mistyped file never leaves
    /// the process.
    async fn upload(
        &self,
        kind: UploadKind,
        file: &FileUpload,
        progress: ProgressFn,
    ) -> Result<UploadedFile, ApiError> {
        if let Some(message) = validate_upload(kind, file).error_message() {
            return Err(ApiError::Validation { message });
        }
        match self.backend() {
            Backend::Mock(mock) => mock.upload(kind, file, progress).await,
            Backend::Http(transport) => {
                // reqwest exposes no native upload progress; report the
                // endpoints of the transfer
                progress(0);
                let uploaded = transport
                    .upload_json(upload_path(kind), kind.field_name(), file)
                    .await?;
                progress(100);
                Ok(uploaded)
            }
        }
    }
}
