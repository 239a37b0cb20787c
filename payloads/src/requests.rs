use crate::{Role, UserStatus};
use serde::{Deserialize, Serialize};

/// Largest accepted image upload, in bytes (5 MiB).
pub const IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Largest accepted avatar upload, in bytes (2 MiB).
pub const AVATAR_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Largest accepted generic file upload, in bytes (10 MiB).
pub const FILE_MAX_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Partial user update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Filters for the user list endpoint. Pagination fields are merged in by
/// the paginated hook; the filter fields match the backend's query names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserQuery {
    /// Render into the dynamic filter map the paginated hooks consume.
    /// Unset fields are omitted entirely.
    pub fn into_filters(
        self,
    ) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(&self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// A file staged for upload, independent of the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// The upload endpoint a file is destined for. Each kind carries its own
/// client-side size and content-type constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    File,
    Avatar,
}

impl UploadKind {
    pub fn max_bytes(&self) -> u64 {
        match self {
            Self::Image => IMAGE_MAX_BYTES,
            Self::File => FILE_MAX_BYTES,
            Self::Avatar => AVATAR_MAX_BYTES,
        }
    }

    /// Field name used in the multipart form, matching the backend
    /// contract.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
            Self::Avatar => "avatar",
        }
    }

    fn requires_image(&self) -> bool {
        matches!(self, Self::Image | Self::Avatar)
    }
}

/// Validation result for staged uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadValidation {
    Valid,
    NotAnImage(UploadKind),
    TooLarge { kind: UploadKind, limit: u64 },
}

impl UploadValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::NotAnImage(UploadKind::Avatar) => {
                Some("Avatars must be image files".into())
            }
            Self::NotAnImage(_) => Some("Only image files can be uploaded".into()),
            Self::TooLarge { kind, limit } => {
                let limit_mb = limit / (1024 * 1024);
                let noun = match kind {
                    UploadKind::Image => "Images",
                    UploadKind::File => "Files",
                    UploadKind::Avatar => "Avatars",
                };
                Some(format!("{noun} must be at most {limit_mb} MB"))
            }
        }
    }
}

/// Validate a staged upload against its destination's constraints.
///
/// Rules:
/// - image and avatar uploads must carry an `image/*` content type
/// - every kind has a size ceiling (5 MiB image, 2 MiB avatar, 10 MiB
///   file)
pub fn validate_upload(
    kind: UploadKind,
    file: &FileUpload,
) -> UploadValidation {
    if kind.requires_image() && !file.is_image() {
        return UploadValidation::NotAnImage(kind);
    }
    if file.size() > kind.max_bytes() {
        return UploadValidation::TooLarge {
            kind,
            limit: kind.max_bytes(),
        };
    }
    UploadValidation::Valid
}
