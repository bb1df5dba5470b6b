use serde::{Deserialize, Serialize};

/// Largest degree certificate accepted: 10 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata the view layer reports for a selected file. Contents are never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size_bytes,
        }
    }
}

/// Reasons a selected file is refused, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AttachmentRejection {
    #[error("Only PDF files are accepted.")]
    WrongType { found: String },
    #[error("File must be under 10MB.")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
}

/// Verdict for a selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttachmentCheck {
    Accepted { file: FileDescriptor },
    Rejected {
        #[serde(flatten)]
        rejection: AttachmentRejection,
        message: String,
    },
}

impl AttachmentCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AttachmentCheck::Accepted { .. })
    }
}

/// Guard deciding whether a document may be attached to a registration.
#[derive(Debug, Clone)]
pub struct FileAttachmentGuard {
    max_bytes: u64,
}

impl Default for FileAttachmentGuard {
    fn default() -> Self {
        Self {
            max_bytes: MAX_ATTACHMENT_BYTES,
        }
    }
}

impl FileAttachmentGuard {
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// The declared type is checked before the size, so a large non-PDF reports the type.
    pub fn check(&self, file: FileDescriptor) -> AttachmentCheck {
        match self.rejection_for(&file) {
            Some(rejection) => AttachmentCheck::Rejected {
                message: rejection.to_string(),
                rejection,
            },
            None => AttachmentCheck::Accepted { file },
        }
    }

    fn rejection_for(&self, file: &FileDescriptor) -> Option<AttachmentRejection> {
        if file.content_type != mime::APPLICATION_PDF.essence_str() {
            return Some(AttachmentRejection::WrongType {
                found: file.content_type.clone(),
            });
        }

        if file.size_bytes > self.max_bytes {
            return Some(AttachmentRejection::TooLarge {
                size_bytes: file.size_bytes,
                limit_bytes: self.max_bytes,
            });
        }

        None
    }
}
