//! File uploads as delivered by the transport layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A reference to an uploaded file.
///
/// The transport layer hands uploads to the engine as plain objects:
///
/// ```json
/// { "name": "avatar.png", "type": "image/png", "size": 1024,
///   "tmp_name": "/tmp/upload-1", "error": 0 }
/// ```
///
/// `content_type` and `temporary_file` are accepted as aliases of `type` and
/// `tmp_name`. A missing `error` means the upload succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    #[serde(rename = "type", alias = "content_type")]
    pub content_type: String,
    pub size: u64,
    #[serde(rename = "tmp_name", alias = "temporary_file")]
    pub temporary_file: PathBuf,
    #[serde(default)]
    pub error: u16,
}

impl UploadedFile {
    /// Status code reported for a successful upload.
    pub const OK: u16 = 0;

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error == Self::OK
    }

    /// Describes a non-zero upload status code.
    #[must_use]
    pub const fn failure_reason(&self) -> Option<&'static str> {
        Some(match self.error {
            Self::OK => return None,
            1 | 2 => "the file exceeds the maximum upload size",
            3 => "the file was only partially uploaded",
            4 => "no file was uploaded",
            6 => "the upload directory is missing",
            7 => "the file could not be written",
            8 => "the upload was stopped by an extension",
            _ => "the upload failed",
        })
    }
}
