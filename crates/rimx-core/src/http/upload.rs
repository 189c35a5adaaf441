//! The single file part sent by a multipart upload.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ExchangeError;

/// Part header asking intermediaries not to cache the upload.
pub const EXPIRES_HEADER: &str = "Expires: 0";

/// Filename used when the source path has no final component.
pub const DEFAULT_FILENAME: &str = "upload.bin";

/// A file carried as one named part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    /// Form field name (e.g. `image`).
    pub field: String,
    /// Filename reported in `Content-Disposition`.
    pub filename: String,
    pub content_type: String,
    /// Extra part headers as `Name: value` lines.
    pub headers: Vec<String>,
    pub data: Vec<u8>,
}

impl UploadPart {
    pub fn new(
        field: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            headers: vec![EXPIRES_HEADER.to_string()],
            data,
        }
    }

    /// Read `path` into a part named `field`, using the path's basename as
    /// the filename. The file is closed before this returns, on success or
    /// error.
    pub fn from_file(field: &str, path: &Path, content_type: &str) -> Result<Self, ExchangeError> {
        let io_err = |source| ExchangeError::Io {
            path: path.to_path_buf(),
            source,
        };
        let data = {
            let mut f = File::open(path).map_err(io_err)?;
            let mut data = Vec::new();
            f.read_to_end(&mut data).map_err(io_err)?;
            data
        };
        Ok(Self::new(field, basename(path), content_type, data))
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
