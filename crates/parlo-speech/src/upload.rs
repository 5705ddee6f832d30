use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

/// A staged upload on local disk, scoped to a single request
///
/// The backing file is created in the configured staging directory and is
/// removed on every exit path: `read` consumes the upload and deletes the
/// file after the bytes are recovered, and dropping an unread upload
/// (validation failure, model failure) deletes it as well. Nothing may
/// outlive the request that staged it.
#[derive(Debug)]
pub struct TransientUpload {
    file: NamedTempFile,
    filename: String,
    content_type: String,
    size: u64,
}

impl TransientUpload {
    /// Stage uploaded bytes on disk
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the staging file cannot be created or
    /// written
    pub fn stage(dir: &Path, filename: &str, content_type: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(
            path = %file.path().display(),
            filename,
            content_type,
            size = bytes.len(),
            "staged upload"
        );

        Ok(Self {
            file,
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
            size: bytes.len() as u64,
        })
    }

    /// Declared MIME type of the upload
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Original filename as sent by the client
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size of the staged file in bytes
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Read the staged bytes back, consuming the upload
    ///
    /// The backing file is deleted before this returns. Deletion failures
    /// are logged but never surfaced to the caller.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the staged file cannot be read
    pub fn read(self) -> std::io::Result<Vec<u8>> {
        let bytes = std::fs::read(self.file.path())?;

        if let Err(e) = self.file.close() {
            tracing::warn!(error = %e, "failed to delete staged upload");
        }

        Ok(bytes)
    }
}
