//! Intake of the uploaded image: name checks, sanitising and the transient
//! on-disk copy handed to the detector.

use crate::error::ApiError;
use axum::extract::Multipart;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

pub const IMAGE_FIELD: &str = "image";
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const FALLBACK_FILENAME: &str = "upload";

/// Accepts names whose last extension is png, jpg or jpeg (any case).
pub fn is_allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, extension)| {
            ALLOWED_EXTENSIONS.contains(&extension.to_lowercase().as_str())
        })
}

/// Reduces a client-supplied name to a flat, ASCII-only file name.
///
/// The name is NFKD-decomposed so accented letters keep their ASCII base.
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// trimmed, so the result can never leave the upload directory.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<32 hex chars>_<sanitised name>`; the random prefix keeps concurrent
/// uploads of the same file apart.
pub fn unique_name(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), secure_filename(filename))
}

/// An uploaded file that lives exactly as long as this guard.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
}

impl StoredUpload {
    fn reserve(dir: &Path, filename: &str) -> Self {
        Self {
            path: dir.join(unique_name(filename)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Upload already gone")
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to delete upload")
            }
        }
    }
}

/// Streams the first `image` file field into `dir`.
///
/// The name is validated before anything touches the disk. On any error
/// after that the guard is dropped and the partial file removed.
pub async fn receive_image(multipart: &mut Multipart, dir: &Path) -> Result<StoredUpload, ApiError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        if !is_allowed_file(&filename) {
            return Err(ApiError::InvalidFileType);
        }

        let upload = StoredUpload::reserve(dir, &filename);
        let mut file = tokio::fs::File::create(upload.path())
            .await
            .map_err(ApiError::StorageFailed)?;

        let mut written = 0usize;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(ApiError::StorageFailed)?;
            written += chunk.len();
        }
        file.flush().await.map_err(ApiError::StorageFailed)?;

        tracing::debug!(path = %upload.path().display(), bytes = written, "Upload stored");
        return Ok(upload);
    }

    Err(ApiError::MissingImage)
}
