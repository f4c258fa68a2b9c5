use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading the resume
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Resume not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read resume {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load resume text from a PDF or plain-text file
///
/// A PDF that cannot be parsed yields an empty string rather than an error;
/// the caller decides whether an empty resume is worth continuing with.
pub fn load_resume_text<P: AsRef<Path>>(path: P) -> Result<String, ResumeError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ResumeError::NotFound(path.to_path_buf()));
    }

    if is_pdf(path) {
        return Ok(match pdf_extract::extract_text(path) {
            Ok(text) => {
                tracing::debug!("Extracted {} characters from {}", text.len(), path.display());
                text
            }
            Err(e) => {
                tracing::warn!("Error reading resume {}: {}", path.display(), e);
                String::new()
            }
        });
    }

    fs::read_to_string(path).map_err(|source| ResumeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[inline]
fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
