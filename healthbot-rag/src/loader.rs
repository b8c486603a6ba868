//! Reading the reference corpus from a folder.
//!
//! Plain-text (`.txt`) and markdown (`.md`) files are read as UTF-8. PDF files
//! are converted with the `pdftotext` system binary (poppler-utils); when it is
//! missing or fails, the file is skipped with a warning. Unreadable files never
//! abort loading.

use std::fs;
use std::path::Path;
use std::process::Command;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Read every supported file under `dir` into a [`Document`].
///
/// Files are visited in sorted path order so repeated builds see the same
/// sequence. Document IDs are paths relative to `dir`. A missing directory
/// yields an empty corpus.
///
/// # Errors
///
/// Returns [`RagError::Io`] if `dir` exists but is not a directory.
pub fn load_corpus(dir: &Path) -> Result<Vec<Document>> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "corpus directory does not exist");
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(RagError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "corpus path is not a directory"),
        ));
    }

    let mut documents = Vec::new();
    let entries = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file());

    for entry in entries {
        let path = entry.path();
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        let text = match extension.as_deref() {
            Some("txt") | Some("md") => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable document");
                    continue;
                }
            },
            Some("pdf") => match extract_pdf_text(path) {
                Ok(text) => text,
                Err(message) => {
                    warn!(path = %path.display(), %message, "skipping PDF document");
                    continue;
                }
            },
            _ => continue,
        };

        let id = path.strip_prefix(dir).unwrap_or(path).to_string_lossy().replace('\\', "/");
        documents.push(Document {
            id,
            text,
            source_uri: Some(path.to_string_lossy().into_owned()),
        });
    }

    debug!(dir = %dir.display(), document_count = documents.len(), "loaded corpus");
    Ok(documents)
}

/// SHA-256 over document IDs and contents, used to detect a stale index.
pub fn corpus_fingerprint(documents: &[Document]) -> String {
    let mut hasher = Sha256::new();
    for document in documents {
        hasher.update(document.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(document.text.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

fn extract_pdf_text(path: &Path) -> std::result::Result<String, String> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| format!("pdftotext unavailable: {e}"))?;

    if !output.status.success() {
        return Err(format!(
            "pdftotext exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
