use std::path::{Path, PathBuf};

use tablegrid::{Document, DocumentError};

use crate::page_range::parse_page_range;

/// Errors reported by the CLI. Every variant exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load page data: {0}")]
    Load(#[from] DocumentError),

    #[error("{0}")]
    PageRange(String),

    #[error("failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Read a JSON page dump with user-friendly error messages.
pub fn load_document(file: &Path) -> Result<Document, CliError> {
    if !file.exists() {
        return Err(CliError::NotFound(file.to_path_buf()));
    }
    let json = std::fs::read_to_string(file).map_err(|source| CliError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    Ok(Document::from_json(&json)?)
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, CliError> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(CliError::PageRange),
        None => Ok((0..page_count).collect()),
    }
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
