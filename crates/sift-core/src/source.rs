//! Line-source seam: the engine consumes already-resident lines and never
//! performs I/O or decompression itself. Concrete providers (filesystem,
//! archive extraction, remote fetch) live behind [`LineSource`].

use std::collections::HashMap;

/// Raw lines plus basic metadata handed to the engine on load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourcePayload {
    /// Ordered raw lines of the file.
    pub lines: Vec<String>,
    /// Size of the source content in bytes.
    pub byte_size: u64,
    /// Optional upstream structured-classification hint.
    pub structured_hint: Option<bool>,
}

/// Failure modes a provider can surface.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("log path is required")]
    MissingPath,
    #[error("no content available for {0}")]
    NotFound(String),
    #[error("read {path}: {detail}")]
    Read { path: String, detail: String },
}

/// Provider interface: `(path) -> ordered raw lines + metadata`.
pub trait LineSource {
    fn fetch(&self, path: &str) -> Result<SourcePayload, SourceError>;
}

// ---------------------------------------------------------------------------
// MemorySource — canned payloads for tests and embedding
// ---------------------------------------------------------------------------

/// In-memory provider keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, SourcePayload>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload under a path, byte size derived from the lines.
    pub fn insert(&mut self, path: &str, lines: Vec<String>) {
        let byte_size = lines.iter().map(|l| l.len() as u64 + 1).sum();
        self.files.insert(
            path.to_owned(),
            SourcePayload {
                lines,
                byte_size,
                structured_hint: None,
            },
        );
    }

    /// Register a payload with an explicit structured hint.
    pub fn insert_with_hint(&mut self, path: &str, lines: Vec<String>, hint: bool) {
        self.insert(path, lines);
        if let Some(payload) = self.files.get_mut(path) {
            payload.structured_hint = Some(hint);
        }
    }
}

impl LineSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<SourcePayload, SourceError> {
        if path.trim().is_empty() {
            return Err(SourceError::MissingPath);
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
