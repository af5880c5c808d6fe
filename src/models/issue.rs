use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One bullet or numbered finding as it came out of the document splitter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawIssue {
    pub text: String,
    pub heading: Option<String>,
    pub source_id: String,
}

impl RawIssue {
    pub fn new(text: impl Into<String>, heading: Option<&str>, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: heading.map(str::to_string),
            source_id: source_id.into(),
        }
    }
}

/// Handle to a document a source can load later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub source_id: String,
    pub location: DocumentLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    File(PathBuf),
    Memory(usize),
    /// A directory entry the walk could not read; loading it always fails.
    Unreadable { path: PathBuf, reason: String },
}

impl std::fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentLocation::File(path) => write!(f, "{}", path.display()),
            DocumentLocation::Memory(idx) => write!(f, "memory #{}", idx),
            DocumentLocation::Unreadable { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source_id: String,
    pub content: String,
}
