use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::models::{DocumentLocation, DocumentRef, SourceDocument};

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Documents in a stable order; the pipeline preserves it.
    async fn discover(&self) -> Result<Vec<DocumentRef>>;
    async fn load(&self, doc: &DocumentRef) -> Result<SourceDocument>;
    fn name(&self) -> &str;
}

/// Review documents (`*.md`) found recursively under a directory.
pub struct FsDocumentSource {
    root: PathBuf,
    label: String,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let label = root.display().to_string();
        Self { root, label }
    }

    fn walk(&self) -> Result<Vec<WalkEntry>> {
        if !self.root.exists() {
            return Err(Error::InputNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(Error::NotADirectory(self.root.clone()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_markdown(entry.path()) {
                        entries.push(WalkEntry {
                            path: entry.into_path(),
                            failure: None,
                        });
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    tracing::warn!("Cannot read {}: {}", path.display(), e);
                    entries.push(WalkEntry {
                        path,
                        failure: Some(e.to_string()),
                    });
                }
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!("Discovered {} markdown files in {}", entries.len(), self.label);
        Ok(entries)
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root).unwrap_or(path).display().to_string()
    }
}

struct WalkEntry {
    path: PathBuf,
    failure: Option<String>,
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    /// Stems that collide (`a/api.md`, `b/api_review.md`) are qualified with their relative path.
    async fn discover(&self) -> Result<Vec<DocumentRef>> {
        let entries = self.walk()?;
        let ids: Vec<String> = entries.iter().map(|e| source_id_from_path(&e.path)).collect();

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for id in &ids {
            *seen.entry(id.as_str()).or_insert(0) += 1;
        }

        Ok(entries
            .into_iter()
            .zip(&ids)
            .map(|(entry, id)| {
                let source_id = if seen.get(id.as_str()).copied().unwrap_or(0) > 1 {
                    format!("{} ({})", id, self.relative(&entry.path))
                } else {
                    id.clone()
                };
                let location = match entry.failure {
                    None => DocumentLocation::File(entry.path),
                    Some(reason) => DocumentLocation::Unreadable {
                        path: entry.path,
                        reason,
                    },
                };
                DocumentRef {
                    source_id,
                    location,
                }
            })
            .collect())
    }

    async fn load(&self, doc: &DocumentRef) -> Result<SourceDocument> {
        let path = match &doc.location {
            DocumentLocation::File(path) => path,
            DocumentLocation::Unreadable { path, reason } => {
                return Err(Error::Document {
                    source_id: doc.source_id.clone(),
                    message: format!("{}: {}", path.display(), reason),
                })
            }
            other => {
                return Err(Error::Document {
                    source_id: doc.source_id.clone(),
                    message: format!("{} is not a file location", other),
                })
            }
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Document {
                source_id: doc.source_id.clone(),
                message: format!("{}: {}", path.display(), e),
            })?;

        tracing::debug!("Read {} characters from {}", content.len(), path.display());

        Ok(SourceDocument {
            source_id: doc.source_id.clone(),
            content,
        })
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Documents held in memory as `(source_id, markdown)` pairs.
pub struct MemoryDocumentSource {
    documents: Vec<(String, String)>,
}

impl MemoryDocumentSource {
    pub fn new<I, S, T>(documents: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            documents: documents
                .into_iter()
                .map(|(id, text)| (id.into(), text.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn discover(&self) -> Result<Vec<DocumentRef>> {
        Ok(self
            .documents
            .iter()
            .enumerate()
            .map(|(idx, (id, _))| DocumentRef {
                source_id: id.clone(),
                location: DocumentLocation::Memory(idx),
            })
            .collect())
    }

    async fn load(&self, doc: &DocumentRef) -> Result<SourceDocument> {
        let content = match doc.location {
            DocumentLocation::Memory(idx) => self.documents.get(idx).map(|(_, text)| text.clone()),
            DocumentLocation::File(_) | DocumentLocation::Unreadable { .. } => None,
        };

        content
            .map(|content| SourceDocument {
                source_id: doc.source_id.clone(),
                content,
            })
            .ok_or_else(|| Error::Document {
                source_id: doc.source_id.clone(),
                message: format!("no in-memory document at {}", doc.location),
            })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// `payment_service_review.md` -> `Payment Service`.
pub fn source_id_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stem = stem
        .strip_suffix("_review")
        .or_else(|| stem.strip_suffix("-review"))
        .unwrap_or(stem);

    let words: Vec<String> = stem
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect();

    if words.is_empty() {
        stem.to_string()
    } else {
        words.join(" ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_id_from_path() {
        assert_eq!(
            source_id_from_path(Path::new("reviews/payment_service_review.md")),
            "Payment Service"
        );
        assert_eq!(source_id_from_path(Path::new("auth-gateway.md")), "Auth Gateway");
        assert_eq!(source_id_from_path(Path::new("API.md")), "Api");
    }

    #[tokio::test]
    async fn test_fs_source_discovers_sorted_markdown() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b_review.md"), "- b").unwrap();
        std::fs::write(dir.path().join("nested/a.md"), "- a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = FsDocumentSource::new(dir.path());
        let docs = source.discover().await.unwrap();

        let ids: Vec<_> = docs.iter().map(|d| d.source_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);

        let loaded = source.load(&docs[1]).await.unwrap();
        assert_eq!(loaded.content, "- a");
    }

    #[tokio::test]
    async fn test_fs_source_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let result = FsDocumentSource::new(&missing).discover().await;
        assert!(matches!(result, Err(Error::InputNotFound(_))));

        let file = dir.path().join("file.md");
        std::fs::write(&file, "").unwrap();
        let result = FsDocumentSource::new(&file).discover().await;
        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_fs_load_failure_is_document_error() {
        let doc = DocumentRef {
            source_id: "Gone".to_string(),
            location: DocumentLocation::File(PathBuf::from("/definitely/not/here.md")),
        };
        let err = FsDocumentSource::new("/").load(&doc).await.unwrap_err();
        assert!(err.is_skippable());
    }

    #[tokio::test]
    async fn test_colliding_stems_get_qualified_ids() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("team_a")).unwrap();
        std::fs::create_dir(dir.path().join("team_b")).unwrap();
        std::fs::write(dir.path().join("team_a/api_review.md"), "- a").unwrap();
        std::fs::write(dir.path().join("team_b/api.md"), "- b").unwrap();
        std::fs::write(dir.path().join("billing.md"), "- c").unwrap();

        let docs = FsDocumentSource::new(dir.path()).discover().await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.source_id.as_str()).collect();

        assert_eq!(
            ids,
            vec!["Billing", "Api (team_a/api_review.md)", "Api (team_b/api.md)"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_walk_failure_becomes_failing_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("svc_review.md"), "- svc").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let source = FsDocumentSource::new(dir.path());
        let docs = source.discover().await.unwrap();
        assert_eq!(docs.len(), 2);

        let broken = docs
            .iter()
            .find(|d| matches!(d.location, DocumentLocation::Unreadable { .. }))
            .unwrap();
        assert_eq!(broken.source_id, "Loop");
        assert!(source.load(broken).await.unwrap_err().is_skippable());

        let svc = docs.iter().find(|d| d.source_id == "Svc").unwrap();
        assert_eq!(source.load(svc).await.unwrap().content, "- svc");
    }

    #[tokio::test]
    async fn test_memory_source_round_trip() {
        let source = MemoryDocumentSource::new(vec![("one", "- first"), ("two", "- second")]);
        let docs = source.discover().await.unwrap();
        assert_eq!(docs.len(), 2);

        let loaded = source.load(&docs[1]).await.unwrap();
        assert_eq!(loaded.source_id, "two");
        assert_eq!(loaded.content, "- second");
    }
}
