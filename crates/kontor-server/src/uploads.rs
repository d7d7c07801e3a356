use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Per-client document folders under a configured root:
/// `<root>/clients/<client_id>/<filename>`. The store only does
/// bookkeeping; which client ids are valid is the caller's problem.
pub struct DocumentStore {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Reduce a client-supplied filename to its final path component.
/// Rejects anything that would escape the client's folder.
pub fn sanitize_filename(raw: &str) -> Result<String, String> {
    let name = Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| "invalid filename".to_string())?;
    if name.is_empty() || name == "." || name == ".." {
        return Err("invalid filename".to_string());
    }
    Ok(name.to_string())
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn client_dir(&self, client_id: i64) -> PathBuf {
        self.root.join("clients").join(client_id.to_string())
    }

    /// Write a document, creating the client folder on first use.
    /// `filename` must already be sanitized.
    pub async fn save(&self, client_id: i64, filename: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.client_dir(client_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// List a client's documents. A client with no folder yet simply
    /// has no documents.
    pub async fn list(&self, client_id: i64) -> Result<Vec<DocumentInfo>> {
        let dir = self.client_dir(client_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", dir.display()))
            }
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let meta = entry.metadata().await.context("Failed to stat document")?;
            if !meta.is_file() {
                continue;
            }
            docs.push(DocumentInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        docs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(docs)
    }

    /// Delete one document. Returns false if it was not there.
    pub async fn delete(&self, client_id: i64, filename: &str) -> Result<bool> {
        let path = self.client_dir(client_id).join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }

    /// Drop a client's whole folder. Used when the client row is
    /// deleted; missing folder is fine.
    pub async fn remove_client_dir(&self, client_id: i64) -> Result<()> {
        let dir = self.client_dir(client_id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", dir.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("invoice.pdf").unwrap(), "invoice.pdf");
        assert_eq!(sanitize_filename("Q3 report.xlsx").unwrap(), "Q3 report.xlsx");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("/etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("a/b/c.txt").unwrap(), "c.txt");
        assert_eq!(sanitize_filename("../../../x.pdf").unwrap(), "x.pdf");
        // Trailing separators are dropped by the component split
        assert_eq!(sanitize_filename("docs/").unwrap(), "docs");
    }

    #[test]
    fn test_sanitize_rejects_traversal_and_empty() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename(".").is_err());
        assert!(sanitize_filename("a/..").is_err());
    }

    #[tokio::test]
    async fn test_save_list_delete_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path());

        assert!(store.list(1).await.unwrap().is_empty());

        store.save(1, "contract.pdf", b"pdf bytes").await.unwrap();
        store.save(1, "notes.txt", b"hello").await.unwrap();
        store.save(2, "other.txt", b"other client").await.unwrap();

        let docs = store.list(1).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "contract.pdf");
        assert_eq!(docs[0].size, 9);
        assert_eq!(docs[1].name, "notes.txt");

        assert!(store.delete(1, "notes.txt").await.unwrap());
        assert!(!store.delete(1, "notes.txt").await.unwrap());
        assert_eq!(store.list(1).await.unwrap().len(), 1);

        // Client 2 untouched
        assert_eq!(store.list(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_client_dir_is_recursive_and_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path());

        store.save(7, "a.txt", b"a").await.unwrap();
        store.save(7, "b.txt", b"b").await.unwrap();

        store.remove_client_dir(7).await.unwrap();
        assert!(store.list(7).await.unwrap().is_empty());

        // Removing a folder that is already gone is not an error
        store.remove_client_dir(7).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path());

        store.save(3, "doc.txt", b"v1").await.unwrap();
        store.save(3, "doc.txt", b"version two").await.unwrap();

        let docs = store.list(3).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].size, 11);
    }
}
