//! Bidirectional file <-> store synchronization for memory corpora.
//!
//! Walks a workspace directory for `architecture_*.md` / `troubleshoot_*.md`
//! files and reconciles them with the store. Each file is handled
//! transactionally on its own; one bad file never aborts the run.
//!
//! Conflict policy (bidirectional): newer `updated_at` wins; on equal
//! timestamps the store wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jive_domain::entities::memory::{MemoryItem, MemoryType};
use jive_domain::error::{Error, Result};
use jive_domain::ports::{EmbeddingProvider, NamespaceStore};
use jive_domain::value_objects::SyncDirection;
use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::codec::{filename_for, parse_document, render_item};

/// Outcome summary of one sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Rows or files created
    pub created: Vec<String>,
    /// Rows or files updated
    pub updated: Vec<String>,
    /// Entries already in sync
    pub unchanged: Vec<String>,
    /// Conflicts resolved by the newer-wins policy
    pub conflicts: Vec<String>,
    /// Per-file failures, `file: message`
    pub errors: Vec<String>,
}

/// File <-> store sync over one namespace.
pub struct SyncService {
    store: Arc<dyn NamespaceStore>,
    embedding: Arc<dyn EmbeddingProvider>,
}

struct ScannedFile {
    path: PathBuf,
    filename: String,
    content: String,
}

impl SyncService {
    /// Bind the service to a namespace store and embedding engine.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedding }
    }

    /// Run a sync pass over `workspace_dir`.
    pub async fn sync(&self, workspace_dir: &Path, direction: SyncDirection) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let files = scan_files(workspace_dir, &mut report)?;
        let store_items = self.all_memory_items().await?;
        let by_filename: HashMap<String, MemoryItem> = store_items
            .into_iter()
            .map(|item| (filename_for(&item), item))
            .collect();

        match direction {
            SyncDirection::FileToDb => {
                for file in &files {
                    self.pull_file(file, by_filename.get(&file.filename), &mut report)
                        .await;
                }
            }
            SyncDirection::DbToFile => {
                self.push_items(workspace_dir, &by_filename, &files, &mut report)?;
            }
            SyncDirection::Bidirectional => {
                for file in &files {
                    match by_filename.get(&file.filename) {
                        None => self.pull_file(file, None, &mut report).await,
                        Some(stored) => {
                            self.reconcile(file, stored, &mut report).await;
                        }
                    }
                }
                // Store rows with no file on disk flow outward.
                let on_disk: HashMap<&str, ()> =
                    files.iter().map(|f| (f.filename.as_str(), ())).collect();
                for (filename, item) in &by_filename {
                    if !on_disk.contains_key(filename.as_str()) {
                        self.write_file(workspace_dir, item, &mut report, true)?;
                    }
                }
            }
        }
        Ok(report)
    }

    async fn all_memory_items(&self) -> Result<Vec<MemoryItem>> {
        let mut items = self
            .store
            .list_memory_items(MemoryType::Architecture)
            .await?;
        items.extend(
            self.store
                .list_memory_items(MemoryType::Troubleshoot)
                .await?,
        );
        Ok(items)
    }

    /// Import one file into the store (file side wins).
    async fn pull_file(
        &self,
        file: &ScannedFile,
        existing: Option<&MemoryItem>,
        report: &mut SyncReport,
    ) {
        let result = self.pull_file_inner(file, existing).await;
        match result {
            Ok(Some(slug)) => {
                if existing.is_some() {
                    report.updated.push(slug);
                } else {
                    report.created.push(slug);
                }
            }
            Ok(None) => report.unchanged.push(file.filename.clone()),
            Err(e) => report.errors.push(format!("{}: {e}", file.filename)),
        }
    }

    async fn pull_file_inner(
        &self,
        file: &ScannedFile,
        existing: Option<&MemoryItem>,
    ) -> Result<Option<String>> {
        let parsed = parse_document(&file.content, Some(file.filename.as_str()))?;
        let item = match existing {
            Some(current) => {
                let item = rekey_like(parsed.item, current);
                if *current == item {
                    return Ok(None);
                }
                item
            }
            None => parsed.item,
        };
        let embedding = self.embedding.embed(&item.embedding_text()).await?;
        self.store.put_memory_item(&item, Some(&embedding)).await?;
        Ok(Some(item.slug().to_string()))
    }

    /// Export store rows to disk (store side wins).
    fn push_items(
        &self,
        workspace_dir: &Path,
        by_filename: &HashMap<String, MemoryItem>,
        files: &[ScannedFile],
        report: &mut SyncReport,
    ) -> Result<()> {
        let content_by_name: HashMap<&str, &str> = files
            .iter()
            .map(|f| (f.filename.as_str(), f.content.as_str()))
            .collect();
        for (filename, item) in by_filename {
            match content_by_name.get(filename.as_str()) {
                Some(on_disk) => {
                    let rendered = render_item(item)?;
                    if content_hash(on_disk) == content_hash(&rendered) {
                        report.unchanged.push(filename.clone());
                    } else {
                        self.write_file(workspace_dir, item, report, false)?;
                        report.updated.push(filename.clone());
                    }
                }
                None => {
                    self.write_file(workspace_dir, item, report, false)?;
                    report.created.push(filename.clone());
                }
            }
        }
        Ok(())
    }

    /// Newer `updated_at` wins; the store wins ties.
    async fn reconcile(&self, file: &ScannedFile, stored: &MemoryItem, report: &mut SyncReport) {
        let parsed = match parse_document(&file.content, Some(file.filename.as_str())) {
            Ok(parsed) => parsed,
            Err(e) => {
                report.errors.push(format!("{}: {e}", file.filename));
                return;
            }
        };
        let item = rekey_like(parsed.item, stored);
        if item == *stored {
            report.unchanged.push(file.filename.clone());
            return;
        }

        report.conflicts.push(file.filename.clone());
        if item.updated_at() > stored.updated_at() {
            self.pull_file(file, Some(stored), report).await;
        } else {
            let dir = file.path.parent().unwrap_or_else(|| Path::new("."));
            if let Err(e) = self.write_file(dir, stored, report, false) {
                report.errors.push(format!("{}: {e}", file.filename));
            } else {
                report.updated.push(file.filename.clone());
            }
        }
    }

    fn write_file(
        &self,
        dir: &Path,
        item: &MemoryItem,
        report: &mut SyncReport,
        record_created: bool,
    ) -> Result<()> {
        let filename = filename_for(item);
        let rendered = render_item(item)?;
        let path = dir.join(&filename);
        std::fs::write(&path, rendered)
            .map_err(|e| Error::io_with_source(format!("cannot write {}", path.display()), e))?;
        if record_created {
            report.created.push(filename);
        }
        Ok(())
    }
}

fn rekey_like(item: MemoryItem, like: &MemoryItem) -> MemoryItem {
    match item {
        MemoryItem::Architecture(mut arch) => {
            arch.id = like.id();
            MemoryItem::Architecture(arch)
        }
        MemoryItem::Troubleshoot(mut ts) => {
            ts.id = like.id();
            MemoryItem::Troubleshoot(ts)
        }
    }
}

fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

fn scan_files(workspace_dir: &Path, report: &mut SyncReport) -> Result<Vec<ScannedFile>> {
    if !workspace_dir.exists() {
        std::fs::create_dir_all(workspace_dir).map_err(|e| {
            Error::io_with_source(format!("cannot create {}", workspace_dir.display()), e)
        })?;
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(workspace_dir).max_depth(2) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.errors.push(format!("walk: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let is_memory_file = std::path::Path::new(&filename)
            .extension()
            .is_some_and(|ext| ext == "md")
            && (filename.starts_with("architecture_") || filename.starts_with("troubleshoot_"));
        if !is_memory_file {
            continue;
        }
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => files.push(ScannedFile {
                path: entry.path().to_path_buf(),
                filename,
                content,
            }),
            Err(e) => report.errors.push(format!("{filename}: {e}")),
        }
    }
    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}
