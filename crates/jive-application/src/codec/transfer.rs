//! Batch export and import of memory corpora.
//!
//! Export writes one Markdown file per item plus a `metadata.json` manifest
//! into `export-{namespace}-{timestamp}/`. Import walks files in any of four
//! modes; a fatal error on one file is reported and does not abort the rest
//! of the batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use jive_domain::entities::memory::{MemoryItem, MemoryType};
use jive_domain::error::{Error, Result};
use jive_domain::ports::{EmbeddingProvider, NamespaceStore, WriteBatch, WriteOp};
use jive_domain::value_objects::{ImportMode, Namespace};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::parse::parse_document;
use super::render::{filename_for, render_item};

/// One file entry in the export manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name inside the export directory
    pub file: String,
    /// Item slug
    pub slug: String,
    /// `architecture` or `troubleshoot`
    pub r#type: String,
    /// SHA-256 of the file content
    pub sha256: String,
}

/// The `metadata.json` manifest of a batch export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Source namespace
    pub namespace: String,
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    /// Embedding model active at export time
    pub model_id: String,
    /// Exported files
    pub files: Vec<ManifestEntry>,
}

/// Result of a batch export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Directory the export was written to
    pub directory: PathBuf,
    /// Number of files written (manifest excluded)
    pub exported: usize,
}

/// Result of an import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Slugs created
    pub created: Vec<String>,
    /// Slugs updated
    pub updated: Vec<String>,
    /// Slugs left untouched (content identical)
    pub unchanged: Vec<String>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
    /// Per-file fatal errors, `file: message`
    pub errors: Vec<String>,
}

/// Export/import over one namespace's memory corpora.
pub struct TransferService {
    store: Arc<dyn NamespaceStore>,
    embedding: Arc<dyn EmbeddingProvider>,
}

impl TransferService {
    /// Bind the service to a namespace store and embedding engine.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedding }
    }

    /// Export one corpus (or both) into a fresh timestamped directory under
    /// `target_dir`.
    pub async fn export(
        &self,
        memory_type: Option<MemoryType>,
        target_dir: &Path,
    ) -> Result<ExportReport> {
        let namespace: Namespace = self.store.namespace().clone();
        let now = Utc::now();
        let directory = target_dir.join(format!(
            "export-{}-{}",
            namespace,
            now.format("%Y%m%d%H%M%S")
        ));
        std::fs::create_dir_all(&directory).map_err(|e| {
            Error::io_with_source(format!("cannot create {}", directory.display()), e)
        })?;

        let mut items = Vec::new();
        match memory_type {
            Some(memory_type) => items.extend(self.store.list_memory_items(memory_type).await?),
            None => {
                items.extend(self.store.list_memory_items(MemoryType::Architecture).await?);
                items.extend(self.store.list_memory_items(MemoryType::Troubleshoot).await?);
            }
        }

        let mut entries = Vec::with_capacity(items.len());
        for item in &items {
            let filename = filename_for(item);
            let content = render_item(item)?;
            let path = directory.join(&filename);
            std::fs::write(&path, &content)
                .map_err(|e| Error::io_with_source(format!("cannot write {}", path.display()), e))?;
            entries.push(ManifestEntry {
                file: filename,
                slug: item.slug().to_string(),
                r#type: item.memory_type().as_str().to_owned(),
                sha256: hex::encode(Sha256::digest(content.as_bytes())),
            });
        }

        let manifest = ExportManifest {
            namespace: namespace.to_string(),
            exported_at: now.to_rfc3339(),
            model_id: self.embedding.model_id().to_owned(),
            files: entries,
        };
        let manifest_path = directory.join("metadata.json");
        std::fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?)
            .map_err(|e| Error::io_with_source("cannot write metadata.json", e))?;

        tracing::info!(
            namespace = %namespace,
            exported = items.len(),
            directory = %directory.display(),
            "memory export complete"
        );
        Ok(ExportReport {
            directory,
            exported: items.len(),
        })
    }

    /// Import a single file's content.
    pub async fn import_content(
        &self,
        content: &str,
        filename: Option<&str>,
        mode: ImportMode,
        report: &mut ImportReport,
    ) -> Result<()> {
        let parsed = parse_document(content, filename)?;
        report.warnings.extend(parsed.warnings);

        let memory_type = parsed.item.memory_type();
        let slug = parsed.item.slug().clone();
        self.warn_dangling_relationships(&parsed.item, report).await?;

        let existing = self.store.get_memory_by_slug(memory_type, &slug).await?;
        match (mode, existing) {
            (ImportMode::CreateOnly, Some(_)) => Err(Error::SlugDuplicate {
                slug: slug.to_string(),
            }),
            (ImportMode::UpdateOnly, None) => Err(Error::not_found(format!(
                "{} memory '{slug}'",
                memory_type.as_str()
            ))),
            (_, existing) => {
                let item = match &existing {
                    // Keep the stored id so references stay valid; every
                    // other field comes from the file (replace included,
                    // which preserves created_on by contract).
                    Some(current) => rekey(parsed.item, current.id()),
                    None => parsed.item,
                };
                if let Some(current) = &existing {
                    if *current == item {
                        report.unchanged.push(slug.to_string());
                        return Ok(());
                    }
                }
                let embedding = self.embedding.embed(&item.embedding_text()).await?;
                let mut batch = WriteBatch::default();
                if mode == ImportMode::Replace {
                    if let Some(current) = &existing {
                        batch.push(WriteOp::DeleteMemoryItem { id: current.id() });
                    }
                }
                batch.push(WriteOp::PutMemoryItem {
                    item,
                    embedding: Some(embedding),
                });
                self.store.apply(batch).await?;
                if existing.is_some() {
                    report.updated.push(slug.to_string());
                } else {
                    report.created.push(slug.to_string());
                }
                Ok(())
            }
        }
    }

    /// Import every memory file in a directory. Per-file errors are recorded
    /// and do not abort the batch. When a `metadata.json` manifest is
    /// present, file hashes are verified and mismatches reported as
    /// warnings.
    pub async fn import_directory(&self, dir: &Path, mode: ImportMode) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let manifest = read_manifest(dir, &mut report);
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| Error::io_with_source(format!("cannot read {}", dir.display()), e))?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "md")
                    && path.file_name().is_some_and(|name| {
                        let name = name.to_string_lossy();
                        name.starts_with("architecture_") || name.starts_with("troubleshoot_")
                    })
            })
            .collect();
        paths.sort();

        for path in paths {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    report.errors.push(format!("{filename}: {e}"));
                    continue;
                }
            };
            if let Some(manifest) = &manifest {
                verify_manifest_hash(manifest, &filename, &content, &mut report);
            }
            if let Err(e) = self
                .import_content(&content, Some(filename.as_str()), mode, &mut report)
                .await
            {
                report.errors.push(format!("{filename}: {e}"));
            }
        }
        Ok(report)
    }

    async fn warn_dangling_relationships(
        &self,
        item: &MemoryItem,
        report: &mut ImportReport,
    ) -> Result<()> {
        let MemoryItem::Architecture(arch) = item else {
            return Ok(());
        };
        let known: HashSet<String> = self
            .store
            .list_memory_items(MemoryType::Architecture)
            .await?
            .into_iter()
            .map(|i| i.slug().to_string())
            .collect();
        for slug in arch.children_slugs.iter().chain(&arch.related_slugs) {
            if !known.contains(slug) && slug != arch.slug.as_str() {
                report
                    .warnings
                    .push(format!("{}: dangling relationship slug '{slug}'", arch.slug));
            }
        }
        Ok(())
    }
}

fn read_manifest(dir: &Path, report: &mut ImportReport) -> Option<ExportManifest> {
    let path = dir.join("metadata.json");
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            report.warnings.push(format!("metadata.json: {e}"));
            None
        }
    }
}

fn verify_manifest_hash(
    manifest: &ExportManifest,
    filename: &str,
    content: &str,
    report: &mut ImportReport,
) {
    let Some(entry) = manifest.files.iter().find(|f| f.file == filename) else {
        return;
    };
    let actual = hex::encode(Sha256::digest(content.as_bytes()));
    if actual != entry.sha256 {
        report
            .warnings
            .push(format!("{filename}: content differs from the export manifest"));
    }
}

fn rekey(item: MemoryItem, id: jive_domain::value_objects::MemoryItemId) -> MemoryItem {
    match item {
        MemoryItem::Architecture(mut arch) => {
            arch.id = id;
            MemoryItem::Architecture(arch)
        }
        MemoryItem::Troubleshoot(mut ts) => {
            ts.id = id;
            MemoryItem::Troubleshoot(ts)
        }
    }
}
