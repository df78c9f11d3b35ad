//! On-disk cache of converted pages.
//!
//! Each page id maps to two files in the cache directory: the ADF document
//! as JSON and the Markdown it converted to. A cached document that no
//! longer decodes is treated as absent so the caller fetches it again.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::adf::Document;

const ADF_EXTENSION: &str = "adf.json";
const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under the user cache directory.
    pub fn default_dir() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME") {
            return PathBuf::from(xdg).join("adfless");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".cache").join("adfless");
        }
        PathBuf::from(".adfless-cache")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, page_id: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", file_stem(page_id)))
    }

    pub fn document_path(&self, page_id: &str) -> PathBuf {
        self.path_for(page_id, ADF_EXTENSION)
    }

    pub fn markdown_path(&self, page_id: &str) -> PathBuf {
        self.path_for(page_id, MARKDOWN_EXTENSION)
    }

    /// Write both artifacts for a page, replacing earlier ones.
    pub fn store(&self, page_id: &str, doc: &Document, markdown: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache dir {}", self.dir.display()))?;

        let json = doc.to_json_pretty().context("Failed to encode ADF document")?;
        let doc_path = self.document_path(page_id);
        fs::write(&doc_path, json)
            .with_context(|| format!("Failed to write {}", doc_path.display()))?;

        let md_path = self.markdown_path(page_id);
        fs::write(&md_path, markdown)
            .with_context(|| format!("Failed to write {}", md_path.display()))?;

        tracing::debug!(page_id, dir = %self.dir.display(), "cached page");
        Ok(())
    }

    /// The cached document, `None` if missing, unreadable or malformed.
    pub fn load_document(&self, page_id: &str) -> Option<Document> {
        let path = self.document_path(page_id);
        let json = fs::read_to_string(&path).ok()?;
        let doc = Document::from_json(&json);
        if doc.is_none() {
            tracing::warn!(path = %path.display(), "cached ADF document is malformed, ignoring it");
        }
        doc
    }

    pub fn load_markdown(&self, page_id: &str) -> Option<String> {
        fs::read_to_string(self.markdown_path(page_id)).ok()
    }

    /// Remove a page's artifacts. Missing files are not an error.
    pub fn invalidate(&self, page_id: &str) -> Result<()> {
        for path in [self.document_path(page_id), self.markdown_path(page_id)] {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// File-name-safe form of a page id.
fn file_stem(page_id: &str) -> String {
    let stem: String = page_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}
