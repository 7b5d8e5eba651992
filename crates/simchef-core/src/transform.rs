//! Page transformer: strip the language switcher, read the title, pick a thumbnail.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::ChefConfig;
use crate::error::ChefError;
use crate::html::{query, rewrite};
use crate::storage;
use crate::store::ArchiveRecord;

/// Result of transforming one saved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPage {
    pub title: String,
    pub thumbnail_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Transformer {
    translations_selector: String,
    title_selector: String,
    thumbnail_fragment: String,
}

impl Transformer {
    pub fn new(
        translations_selector: impl Into<String>,
        title_selector: impl Into<String>,
        thumbnail_fragment: impl Into<String>,
    ) -> Self {
        Self {
            translations_selector: translations_selector.into(),
            title_selector: title_selector.into(),
            thumbnail_fragment: thumbnail_fragment.into(),
        }
    }

    pub fn from_config(cfg: &ChefConfig) -> Self {
        Self::new(
            cfg.translations_selector.as_str(),
            cfg.title_selector.as_str(),
            cfg.thumbnail_fragment.as_str(),
        )
    }

    /// Rewrites `record.index_path` in place without the translations block and
    /// returns the page title plus the thumbnail, if one was saved.
    pub fn transform(&self, record: &ArchiveRecord) -> Result<TransformedPage> {
        let path = &record.index_path;
        let original = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;

        let title = query::element_text(&String::from_utf8_lossy(&original), &self.title_selector)?
            .map(|t| t.trim().to_string())
            .ok_or_else(|| ChefError::MissingElement {
                selector: self.title_selector.clone(),
                path: path.clone(),
            })?;

        let (output, removed) = rewrite::remove_elements(&original, &self.translations_selector)?;
        if removed == 0 {
            tracing::debug!("no `{}` in {}", self.translations_selector, path.display());
        }
        if output != original {
            storage::write_atomic(path, &output)?;
        }

        let thumbnail_path = self.thumbnail(record);
        if thumbnail_path.is_none() {
            tracing::debug!("no thumbnail for {}", record.url);
        }

        Ok(TransformedPage {
            title,
            thumbnail_path,
        })
    }

    fn thumbnail(&self, record: &ArchiveRecord) -> Option<PathBuf> {
        let rel = record
            .resources
            .iter()
            .find(|r| r.contains(&self.thumbnail_fragment))?;
        Some(
            rel.split('/')
                .fold(record.page_dir().to_path_buf(), |p, seg| p.join(seg)),
        )
    }
}
