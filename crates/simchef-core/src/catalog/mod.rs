//! Output tree: channel → one topic per language → one HTML5 app.
//!
//! Serialized as `channel.json` for the downstream uploader.

pub mod builder;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ChannelConfig;

pub use builder::CatalogBuilder;

pub const PUBLIC_DOMAIN: &str = "Public Domain";

/// Root of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelNode {
    pub source_domain: String,
    pub source_id: String,
    pub title: String,
    pub language: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub children: Vec<TopicNode>,
}

impl ChannelNode {
    /// Empty channel carrying the configured metadata.
    pub fn from_config(cfg: &ChannelConfig) -> Self {
        Self {
            source_domain: cfg.source_domain.clone(),
            source_id: cfg.source_id.clone(),
            title: cfg.title.clone(),
            language: cfg.language.clone(),
            description: cfg.description.clone(),
            thumbnail: cfg.thumbnail.clone(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, topic: TopicNode) {
        self.children.push(topic);
    }
}

/// Grouping node, one per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Html5AppNode>,
}

impl TopicNode {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, app: Html5AppNode) {
        self.children.push(app);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Html5App,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    HtmlZip,
}

/// A file attached to a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub kind: FileKind,
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the file.
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub copyright_holder: String,
}

impl License {
    pub fn public_domain(copyright_holder: impl Into<String>) -> Self {
        Self {
            id: PUBLIC_DOMAIN.to_string(),
            copyright_holder: copyright_holder.into(),
        }
    }
}

/// One packaged page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Html5AppNode {
    pub kind: NodeKind,
    pub source_id: String,
    pub title: String,
    pub files: Vec<FileRef>,
    pub license: License,
    /// Language code, or the raw display name when it could not be resolved.
    pub language: String,
    #[serde(default)]
    pub thumbnail: Option<PathBuf>,
}
