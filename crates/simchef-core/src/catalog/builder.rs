//! Turns the archive map into the output tree, one language at a time.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{ChannelNode, FileKind, FileRef, Html5AppNode, License, NodeKind, TopicNode};
use crate::archive;
use crate::checksum::{self, ArchiveChange};
use crate::config::ChefConfig;
use crate::languages::LanguageTable;
use crate::store::{ArchiveMap, ArchiveRecord};
use crate::transform::Transformer;

pub struct CatalogBuilder {
    transformer: Transformer,
    languages: LanguageTable,
    zip_dir: PathBuf,
    source_id_prefix: String,
    license_holder: String,
}

impl CatalogBuilder {
    pub fn new(cfg: &ChefConfig, zip_dir: impl Into<PathBuf>) -> Self {
        Self {
            transformer: Transformer::from_config(cfg),
            languages: LanguageTable::new(cfg.languages.clone()),
            zip_dir: zip_dir.into(),
            source_id_prefix: cfg.channel.source_id.clone(),
            license_holder: cfg.license_holder.clone(),
        }
    }

    pub fn zip_dir(&self) -> &Path {
        &self.zip_dir
    }

    /// Packages every language in `data` (sorted by display name) and appends
    /// one topic per language to `root`.
    ///
    /// Stops at the first failure; topics added before it stay on `root`.
    pub fn construct_channel(&self, data: &ArchiveMap, root: &mut ChannelNode) -> Result<()> {
        for (name, record) in data {
            let topic = self
                .package(name, record)
                .with_context(|| format!("package language {}", name))?;
            root.add_child(topic);
        }
        tracing::info!("channel has {} languages", root.children.len());
        Ok(())
    }

    fn package(&self, name: &str, record: &ArchiveRecord) -> Result<TopicNode> {
        let language = self.languages.code_or_display_name(name);
        let page = self.transformer.transform(record)?;

        let staged = archive::create_predictable_zip(record.page_dir(), &self.zip_dir)?;
        let dest = self.zip_dir.join(archive::archive_name(&language));
        let previous = checksum::sha256_if_exists(&dest)?;
        archive::relocate(&staged, &dest)?;
        let sha256 = checksum::sha256_path(&dest)?;
        let change = ArchiveChange::between(previous.as_deref(), &sha256);
        tracing::info!("{} {} ({})", dest.display(), change, sha256);

        let mut topic = TopicNode::new(name, name);
        topic.add_child(Html5AppNode {
            kind: NodeKind::Html5App,
            source_id: format!("{}-{}", self.source_id_prefix, name),
            title: page.title,
            files: vec![FileRef {
                kind: FileKind::HtmlZip,
                path: dest,
                sha256,
            }],
            license: License::public_domain(self.license_holder.as_str()),
            language,
            thumbnail: page.thumbnail_path,
        });
        Ok(topic)
    }
}
