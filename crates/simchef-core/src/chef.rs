//! Pipeline driver: fetch every language, package each one, write the tree.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

use crate::catalog::{CatalogBuilder, ChannelNode};
use crate::config::ChefConfig;
use crate::fetcher::{Fetcher, LinkPolicy};
use crate::html::query;
use crate::http::HttpClient;
use crate::storage;
use crate::store::{has_valid, ArchiveMap, ArchiveStore};

/// Display name under which the root page is stored.
pub const ROOT_LANGUAGE: &str = "English";

const DEFAULT_DATA_DIR: &str = "chefdata";

/// On-disk locations derived from the data directory and archive version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChefPaths {
    pub data_dir: PathBuf,
    pub downloads_dir: PathBuf,
    /// `downloads/archive_<version>`; page directories live here.
    pub archive_dir: PathBuf,
    /// The archive store file.
    pub archive_data: PathBuf,
    pub zip_dir: PathBuf,
    pub channel_json: PathBuf,
}

impl ChefPaths {
    pub fn new(data_dir: impl Into<PathBuf>, archive_version: u32) -> Self {
        let data_dir = data_dir.into();
        let downloads_dir = data_dir.join("downloads");
        let archive_dir = downloads_dir.join(format!("archive_{}", archive_version));
        Self {
            archive_data: archive_dir.join("downloads.json"),
            zip_dir: data_dir.join("zips"),
            channel_json: data_dir.join("channel.json"),
            downloads_dir,
            archive_dir,
            data_dir,
        }
    }

    /// `override_dir`, else the configured data dir, else `./chefdata`.
    pub fn resolve(cfg: &ChefConfig, override_dir: Option<&Path>) -> Self {
        let data_dir = override_dir
            .map(Path::to_path_buf)
            .or_else(|| cfg.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(data_dir, cfg.archive_version)
    }
}

pub struct Chef<C: HttpClient> {
    cfg: ChefConfig,
    paths: ChefPaths,
    client: C,
}

impl<C: HttpClient> Chef<C> {
    pub fn new(cfg: ChefConfig, paths: ChefPaths, client: C) -> Self {
        Self { cfg, paths, client }
    }

    pub fn config(&self) -> &ChefConfig {
        &self.cfg
    }

    pub fn paths(&self) -> &ChefPaths {
        &self.paths
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> ArchiveStore {
        ArchiveStore::new(&self.paths.archive_data)
    }

    /// Fetches the root page and every translation not already in the store,
    /// then saves the store. Languages with a valid record cost no requests.
    pub fn download_content(&self) -> Result<ArchiveMap> {
        let store = self.store();
        let mut data = store.load()?;
        let fetcher = Fetcher::new(&self.client, &self.paths.archive_dir);
        let policy = LinkPolicy::same_domain_one_level();

        self.fetch_language(&fetcher, &policy, &mut data, ROOT_LANGUAGE, &self.cfg.root_url)?;

        for (name, url) in self.translations(&fetcher, &data)? {
            self.fetch_language(&fetcher, &policy, &mut data, &name, &url)?;
        }

        store.save(&data)?;
        Ok(data)
    }

    fn fetch_language(
        &self,
        fetcher: &Fetcher<'_, C>,
        policy: &LinkPolicy,
        data: &mut ArchiveMap,
        name: &str,
        url: &str,
    ) -> Result<()> {
        if has_valid(data, name) {
            tracing::debug!("{} already downloaded, skipping", name);
            return Ok(());
        }
        tracing::info!("downloading {} from {}", name, url);
        let mut record = fetcher
            .fetch(url, policy)
            .with_context(|| format!("download {}", name))?;
        record.language_name = name.to_string();
        data.insert(name.to_string(), record);
        Ok(())
    }

    /// (display name, URL) of each language listed on the saved root page.
    fn translations(
        &self,
        fetcher: &Fetcher<'_, C>,
        data: &ArchiveMap,
    ) -> Result<Vec<(String, String)>> {
        let root = match data.get(ROOT_LANGUAGE) {
            Some(r) => r,
            None => return Ok(Vec::new()),
        };
        let html = std::fs::read_to_string(&root.index_path)
            .with_context(|| format!("read {}", root.index_path.display()))?;
        let root_url =
            Url::parse(&root.url).with_context(|| format!("invalid URL in store: {}", root.url))?;
        let layout = fetcher.layout_for(&root_url);

        let links = match query::translation_links(&html, &self.cfg.translations_selector)? {
            Some(links) => links,
            None => {
                tracing::warn!(
                    "no `{}` in {}; only languages already in the store are included",
                    self.cfg.translations_selector,
                    root.index_path.display()
                );
                return Ok(Vec::new());
            }
        };

        let mut out = Vec::new();
        for link in links {
            if link.text.is_empty() || link.text.contains(&self.cfg.skip_link_marker) {
                tracing::debug!("skipping translation link `{}`", link.text);
                continue;
            }
            let url = match layout.url_for_local(&link.href) {
                Some(u) => u,
                None => {
                    tracing::warn!("cannot resolve translation link {} ({})", link.href, link.text);
                    continue;
                }
            };
            let mut url = url.to_string();
            if !url.ends_with('/') {
                url.push('/');
            }
            out.push((link.text, url));
        }
        Ok(out)
    }

    /// Packages `data` onto `root`; see [`CatalogBuilder::construct_channel`].
    pub fn construct_channel(&self, data: &ArchiveMap, root: &mut ChannelNode) -> Result<()> {
        CatalogBuilder::new(&self.cfg, &self.paths.zip_dir).construct_channel(data, root)
    }

    /// Writes the tree to `channel.json`.
    pub fn write_channel(&self, root: &ChannelNode) -> Result<()> {
        let json = serde_json::to_vec_pretty(root).context("serialize channel")?;
        storage::write_atomic(&self.paths.channel_json, &json)?;
        tracing::info!("wrote {}", self.paths.channel_json.display());
        Ok(())
    }

    /// Full pipeline. The tree is written even when packaging fails part-way.
    pub fn run(&self) -> Result<ChannelNode> {
        let data = self.download_content()?;
        self.build(&data)
    }

    /// Package `data` and write the tree.
    pub fn build(&self, data: &ArchiveMap) -> Result<ChannelNode> {
        let mut root = ChannelNode::from_config(&self.cfg.channel);
        let built = self.construct_channel(data, &mut root);
        self.write_channel(&root)?;
        built?;
        Ok(root)
    }
}
