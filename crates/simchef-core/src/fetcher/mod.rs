//! Page fetcher.
//!
//! Saves a root page plus every in-scope URL it references directly (one
//! level, never further) into a per-URL page directory, then rewrites the
//! saved HTML so references to saved files point at the local copies.

pub mod layout;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ChefError;
use crate::html::{query, rewrite};
use crate::http::HttpClient;
use crate::store::ArchiveRecord;

pub use layout::{PageLayout, INDEX_FILE};

/// Which discovered URLs are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Same host as the root page.
    SameDomain,
    /// Any http(s) URL.
    All,
}

/// Link-following policy for [`Fetcher::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    pub scope: LinkScope,
    /// 0 = root page only, 1 = root page plus its direct references.
    pub levels: u8,
}

impl LinkPolicy {
    pub fn same_domain_one_level() -> Self {
        Self {
            scope: LinkScope::SameDomain,
            levels: 1,
        }
    }

    fn in_scope(&self, root: &Url, candidate: &Url) -> bool {
        match self.scope {
            LinkScope::SameDomain => root.host_str() == candidate.host_str(),
            LinkScope::All => true,
        }
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::same_domain_one_level()
    }
}

/// Distinctness key: the URL without query and fragment.
pub fn fetch_key(url: &Url) -> String {
    let mut u = url.clone();
    u.set_query(None);
    u.set_fragment(None);
    u.into()
}

/// A fetched HTML sub-page waiting for its links to be rewritten.
struct PendingPage {
    rel: String,
    base: Url,
    body: Vec<u8>,
}

/// Downloads pages into `<archive_dir>/<page slug>/`.
pub struct Fetcher<'c, C: HttpClient + ?Sized> {
    client: &'c C,
    archive_dir: PathBuf,
}

impl<'c, C: HttpClient + ?Sized> Fetcher<'c, C> {
    pub fn new(client: &'c C, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            archive_dir: archive_dir.into(),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Layout used for pages fetched from `url`.
    pub fn layout_for(&self, url: &Url) -> PageLayout {
        PageLayout::new(&self.archive_dir, url)
    }

    /// Fetch `url` and, depending on `policy`, everything it references directly.
    ///
    /// The returned record has an empty `language_name`; the caller owns naming.
    /// Any network failure or non-2xx response aborts the fetch.
    pub fn fetch(&self, url: &str, policy: &LinkPolicy) -> Result<ArchiveRecord> {
        if policy.levels > 1 {
            return Err(ChefError::UnsupportedLinkDepth(policy.levels).into());
        }
        let requested = Url::parse(url).with_context(|| format!("invalid URL: {}", url))?;
        let layout = self.layout_for(&requested);

        tracing::info!("fetching {} into {}", url, layout.dir().display());
        let root = self.client.get(url)?;
        let base = Url::parse(&root.url).unwrap_or_else(|_| requested.clone());

        reset_dir(layout.dir())?;

        let mut local_by_key: HashMap<String, String> = HashMap::new();
        local_by_key.insert(fetch_key(&requested), INDEX_FILE.to_string());
        local_by_key.insert(fetch_key(&base), INDEX_FILE.to_string());

        let mut resources: Vec<String> = Vec::new();
        let mut pages: Vec<PendingPage> = Vec::new();

        if policy.levels >= 1 {
            let html = String::from_utf8_lossy(&root.body);
            for link in query::discover_links(&html, &base)? {
                if !policy.in_scope(&base, &link) {
                    continue;
                }
                let key = fetch_key(&link);
                if local_by_key.contains_key(&key) {
                    continue;
                }

                let resp = self.client.get(link.as_str())?;
                let rel = layout::resource_path(&link, resp.is_html());
                tracing::debug!("saved {} as {}", link, rel);

                if resp.is_html() {
                    let page_base = Url::parse(&resp.url).unwrap_or_else(|_| link.clone());
                    pages.push(PendingPage {
                        rel: rel.clone(),
                        base: page_base,
                        body: resp.body,
                    });
                } else {
                    write_file(&layout.local_file(&rel), &resp.body)?;
                }

                local_by_key.insert(key, rel.clone());
                if !resources.contains(&rel) {
                    resources.push(rel);
                }
            }
        }

        for page in pages {
            let out = rewrite::rewrite_references(&page.body, |raw| {
                local_reference(&page.base, raw, &page.rel, &local_by_key)
            })?;
            write_file(&layout.local_file(&page.rel), &out)?;
        }

        let index = rewrite::rewrite_references(&root.body, |raw| {
            local_reference(&base, raw, INDEX_FILE, &local_by_key)
        })?;
        let index_path = layout.index_path();
        write_file(&index_path, &index)?;

        tracing::info!("fetched {} ({} resources)", url, resources.len());
        Ok(ArchiveRecord {
            language_name: String::new(),
            url: url.to_string(),
            index_path,
            resources,
        })
    }
}

/// Replacement for `raw` (found in the file `from`) if it points at a saved file.
/// Query and fragment of the original reference are kept.
fn local_reference(
    base: &Url,
    raw: &str,
    from: &str,
    local_by_key: &HashMap<String, String>,
) -> Option<String> {
    let target = query::resolve_reference(base, &raw.replace("&amp;", "&"))?;
    let to = local_by_key.get(&fetch_key(&target))?;
    let mut out = layout::relative_link(from, to);
    if let Some(q) = target.query() {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = target.fragment() {
        out.push('#');
        out.push_str(f);
    }
    Some(out)
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("clear page dir: {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
    Ok(())
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir: {}", parent.display()))?;
    }
    fs::write(path, data).with_context(|| format!("write {}", path.display()))
}
