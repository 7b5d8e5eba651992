//! Where a fetched page and its resources live on disk.
//!
//! ```text
//! <archive_dir>/ncase.me_covid-19_fr/          page directory (the zip root)
//!     index.html                               the root page
//!     ncase.me/covid-19/pics/dp3t.png          resources mirror <host>/<path>
//!     ncase.me/covid-19/sim/index.html
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use url::Url;

use crate::sanitize::sanitize_component;

/// Filename used for the root page and for directory-like URLs.
pub const INDEX_FILE: &str = "index.html";

/// Bytes escaped when a local path segment is written back into an attribute.
/// Non-ASCII is always escaped.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'\\');

/// On-disk name for one URL path segment: percent-decoded, then sanitized.
fn local_segment(segment: &str) -> String {
    sanitize_component(&percent_decode_str(segment).decode_utf8_lossy())
}

/// Host directory for a URL: `host`, or `host_port` when a non-default port is used.
pub fn host_dir(url: &Url) -> String {
    let host = url.host_str().unwrap_or("localhost");
    match url.port() {
        Some(port) => sanitize_component(&format!("{}_{}", host, port)),
        None => sanitize_component(host),
    }
}

/// Directory name for a page URL: host and path segments joined with `_`.
pub fn page_slug(url: &Url) -> String {
    let mut parts = vec![host_dir(url)];
    if let Some(segments) = url.path_segments() {
        parts.extend(
            segments
                .filter(|s| !s.is_empty())
                .map(local_segment),
        );
    }
    parts.join("_")
}

/// Local path (relative to the page directory, `/`-separated) for a resource URL.
/// Segments are percent-decoded, so `my%20pic.png` is stored as `my pic.png`.
///
/// Directory URLs (trailing `/`) and extensionless HTML get `index.html` appended,
/// so `.../sim?x=1` served as HTML is stored at `.../sim/index.html`.
pub fn resource_path(url: &Url, is_html: bool) -> String {
    let mut parts = vec![host_dir(url)];
    let raw: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    let trailing_slash = raw.last().map(|s| s.is_empty()).unwrap_or(true);
    parts.extend(raw.iter().filter(|s| !s.is_empty()).map(|s| local_segment(s)));

    let last_has_ext = parts.len() > 1
        && parts
            .last()
            .map(|s| s.contains('.'))
            .unwrap_or(false);
    if parts.len() == 1 || trailing_slash || (is_html && !last_has_ext) {
        parts.push(INDEX_FILE.to_string());
    }
    parts.join("/")
}

/// Relative reference from the file `from` to the file `to` (both relative to the page directory),
/// percent-encoded for use in an attribute.
pub fn relative_link(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = {
        let mut v: Vec<&str> = from.split('/').collect();
        v.pop();
        v
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let to_dir = &to_parts[..to_parts.len().saturating_sub(1)];

    let common = from_dir
        .iter()
        .zip(to_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<String> = Vec::new();
    out.extend(std::iter::repeat("..".to_string()).take(from_dir.len() - common));
    out.extend(
        to_parts[common..]
            .iter()
            .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string()),
    );
    out.join("/")
}

/// Layout of one page directory.
#[derive(Debug, Clone)]
pub struct PageLayout {
    root: Url,
    dir: PathBuf,
}

impl PageLayout {
    pub fn new(archive_dir: &Path, root: &Url) -> Self {
        Self {
            root: root.clone(),
            dir: archive_dir.join(page_slug(root)),
        }
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Absolute path of a resource given its relative path.
    pub fn local_file(&self, rel: &str) -> PathBuf {
        rel.split('/').fold(self.dir.clone(), |p, seg| p.join(seg))
    }

    /// Maps a reference found in the saved root page back to the URL it came from.
    ///
    /// Rewritten references (`<host>/<path>`, percent-encoded) map onto the root's
    /// origin with a trailing `index.html` dropped; anything else is resolved
    /// against the root URL.
    pub fn url_for_local(&self, reference: &str) -> Option<Url> {
        let reference = reference.trim();
        if let Ok(abs) = Url::parse(reference) {
            return Some(abs);
        }

        let split = reference.find(['?', '#']).unwrap_or(reference.len());
        let (path_part, suffix) = reference.split_at(split);
        if path_part == INDEX_FILE {
            return Some(self.root.clone());
        }

        let prefix = format!("{}/", host_dir(&self.root));
        let rest = match path_part.strip_prefix(&prefix) {
            Some(rest) => rest,
            None => return self.root.join(reference).ok(),
        };
        let rest = rest.strip_suffix(INDEX_FILE).unwrap_or(rest);

        let mut url = self.root.clone();
        url.set_path(&format!("/{}", rest));
        url.set_query(None);
        url.set_fragment(None);
        let (query, fragment) = match suffix.strip_prefix('?') {
            Some(q) => match q.split_once('#') {
                Some((q, f)) => (Some(q), Some(f)),
                None => (Some(q), None),
            },
            None => (None, suffix.strip_prefix('#')),
        };
        url.set_query(query);
        url.set_fragment(fragment);
        Some(url)
    }
}
