//! HTML helpers.
//!
//! `query` builds a DOM with `scraper` for lookups (links, text). `rewrite`
//! streams the original bytes through `lol_html`, so everything it does not
//! touch is emitted byte-for-byte.

pub mod query;
pub mod rewrite;

/// Elements and attributes that reference other documents or assets.
pub const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("link", "href"),
    ("img", "src"),
    ("script", "src"),
    ("iframe", "src"),
    ("iframe", "data-src"),
    ("source", "src"),
    ("video", "src"),
    ("audio", "src"),
];
