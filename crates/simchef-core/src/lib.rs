//! simchef core: fetch localized simulation pages, strip them down, package
//! each language as a deterministic zip, and describe the result as a tree.

pub mod archive;
pub mod catalog;
pub mod checksum;
pub mod chef;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod http;
pub mod languages;
pub mod logging;
pub mod sanitize;
pub mod storage;
pub mod store;
pub mod transform;
