//! Integration test: full run against a local multi-language site.
//!
//! Runs fetch → transform → zip → tree with the curl client, then reruns to
//! check that nothing is downloaded twice and archives come out identical.

mod common;

use simchef_core::catalog::ChannelNode;
use simchef_core::chef::{Chef, ChefPaths};
use simchef_core::config::ChefConfig;
use simchef_core::http::CurlClient;
use std::fs;
use std::io::Read;
use tempfile::tempdir;

const ROOT: &str = r#"<!DOCTYPE html>
<html><body>
<div id="translations">
  <a href="fr/">Fran&ccedil;ais</a>
  <a href="ja/">日本語</a>
  <a href="tlh/">Klingon</a>
  <a href="https://github.com/ncase/covid-19">Help make a translation!</a>
</div>
<span id="share_title">What Happens Next?</span>
<img src="pics/dp3t.png">
</body></html>
"#;

fn page(title: &str) -> Vec<u8> {
    format!(
        r#"<html><body><div id="translations"><a href="../">English</a></div><span id="share_title">{}</span><img src="../pics/dp3t.png"></body></html>"#,
        title
    )
    .into_bytes()
}

fn serve() -> common::site_server::SiteServer {
    let fr = page("Et maintenant ?");
    let ja = page("次に何が起こるか");
    let tlh = page("Qapla'");
    common::site_server::start(&[
        ("/covid-19/", "text/html; charset=utf-8", ROOT.as_bytes()),
        ("/covid-19/fr/", "text/html", fr.as_slice()),
        ("/covid-19/ja/", "text/html", ja.as_slice()),
        ("/covid-19/tlh/", "text/html", tlh.as_slice()),
        ("/covid-19/pics/dp3t.png", "image/png", b"PNG".as_slice()),
    ])
}

fn chef(server: &common::site_server::SiteServer, data_dir: &std::path::Path) -> Chef<CurlClient> {
    let cfg = ChefConfig {
        root_url: server.url("/covid-19/"),
        ..ChefConfig::default()
    };
    let paths = ChefPaths::resolve(&cfg, Some(data_dir));
    Chef::new(cfg, paths, CurlClient::default())
}

#[test]
fn run_produces_sorted_tree_and_archives() {
    let server = serve();
    let data = tempdir().unwrap();
    let chef = chef(&server, data.path());
    let root = chef.run().unwrap();

    let titles: Vec<&str> = root.children.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["English", "Français", "Klingon", "日本語"]);

    let leaves: Vec<_> = root.children.iter().map(|t| &t.children[0]).collect();
    assert_eq!(leaves[0].language, "en");
    assert_eq!(leaves[1].language, "fr");
    assert_eq!(leaves[1].title, "Et maintenant ?");
    assert_eq!(leaves[2].language, "Klingon");
    assert_eq!(leaves[3].language, "ja");
    assert_eq!(leaves[3].source_id, "covid19-sim-日本語");

    let zips = &chef.paths().zip_dir;
    for name in ["en.zip", "fr.zip", "Klingon.zip", "ja.zip"] {
        assert!(zips.join(name).is_file(), "{} should exist", name);
    }
    assert!(leaves.iter().all(|l| l.thumbnail.is_some()));

    let written: ChannelNode =
        serde_json::from_slice(&fs::read(&chef.paths().channel_json).unwrap()).unwrap();
    assert_eq!(written, root);

    // The packaged English page no longer carries the language switcher.
    let mut archive = zip::ZipArchive::new(fs::File::open(zips.join("en.zip")).unwrap()).unwrap();
    let mut index = String::new();
    archive
        .by_name("index.html")
        .unwrap()
        .read_to_string(&mut index)
        .unwrap();
    assert!(!index.contains("translations"));
    assert!(index.contains("What Happens Next?"));
}

#[test]
fn second_run_downloads_nothing_and_archives_are_identical() {
    let server = serve();
    let data = tempdir().unwrap();

    let first = chef(&server, data.path()).run().unwrap();
    let requests_after_first = server.requests().len();
    let store_before = fs::read(ChefPaths::new(data.path(), 1).archive_data).unwrap();

    let second = chef(&server, data.path()).run().unwrap();
    assert_eq!(server.requests().len(), requests_after_first);
    assert_eq!(
        fs::read(ChefPaths::new(data.path(), 1).archive_data).unwrap(),
        store_before
    );

    let digests = |root: &ChannelNode| -> Vec<String> {
        root.children
            .iter()
            .map(|t| t.children[0].files[0].sha256.clone())
            .collect()
    };
    assert_eq!(digests(&first), digests(&second));
}
