use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Channel metadata copied onto the root node of the output tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Who is providing the content (e.g. "ncase.me").
    pub source_domain: String,
    /// Unique id of the content source; also prefixes leaf source ids.
    pub source_id: String,
    pub title: String,
    /// Language code of the channel itself.
    pub language: String,
    pub description: String,
    /// Local path or URL of the channel thumbnail.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            source_domain: "ncase.me".to_string(),
            source_id: "covid19-sim".to_string(),
            title: "Coronavirus Simulations".to_string(),
            language: "en".to_string(),
            description: "For anyone of any age curious to explore what happens next in the \
                COVID-19 pandemic, these playable simulations from Marcel Salathé and Nicky Case \
                provide a way to learn about epidemiology, explore how the math of viruses works, \
                and develop our ability to deal with the reality of the pandemic."
                .to_string(),
            thumbnail: Some("assets/spread.png".to_string()),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 120,
            user_agent: concat!("simchef/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/simchef/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChefConfig {
    /// English landing page; translations are discovered from it.
    pub root_url: String,
    /// Bumping this starts a fresh `archive_<version>` download directory.
    pub archive_version: u32,
    /// Where downloads, zips and `channel.json` live. Defaults to `./chefdata`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Substring identifying the thumbnail among a page's resources.
    pub thumbnail_fragment: String,
    /// Copyright holder on the public-domain license of every leaf.
    pub license_holder: String,
    /// Container listing the translation links; removed from packaged pages.
    pub translations_selector: String,
    /// Element holding the localized title.
    pub title_selector: String,
    /// Translation links whose text contains this are not languages ("Help make a translation").
    pub skip_link_marker: String,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Extra display name → language code mappings, checked before the built-in table.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

impl Default for ChefConfig {
    fn default() -> Self {
        Self {
            root_url: "https://ncase.me/covid-19/".to_string(),
            archive_version: 1,
            data_dir: None,
            thumbnail_fragment: "dp3t.png".to_string(),
            license_holder: "Marcel Salathé & Nicky Case".to_string(),
            translations_selector: "div#translations".to_string(),
            title_selector: "span#share_title".to_string(),
            skip_link_marker: "translation".to_string(),
            channel: ChannelConfig::default(),
            http: HttpConfig::default(),
            languages: BTreeMap::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("simchef")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default location, creating a default file if none exists.
pub fn load_or_init() -> Result<ChefConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ChefConfig> {
    if !path.exists() {
        let default_cfg = ChefConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ChefConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ChefConfig::default();
        assert_eq!(cfg.root_url, "https://ncase.me/covid-19/");
        assert_eq!(cfg.archive_version, 1);
        assert_eq!(cfg.thumbnail_fragment, "dp3t.png");
        assert_eq!(cfg.translations_selector, "div#translations");
        assert_eq!(cfg.title_selector, "span#share_title");
        assert_eq!(cfg.channel.source_id, "covid19-sim");
        assert!(cfg.languages.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ChefConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ChefConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.root_url, cfg.root_url);
        assert_eq!(parsed.license_holder, cfg.license_holder);
        assert_eq!(parsed.channel.title, cfg.channel.title);
        assert_eq!(parsed.http.timeout_secs, cfg.http.timeout_secs);
    }

    #[test]
    fn config_toml_minimal_uses_section_defaults() {
        let toml = r#"
            root_url = "http://127.0.0.1:8000/sims/"
            archive_version = 2
            thumbnail_fragment = "thumb.png"
            license_holder = "Someone"
            translations_selector = "nav#langs"
            title_selector = "h1.title"
            skip_link_marker = "help"

            [languages]
            "Klingon" = "tlh"
        "#;
        let cfg: ChefConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.archive_version, 2);
        assert!(cfg.data_dir.is_none());
        assert_eq!(cfg.channel.source_domain, "ncase.me");
        assert_eq!(cfg.http.connect_timeout(), Duration::from_secs(15));
        assert_eq!(cfg.languages.get("Klingon").map(String::as_str), Some("tlh"));
    }

    #[test]
    fn load_or_init_at_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simchef").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.archive_version, 1);

        let again = load_or_init_at(&path).unwrap();
        assert_eq!(again.root_url, cfg.root_url);
    }
}
