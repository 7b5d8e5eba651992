//! DOM lookups built on `scraper`.

use anyhow::Result;
use scraper::{Html, Selector};
use url::Url;

use super::LINK_ATTRIBUTES;
use crate::error::ChefError;

fn selector(css: &str) -> Result<Selector, ChefError> {
    Selector::parse(css).map_err(|e| ChefError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Raw values of every link attribute in [`LINK_ATTRIBUTES`], in document order.
pub fn extract_references(html: &str) -> Result<Vec<String>> {
    let group = LINK_ATTRIBUTES
        .iter()
        .map(|(tag, attr)| format!("{}[{}]", tag, attr))
        .collect::<Vec<_>>()
        .join(", ");
    let sel = selector(&group)?;
    let document = Html::parse_document(html);

    let mut refs = Vec::new();
    for element in document.select(&sel) {
        let name = element.value().name();
        for (tag, attr) in LINK_ATTRIBUTES {
            if *tag != name {
                continue;
            }
            if let Some(value) = element.value().attr(attr) {
                refs.push(value.to_string());
            }
        }
    }
    Ok(refs)
}

/// Resolves a raw reference against `base`.
///
/// Returns `None` for empty values, in-page anchors (`#...`) and anything
/// that does not end up as http(s) (`mailto:`, `javascript:`, `data:`, ...).
/// The fragment is kept; callers strip it when they need a fetch key.
pub fn resolve_reference(base: &Url, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }
    let url = base.join(raw).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

/// Absolute, fragment-free URLs referenced by the page, in document order, duplicates kept.
pub fn discover_links(html: &str, base: &Url) -> Result<Vec<Url>> {
    Ok(extract_references(html)?
        .iter()
        .filter_map(|raw| resolve_reference(base, raw))
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .collect())
}

/// A link inside the translations block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationLink {
    /// Trimmed link text, e.g. "Français".
    pub text: String,
    pub href: String,
}

/// Links inside the first element matching `container`.
/// `Ok(None)` when there is no such element.
pub fn translation_links(html: &str, container: &str) -> Result<Option<Vec<TranslationLink>>> {
    let container_sel = selector(container)?;
    let link_sel = selector("a[href]")?;
    let document = Html::parse_document(html);

    let block = match document.select(&container_sel).next() {
        Some(b) => b,
        None => return Ok(None),
    };
    let links = block
        .select(&link_sel)
        .filter_map(|a| {
            a.value().attr("href").map(|href| TranslationLink {
                text: a.text().collect::<String>().trim().to_string(),
                href: href.trim().to_string(),
            })
        })
        .collect();
    Ok(Some(links))
}

/// Text content (entities decoded) of the first element matching `css`.
pub fn element_text(html: &str, css: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<html><head>
        <link rel="stylesheet" href="css/main.css">
        <script src="js/app.js"></script>
        </head><body>
        <a href="#top">Top</a>
        <img src="pics/dp3t.png">
        <iframe src="sim?stage=1" data-src="sim?stage=2"></iframe>
        <a href="mailto:someone@example.com">Mail</a>
        <a href="https://other.example.org/x">Elsewhere</a>
        </body></html>"##;

    #[test]
    fn extract_references_in_document_order() {
        let refs = extract_references(PAGE).unwrap();
        assert_eq!(
            refs,
            vec![
                "css/main.css",
                "js/app.js",
                "#top",
                "pics/dp3t.png",
                "sim?stage=1",
                "sim?stage=2",
                "mailto:someone@example.com",
                "https://other.example.org/x",
            ]
        );
    }

    #[test]
    fn discover_links_resolves_and_filters() {
        let base = Url::parse("https://ncase.me/covid-19/").unwrap();
        let links: Vec<String> = discover_links(PAGE, &base)
            .unwrap()
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            links,
            vec![
                "https://ncase.me/covid-19/css/main.css",
                "https://ncase.me/covid-19/js/app.js",
                "https://ncase.me/covid-19/pics/dp3t.png",
                "https://ncase.me/covid-19/sim?stage=1",
                "https://ncase.me/covid-19/sim?stage=2",
                "https://other.example.org/x",
            ]
        );
    }

    #[test]
    fn resolve_reference_keeps_fragment_and_skips_anchors() {
        let base = Url::parse("https://ncase.me/covid-19/").unwrap();
        assert_eq!(
            resolve_reference(&base, "fr/#intro").unwrap().as_str(),
            "https://ncase.me/covid-19/fr/#intro"
        );
        assert!(resolve_reference(&base, "#intro").is_none());
        assert!(resolve_reference(&base, "  ").is_none());
        assert!(resolve_reference(&base, "javascript:void(0)").is_none());
    }

    #[test]
    fn translation_links_missing_block() {
        let links = translation_links("<p>no block</p>", "div#translations").unwrap();
        assert!(links.is_none());
    }

    #[test]
    fn translation_links_text_and_href() {
        let html = r#"<div id="translations">
            <a href="fr/"> Français </a>
            <a href="es/">Español</a>
            <a href="https://github.com/ncase/covid-19">Help make a translation!</a>
            </div>"#;
        let links = translation_links(html, "div#translations").unwrap().unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].text, "Français");
        assert_eq!(links[0].href, "fr/");
        assert_eq!(links[2].text, "Help make a translation!");
    }

    #[test]
    fn element_text_decodes_entities() {
        let html = r#"<span id="share_title">What Happens Next? COVID&#8209;19 &amp; You</span>"#;
        let text = element_text(html, "span#share_title").unwrap();
        assert_eq!(text.as_deref(), Some("What Happens Next? COVID\u{2011}19 & You"));
        assert!(element_text(html, "span#missing").unwrap().is_none());
    }

    #[test]
    fn invalid_selector_is_reported() {
        let err = element_text("<p></p>", "span[").unwrap_err();
        assert!(err.to_string().contains("invalid selector"));
    }
}
