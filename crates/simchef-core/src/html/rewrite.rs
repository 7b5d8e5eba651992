//! Streaming edits built on `lol_html`.
//!
//! Output is the input token stream with only the requested edits applied,
//! so the same input always produces the same bytes.

use anyhow::Result;
use lol_html::{element, HtmlRewriter, Settings};
use std::cell::Cell;

use super::LINK_ATTRIBUTES;
use crate::error::ChefError;

fn run(html: &[u8], settings: Settings<'_, '_>) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = HtmlRewriter::new(settings, |chunk: &[u8]| output.extend_from_slice(chunk));
    rewriter.write(html)?;
    rewriter.end()?;
    Ok(output)
}

/// Rewrites every link attribute for which `map` returns a replacement.
pub fn rewrite_references<F>(html: &[u8], map: F) -> Result<Vec<u8>>
where
    F: Fn(&str) -> Option<String>,
{
    let map = &map;
    let handlers = LINK_ATTRIBUTES
        .iter()
        .map(|&(tag, attr)| {
            element!(format!("{}[{}]", tag, attr), move |el| {
                if let Some(value) = el.get_attribute(attr) {
                    if let Some(replacement) = map(&value) {
                        el.set_attribute(attr, &replacement)?;
                    }
                }
                Ok(())
            })
        })
        .collect();

    run(
        html,
        Settings {
            element_content_handlers: handlers,
            ..Settings::default()
        },
    )
}

/// Removes every element matching `selector` together with its content.
/// Returns the new document and how many elements were removed.
pub fn remove_elements(html: &[u8], selector: &str) -> Result<(Vec<u8>, usize)> {
    selector
        .parse::<lol_html::Selector>()
        .map_err(|e| ChefError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

    let removed = Cell::new(0usize);
    let output = run(
        html,
        Settings {
            element_content_handlers: vec![element!(selector, |el| {
                el.remove();
                removed.set(removed.get() + 1);
                Ok(())
            })],
            ..Settings::default()
        },
    )?;
    Ok((output, removed.get()))
}
