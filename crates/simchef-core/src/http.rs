//! Blocking HTTP GET.
//!
//! The pipeline is strictly sequential, so one curl `Easy` handle per request
//! is all we need. The [`HttpClient`] trait is the seam the fetcher depends
//! on; tests plug in an in-memory site instead of the network.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::ChefError;

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Effective URL after redirects; relative links resolve against this.
    pub url: String,
    pub status: u32,
    /// Raw `Content-Type` value, if sent.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True if the server labelled the body as HTML.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let mime = ct.split(';').next().unwrap_or("").trim();
                mime.eq_ignore_ascii_case("text/html")
                    || mime.eq_ignore_ascii_case("application/xhtml+xml")
            })
            .unwrap_or(false)
    }
}

/// Anything that can GET a URL. Non-2xx statuses must be returned as errors.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// libcurl-backed client.
#[derive(Debug, Clone)]
pub struct CurlClient {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl CurlClient {
    pub fn new(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for CurlClient {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl HttpClient for CurlClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        // Empty string = accept every encoding libcurl can decode.
        easy.accept_encoding("")?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("GET {} failed", url))?;
        }

        let status = easy.response_code().context("no response code")?;
        if !(200..300).contains(&status) {
            return Err(ChefError::HttpStatus {
                url: url.to_string(),
                status,
            }
            .into());
        }

        let effective = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());
        let content_type = easy.content_type()?.map(str::to_string);

        tracing::debug!(
            "GET {} -> {} ({} bytes, {})",
            url,
            status,
            body.len(),
            content_type.as_deref().unwrap_or("no content-type")
        );

        Ok(HttpResponse {
            url: effective,
            status,
            content_type,
            body,
        })
    }
}
