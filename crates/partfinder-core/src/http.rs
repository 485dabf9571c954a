//! Blocking HTTP seam between the resolvers and the vendor sites

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::Config;

/// A fetched page after redirects were followed
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL, post-redirect
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16() || self.status == StatusCode::GONE.as_u16()
    }
}

/// Issues requests on behalf of the resolvers.
///
/// Non-success statuses are returned as pages rather than errors; an `Err` means the
/// request itself failed (DNS, connection, timeout, undecodable body).
pub trait Transport {
    fn get(&self, url: &str) -> Result<Page>;
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Page>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    fn into_page(response: reqwest::blocking::Response) -> Result<Page> {
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))?;
        Ok(Page { url, status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Page> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request to {url} failed"))?;
        Self::into_page(response)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Page> {
        log::debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .with_context(|| format!("Request to {url} failed"))?;
        Self::into_page(response)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Page> {
        (**self).get(url)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Page> {
        (**self).post_json(url, body)
    }
}
