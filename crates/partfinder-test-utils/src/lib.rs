//! Test doubles for driving the resolution pipeline without a network.

pub mod fixtures;

use anyhow::Result;
use partfinder_core::{Page, Transport};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

const MAX_REDIRECTS: usize = 10;

/// In-memory vendor sites.
///
/// Unknown URLs answer 404 with an empty body. Every request is recorded as
/// `"GET <url>"` or `"POST <url> <sku>"`.
#[derive(Default)]
pub struct FakeTransport {
    pages: HashMap<String, (u16, String)>,
    redirects: HashMap<String, String>,
    rpc: HashMap<(String, String), String>,
    failing: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `url`
    pub fn page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.status(url, 200, body)
    }

    pub fn status(mut self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), (status, body.into()));
        self
    }

    /// Answer requests for `from` as if the server redirected to `to`
    pub fn redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.insert(from.into(), to.into());
        self
    }

    /// Answer JSON-RPC posts to `url` naming `sku` with `body`
    pub fn rpc(mut self, url: impl Into<String>, sku: impl Into<String>, body: impl Into<String>) -> Self {
        self.rpc.insert((url.into(), sku.into()), body.into());
        self
    }

    /// Make every request to `url` fail at the connection level
    pub fn fail(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn check_reachable(&self, url: &str) -> Result<()> {
        if self.failing.contains(url) {
            anyhow::bail!("connection refused: {url}");
        }
        Ok(())
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<Page> {
        self.requests.borrow_mut().push(format!("GET {url}"));
        self.check_reachable(url)?;

        let mut current = url.to_string();
        for _ in 0..MAX_REDIRECTS {
            match self.redirects.get(&current) {
                Some(next) => current = next.clone(),
                None => break,
            }
        }

        let (status, body) = self
            .pages
            .get(&current)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(Page {
            url: current,
            status,
            body,
        })
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Page> {
        let sku = body["params"]["name"].as_str().unwrap_or_default().to_string();
        self.requests.borrow_mut().push(format!("POST {url} {sku}"));
        self.check_reachable(url)?;

        let page = match self.rpc.get(&(url.to_string(), sku)) {
            Some(body) => Page {
                url: url.to_string(),
                status: 200,
                body: body.clone(),
            },
            None => Page {
                url: url.to_string(),
                status: 404,
                body: String::new(),
            },
        };
        Ok(page)
    }
}
