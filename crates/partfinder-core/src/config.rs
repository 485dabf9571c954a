//! Immutable pipeline configuration
//!
//! Built once at start-up and handed to the pipeline by value. Production defaults can be
//! overridden from the environment, e.g. to point the tool at a staging mirror.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Primary vendor: full-text search, catalog listings and the delivery-schedule endpoint
#[derive(Debug, Clone)]
pub struct PrimaryVendor {
    pub base_url: String,
    pub search_path: String,
    pub delivery_url: String,
    /// Query pair restricting a catalog listing to in-stock rows
    pub in_stock_filter: (String, String),
    /// Characters in references that the vendor's search does not index
    pub wildcard_chars: String,
    pub routes: RouteMarkers,
}

/// URL fragments identifying the page shape a search landed on
#[derive(Debug, Clone)]
pub struct RouteMarkers {
    pub filtered_catalog: String,
    pub search_results: String,
    pub unfiltered_catalog: String,
    pub single_product: String,
}

/// Secondary vendor: product pages addressed by lowercased part number
#[derive(Debug, Clone)]
pub struct SecondaryVendor {
    pub product_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub primary: PrimaryVendor,
    pub secondary: SecondaryVendor,
    /// Longest acceptable lead time for a retained offer
    pub max_delivery_days: u32,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary: PrimaryVendor {
                base_url: "https://www.terraelectronica.ru".to_string(),
                search_path: "/search".to_string(),
                delivery_url: "https://www.terraelectronica.ru/api/dms".to_string(),
                in_stock_filter: ("f[present]".to_string(), "1".to_string()),
                wildcard_chars: "x".to_string(),
                routes: RouteMarkers {
                    filtered_catalog: "mikrokontrollery".to_string(),
                    search_results: "search?".to_string(),
                    unfiltered_catalog: "catalog/products/".to_string(),
                    single_product: "/product/".to_string(),
                },
            },
            secondary: SecondaryVendor {
                product_base: "https://www.chipdip.ru/product".to_string(),
            },
            max_delivery_days: 14,
            request_timeout: Duration::from_secs(60),
            user_agent: format!("partfinder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Defaults with `PARTFINDER_*` environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("PARTFINDER_PRIMARY_URL") {
            config.primary.base_url = absolute_url("PARTFINDER_PRIMARY_URL", &url)?;
        }
        if let Some(url) = lookup("PARTFINDER_DELIVERY_URL") {
            config.primary.delivery_url = absolute_url("PARTFINDER_DELIVERY_URL", &url)?;
        }
        if let Some(url) = lookup("PARTFINDER_SECONDARY_URL") {
            config.secondary.product_base = absolute_url("PARTFINDER_SECONDARY_URL", &url)?;
        }
        if let Some(secs) = lookup("PARTFINDER_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("PARTFINDER_TIMEOUT_SECS is not a number: {secs}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Full-text search URL for a reference, with wildcard markers removed
    pub fn search_url(&self, reference: &str) -> Result<Url> {
        let text: String = reference
            .chars()
            .filter(|c| !self.primary.wildcard_chars.contains(*c))
            .collect();
        let mut url = Url::parse(&format!(
            "{}{}",
            self.primary.base_url, self.primary.search_path
        ))
        .context("Invalid primary vendor search URL")?;
        url.query_pairs_mut().append_pair("text", text.trim());
        Ok(url)
    }

    /// Catalog listing URL restricted to in-stock rows
    pub fn in_stock_url(&self, listing_url: &str) -> Result<Url> {
        let mut url = Url::parse(listing_url)
            .with_context(|| format!("Invalid catalog URL: {listing_url}"))?;
        let (key, value) = &self.primary.in_stock_filter;
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    /// Resolve a link found in primary vendor markup against the base URL
    pub fn primary_link(&self, href: &str) -> Result<Url> {
        let base = Url::parse(&self.primary.base_url).context("Invalid primary vendor URL")?;
        base.join(href)
            .with_context(|| format!("Invalid link in vendor markup: {href}"))
    }

    /// Secondary vendor product page for a part number
    pub fn secondary_url(&self, part_number: &str) -> String {
        format!(
            "{}/{}",
            self.secondary.product_base.trim_end_matches('/'),
            part_number.trim().to_lowercase()
        )
    }
}

fn absolute_url(key: &str, value: &str) -> Result<String> {
    let url = Url::parse(value).with_context(|| format!("{key} is not an absolute URL: {value}"))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}
