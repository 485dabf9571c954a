//! Search routing: where did the vendor's full-text search send us, and how is that page
//! read?

use anyhow::Result;
use scraper::Html;

use crate::catalog::{self, CatalogKind};
use crate::config::{Config, RouteMarkers};
use crate::error::Extraction;
use crate::http::{Page, Transport};
use crate::selectors;

/// Page shape a search response landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Microcontroller catalog; re-requested with the in-stock filter
    FilteredCatalog,
    /// Generic product catalog without a stock filter
    UnfilteredCatalog,
    /// Search results list; its first entry is followed
    SearchResults,
    /// Single-SKU product page, not parsed
    SingleProduct,
    Unrecognized,
}

/// Classify a final (post-redirect) URL.
///
/// Markers are tested in a fixed order, so a URL matching several resolves to the first.
pub fn classify(url: &str, markers: &RouteMarkers) -> Route {
    if url.contains(&markers.filtered_catalog) {
        Route::FilteredCatalog
    } else if url.contains(&markers.search_results) {
        Route::SearchResults
    } else if url.contains(&markers.unfiltered_catalog) {
        Route::UnfilteredCatalog
    } else if url.contains(&markers.single_product) {
        Route::SingleProduct
    } else {
        Route::Unrecognized
    }
}

/// Outcome of resolving one component reference at the vendors
#[derive(Debug)]
pub enum Resolution {
    Offers(Extraction),
    Skipped,
    Unresolved(String),
}

/// Search for `reference` and extract offers from wherever the search lands
pub fn resolve(config: &Config, transport: &dyn Transport, reference: &str) -> Resolution {
    match route(config, transport, reference) {
        Ok(resolution) => resolution,
        Err(e) => {
            log::warn!("{reference}: {e:#}");
            Resolution::Unresolved(format!("{e:#}"))
        }
    }
}

fn route(config: &Config, transport: &dyn Transport, reference: &str) -> Result<Resolution> {
    let search_url = config.search_url(reference)?;
    let page = fetch(transport, search_url.as_str())?;

    let route = classify(&page.url, &config.primary.routes);
    log::debug!("{reference}: search landed on {} ({route:?})", page.url);

    match route {
        Route::FilteredCatalog => filtered_catalog(config, transport, &page.url),
        Route::SearchResults => {
            let Some(href) = first_result_link(&page.body) else {
                log::warn!("{reference}: no usable search results at {}", page.url);
                return Ok(Resolution::Unresolved(format!(
                    "no search results at {}",
                    page.url
                )));
            };
            let link = config.primary_link(&href)?;
            let followed = fetch(transport, link.as_str())?;
            filtered_catalog(config, transport, &followed.url)
        }
        Route::UnfilteredCatalog => Ok(Resolution::Offers(catalog::extract(
            config,
            transport,
            &page.body,
            CatalogKind::Unfiltered,
        ))),
        Route::SingleProduct => {
            log::info!("{reference}: single product page {}, skipped", page.url);
            Ok(Resolution::Skipped)
        }
        Route::Unrecognized => {
            log::warn!("{reference}: {} is not parsed", page.url);
            Ok(Resolution::Unresolved(format!("unrecognized page {}", page.url)))
        }
    }
}

fn filtered_catalog(
    config: &Config,
    transport: &dyn Transport,
    listing_url: &str,
) -> Result<Resolution> {
    let url = config.in_stock_url(listing_url)?;
    let page = fetch(transport, url.as_str())?;
    Ok(Resolution::Offers(catalog::extract(
        config,
        transport,
        &page.body,
        CatalogKind::Filtered,
    )))
}

fn fetch(transport: &dyn Transport, url: &str) -> Result<Page> {
    let page = transport.get(url)?;
    if !page.is_success() {
        anyhow::bail!("{url} returned {}", page.status);
    }
    Ok(page)
}

/// Href of the first entry of a search results list
pub fn first_result_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let href = document
        .select(&selectors::search::RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string);
    href
}
