//! CSS selectors for vendor markup.
//!
//! Every lookup the extractors perform goes through here, keyed by the role of the
//! element rather than its position. Update this file when a vendor changes its markup.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

pub static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
pub static HEADER_CELL: Lazy<Selector> = Lazy::new(|| selector("th"));

/// Primary vendor catalog listing
pub mod catalog {
    use super::*;

    pub static NAME_CELL: Lazy<Selector> = Lazy::new(|| selector("td.table-item-name"));
    /// Detail-page link carrying the SKU as its text
    pub static NAME_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
    pub static PRICE_CELL: Lazy<Selector> = Lazy::new(|| selector("td.table-item-price"));
    pub static ACTIVE_PRICE: Lazy<Selector> =
        Lazy::new(|| selector(".price-single.price-active[data-price]"));
    pub static STOCK: Lazy<Selector> = Lazy::new(|| selector(".item-qnt"));

    pub const PRICE_ATTR: &str = "data-price";
    pub const MIN_ORDER_ATTR: &str = "data-count";
}

/// Primary vendor full-text search results
pub mod search {
    use super::*;

    pub static RESULT_LINK: Lazy<Selector> = Lazy::new(|| selector("ul.search-list a[href]"));
}

/// Fragment returned by the delivery-schedule endpoint
pub mod delivery {
    use super::*;

    pub static PRICE: Lazy<Selector> = Lazy::new(|| selector("[data-price]"));
    pub static STOCK: Lazy<Selector> = Lazy::new(|| selector(".item-qnt"));
    pub static TERM: Lazy<Selector> = Lazy::new(|| selector(".dms-term"));
}

/// Secondary vendor product page
pub mod secondary {
    use super::*;

    pub static OFFERS_TABLE: Lazy<Selector> = Lazy::new(|| selector("table.offers-table"));
    pub static DELIVERY: Lazy<Selector> = Lazy::new(|| selector(".offer-delivery"));
    pub static PRICE: Lazy<Selector> = Lazy::new(|| selector(".offer-price"));
    pub static STOCK: Lazy<Selector> = Lazy::new(|| selector(".offer-stock"));
    pub static MIN_ORDER: Lazy<Selector> = Lazy::new(|| selector(".offer-min"));
}

/// First element under `scope` matching `selector`
pub fn find<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Whitespace-collapsed text content of an element
pub fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a row is made of header cells
pub fn is_header_row(row: ElementRef<'_>) -> bool {
    row.select(&HEADER_CELL).next().is_some()
}
