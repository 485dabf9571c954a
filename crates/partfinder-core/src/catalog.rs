//! Offer extraction from the primary vendor's catalog listings.
//!
//! Two listing shapes exist. A filtered listing has been restricted to in-stock items
//! by query, so every row is expected to carry price and stock markup. An unfiltered
//! listing may contain rows without any, which are treated as having no immediate stock.
//! Either way rows without stock fall back to the delivery schedule, and every SKU is
//! also looked up at the secondary vendor.

use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use url::Url;

use crate::config::Config;
use crate::delivery;
use crate::error::{Extraction, ExtractionError};
use crate::http::Transport;
use crate::model::{Offer, OfferSource};
use crate::parse;
use crate::secondary;
use crate::selectors::{self, catalog as sel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Filtered,
    Unfiltered,
}

/// Price and stock as shown on a listing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub price: Decimal,
    pub min_order_quantity: u32,
    pub stock_quantity: u32,
}

/// One parsed row of a catalog listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub sku: String,
    pub detail_url: String,
    /// Vendor-internal numeric identifier taken from the detail link
    pub code: Option<u64>,
    /// `None` when the row has no price markup at all
    pub listing: Option<Listing>,
}

/// Parse every data row of a listing page
pub fn parse_rows(
    html: &str,
    config: &Config,
    kind: CatalogKind,
) -> Vec<Result<CatalogRow, ExtractionError>> {
    let document = Html::parse_document(html);
    let rows = document
        .select(&selectors::ROW)
        .filter(|row| !selectors::is_header_row(*row))
        .map(|row| parse_row(row, config, kind))
        .collect();
    rows
}

fn parse_row(
    row: ElementRef<'_>,
    config: &Config,
    kind: CatalogKind,
) -> Result<CatalogRow, ExtractionError> {
    let name_cell =
        selectors::find(row, &sel::NAME_CELL).ok_or(ExtractionError::MissingField("name cell"))?;
    let (sku, href) = name_cell
        .select(&sel::NAME_LINK)
        .find_map(|a| {
            let sku = selectors::text(a);
            let href = a.value().attr("href")?;
            (!sku.is_empty()).then(|| (sku, href))
        })
        .ok_or(ExtractionError::MissingField("part number link"))?;
    let detail_url = config.primary_link(href)?;
    let code = product_code(&detail_url);

    let listing = match (kind, selectors::find(row, &sel::ACTIVE_PRICE)) {
        (_, Some(price)) => Some(parse_listing(row, price)?),
        (CatalogKind::Unfiltered, None) => None,
        (CatalogKind::Filtered, None) => return Err(ExtractionError::MissingField("price")),
    };

    Ok(CatalogRow {
        sku,
        detail_url: detail_url.to_string(),
        code,
        listing,
    })
}

fn parse_listing(row: ElementRef<'_>, price: ElementRef<'_>) -> Result<Listing, ExtractionError> {
    let attrs = price.value();
    let price = attrs
        .attr(sel::PRICE_ATTR)
        .ok_or(ExtractionError::MissingField("price"))?;
    let min_order_quantity = attrs
        .attr(sel::MIN_ORDER_ATTR)
        .ok_or(ExtractionError::MissingField("minimum order"))?;
    let stock = selectors::find(row, &sel::STOCK).ok_or(ExtractionError::MissingField("stock"))?;

    Ok(Listing {
        price: parse::price("price", price)?,
        min_order_quantity: parse::quantity("minimum order", min_order_quantity)?,
        stock_quantity: parse::quantity("stock", &selectors::text(stock))?,
    })
}

/// Trailing numeric path segment of a detail link ("/product/405123" -> 405123)
fn product_code(url: &Url) -> Option<u64> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()?
        .parse()
        .ok()
}

/// Extract offers from a listing page, querying the delivery schedule and the secondary
/// vendor for each row
pub fn extract(
    config: &Config,
    transport: &dyn Transport,
    html: &str,
    kind: CatalogKind,
) -> Extraction {
    let mut extraction = Extraction::default();

    for (i, row) in parse_rows(html, config, kind).into_iter().enumerate() {
        match row {
            Ok(row) => extraction.extend(offers_for_row(config, transport, row)),
            Err(e) => extraction.record(&format!("catalog row {}", i + 1), Err::<Vec<Offer>, _>(e)),
        }
    }

    extraction
}

fn offers_for_row(config: &Config, transport: &dyn Transport, row: CatalogRow) -> Extraction {
    let mut extraction = Extraction::default();

    match (&row.listing, row.code) {
        (Some(listing), _) if listing.stock_quantity > 0 => {
            log::debug!(
                "{}: {} in stock at {} (min {})",
                row.sku,
                listing.stock_quantity,
                listing.price,
                listing.min_order_quantity
            );
            extraction.offers.push(Offer {
                part_number: row.sku.clone(),
                price: listing.price,
                min_order_quantity: listing.min_order_quantity,
                stock_quantity: listing.stock_quantity,
                delivery_days: 0,
                source_url: row.detail_url.clone(),
                source: OfferSource::Catalog,
            });
        }
        (_, Some(code)) => {
            extraction.extend(delivery::resolve(
                config,
                transport,
                &row.sku,
                code,
                &row.detail_url,
            ));
        }
        (_, None) => extraction.record(
            &format!("{}: delivery schedule", row.sku),
            Err::<Vec<Offer>, _>(ExtractionError::MissingField("product code")),
        ),
    }

    extraction.extend(secondary::resolve(config, transport, &row.sku));
    extraction
}
