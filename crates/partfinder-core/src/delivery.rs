//! Back-order lead times from the primary vendor's delivery-schedule endpoint.
//!
//! Queried for catalog rows that show no immediate stock. The endpoint speaks a
//! JSON-RPC-shaped protocol and answers with an HTML fragment listing one tier per row.

use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Extraction, ExtractionError};
use crate::http::Transport;
use crate::model::{Offer, OfferSource};
use crate::parse;
use crate::selectors::{self, delivery as sel};

/// One lead-time tier of the delivery schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackorderTier {
    pub price: Decimal,
    pub min_order_quantity: u32,
    pub stock_quantity: u32,
    pub delivery_days: u32,
}

impl BackorderTier {
    fn into_offer(self, sku: &str, listing_url: &str) -> Offer {
        Offer {
            part_number: sku.to_string(),
            price: self.price,
            min_order_quantity: self.min_order_quantity,
            stock_quantity: self.stock_quantity,
            delivery_days: self.delivery_days,
            source_url: listing_url.to_string(),
            source: OfferSource::Backorder,
        }
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    #[serde(default)]
    message: String,
}

/// JSON-RPC request body asking for the delivery schedule of one SKU
pub fn request_body(code: u64, sku: &str) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": "get_dms",
        "params": { "code": code, "name": sku },
        "id": code,
    })
}

/// Query the delivery schedule for `sku` and turn every qualifying tier into an offer
pub fn resolve(
    config: &Config,
    transport: &dyn Transport,
    sku: &str,
    code: u64,
    listing_url: &str,
) -> Extraction {
    let mut extraction = Extraction::default();
    let context = format!("{sku}: delivery schedule");

    let fragment = transport
        .post_json(&config.primary.delivery_url, &request_body(code, sku))
        .map_err(ExtractionError::from)
        .and_then(|page| {
            if page.is_success() {
                fragment_from_body(&page.body)
            } else {
                Err(anyhow::anyhow!("delivery endpoint returned {}", page.status).into())
            }
        });

    let fragment = match fragment {
        Ok(fragment) => fragment,
        Err(e) => {
            extraction.record(&context, Err::<Vec<Offer>, _>(e));
            return extraction;
        }
    };

    for (i, tier) in parse_schedule(&fragment, config.max_delivery_days)
        .into_iter()
        .enumerate()
    {
        let tier = tier.map(|t| Some(t.into_offer(sku, listing_url)));
        extraction.record(&format!("{context}, tier {}", i + 1), tier);
    }

    log::debug!(
        "{sku}: {} back-order tiers retained",
        extraction.offers.len()
    );
    extraction
}

/// Pull the HTML fragment out of the endpoint's response body.
///
/// Accepts a JSON-RPC envelope whose result is the fragment itself or an object with an
/// `html` member; a body that is not JSON at all is taken to be the fragment.
pub fn fragment_from_body(body: &str) -> Result<String, ExtractionError> {
    let Ok(response) = serde_json::from_str::<RpcResponse>(body) else {
        return Ok(body.to_string());
    };

    if let Some(error) = response.error {
        return Err(anyhow::anyhow!("delivery endpoint error: {}", error.message).into());
    }

    match response.result {
        Some(serde_json::Value::String(html)) => Ok(html),
        Some(serde_json::Value::Object(map)) => map
            .get("html")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(ExtractionError::MissingField("delivery fragment")),
        _ => Err(ExtractionError::MissingField("delivery fragment")),
    }
}

/// Parse every tier row of a schedule fragment.
///
/// Tiers whose lead time is not day-denominated, or is `max_days` or longer, come back
/// as errors alongside malformed rows.
pub fn parse_schedule(fragment: &str, max_days: u32) -> Vec<Result<BackorderTier, ExtractionError>> {
    let html = if fragment.contains("<table") {
        Html::parse_fragment(fragment)
    } else {
        Html::parse_fragment(&format!("<table>{fragment}</table>"))
    };

    let tiers = html
        .root_element()
        .select(&selectors::ROW)
        .filter(|row| !selectors::is_header_row(*row))
        .map(|row| parse_tier(row, max_days))
        .collect();
    tiers
}

fn parse_tier(row: ElementRef<'_>, max_days: u32) -> Result<BackorderTier, ExtractionError> {
    let price_el =
        selectors::find(row, &sel::PRICE).ok_or(ExtractionError::MissingField("price"))?;
    let price = price_el
        .value()
        .attr(selectors::catalog::PRICE_ATTR)
        .ok_or(ExtractionError::MissingField("price"))?;
    let price = parse::price("price", price)?;

    let min_order_quantity = price_el
        .value()
        .attr(selectors::catalog::MIN_ORDER_ATTR)
        .ok_or(ExtractionError::MissingField("minimum order"))?;
    let min_order_quantity = parse::quantity("minimum order", min_order_quantity)?;

    let stock =
        selectors::find(row, &sel::STOCK).ok_or(ExtractionError::MissingField("stock"))?;
    let stock_quantity = parse::quantity("stock", &selectors::text(stock))?;

    let term =
        selectors::find(row, &sel::TERM).ok_or(ExtractionError::MissingField("lead time"))?;
    let delivery_days = parse::lead_time_days(&selectors::text(term), true)?;
    if delivery_days >= max_days {
        return Err(ExtractionError::DeliveryTooLong(delivery_days));
    }

    Ok(BackorderTier {
        price,
        min_order_quantity,
        stock_quantity,
        delivery_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SCHEDULE: &str = r#"
<table>
  <tr><th>Price</th><th>Qty</th><th>Term</th></tr>
  <tr>
    <td><span class="price-single" data-price="98.40" data-count="10">98,40</span></td>
    <td><span class="item-qnt">10 шт.</span></td>
    <td class="dms-term">5 дней</td>
  </tr>
  <tr>
    <td><span class="price-single" data-price="91.10" data-count="50">91,10</span></td>
    <td><span class="item-qnt">50 шт.</span></td>
    <td class="dms-term">12 дней</td>
  </tr>
  <tr>
    <td><span class="price-single" data-price="80.00" data-count="100">80,00</span></td>
    <td><span class="item-qnt">500 шт.</span></td>
    <td class="dms-term">3 недели</td>
  </tr>
</table>"#;

    #[test]
    fn test_parse_schedule_keeps_day_tiers() {
        let tiers = parse_schedule(SCHEDULE, 14);
        assert_eq!(tiers.len(), 3);

        let kept: Vec<_> = tiers.iter().filter_map(|t| t.as_ref().ok()).collect();
        assert_eq!(
            kept,
            vec![
                &BackorderTier {
                    price: dec!(98.40),
                    min_order_quantity: 10,
                    stock_quantity: 10,
                    delivery_days: 5,
                },
                &BackorderTier {
                    price: dec!(91.10),
                    min_order_quantity: 50,
                    stock_quantity: 50,
                    delivery_days: 12,
                },
            ]
        );
        assert!(matches!(tiers[2], Err(ExtractionError::UnitMismatch(_))));
    }

    #[test]
    fn test_parse_schedule_drops_long_lead_times() {
        let fragment = r#"<tr>
            <td><span data-price="1.00" data-count="1"></span></td>
            <td><span class="item-qnt">7</span></td>
            <td class="dms-term">14 дней</td>
        </tr>"#;
        let tiers = parse_schedule(fragment, 14);
        assert_eq!(tiers.len(), 1);
        assert!(matches!(tiers[0], Err(ExtractionError::DeliveryTooLong(14))));
    }

    #[test]
    fn test_parse_schedule_skips_malformed_row() {
        let fragment = r#"<table>
            <tr><td><span class="item-qnt">7</span></td><td class="dms-term">2 дня</td></tr>
            <tr>
              <td><span data-price="2.50" data-count="5"></span></td>
              <td><span class="item-qnt">7</span></td>
              <td class="dms-term">2 дня</td>
            </tr>
        </table>"#;
        let tiers = parse_schedule(fragment, 14);
        assert!(matches!(tiers[0], Err(ExtractionError::MissingField("price"))));
        assert_eq!(tiers[1].as_ref().unwrap().delivery_days, 2);
    }

    #[test]
    fn test_fragment_from_body_variants() {
        let plain = fragment_from_body("<table></table>").unwrap();
        assert_eq!(plain, "<table></table>");

        let string_result =
            fragment_from_body(r#"{"jsonrpc":"2.0","result":"<tr></tr>","id":1}"#).unwrap();
        assert_eq!(string_result, "<tr></tr>");

        let object_result =
            fragment_from_body(r#"{"jsonrpc":"2.0","result":{"html":"<p></p>"},"id":1}"#)
                .unwrap();
        assert_eq!(object_result, "<p></p>");

        let error = fragment_from_body(
            r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"unknown code"},"id":1}"#,
        );
        assert!(matches!(error, Err(ExtractionError::Fetch(_))));

        let empty = fragment_from_body(r#"{"jsonrpc":"2.0","result":null,"id":1}"#);
        assert!(matches!(empty, Err(ExtractionError::MissingField(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body(405123, "STM32F103C8T6");
        assert_eq!(body["method"], "get_dms");
        assert_eq!(body["params"]["code"], 405123);
        assert_eq!(body["params"]["name"], "STM32F103C8T6");
    }
}
