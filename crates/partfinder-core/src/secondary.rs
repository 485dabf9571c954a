//! Offers from the secondary vendor, looked up by exact part number

use scraper::{ElementRef, Html};

use crate::config::Config;
use crate::error::{Extraction, ExtractionError};
use crate::http::Transport;
use crate::model::{Offer, OfferSource};
use crate::parse;
use crate::selectors::{self, secondary as sel};

/// Fetch the secondary vendor's product page for `part_number` and collect its tiers.
///
/// A not-found page contributes nothing and is not treated as a failure.
pub fn resolve(config: &Config, transport: &dyn Transport, part_number: &str) -> Extraction {
    let mut extraction = Extraction::default();
    let url = config.secondary_url(part_number);
    let context = format!("{part_number}: secondary vendor");

    let page = match transport.get(&url) {
        Ok(page) => page,
        Err(e) => {
            extraction.record(&context, Err::<Vec<Offer>, _>(e.into()));
            return extraction;
        }
    };

    if page.is_not_found() {
        log::debug!("{context}: not listed");
        return extraction;
    }
    if !page.is_success() {
        let e = anyhow::anyhow!("{url} returned {}", page.status);
        extraction.record(&context, Err::<Vec<Offer>, _>(e.into()));
        return extraction;
    }

    match parse_offers(&page.body, part_number, &page.url, config.max_delivery_days) {
        Ok(tiers) => {
            for (i, tier) in tiers.into_iter().enumerate() {
                extraction.record(&format!("{context}, tier {}", i + 1), tier.map(Some));
            }
        }
        Err(e) => extraction.record(&context, Err::<Vec<Offer>, _>(e)),
    }

    log::debug!(
        "{context}: {} offers retained",
        extraction.offers.len()
    );
    extraction
}

/// Parse the offers table of a product page.
///
/// A page without the table is an error for the whole part number; individual tiers
/// fail independently. Tiers quoted on request or slower than `max_days` are rejected.
pub fn parse_offers(
    html: &str,
    part_number: &str,
    source_url: &str,
    max_days: u32,
) -> Result<Vec<Result<Offer, ExtractionError>>, ExtractionError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&sel::OFFERS_TABLE)
        .next()
        .ok_or(ExtractionError::MissingField("offers table"))?;

    let tiers = table
        .select(&selectors::ROW)
        .filter(|row| !selectors::is_header_row(*row))
        .map(|row| parse_tier(row, max_days))
        .map(|tier| {
            tier.map(|tier| Offer {
                part_number: part_number.to_string(),
                source_url: source_url.to_string(),
                ..tier
            })
        })
        .collect();
    Ok(tiers)
}

fn cell_text<'a>(
    row: ElementRef<'a>,
    selector: &scraper::Selector,
    field: &'static str,
) -> Result<String, ExtractionError> {
    selectors::find(row, selector)
        .map(selectors::text)
        .ok_or(ExtractionError::MissingField(field))
}

fn parse_tier(row: ElementRef<'_>, max_days: u32) -> Result<Offer, ExtractionError> {
    let delivery_days = parse::lead_time_days(&cell_text(row, &sel::DELIVERY, "lead time")?, false)?;
    if delivery_days > max_days {
        return Err(ExtractionError::DeliveryTooLong(delivery_days));
    }

    let price = parse::price("price", &cell_text(row, &sel::PRICE, "price")?)?;
    let stock_quantity = parse::quantity("stock", &cell_text(row, &sel::STOCK, "stock")?)?;
    let min_order_quantity =
        parse::quantity("minimum order", &cell_text(row, &sel::MIN_ORDER, "minimum order")?)?;

    Ok(Offer {
        part_number: String::new(),
        price,
        min_order_quantity,
        stock_quantity,
        delivery_days,
        source_url: String::new(),
        source: OfferSource::SecondaryVendor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PAGE: &str = r#"<html><body>
<h1>STM32F103C8T6</h1>
<table class="offers-table">
  <thead><tr><th>Срок</th><th>Цена</th><th>Наличие</th><th>Мин.</th></tr></thead>
  <tbody>
    <tr>
      <td class="offer-delivery">1 день</td>
      <td class="offer-price">1 234,50 руб.</td>
      <td class="offer-stock">42 шт.</td>
      <td class="offer-min">1</td>
    </tr>
    <tr>
      <td class="offer-delivery">10-14 дней</td>
      <td class="offer-price">999,00 руб.</td>
      <td class="offer-stock">300 шт.</td>
      <td class="offer-min">10</td>
    </tr>
    <tr>
      <td class="offer-delivery">21 день</td>
      <td class="offer-price">850,00 руб.</td>
      <td class="offer-stock">1000 шт.</td>
      <td class="offer-min">100</td>
    </tr>
    <tr>
      <td class="offer-delivery">по запросу</td>
      <td class="offer-price">700,00 руб.</td>
      <td class="offer-stock">0</td>
      <td class="offer-min">1</td>
    </tr>
    <tr>
      <td class="offer-delivery">3 дня</td>
      <td class="offer-stock">5 шт.</td>
      <td class="offer-min">1</td>
    </tr>
  </tbody>
</table>
</body></html>"#;

    #[test]
    fn test_parse_offers_filters_tiers() {
        let url = "https://www.chipdip.ru/product/stm32f103c8t6";
        let tiers = parse_offers(PAGE, "STM32F103C8T6", url, 14).unwrap();
        assert_eq!(tiers.len(), 5);

        let first = tiers[0].as_ref().unwrap();
        assert_eq!(first.part_number, "STM32F103C8T6");
        assert_eq!(first.price, dec!(1234.50));
        assert_eq!(first.stock_quantity, 42);
        assert_eq!(first.min_order_quantity, 1);
        assert_eq!(first.delivery_days, 1);
        assert_eq!(first.source_url, url);
        assert_eq!(first.source, OfferSource::SecondaryVendor);

        let second = tiers[1].as_ref().unwrap();
        assert_eq!(second.delivery_days, 14);
        assert_eq!(second.price, dec!(999));

        assert!(matches!(tiers[2], Err(ExtractionError::DeliveryTooLong(21))));
        assert!(matches!(tiers[3], Err(ExtractionError::OnRequest)));
        assert!(matches!(tiers[4], Err(ExtractionError::MissingField("price"))));
    }

    #[test]
    fn test_parse_offers_without_table() {
        let result = parse_offers("<html><body><p>Нет предложений</p></body></html>", "X", "u", 14);
        assert!(matches!(
            result,
            Err(ExtractionError::MissingField("offers table"))
        ));
    }
}
