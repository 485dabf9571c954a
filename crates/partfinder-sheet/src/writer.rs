//! Offer sheet output: one row per retained offer, grouped by component in input order

use chrono::{DateTime, Local};
use partfinder_core::{Component, UNKNOWN};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::SheetError;

pub const HEADER: [&str; 10] = [
    "Model",
    "PN",
    "Price",
    "Min count",
    "InStock",
    "Url",
    "Days",
    "Package",
    "Flash",
    "RAM",
];

/// Timestamped file name so repeated runs never overwrite each other
pub fn output_file_name(now: DateTime<Local>) -> String {
    format!("Results_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn size_text(size: Option<u32>) -> String {
    size.map_or_else(|| UNKNOWN.to_string(), |s| s.to_string())
}

/// Write the offer sheet to `writer`, returning the number of offer rows written
pub fn write_offers<W: Write>(components: &[Component], writer: W) -> Result<usize, SheetError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    let mut rows = 0;
    for component in components.iter().filter(|c| c.available) {
        let flash = size_text(component.flash_size);
        let ram = size_text(component.ram_size);
        for offer in &component.offers {
            csv.write_record(&[
                component.reference.clone(),
                offer.part_number.clone(),
                offer.price.to_string(),
                offer.min_order_quantity.to_string(),
                offer.stock_quantity.to_string(),
                offer.source_url.clone(),
                offer.delivery_days.to_string(),
                component.package.clone(),
                flash.clone(),
                ram.clone(),
            ])?;
            rows += 1;
        }
    }

    csv.flush()?;
    Ok(rows)
}

/// Write the offer sheet into `dir` under a timestamped name
pub fn write_results(components: &[Component], dir: &Path) -> Result<PathBuf, SheetError> {
    let path = dir.join(output_file_name(Local::now()));
    let file = std::fs::File::create(&path)?;
    let rows = write_offers(components, file)?;
    log::info!("Wrote {} offers to {}", rows, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use partfinder_core::{Offer, OfferSource};
    use rust_decimal_macros::dec;

    fn resolved_component() -> Component {
        let mut component = Component::new("STM32F103C8T6")
            .with_package("LQFP48")
            .with_sizes(Some(64), Some(20));
        component.offers = vec![
            Offer {
                part_number: "STM32F103C8T6".to_string(),
                price: dec!(120.50),
                min_order_quantity: 1,
                stock_quantity: 15,
                delivery_days: 0,
                source_url: "https://www.terraelectronica.ru/product/405123".to_string(),
                source: OfferSource::Catalog,
            },
            Offer {
                part_number: "STM32F103C8T6".to_string(),
                price: dec!(98.40),
                min_order_quantity: 10,
                stock_quantity: 10,
                delivery_days: 5,
                source_url: "https://www.terraelectronica.ru/product/405123".to_string(),
                source: OfferSource::Backorder,
            },
        ];
        component.available = true;
        component
    }

    #[test]
    fn test_write_offers() {
        let components = vec![
            resolved_component(),
            Component::new("STM32F030F4P6").with_package("TSSOP20"),
        ];
        let mut buf = Vec::new();
        let rows = write_offers(&components, &mut buf).unwrap();
        assert_eq!(rows, 2);

        insta::assert_snapshot!(String::from_utf8(buf).unwrap(), @r"
Model,PN,Price,Min count,InStock,Url,Days,Package,Flash,RAM
STM32F103C8T6,STM32F103C8T6,120.50,1,15,https://www.terraelectronica.ru/product/405123,0,LQFP48,64,20
STM32F103C8T6,STM32F103C8T6,98.40,10,10,https://www.terraelectronica.ru/product/405123,5,LQFP48,64,20
");
    }

    #[test]
    fn test_unknown_sizes() {
        let mut component = resolved_component().with_sizes(None, Some(8));
        component.offers.truncate(1);
        let mut buf = Vec::new();
        write_offers(&[component], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",LQFP48,Unknown,8"));
    }

    #[test]
    fn test_output_file_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(output_file_name(now), "Results_20240309_140507.csv");
    }

    #[test]
    fn test_write_results_creates_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_results(&[resolved_component()], dir.path()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Results_") && name.ends_with(".csv"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
