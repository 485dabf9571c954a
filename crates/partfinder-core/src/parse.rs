//! Number and lead-time parsing for vendor markup text

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ExtractionError;

/// Phrases vendors use instead of a committed lead time
const ON_REQUEST: &[&str] = &["on request", "по запросу", "под заказ"];

/// Unit prefixes accepted as days ("5 дней", "3 дн.", "7 days", "2d")
const DAY_UNITS: &[&str] = &["д", "day", "d"];

/// Words allowed between the number and a day unit ("5 рабочих дней", "3 business days")
const DAY_QUALIFIERS: &[&str] = &["раб", "календ", "working", "business", "calendar"];

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{a0}' || c == '\u{2009}' || c == '\u{202f}'
}

/// Leading integer of a quantity, with digit groups split by single blanks joined
/// ("15 шт." -> 15, "1 500 шт." -> 1500)
pub fn quantity(field: &'static str, text: &str) -> Result<u32, ExtractionError> {
    let trimmed = text.trim_matches(is_blank);
    if trimmed.is_empty() {
        return Err(ExtractionError::MissingField(field));
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut digits = String::new();
    for (i, c) in chars.iter().enumerate() {
        if c.is_ascii_digit() {
            digits.push(*c);
        } else if is_blank(*c)
            && !digits.is_empty()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
        {
            continue;
        } else {
            break;
        }
    }

    digits
        .parse()
        .map_err(|_| ExtractionError::invalid_number(field, text.trim()))
}

/// Price in either point or comma decimal notation, with grouping spaces and a trailing
/// currency suffix tolerated ("1 234,56 руб." -> 1234.56)
pub fn price(field: &'static str, text: &str) -> Result<Decimal, ExtractionError> {
    let numeric: String = text
        .trim_matches(is_blank)
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || is_blank(*c))
        .filter(|c| !is_blank(*c))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let numeric = numeric.trim_end_matches('.');
    if numeric.is_empty() {
        return Err(ExtractionError::invalid_number(field, text.trim()));
    }
    Decimal::from_str(numeric).map_err(|_| ExtractionError::invalid_number(field, text.trim()))
}

/// Lead time in days from a duration string.
///
/// The first token group carries the number (a range like "5-7" yields its upper
/// bound); the unit must be day-denominated. With `unit_required` unset a bare number
/// is read as days. Week-denominated durations are rejected, not converted.
pub fn lead_time_days(text: &str, unit_required: bool) -> Result<u32, ExtractionError> {
    let normalized = text.trim_matches(is_blank).to_lowercase();
    if ON_REQUEST.iter().any(|p| normalized.contains(p)) {
        return Err(ExtractionError::OnRequest);
    }

    let mut tokens = normalized.split(is_blank).filter(|t| !t.is_empty());
    let first = tokens
        .next()
        .ok_or(ExtractionError::MissingField("lead time"))?;

    let number_end = first
        .find(|c: char| !(c.is_ascii_digit() || c == '-' || c == '–'))
        .unwrap_or(first.len());
    let (number, attached_unit) = first.split_at(number_end);
    let days = number
        .split(['-', '–'])
        .filter(|n| !n.is_empty())
        .map(|n| n.parse::<u32>())
        .try_fold(None, |max: Option<u32>, n| n.map(|n| Some(max.map_or(n, |m| m.max(n)))))
        .ok()
        .flatten()
        .ok_or_else(|| ExtractionError::invalid_number("lead time", text.trim()))?;

    let unit = if attached_unit.is_empty() {
        tokens
            .find(|t| !DAY_QUALIFIERS.iter().any(|q| t.starts_with(q)))
            .unwrap_or_default()
    } else {
        attached_unit
    };

    if unit.is_empty() {
        return if unit_required {
            Err(ExtractionError::UnitMismatch(text.trim().to_string()))
        } else {
            Ok(days)
        };
    }

    if DAY_UNITS.iter().any(|u| unit.starts_with(u)) {
        Ok(days)
    } else {
        Err(ExtractionError::UnitMismatch(text.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_reads_leading_token() {
        assert_eq!(quantity("stock", "15 шт.").unwrap(), 15);
        assert_eq!(quantity("stock", "  0 ").unwrap(), 0);
        assert_eq!(quantity("stock", "250шт").unwrap(), 250);
        assert_eq!(quantity("stock", "1 500 шт.").unwrap(), 1500);
        assert_eq!(quantity("stock", "12\u{a0}000 шт.").unwrap(), 12000);
        assert_eq!(quantity("stock", "1 234 567").unwrap(), 1234567);
        // a blank not followed by a digit ends the number
        assert_eq!(quantity("stock", "40 шт. 2 уп.").unwrap(), 40);
        assert!(matches!(
            quantity("stock", "нет"),
            Err(ExtractionError::InvalidNumber { field: "stock", .. })
        ));
        assert!(matches!(
            quantity("stock", "   "),
            Err(ExtractionError::MissingField("stock"))
        ));
    }

    #[test]
    fn test_price_point_and_comma_notation() {
        assert_eq!(price("price", "120.50").unwrap(), dec!(120.50));
        assert_eq!(price("price", "120,5").unwrap(), dec!(120.5));
        assert_eq!(price("price", "1 234,56 руб.").unwrap(), dec!(1234.56));
        assert_eq!(price("price", "1\u{a0}099,00\u{a0}₽").unwrap(), dec!(1099.00));
        assert!(price("price", "руб.").is_err());
        assert!(price("price", "").is_err());
    }

    #[test]
    fn test_lead_time_days() {
        assert_eq!(lead_time_days("5 дней", true).unwrap(), 5);
        assert_eq!(lead_time_days("3 дн.", true).unwrap(), 3);
        assert_eq!(lead_time_days("12 days", true).unwrap(), 12);
        assert_eq!(lead_time_days("2d", true).unwrap(), 2);
        assert_eq!(lead_time_days("5-7 дней", true).unwrap(), 7);
        assert_eq!(lead_time_days("4", false).unwrap(), 4);
        assert_eq!(lead_time_days("5 рабочих дней", true).unwrap(), 5);
        assert_eq!(lead_time_days("3 business days", true).unwrap(), 3);
    }

    #[test]
    fn test_lead_time_rejects_weeks_and_requests() {
        assert!(matches!(
            lead_time_days("2 недели", true),
            Err(ExtractionError::UnitMismatch(_))
        ));
        assert!(matches!(
            lead_time_days("3 weeks", false),
            Err(ExtractionError::UnitMismatch(_))
        ));
        assert!(matches!(
            lead_time_days("2 рабочие недели", true),
            Err(ExtractionError::UnitMismatch(_))
        ));
        assert!(matches!(
            lead_time_days("5 рабочих", true),
            Err(ExtractionError::UnitMismatch(_))
        ));
        assert!(matches!(
            lead_time_days("4", true),
            Err(ExtractionError::UnitMismatch(_))
        ));
        assert!(matches!(
            lead_time_days("По запросу", false),
            Err(ExtractionError::OnRequest)
        ));
        assert!(matches!(
            lead_time_days("on request", true),
            Err(ExtractionError::OnRequest)
        ));
        assert!(matches!(
            lead_time_days("soon", false),
            Err(ExtractionError::InvalidNumber { .. })
        ));
    }
}
