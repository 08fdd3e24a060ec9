//! Display formatting for amounts, rates and history entries
//!
//! Values are rounded only here; stored records keep full precision.

use crate::types::Conversion;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Amount with two decimals
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Unit rate with four decimals
pub fn format_rate(rate: f64) -> String {
    format!("{:.4}", rate)
}

/// `"100.00 USD = 90.00 EUR"`
pub fn conversion_summary(conversion: &Conversion) -> String {
    format!(
        "{} {} = {} {}",
        format_amount(conversion.amount),
        conversion.from,
        format_amount(conversion.result),
        conversion.to
    )
}

/// `"1 USD = 0.9000 EUR"`
pub fn rate_summary(conversion: &Conversion) -> String {
    format!(
        "1 {} = {} {}",
        conversion.from,
        format_rate(conversion.rate),
        conversion.to
    )
}

/// Day, short month, year and time, e.g. `"01 Mar 2024, 12:30"`
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%d %b %Y, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConversionQuote;
    use chrono::{FixedOffset, Utc};

    fn sample() -> Conversion {
        Conversion::new(
            "1",
            "USD",
            "EUR",
            100.0,
            ConversionQuote {
                result: 90.123456,
                rate: 0.90123456,
            },
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_amount_and_rate_precision() {
        assert_eq!(format_amount(90.0), "90.00");
        assert_eq!(format_amount(1234.5678), "1234.57");
        assert_eq!(format_rate(0.9), "0.9000");
        assert_eq!(format_rate(7312.123456), "7312.1235");
    }

    #[test]
    fn test_summaries() {
        let c = sample();
        assert_eq!(conversion_summary(&c), "100.00 USD = 90.12 EUR");
        assert_eq!(rate_summary(&c), "1 USD = 0.9012 EUR");
    }

    #[test]
    fn test_format_date() {
        let c = sample();
        assert_eq!(format_date(&c.date), "01 Mar 2024, 12:30");

        let asuncion = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            format_date(&c.date.with_timezone(&asuncion)),
            "01 Mar 2024, 09:30"
        );
    }
}
