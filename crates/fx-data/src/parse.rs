//! Field parsing shared by the adapters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use fx_core::error::ProviderError;
use fx_core::PriceSeries;

/// Parse a timestamp into Unix milliseconds (UTC).
///
/// Accepts the date and date-time layouts the providers and replay files
/// use, RFC 3339, and bare Unix seconds or milliseconds.
pub fn parse_timestamp(value: &str) -> Result<i64, ProviderError> {
    let value = value.trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }

    if let Ok(ts) = value.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts
            .checked_mul(1000)
            .ok_or_else(|| ProviderError::Parse(format!("Timestamp out of range: {}", value)));
    }

    Err(ProviderError::Parse(format!("Could not parse date: {}", value)))
}

/// Parse a price sent as a string.
pub(crate) fn parse_price(field: &str, value: &str) -> Result<f64, ProviderError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ProviderError::Parse(format!("Invalid {}: {:?}", field, value)))
}

/// Keep only the newest `limit` points.
pub(crate) fn tail(series: PriceSeries, limit: Option<usize>) -> PriceSeries {
    match limit {
        Some(n) if n < series.len() => PriceSeries::from_points(series.last_n(n).iter().copied()),
        _ => series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_core::PricePoint;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000); // Unix ms
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000); // Unix sec
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_out_of_range_timestamp() {
        assert!(matches!(parse_timestamp("-9999999999999999"), Err(ProviderError::Parse(_))));
        assert!(matches!(
            parse_timestamp(&i64::MIN.to_string()),
            Err(ProviderError::Parse(_))
        ));
        assert_eq!(parse_timestamp("-60").unwrap(), -60_000);
    }

    #[test]
    fn test_parse_price() {
        assert!((parse_price("close", " 1.08512 ").unwrap() - 1.08512).abs() < 1e-12);
        assert!(matches!(parse_price("close", "n/a"), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_tail() {
        let series: PriceSeries = (0..10).map(|i| PricePoint::new(i, 1.0, 1.0, 1.0, i as f64)).collect();

        let limited = tail(series.clone(), Some(3));
        assert_eq!(limited.closes(), vec![7.0, 8.0, 9.0]);
        assert_eq!(tail(series.clone(), None).len(), 10);
        assert_eq!(tail(series, Some(50)).len(), 10);
    }
}
