//! Price data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLC(V) observation.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    /// Create a new price point without volume.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Attach a volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Chronologically ordered price series (oldest first).
///
/// Providers disagree on ordering, so the series sorts whatever it is given
/// and keeps the last point seen for a duplicated timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSeries")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

/// Wire shape of a series, normalized on the way in.
#[derive(Deserialize)]
struct RawSeries {
    points: Vec<PricePoint>,
}

impl From<RawSeries> for PriceSeries {
    fn from(raw: RawSeries) -> Self {
        Self::from_points(raw.points)
    }
}

impl PriceSeries {
    /// Build a series from points in any order.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points.into_iter().collect();
        // Stable sort keeps arrival order within a timestamp.
        points.sort_by_key(|p| p.timestamp);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The most recent point.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The point before the most recent one.
    pub fn previous(&self) -> Option<&PricePoint> {
        self.points.len().checked_sub(2).and_then(|i| self.points.get(i))
    }

    /// Get the last N points.
    pub fn last_n(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Extract close prices.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Get an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        Self::from_points(iter)
    }
}

/// Current quote snapshot with no history behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Latest price
    pub close: f64,
    /// Prior session close, if reported
    pub previous_close: Option<f64>,
    /// Change against the prior close in percent, if reported
    pub percent_change: Option<f64>,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl Quote {
    /// Quote carrying only a price.
    pub fn rate(close: f64, timestamp: i64) -> Self {
        Self {
            close,
            previous_close: None,
            percent_change: None,
            timestamp,
        }
    }

    /// Percent change, preferring the provider's own figure.
    pub fn change_percent(&self) -> Option<f64> {
        if let Some(pct) = self.percent_change {
            return Some(pct);
        }
        match self.previous_close {
            Some(prev) if prev > 0.0 => Some((self.close - prev) / prev * 100.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: i64, close: f64) -> PricePoint {
        PricePoint::new(ts, close, close + 0.001, close - 0.001, close)
    }

    #[test]
    fn test_series_sorts_reverse_chronological_input() {
        let series = PriceSeries::from_points(vec![point(3, 1.3), point(2, 1.2), point(1, 1.1)]);

        assert_eq!(series.closes(), vec![1.1, 1.2, 1.3]);
        assert_eq!(series.latest().unwrap().timestamp, 3);
        assert_eq!(series.previous().unwrap().timestamp, 2);
    }

    #[test]
    fn test_series_keeps_last_duplicate() {
        let series = PriceSeries::from_points(vec![point(1, 1.0), point(2, 1.5), point(2, 2.0)]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().close, 2.0);
    }

    #[test]
    fn test_series_previous_needs_two_points() {
        let series = PriceSeries::from_points(vec![point(1, 1.0)]);
        assert!(series.previous().is_none());
        assert!(PriceSeries::default().latest().is_none());
    }

    #[test]
    fn test_deserialized_series_is_chronological() {
        let json = r#"{ "points": [
            { "timestamp": 2, "open": 1.2, "high": 1.2, "low": 1.2, "close": 1.2 },
            { "timestamp": 1, "open": 1.1, "high": 1.1, "low": 1.1, "close": 1.1 },
            { "timestamp": 2, "open": 1.3, "high": 1.3, "low": 1.3, "close": 1.3 }
        ] }"#;

        let series: PriceSeries = serde_json::from_str(json).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().timestamp, 2);
        assert_eq!(series.closes(), vec![1.1, 1.3]);
    }

    #[test]
    fn test_last_n() {
        let series: PriceSeries = (0..10).map(|i| point(i, i as f64)).collect();

        assert_eq!(series.last_n(3).len(), 3);
        assert_eq!(series.last_n(3)[0].close, 7.0);
        assert_eq!(series.last_n(50).len(), 10);
    }

    #[test]
    fn test_quote_change_percent() {
        let mut quote = Quote::rate(1.1, 0);
        assert!(quote.change_percent().is_none());

        quote.previous_close = Some(1.0);
        assert!((quote.change_percent().unwrap() - 10.0).abs() < 1e-9);

        quote.percent_change = Some(0.25);
        assert_eq!(quote.change_percent(), Some(0.25));
    }
}
