//! CSV replay provider for offline runs.

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use fx_core::error::ProviderError;
use fx_core::traits::Provider;
use fx_core::{PricePoint, PriceSeries, ProviderData, ProviderId, SignalRequest};
use serde::Deserialize;
use tracing::debug;

use crate::parse::{parse_timestamp, tail};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "datetime",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

/// Serves recorded bars from `<dir>/<PAIR>.csv` in place of a live provider.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    id: ProviderId,
    dir: PathBuf,
}

impl ReplayProvider {
    /// Create a replay provider standing in for `id`.
    pub fn new(id: ProviderId, dir: impl Into<PathBuf>) -> Self {
        Self { id, dir: dir.into() }
    }

    /// File holding the bars for a pair.
    pub fn path_for(&self, request: &SignalRequest) -> PathBuf {
        self.dir.join(format!("{}.csv", request.pair.compact()))
    }

    /// Load bars from a CSV file.
    pub fn load(path: &Path) -> Result<PriceSeries, ProviderError> {
        if !path.exists() {
            return Err(ProviderError::NoData);
        }
        let file = std::fs::File::open(path).map_err(|e| ProviderError::Connection(e.to_string()))?;
        parse_csv(file)
    }
}

#[async_trait]
impl Provider for ReplayProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "CSV replay"
    }

    async fn fetch(&self, request: &SignalRequest) -> Result<ProviderData, ProviderError> {
        let path = self.path_for(request);
        debug!("Replaying {} for {}", path.display(), self.id);

        let series = tokio::task::spawn_blocking(move || Self::load(&path))
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))??;
        let points = tail(series, request.output_size);
        Ok(ProviderData::Series {
            points,
            quote: None,
        })
    }
}

/// Parse CSV bars in any order into a chronological series.
fn parse_csv<R: Read>(reader: R) -> Result<PriceSeries, ProviderError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| ProviderError::Parse(e.to_string()))?;
        let point = PricePoint::new(
            parse_timestamp(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
        );
        points.push(match record.volume {
            Some(volume) => point.with_volume(volume),
            None => point,
        });
    }

    if points.is_empty() {
        return Err(ProviderError::NoData);
    }
    Ok(PriceSeries::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fx_core::Interval;

    const CSV: &str = "\
datetime,open,high,low,close
2024-03-15 10:30:00,1.0892,1.0899,1.0890,1.0897
2024-03-15 10:00:00,1.0880,1.0891,1.0879,1.0890
2024-03-15 10:15:00,1.0890,1.0895,1.0885,1.0892
";

    #[test]
    fn test_parse_csv_sorts() {
        let series = parse_csv(CSV.as_bytes()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0890, 1.0892, 1.0897]);
        assert!(series.points().iter().all(|p| p.volume.is_none()));
    }

    #[test]
    fn test_capitalized_headers_with_volume() {
        let csv = "Date,Open,High,Low,Close,Volume\n2024-03-14,1.08,1.09,1.07,1.085,1200\n";
        let series = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(series.latest().unwrap().volume, Some(1200.0));
    }

    #[test]
    fn test_empty_and_malformed() {
        assert_eq!(parse_csv("date,open,high,low,close\n".as_bytes()), Err(ProviderError::NoData));
        assert!(matches!(
            parse_csv("date,open,high,low,close\n2024-03-14,x,1,1,1\n".as_bytes()),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            parse_csv("date,open,high,low,close\n-9999999999999999,1,1,1,1\n".as_bytes()),
            Err(ProviderError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_no_data() {
        let provider = ReplayProvider::new(ProviderId::TwelveData, std::env::temp_dir().join("fxsignals-missing"));
        let request = SignalRequest::new(
            "EURUSD".parse().unwrap(),
            Interval::Minute15,
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        );

        assert_eq!(provider.id(), ProviderId::TwelveData);
        assert!(provider.path_for(&request).ends_with("EURUSD.csv"));
        assert_eq!(provider.fetch(&request).await, Err(ProviderError::NoData));
    }

    #[tokio::test]
    async fn test_replay_from_file() {
        let dir = std::env::temp_dir().join(format!("fxsignals-replay-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("GBPUSD.csv"), CSV).unwrap();

        let provider = ReplayProvider::new(ProviderId::AlphaVantage, &dir);
        let request = SignalRequest::new(
            "GBP/USD".parse().unwrap(),
            Interval::Minute15,
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        )
        .with_output_size(2);

        let data = provider.fetch(&request).await.unwrap();
        assert_eq!(data.series().unwrap().closes(), vec![1.0892, 1.0897]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
