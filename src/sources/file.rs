use super::SnapshotSource;
use super::ticker::parse_dlr_maturity;
use crate::errors::{AppError, Result};
use crate::models::{FuturesQuote, MarketSnapshot};
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    /// Defaults to the time the file is read.
    timestamp: Option<DateTime<Utc>>,
    spot_price: f64,
    funding_rate: f64,
    #[serde(default)]
    contracts: Vec<ContractEntry>,
}

#[derive(Debug, Deserialize)]
struct ContractEntry {
    symbol: String,
    /// Derived from the ticker when omitted.
    maturity_date: Option<NaiveDate>,
    bid: Option<f64>,
    ask: Option<f64>,
    settlement: Option<f64>,
}

/// Snapshot stored as a JSON document on disk, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<MarketSnapshot>> {
        Box::pin(async move {
            let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                AppError::SourceUnavailable(format!("{}: {e}", self.path.display()))
            })?;
            parse_snapshot(&raw, Utc::now())
        })
    }
}

/// Parse a snapshot document. Entries whose maturity can be neither read nor
/// derived from the ticker are skipped with a warning.
pub fn parse_snapshot(raw: &str, read_at: DateTime<Utc>) -> Result<MarketSnapshot> {
    let file: SnapshotFile = serde_json::from_str(raw)?;

    let contracts = file
        .contracts
        .into_iter()
        .filter_map(|entry| {
            let Some(maturity_date) = entry
                .maturity_date
                .or_else(|| parse_dlr_maturity(&entry.symbol))
            else {
                warn!(symbol = %entry.symbol, "[SNAPSHOT] no maturity for contract, skipping");
                return None;
            };
            Some(FuturesQuote {
                symbol: entry.symbol,
                maturity_date,
                bid: entry.bid,
                ask: entry.ask,
                settlement: entry.settlement,
            })
        })
        .collect();

    MarketSnapshot::new(
        file.timestamp.unwrap_or(read_at),
        file.spot_price,
        file.funding_rate,
        contracts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn read_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 15, 0, 0).unwrap()
    }

    #[test]
    fn derives_maturity_from_ticker() {
        let raw = r#"{
            "spot_price": 1450.5,
            "funding_rate": 0.35,
            "contracts": [
                {"symbol": "DLR/ENE26A", "bid": 1500.0, "ask": 1505.0},
                {"symbol": "DLR/DIC25", "maturity_date": "2025-12-30", "settlement": 1480.0},
                {"symbol": "DLR/ENE26/FEB26", "bid": 10.0, "ask": 11.0}
            ]
        }"#;
        let snap = parse_snapshot(raw, read_at()).unwrap();
        assert_eq!(snap.timestamp(), read_at());
        assert_eq!(snap.contracts().len(), 2);
        assert_eq!(snap.contracts()[0].symbol, "DLR/DIC25");
        assert_eq!(
            snap.contracts()[1].maturity_date,
            NaiveDate::from_ymd_opt(2026, 1, 30).unwrap()
        );
    }

    #[test]
    fn invalid_spot_rejects_document() {
        let raw = r#"{"spot_price": 0, "funding_rate": 0.35, "contracts": []}"#;
        assert!(matches!(
            parse_snapshot(raw, read_at()),
            Err(AppError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            parse_snapshot("not json", read_at()),
            Err(AppError::SerdeJson(_))
        ));
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("carry-monitor-{}.json", std::process::id()));
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(
                f,
                r#"{{"timestamp": "2025-10-01T15:00:00Z", "spot_price": 1000.0, "funding_rate": 0.4,
                    "contracts": [{{"symbol": "DLR/DIC25", "bid": 1080.0, "ask": 1090.0}}]}}"#
            )
            .unwrap();
        }
        let snap = FileSource::new(path.clone()).fetch_snapshot().await.unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(snap.spot_price(), 1000.0);
        assert_eq!(snap.contracts().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_source_unavailable() {
        let source = FileSource::new("/nonexistent/carry-monitor/snapshot.json");
        assert!(matches!(
            source.fetch_snapshot().await,
            Err(AppError::SourceUnavailable(_))
        ));
    }
}
