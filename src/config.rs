//! Configuration loader and application settings.

use crate::arbitrage::FrictionConfig;
use crate::errors::{AppError, Result};
use crate::sources::{FallbackChain, FileSource, SnapshotSource, SyntheticSource};
use std::path::PathBuf;
use std::str::FromStr;

/// Which adapter a `DATA_SOURCES` entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Synthetic,
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "synthetic" | "mock" => Ok(SourceKind::Synthetic),
            other => Err(AppError::Config(format!("unknown data source '{other}'"))),
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sources in the order they are tried.
    pub data_sources: Vec<SourceKind>,
    /// JSON snapshot read by the file source.
    pub snapshot_path: Option<PathBuf>,
    /// Seconds between refresh cycles.
    pub refresh_secs: u64,
    pub synthetic_seed: Option<u64>,
    pub friction: FrictionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_sources = lookup("DATA_SOURCES")
            .unwrap_or_else(|| "synthetic".into())
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(SourceKind::from_str)
            .collect::<Result<Vec<_>>>()?;
        if data_sources.is_empty() {
            return Err(AppError::Config("DATA_SOURCES lists no sources".into()));
        }

        let snapshot_path = lookup("SNAPSHOT_PATH").map(PathBuf::from);
        if data_sources.contains(&SourceKind::File) && snapshot_path.is_none() {
            return Err(AppError::Config(
                "SNAPSHOT_PATH must be set when DATA_SOURCES includes 'file'".into(),
            ));
        }

        let refresh_secs: u64 = parse_var(&lookup, "REFRESH_SECS")?.unwrap_or(5);
        if refresh_secs == 0 {
            return Err(AppError::Config("REFRESH_SECS must be at least 1".into()));
        }

        let friction = FrictionConfig {
            spread_widen_bps: parse_var(&lookup, "SPREAD_WIDEN_BPS")?.unwrap_or(0.0),
            commission_bps: parse_var(&lookup, "COMMISSION_BPS")?.unwrap_or(0.0),
            funding_rate_override: parse_var(&lookup, "FUNDING_RATE_OVERRIDE")?,
        };
        friction
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            data_sources,
            snapshot_path,
            refresh_secs,
            synthetic_seed: parse_var(&lookup, "SYNTHETIC_SEED")?,
            friction,
        })
    }

    /// Instantiate the configured sources as a fallback chain.
    pub fn source_chain(&self) -> Result<FallbackChain> {
        let sources = self
            .data_sources
            .iter()
            .map(|kind| -> Result<Box<dyn SnapshotSource>> {
                let source: Box<dyn SnapshotSource> = match kind {
                    SourceKind::File => {
                        let path = self.snapshot_path.clone().ok_or_else(|| {
                            AppError::Config("SNAPSHOT_PATH is not set".into())
                        })?;
                        Box::new(FileSource::new(path))
                    }
                    SourceKind::Synthetic => Box::new(SyntheticSource::new(self.synthetic_seed)),
                };
                Ok(source)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(FallbackChain::new(sources))
    }
}

/// Parse an optional variable; present but malformed is an error.
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{key}={raw}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_synthetic_without_friction() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.data_sources, vec![SourceKind::Synthetic]);
        assert_eq!(cfg.refresh_secs, 5);
        assert_eq!(cfg.friction, FrictionConfig::default());
        assert_eq!(cfg.source_chain().unwrap().len(), 1);
    }

    #[test]
    fn reads_sources_and_friction() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATA_SOURCES", "file, synthetic"),
            ("SNAPSHOT_PATH", "/tmp/snap.json"),
            ("COMMISSION_BPS", "25"),
            ("SPREAD_WIDEN_BPS", "50"),
            ("FUNDING_RATE_OVERRIDE", "0.38"),
            ("SYNTHETIC_SEED", "11"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.data_sources,
            vec![SourceKind::File, SourceKind::Synthetic]
        );
        assert_eq!(cfg.friction.commission_bps, 25.0);
        assert_eq!(cfg.friction.spread_widen_bps, 50.0);
        assert_eq!(cfg.friction.funding_rate_override, Some(0.38));
        assert_eq!(cfg.synthetic_seed, Some(11));
        assert_eq!(cfg.source_chain().unwrap().len(), 2);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("COMMISSION_BPS", "ten")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("COMMISSION_BPS", "-5")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("DATA_SOURCES", "file")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("DATA_SOURCES", "rofex")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("REFRESH_SECS", "0")])),
            Err(AppError::Config(_))
        ));
    }
}
