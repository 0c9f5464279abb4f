use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `config.toml` still yields a usable config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: Display,
    pub storage: Storage,
    pub vc_matching: VcMatching,
    pub logging: Logging,
}

/// How computed figures are rendered in the terminal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Display {
    /// Decimal places shown for money and rate figures.
    pub decimal_places: u32,
    pub currency_symbol: String,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            currency_symbol: "$".to_string(),
        }
    }
}

/// Where per-user records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StorageBackend {
    /// PostgreSQL, reached through `DATABASE_URL`.
    #[default]
    Postgres,
    /// A process-local store; records vanish on exit.
    Memory,
}

/// Contains parameters for the record store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub backend: StorageBackend,
    pub max_connections: u32,
    /// How long to wait for a pooled connection, in seconds.
    pub acquire_timeout_secs: u64,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

/// Defaults for the investor search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VcMatching {
    /// JSON export of the investor spreadsheet.
    pub dataset_path: PathBuf,
    /// Share of the filtered investors returned, in percent.
    pub default_percentage: Decimal,
    pub per_page: usize,
    /// Seed for the sampling RNG, so repeated searches return the same investors.
    pub sample_seed: u64,
}

impl Default for VcMatching {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("vc_data.json"),
            default_percentage: dec!(30),
            per_page: 50,
            sample_seed: 42,
        }
    }
}

/// Contains parameters for log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "runway.log".to_string(),
        }
    }
}
