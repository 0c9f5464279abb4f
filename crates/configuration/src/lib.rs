use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Display, Logging, Storage, StorageBackend, VcMatching};
pub use telemetry::init_tracing;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of the environment variables that override file settings,
/// e.g. `RUNWAY__STORAGE__BACKEND=memory`.
const ENV_PREFIX: &str = "RUNWAY";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// deserializes it into our strongly-typed `Config` struct, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads and validates the configuration from `path`, layering `RUNWAY__*` environment
/// variables on top. A missing file is not an error; every setting has a default.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

/// Rejects settings that would make later stages misbehave.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.display.decimal_places > 28 {
        return Err(ConfigError::ValidationError(
            "display.decimal_places must be at most 28".to_string(),
        ));
    }
    if config.vc_matching.per_page == 0 {
        return Err(ConfigError::ValidationError(
            "vc_matching.per_page must be greater than 0".to_string(),
        ));
    }
    let percentage = config.vc_matching.default_percentage;
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(ConfigError::ValidationError(
            "vc_matching.default_percentage must be between 0 and 100".to_string(),
        ));
    }
    if config.storage.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "storage.max_connections must be greater than 0".to_string(),
        ));
    }
    if tracing_subscriber::EnvFilter::try_new(&config.logging.level).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "logging.level '{}' is not a valid filter directive",
            config.logging.level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.display.decimal_places, 2);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.vc_matching.default_percentage, dec!(30));
        assert_eq!(config.vc_matching.per_page, 50);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [display]
            decimal_places = 4

            [storage]
            backend = "memory"

            [vc_matching]
            dataset_path = "data/investors.json"
            per_page = 20
            "#,
        );
        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.display.decimal_places, 4);
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.vc_matching.per_page, 20);
        assert_eq!(config.vc_matching.sample_seed, 42);
    }

    #[test]
    fn zero_per_page_is_rejected() {
        let file = write_config("[vc_matching]\nper_page = 0\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud=[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn out_of_range_percentage_is_rejected() {
        let mut config = Config::default();
        config.vc_matching.default_percentage = dec!(120);
        assert!(validate(&config).is_err());
    }
}
