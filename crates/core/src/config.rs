use serde::Deserialize;

/// Root application configuration. Loaded from an optional
/// `creator-trust.toml` file and environment variables with the prefix
/// `CREATOR_TRUST__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    #[serde(default = "default_payment_reference_prefix")]
    pub payment_reference_prefix: String,
    /// Decimal places kept on a creator's aggregate rating.
    #[serde(default = "default_rating_precision")]
    pub rating_precision: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_json")]
    pub json: bool,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default functions
fn default_seed_demo_data() -> bool {
    true
}
fn default_payment_reference_prefix() -> String {
    "PAY".to_string()
}
fn default_rating_precision() -> u32 {
    2
}
fn default_log_json() -> bool {
    true
}
fn default_log_filter() -> String {
    "creator_trust=info,creator_trust_marketplace=info".to_string()
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            payment_reference_prefix: default_payment_reference_prefix(),
            rating_precision: default_rating_precision(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: default_log_json(),
            filter: default_log_filter(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            marketplace: MarketplaceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional config file and environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("creator-trust").required(false))
            .add_source(
                config::Environment::with_prefix("CREATOR_TRUST")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.marketplace.seed_demo_data);
        assert_eq!(config.marketplace.payment_reference_prefix, "PAY");
        assert_eq!(config.marketplace.rating_precision, 2);
        assert!(config.logging.json);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [marketplace]
            seed_demo_data = false

            [logging]
            json = false
        "#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!config.marketplace.seed_demo_data);
        assert_eq!(config.marketplace.payment_reference_prefix, "PAY");
        assert!(!config.logging.json);
        assert_eq!(config.logging.filter, default_log_filter());
    }

    #[test]
    fn test_empty_source_is_default() {
        let config: AppConfig = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(config.marketplace.rating_precision, 2);
    }
}
