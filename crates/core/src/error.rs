use thiserror::Error;

pub type MarketplaceResult<T> = Result<T, MarketplaceError>;

#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Wrong role: {0}")]
    WrongRole(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MarketplaceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for the "no such entity" case, which callers usually map to a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<config::ConfigError> for MarketplaceError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = MarketplaceError::not_found("campaign", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "campaign not found: abc");
    }

    #[test]
    fn test_conflict_is_not_not_found() {
        let err = MarketplaceError::Conflict("email already registered".into());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("email already registered"));
    }

    #[test]
    fn test_config_error_maps_to_config_variant() {
        let err: MarketplaceError = config::ConfigError::Message("bad prefix".into()).into();
        assert!(matches!(err, MarketplaceError::Config(ref m) if m.contains("bad prefix")));
    }
}
