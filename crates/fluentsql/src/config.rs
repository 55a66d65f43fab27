use crate::error::{DbError, DbResult};

/// Environment variable read by [`DbConfig::from_env`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration for [`Db`](crate::Db).
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection string, passed verbatim to the connector.
    pub dsn: String,
    /// Refuse UPDATE statements without a WHERE clause.
    pub safety_check: bool,
    /// Label attached to every hook context.
    pub tag: Option<String>,
}

impl DbConfig {
    /// Create a configuration with the safety check enabled.
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            safety_check: true,
            tag: None,
        }
    }

    /// Read the connection string from `DATABASE_URL`.
    pub fn from_env() -> DbResult<Self> {
        Self::from_env_var(DATABASE_URL_ENV)
    }

    /// Read the connection string from the given environment variable.
    pub fn from_env_var(name: &str) -> DbResult<Self> {
        let dsn = std::env::var(name)
            .map_err(|e| DbError::config(format!("{name}: {e}")))?;
        if dsn.trim().is_empty() {
            return Err(DbError::config(format!("{name} is empty")));
        }
        Ok(Self::new(dsn))
    }

    /// Enable or disable the UPDATE-without-WHERE check.
    pub fn safety_check(mut self, enabled: bool) -> Self {
        self.safety_check = enabled;
        self
    }

    /// Allow UPDATE statements without a WHERE clause.
    pub fn disable_safety(self) -> Self {
        self.safety_check(false)
    }

    /// Label every statement issued through this configuration.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DbConfig::new("postgres://localhost/app");
        assert_eq!(config.dsn, "postgres://localhost/app");
        assert!(config.safety_check);
        assert!(config.tag.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("dsn").disable_safety().tag("reports");
        assert!(!config.safety_check);
        assert_eq!(config.tag.as_deref(), Some("reports"));
        assert!(DbConfig::new("dsn").safety_check(true).safety_check);
    }

    #[test]
    fn test_from_missing_env_var() {
        let err = DbConfig::from_env_var("FLUENTSQL_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(err.is_config());
    }
}
