use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Application configuration: remote endpoints, identity provider pages and
/// session cookie settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub endpoints: EndpointsConfig,
    pub session: SessionConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct IdentityConfig {
    /// Hosted login page; redirects back to `/` with a `code`.
    pub login_url: String,
    /// Hosted login page that redirects back to the enrolment page.
    pub upload_url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EndpointsConfig {
    pub visitor_storage_base: String,
    pub employee_storage_base: String,
    pub verify_base: String,
    pub board_base: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "auth_token".to_string(),
            max_age_secs: 86_400,
        }
    }
}

impl AppConfig {
    /// Loads the embedded defaults, overridden by `WORKSITE__<SECTION>__<KEY>`
    /// environment variables where the platform has any.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .add_source(
                config::Environment::with_prefix("WORKSITE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_defaults() {
        // Act
        let config = AppConfig::load().unwrap();

        // Assert
        assert_eq!(config.session, SessionConfig::default());
        assert!(config.endpoints.verify_base.ends_with("/employees"));
        assert!(config.endpoints.board_base.ends_with("/jiraboard"));
        assert!(config.identity.login_url.contains("response_type=code"));
    }

    #[test]
    fn test_config_deserialize_from_toml() {
        // Arrange
        let toml_str = r#"
            [identity]
            login_url = "https://idp.test/login"
            upload_url = "https://idp.test/upload"

            [endpoints]
            visitor_storage_base = "https://api.test/visitors"
            employee_storage_base = "https://api.test/employees-images"
            verify_base = "https://api.test/employees"
            board_base = "https://api.test/board"

            [session]
            cookie_name = "session"
            max_age_secs = 60
        "#;

        // Act
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(config.identity.login_url, "https://idp.test/login");
        assert_eq!(config.endpoints.board_base, "https://api.test/board");
        assert_eq!(config.session.cookie_name, "session");
        assert_eq!(config.session.max_age_secs, 60);
    }

    #[test]
    fn test_config_missing_section_is_rejected() {
        // Arrange
        let toml_str = r#"
            [session]
            cookie_name = "auth_token"
            max_age_secs = 86400
        "#;

        // Act
        let result: Result<AppConfig, _> = toml::from_str(toml_str);

        // Assert
        assert!(result.is_err());
    }
}
