use crate::presentation::config::LoggingSettings;

pub const DEFAULT_FILTER: &str = "info,transcript_pipeline=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    /// `LOG_FORMAT=json` forces JSON output regardless of settings.
    pub fn from_settings(environment: impl Into<String>, logging: &LoggingSettings) -> Self {
        let json_from_env = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            environment: environment.into(),
            json_format: logging.json || json_from_env,
            default_filter: filter_for_level(&logging.level),
        }
    }
}

fn filter_for_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "" | "info" => DEFAULT_FILTER.to_string(),
        other => format!("{other},tower_http={other}"),
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}
