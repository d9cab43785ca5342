use transcript_pipeline::infrastructure::observability::{DEFAULT_FILTER, TracingConfig};
use transcript_pipeline::presentation::config::LoggingSettings;

fn logging(level: &str, json: bool) -> LoggingSettings {
    LoggingSettings {
        level: level.to_string(),
        json,
    }
}

#[test]
fn given_info_level_when_building_config_then_uses_crate_debug_filter() {
    let config = TracingConfig::from_settings("Local", &logging("info", false));

    assert_eq!(config.default_filter, DEFAULT_FILTER);
    assert_eq!(config.environment, "Local");
}

#[test]
fn given_warn_level_when_building_config_then_filter_follows_level() {
    let config = TracingConfig::from_settings("Prod", &logging("WARN", false));

    assert_eq!(config.default_filter, "warn,tower_http=warn");
}

#[test]
fn given_json_setting_when_building_config_then_json_format_enabled() {
    let config = TracingConfig::from_settings("Prod", &logging("info", true));

    assert!(config.json_format);
}
