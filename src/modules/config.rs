use serde_json;
use std::fs;

use super::paths::get_data_dir;
use crate::models::AppConfig;

const CONFIG_FILE: &str = "proxy_config.json";

/// Load application config
pub fn load_app_config() -> Result<AppConfig, String> {
    let data_dir = get_data_dir()?;
    let config_path = data_dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(&config_path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
}

/// Save application config
pub fn save_app_config(config: &AppConfig) -> Result<(), String> {
    let data_dir = get_data_dir()?;
    let config_path = data_dir.join(CONFIG_FILE);

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(&config_path, content).map_err(|e| format!("Failed to save config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let config: AppConfig =
            serde_json::from_str(r#"{"proxy":{"port":9000}}"#).expect("parse config");
        assert_eq!(config.proxy.port, 9000);
        // Unspecified fields fall back to defaults
        assert_eq!(config.proxy.request_timeout, 120);
        assert_eq!(config.proxy.provisioning.egg_id, 15);

        let serialized = serde_json::to_string_pretty(&config).expect("serialize config");
        let reparsed: AppConfig = serde_json::from_str(&serialized).expect("reparse config");
        assert_eq!(reparsed.proxy.port, 9000);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("parse empty config");
        assert_eq!(config.proxy.port, 8045);
        assert!(!config.proxy.allow_lan_access);
    }
}
