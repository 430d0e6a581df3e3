use std::fs;
use std::path::PathBuf;

const DATA_DIR: &str = ".ptero-proxy";
const DATA_DIR_ENV: &str = "PTERO_PROXY_DATA_DIR";

/// Get data directory path
///
/// `PTERO_PROXY_DATA_DIR` overrides the default `~/.ptero-proxy`, which
/// containers and tests rely on.
pub fn get_data_dir() -> Result<PathBuf, String> {
    let data_dir = match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => {
            let home = dirs::home_dir().ok_or("Failed to get user home directory")?;
            home.join(DATA_DIR)
        }
    };

    // Ensure directory exists
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)
            .map_err(|e| format!("Failed to create data directory: {}", e))?;
    }

    Ok(data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override() {
        let dir = std::env::temp_dir().join("ptero_proxy_test_data_dir");
        std::env::set_var(DATA_DIR_ENV, &dir);
        let resolved = get_data_dir().expect("data dir");
        assert_eq!(resolved, dir);
        assert!(resolved.exists());
        std::env::remove_var(DATA_DIR_ENV);
        let _ = fs::remove_dir_all(dir);
    }
}
