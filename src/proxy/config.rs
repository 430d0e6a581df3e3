use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Proxy service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Whether to allow LAN access
    /// - false: local access only, 127.0.0.1 (default, privacy first)
    /// - true: bind 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Policy applied to every server created through /create
    #[serde(default)]
    pub provisioning: ProvisionPolicy,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            request_timeout: default_request_timeout(),
            provisioning: ProvisionPolicy::default(),
        }
    }
}

fn default_port() -> u16 {
    8045
}

fn default_request_timeout() -> u64 {
    120
}

impl ProxyConfig {
    /// Get the actual listen address
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}

/// Provisioning policy for /create.
///
/// These values encode product defaults (which egg gets deployed, where,
/// with which resource weights), not panel protocol requirements. They are
/// kept out of the handlers so an operator can change them in the config
/// file without touching code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionPolicy {
    /// Nest grouping the deployed egg
    #[serde(default = "default_nest_id")]
    pub nest_id: u32,

    /// Egg (server blueprint) every created server uses
    #[serde(default = "default_egg_id")]
    pub egg_id: u32,

    /// Panel location servers are deployed to
    #[serde(default = "default_location_id")]
    pub location_id: u32,

    /// Block IO weight passed to the panel
    #[serde(default = "default_io_weight")]
    pub io_weight: u64,

    /// Swap allowance in MB
    #[serde(default)]
    pub swap_mb: u64,

    /// CPU limit (percent) when the caller does not send one
    #[serde(default = "default_cpu_percent")]
    pub default_cpu_percent: u64,

    #[serde(default = "default_feature_limit")]
    pub databases: u32,

    #[serde(default = "default_feature_limit")]
    pub backups: u32,

    #[serde(default = "default_feature_limit")]
    pub allocations: u32,

    /// Startup environment handed to the egg
    #[serde(default = "default_environment")]
    pub environment: HashMap<String, String>,
}

impl Default for ProvisionPolicy {
    fn default() -> Self {
        Self {
            nest_id: default_nest_id(),
            egg_id: default_egg_id(),
            location_id: default_location_id(),
            io_weight: default_io_weight(),
            swap_mb: 0,
            default_cpu_percent: default_cpu_percent(),
            databases: default_feature_limit(),
            backups: default_feature_limit(),
            allocations: default_feature_limit(),
            environment: default_environment(),
        }
    }
}

impl ProvisionPolicy {
    /// Application API path of the configured egg
    pub fn egg_path(&self) -> String {
        format!("nests/{}/eggs/{}", self.nest_id, self.egg_id)
    }
}

fn default_nest_id() -> u32 {
    5
}

fn default_egg_id() -> u32 {
    15
}

fn default_location_id() -> u32 {
    1
}

fn default_io_weight() -> u64 {
    500
}

fn default_cpu_percent() -> u64 {
    100
}

fn default_feature_limit() -> u32 {
    5
}

fn default_environment() -> HashMap<String, String> {
    HashMap::from([
        ("INST".to_string(), "npm".to_string()),
        ("USER_UPLOAD".to_string(), "0".to_string()),
        ("AUTO_UPDATE".to_string(), "0".to_string()),
        ("CMD_RUN".to_string(), "npm start".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let mut config = ProxyConfig::default();
        assert_eq!(config.get_bind_address(), "127.0.0.1");
        config.allow_lan_access = true;
        assert_eq!(config.get_bind_address(), "0.0.0.0");
    }

    #[test]
    fn test_egg_path() {
        let policy = ProvisionPolicy::default();
        assert_eq!(policy.egg_path(), "nests/5/eggs/15");

        let custom = ProvisionPolicy {
            nest_id: 2,
            egg_id: 7,
            ..ProvisionPolicy::default()
        };
        assert_eq!(custom.egg_path(), "nests/2/eggs/7");
    }

    #[test]
    fn test_policy_defaults() {
        let policy = ProvisionPolicy::default();
        assert_eq!(policy.location_id, 1);
        assert_eq!(policy.io_weight, 500);
        assert_eq!(policy.swap_mb, 0);
        assert_eq!(policy.default_cpu_percent, 100);
        assert_eq!(
            (policy.databases, policy.backups, policy.allocations),
            (5, 5, 5)
        );
        assert_eq!(
            policy.environment.get("CMD_RUN").map(String::as_str),
            Some("npm start")
        );
    }
}
