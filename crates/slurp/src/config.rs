//! YAML configuration, loaded once at startup.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use slurp_listener::{ListenerConfig, DEFAULT_RELAY_URL};
use slurp_summary::{CmdLineConfig, DockConfig, StockConfig};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub relay: RelayConfig,
    pub metrics: MetricsConfig,
    pub cmd_line: CmdLineConfig,
    pub dock: DockConfig,
    pub stock: StockConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub url: String,
    /// Reconnect when the relay has been silent this long
    pub timeout_secs: u64,
    pub reconnect_delay_secs: u64,
    pub max_reconnect_delay_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RELAY_URL.to_string(),
            timeout_secs: 600,
            reconnect_delay_secs: 5,
            max_reconnect_delay_secs: 300,
        }
    }
}

impl RelayConfig {
    pub fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            recv_timeout: Duration::from_secs(self.timeout_secs),
            reconnect_delay: Duration::from_secs(self.reconnect_delay_secs),
            max_reconnect_delay: Duration::from_secs(self.max_reconnect_delay_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Serve `/healthz` and `/metrics` here; disabled when unset
    pub listen_addr: Option<SocketAddr>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relay.url.trim().is_empty() {
            return Err(ConfigError::Invalid("relay.url must not be empty".to_string()));
        }
        if self.relay.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "relay.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.relay.reconnect_delay_secs > self.relay.max_reconnect_delay_secs {
            return Err(ConfigError::Invalid(format!(
                "relay.reconnect_delay_secs ({}) exceeds relay.max_reconnect_delay_secs ({})",
                self.relay.reconnect_delay_secs, self.relay.max_reconnect_delay_secs
            )));
        }
        if self.stock.max_best == 0 {
            return Err(ConfigError::Invalid(
                "stock.max_best must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn load_str(yaml: &str) -> Result<Config, ConfigError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        Config::load(file.path())
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
relay:
  url: tcp://localhost:9500
  timeout_secs: 60
  reconnect_delay_secs: 1
  max_reconnect_delay_secs: 30
metrics:
  listen_addr: 127.0.0.1:9090
cmd_line:
  print_wait: 3
  station_highlights:
    orbis: "*"
    coriolis: "+"
dock:
  file_path: /data/dockfile.json
  autosave_wait: 7
stock:
  file_path: /data/stockfile.json
  autosave_wait: 50
  max_best: 3
  min_stock: 1000
  min_demand: 10
  acceptable_station_types: [Orbis, Coriolis]
  origin_coords: [-33.0, 12.5, 100.0]
  max_from_origin: 150.0
  max_from_sun: 2500.0
"#;
        let config = load_str(yaml).unwrap();

        assert_eq!(config.relay.url, "tcp://localhost:9500");
        assert_eq!(
            config.relay.listener_config().recv_timeout,
            Duration::from_secs(60)
        );
        assert_eq!(
            config.metrics.listen_addr,
            Some("127.0.0.1:9090".parse().unwrap())
        );
        assert_eq!(config.cmd_line.print_wait, 3);
        assert_eq!(config.cmd_line.station_highlights["orbis"], "*");
        assert_eq!(config.dock.file_path, PathBuf::from("/data/dockfile.json"));
        assert_eq!(config.dock.autosave_wait, 7);
        assert_eq!(config.stock.max_best, 3);
        assert_eq!(config.stock.min_stock, 1000);
        assert_eq!(config.stock.acceptable_station_types, vec!["Orbis", "Coriolis"]);
        assert_eq!(config.stock.origin_coords, [-33.0, 12.5, 100.0]);
        assert_eq!(config.stock.max_from_sun, 2500.0);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = load_str("cmd_line:\n  print_wait: 25\n").unwrap();

        assert_eq!(config.cmd_line.print_wait, 25);
        assert_eq!(config.relay.url, "tcp://eddn.edcd.io:9500");
        assert_eq!(config.relay.timeout_secs, 600);
        assert_eq!(config.metrics.listen_addr, None);
        assert_eq!(config.dock.autosave_wait, 20);
        assert_eq!(config.stock.autosave_wait, 100);
        assert_eq!(config.stock.max_best, 5);
        assert_eq!(config.stock.min_stock, 500);
        assert_eq!(config.stock.min_demand, 1);
        assert_eq!(config.stock.max_from_origin, 500.0);
        assert_eq!(config.stock.max_from_sun, 1000.0);
        assert_eq!(config.stock.acceptable_station_types.len(), 7);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = load_str("stock:\n  max_best: 8\n").unwrap();
        assert_eq!(config.stock.max_best, 8);
        assert_eq!(config.stock.file_path, PathBuf::from("stockfile.json"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Config::load(Path::new("/nonexistent/slurper.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_yaml_is_error() {
        let err = load_str("stock: [not, a, map]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            load_str("relay:\n  timeout_secs: 0\n").unwrap_err(),
            ConfigError::Invalid(_)
        ));
        assert!(matches!(
            load_str("stock:\n  max_best: 0\n").unwrap_err(),
            ConfigError::Invalid(_)
        ));
        assert!(matches!(
            load_str("relay:\n  reconnect_delay_secs: 600\n  max_reconnect_delay_secs: 60\n")
                .unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }
}
