//! Configuration surface
//!
//! One stanza: the serial link parameters, the per-tick backlog bound,
//! and the sensor map. Loaded from TOML or built in code.

use crate::core::enricher::SensorMap;
use crate::core::transport::SerialConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XdrConfig {
    /// Maximum backlog the enricher processes per tick; older entries are
    /// discarded first.
    pub max_packets: usize,
    /// Serial link parameters.
    pub serial: SerialConfig,
    /// Observation name to expected transducer type code. An empty map
    /// means no reading is ever applied.
    pub sensor_map: SensorMap,
}

impl Default for XdrConfig {
    fn default() -> Self {
        Self {
            max_packets: 5,
            serial: SerialConfig::default(),
            sensor_map: SensorMap::new(),
        }
    }
}

/// Configuration load/save errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid TOML for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value could not be serialized.
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl XdrConfig {
    /// Loads from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves as pretty-printed TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = XdrConfig::default();
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.timeout_secs, 5);
        assert_eq!(config.max_packets, 5);
        assert!(config.sensor_map.is_empty());
    }

    #[test]
    fn test_parse_stanza() {
        let config: XdrConfig = toml::from_str(
            r#"
            max_packets = 3

            [serial]
            port = "/dev/ttyUSB1"
            baud_rate = 4800

            [sensor_map]
            outTemp = "C"
            barometer = "P"
            "#,
        )
        .unwrap();

        assert_eq!(config.serial.port, "/dev/ttyUSB1");
        assert_eq!(config.serial.baud_rate, 4800);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.serial.timeout_secs, 5);
        assert_eq!(config.max_packets, 3);
        assert_eq!(config.sensor_map.get("outTemp").unwrap(), "C");
        assert_eq!(config.sensor_map.get("barometer").unwrap(), "P");
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = XdrConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.max_packets, 5);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xdrlink.toml");

        let mut config = XdrConfig::default();
        config.serial = SerialConfig::new("/dev/ttyUSB0", 4800).timeout_secs(2);
        config.max_packets = 10;
        config
            .sensor_map
            .insert("outTemp".to_string(), "C".to_string());
        config.save(&path).unwrap();

        let loaded = XdrConfig::load(&path).unwrap();
        assert_eq!(loaded.serial.port, "/dev/ttyUSB0");
        assert_eq!(loaded.serial.baud_rate, 4800);
        assert_eq!(loaded.serial.timeout_secs, 2);
        assert_eq!(loaded.max_packets, 10);
        assert_eq!(loaded.sensor_map.get("outTemp").unwrap(), "C");
    }
}
