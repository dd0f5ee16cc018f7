//! Statelex Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary between the scanning
//! engine and whoever embeds it.

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,
    /// Scan session configuration
    pub scan: ScanConfig,
}

impl Config {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Log verbosity, independent of any logging backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Global default level
    pub global: LogLevel,
    /// Character source level (None falls back to global)
    pub source: Option<LogLevel>,
    /// Engine level
    pub engine: Option<LogLevel>,
    /// Driver level
    pub driver: Option<LogLevel>,
}

impl LogConfig {
    /// Effective level for a phase
    pub fn level_for(&self, phase: Phase) -> LogLevel {
        let specific = match phase {
            Phase::Source => self.source,
            Phase::Engine => self.engine,
            Phase::Driver => self.driver,
        };
        specific.unwrap_or(self.global)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: LogLevel::Info,
            source: None,
            engine: None,
            driver: None,
        }
    }
}

/// Configuration of one scan session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Capacity of the token channel; 0 means rendezvous handoff
    pub channel_capacity: usize,
    /// Name given to the producer thread
    pub thread_name: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 0,
            thread_name: "statelex-scanner".to_string(),
        }
    }
}

/// Scanning phase enum for phase-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Source,
    Engine,
    Driver,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Source => "source",
            Phase::Engine => "engine",
            Phase::Driver => "driver",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("statelex::{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scan_config() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.channel_capacity, 0);
        assert_eq!(cfg.thread_name, "statelex-scanner");
    }

    #[test]
    fn test_level_for_falls_back_to_global() {
        let cfg = LogConfig {
            global: LogLevel::Warn,
            engine: Some(LogLevel::Trace),
            ..Default::default()
        };
        assert_eq!(cfg.level_for(Phase::Engine), LogLevel::Trace);
        assert_eq!(cfg.level_for(Phase::Driver), LogLevel::Warn);
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Source.as_str(), "source");
        assert_eq!(Phase::Driver.target(), "statelex::driver");
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = Config::from_json(r#"{"scan": {"channel_capacity": 16}, "log": {"engine": "debug"}}"#)
            .unwrap();
        assert_eq!(cfg.scan.channel_capacity, 16);
        assert_eq!(cfg.scan.thread_name, "statelex-scanner");
        assert_eq!(cfg.log.global, LogLevel::Info);
        assert_eq!(cfg.log.engine, Some(LogLevel::Debug));
    }

    #[test]
    fn test_from_json_rejects_unknown_level() {
        assert!(Config::from_json(r#"{"log": {"global": "loud"}}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = Config::default();
        let json = cfg.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), cfg);
    }
}
