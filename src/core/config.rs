//! 全局配置系统
//!
//! 提供线程安全的全局配置单例。配置数据结构本身定义在
//! `statelex-config` 中，这里只负责保存和把日志级别映射到 `tracing`。
//!
//! # 使用示例
//! ```
//! use statelex::core::config::{self, Config};
//!
//! let mut cfg = Config::default();
//! cfg.scan.channel_capacity = 32;
//!
//! config::init(cfg);
//! assert_eq!(config::config().scan.channel_capacity, 32);
//! ```

use once_cell::sync::OnceCell;
use tracing::Level;

pub use statelex_config::{Config, LogConfig, LogLevel, Phase, ScanConfig};

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

/// 初始化全局配置（只能调用一次）
///
/// # Panics
/// 如果配置已经初始化，会 panic
pub fn init(config: Config) {
    GLOBAL_CONFIG
        .set(config)
        .expect("Config already initialized");
}

/// 尝试初始化全局配置，已初始化时原样返回传入的配置
pub fn try_init(config: Config) -> Result<(), Config> {
    GLOBAL_CONFIG.set(config)
}

/// 获取全局配置引用
///
/// # Panics
/// 如果配置未初始化，会 panic
pub fn config() -> &'static Config {
    GLOBAL_CONFIG.get().expect("Config not initialized")
}

/// 检查配置是否已初始化
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

/// 当前配置的副本；未初始化时返回默认配置
pub fn current() -> Config {
    snapshot(&GLOBAL_CONFIG)
}

fn snapshot(cell: &OnceCell<Config>) -> Config {
    cell.get().cloned().unwrap_or_default()
}

/// 映射为 `tracing` 的级别
pub fn tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// 指定阶段的实际 `tracing` 级别
pub fn level_for(log: &LogConfig, phase: Phase) -> Level {
    tracing_level(log.level_for(phase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_falls_back_to_default() {
        let cell = OnceCell::new();
        assert_eq!(snapshot(&cell), Config::default());

        let mut cfg = Config::default();
        cfg.scan.channel_capacity = 8;
        cell.set(cfg.clone()).unwrap();
        assert_eq!(snapshot(&cell), cfg);
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(tracing_level(LogLevel::Trace), Level::TRACE);
        assert_eq!(tracing_level(LogLevel::Warn), Level::WARN);
        assert_eq!(tracing_level(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_level_for_phase() {
        let log = LogConfig {
            global: LogLevel::Warn,
            driver: Some(LogLevel::Debug),
            ..Default::default()
        };
        assert_eq!(level_for(&log, Phase::Driver), Level::DEBUG);
        assert_eq!(level_for(&log, Phase::Source), Level::WARN);
    }
}
