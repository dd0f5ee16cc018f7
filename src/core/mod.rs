//! Core - 扫描引擎与配套设施
//!
//! 引擎本身只操作内存数据结构和调用方提供的字符源，
//! 配置与日志初始化也放在这里。

pub mod config;
pub mod kit;
pub mod logger;

// 重导出常用类型
pub use config::{Config, LogConfig, LogLevel, Phase, ScanConfig};
