//! 日志系统初始化
//!
//! 基于 `tracing` 和 `tracing-subscriber` 实现分阶段日志控制。
//!
//! # 使用示例
//! ```ignore
//! use statelex::core::config::{self, Config};
//! use statelex::core::logger::init_logger;
//!
//! config::init(Config::default());
//! init_logger();
//! ```

use std::io;
use std::path::Path;

use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::core::config::{self, Phase};

/// 日志输出格式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    #[default]
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 初始化日志系统
///
/// 读取全局配置（未初始化时使用默认配置）
pub fn init_logger() {
    init_with_format(LogFormat::default());
}

/// 使用指定格式初始化日志系统
pub fn init_with_format(format: LogFormat) {
    let targets = build_targets();
    let stdout_layer = create_format_layer(format, io::stdout).with_filter(targets);
    tracing_subscriber::registry().with(stdout_layer).init();
}

/// 同时输出到控制台和文件
///
/// # Errors
/// 日志文件无法打开时返回错误
pub fn init_with_file<P: AsRef<Path>>(format: LogFormat, path: P) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let targets = build_targets();

    // 控制台层
    let stdout_layer = create_format_layer(format, io::stdout).with_filter(targets.clone());

    // 文件层
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .with_filter(targets);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();
    Ok(())
}

/// 构建各阶段的目标过滤器
fn build_targets() -> Targets {
    let cfg = config::current().log;
    Targets::new()
        .with_default(config::tracing_level(cfg.global))
        .with_target(Phase::Source.target(), config::level_for(&cfg, Phase::Source))
        .with_target(Phase::Engine.target(), config::level_for(&cfg, Phase::Engine))
        .with_target(Phase::Driver.target(), config::level_for(&cfg, Phase::Driver))
}

/// 根据格式创建 formatter layer
fn create_format_layer<W, F>(
    format: LogFormat,
    make_writer: F,
) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
    }
}

/// 为当前测试初始化简单日志（仅打印到控制台）
#[cfg(test)]
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
