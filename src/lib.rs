//! Statelex - 状态函数驱动的词法分析引擎
//!
//! 调用方用一组手写的状态函数描述具体语言的词法，引擎负责：
//! 带单步回退的字符读取、位置追踪、token 发布，以及在生产者线程上
//! 驱动状态机并按顺序把 token 交给消费者。
//!
//! # Architecture
//!
//! ```text
//! statelex-config/  - 纯配置数据结构
//! src/
//! ├── api/          - 对外接口（文本/读取器 → token）
//! └── core/
//!     ├── config    - 全局配置单例
//!     ├── logger    - tracing 初始化
//!     └── kit/lexer - 扫描引擎
//! ```
//!
//! # Quick Start
//!
//! ```
//! use statelex::{Engine, Lexer, StateFn, TokenType};
//!
//! const WORD: TokenType = TokenType(0);
//!
//! fn is_space(c: char) -> bool {
//!     matches!(c, ' ' | '\t' | '\r' | '\n')
//! }
//!
//! fn lex_space(lex: &mut dyn Lexer) -> Option<StateFn> {
//!     while lex.next().is_some_and(is_space) {}
//!     lex.backup();
//!     lex.ignore();
//!     Some(StateFn::new(lex_word))
//! }
//!
//! fn lex_word(lex: &mut dyn Lexer) -> Option<StateFn> {
//!     loop {
//!         match lex.peek() {
//!             Some(c) if is_space(c) => {
//!                 lex.emit(WORD);
//!                 return Some(StateFn::new(lex_space));
//!             }
//!             None => {
//!                 lex.emit(WORD);
//!                 return None;
//!             }
//!             Some(_) => {
//!                 lex.next();
//!             }
//!         }
//!     }
//! }
//!
//! let stream = Engine::from_text("  foo bar").run(StateFn::new(lex_space)).unwrap();
//! let words: Vec<String> = stream.map(|t| t.text).collect();
//! assert_eq!(words, ["foo", "bar"]);
//! ```

// 核心层
pub mod core;

// API 层（对外接口）
pub mod api;

// 重导出常用类型
pub use api::{collect, lex, lex_reader, lex_stream};
pub use crate::core::kit::lexer::{
    CancelToken, CharSource, Engine, Extra, Lexer, Position, ReaderSource, ScanError, StateFn,
    StrSource, Token, TokenStream, TokenType,
};
pub use crate::core::{
    config::init as init_config, logger::init_logger, logger::LogFormat, Config, LogConfig,
    LogLevel, Phase, ScanConfig,
};

/// 初始化配置和日志系统
///
/// # Panics
/// 配置已初始化或全局日志订阅者已存在时 panic
///
/// # Example
/// ```ignore
/// use statelex::{init_with_logger, Config, LogFormat};
///
/// init_with_logger(Config::default(), LogFormat::Compact);
/// ```
pub fn init_with_logger(config: Config, format: LogFormat) {
    crate::core::config::init(config);
    crate::core::logger::init_with_format(format);
}
