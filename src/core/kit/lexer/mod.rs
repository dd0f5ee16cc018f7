//! 状态函数驱动的词法分析引擎
//!
//! 设计目标：
//! - 可复用：具体语法由调用方的状态函数实现，引擎只提供扫描能力
//! - 精准位置：行、列、字符偏移，全部 0-based
//! - 单步回退：`peek` 即 `next` + `backup`
//! - 流式：生产者线程扫描，消费者按顺序增量取 token

pub mod backtrack;
pub mod driver;
pub mod engine;
pub mod error;
pub mod position;
pub mod source;
pub mod token;

pub use driver::{CancelToken, TokenStream};
pub use engine::{Engine, Lexer, StateFn};
pub use error::ScanError;
pub use position::Position;
pub use source::{CharSource, ReaderSource, StrSource};
pub use token::{Extra, Token, TokenType};
