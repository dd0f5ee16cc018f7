//! API 层 - 对外接口
//!
//! 输入 → token，不关心 token 如何被使用。

use std::io::Read;

use tracing::{debug, info, instrument};

use crate::core::kit::lexer::driver::DRIVER_TARGET;
use crate::core::kit::lexer::{Engine, ScanError, StateFn, Token, TokenStream};

/// 在当前线程扫描文本，返回全部 token（包括可能的错误 token）
#[instrument(target = "statelex::driver", skip(source, start), fields(len = source.len()))]
pub fn lex(source: &str, start: StateFn) -> Vec<Token> {
    info!(target: DRIVER_TARGET, "Starting lexer");
    let tokens = Engine::from_text(source).tokenize(start);
    info!(target: DRIVER_TARGET, "Lexer completed: {} tokens", tokens.len());
    tokens
}

/// 在生产者线程扫描文本
///
/// # Errors
/// 无法创建生产者线程时返回 [`ScanError::Spawn`]
pub fn lex_stream(source: &str, start: StateFn) -> Result<TokenStream, ScanError> {
    Engine::from_text(source).run(start)
}

/// 在生产者线程扫描任意 UTF-8 读取器
///
/// 读取失败以错误 token 的形式出现在流中
///
/// # Errors
/// 无法创建生产者线程时返回 [`ScanError::Spawn`]
pub fn lex_reader<R>(reader: R, start: StateFn) -> Result<TokenStream, ScanError>
where
    R: Read + Send + 'static,
{
    Engine::from_reader(reader).run(start)
}

/// 收集 token，遇到错误 token 即停止
///
/// 错误 token 是终止信号：返回 `Err(错误 token)`，之前的 token 被丢弃
pub fn collect<I>(tokens: I) -> Result<Vec<Token>, Token>
where
    I: IntoIterator<Item = Token>,
{
    let mut out = Vec::new();
    for token in tokens {
        if token.is_error() {
            debug!(target: DRIVER_TARGET, %token, "Stopping at error token");
            return Err(token);
        }
        out.push(token);
    }
    Ok(out)
}
