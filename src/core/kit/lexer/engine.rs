//! 扫描引擎
//!
//! 状态函数只看到 [`Lexer`] 这组能力（next/peek/backup/emit/ignore/errorf
//! 以及位置访问），具体的读取和存储由 [`Engine`] 实现。
//!
//! # 示例
//!
//! ```
//! use statelex::{Engine, Lexer, StateFn, TokenType};
//!
//! const WORD: TokenType = TokenType(0);
//!
//! fn lex_word(lex: &mut dyn Lexer) -> Option<StateFn> {
//!     while lex.next().is_some() {}
//!     lex.backup();
//!     lex.emit(WORD);
//!     None
//! }
//!
//! let tokens = Engine::from_text("hello").tokenize(StateFn::new(lex_word));
//! assert_eq!(tokens[0].text, "hello");
//! ```

use std::fmt;
use std::mem;
use std::sync::mpsc::SyncSender;

use statelex_config::ScanConfig;
use tracing::{debug, error, trace};

use super::backtrack::{BacktrackSource, Fetched};
use super::driver::CancelToken;
use super::error::ScanError;
use super::position::Position;
use super::source::{CharSource, ReaderSource, StrSource};
use super::token::{Extra, Token, TokenType};
use crate::core::config;

/// 日志目标
pub const ENGINE_TARGET: &str = "statelex::engine";

/// 状态函数
///
/// 消费字符后返回下一个状态，返回 `None` 表示自然结束。
/// 普通函数和捕获变量的闭包都可以包装成 `StateFn`。
pub struct StateFn(Box<dyn FnOnce(&mut dyn Lexer) -> Option<StateFn> + Send>);

impl StateFn {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut dyn Lexer) -> Option<StateFn> + Send + 'static,
    {
        StateFn(Box::new(f))
    }

    pub(crate) fn call(self, lexer: &mut dyn Lexer) -> Option<StateFn> {
        (self.0)(lexer)
    }
}

impl fmt::Debug for StateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateFn")
    }
}

/// 状态函数可用的扫描能力
pub trait Lexer {
    /// 消费下一个字符；`None` 表示输入结束（之后每次都返回 `None`）
    fn next(&mut self) -> Option<char>;

    /// 撤销最近一次 `next`，出错时返回 [`ScanError::NothingToBackup`]
    fn try_backup(&mut self) -> Result<(), ScanError>;

    /// 打包扫描缓冲区为 token 并发布
    fn emit_extra(&mut self, kind: TokenType, extra: Option<Extra>);

    /// 丢弃扫描缓冲区，不发布任何内容
    fn ignore(&mut self);

    /// 在当前位置发布错误 token 并终止状态机
    fn errorf(&mut self, kind: TokenType, args: fmt::Arguments<'_>) -> Option<StateFn>;

    /// 当前位置
    fn position(&self) -> Position;

    /// 当前扫描缓冲区的内容
    fn value(&self) -> &str;

    /// 查看下一个字符但不消费
    fn peek(&mut self) -> Option<char> {
        let c = self.next();
        self.backup();
        c
    }

    /// 撤销最近一次 `next`
    ///
    /// # Panics
    /// 没有可撤销的字符时 panic（契约违规）
    fn backup(&mut self) {
        if let Err(e) = self.try_backup() {
            error!(target: ENGINE_TARGET, position = %self.position(), "{}", e);
            panic!("{}", e);
        }
    }

    fn emit(&mut self, kind: TokenType) {
        self.emit_extra(kind, None);
    }

    fn line(&self) -> usize {
        self.position().line
    }

    fn column(&self) -> usize {
        self.position().column
    }

    fn offset(&self) -> usize {
        self.position().offset
    }
}

/// 最近一次 `next` 的撤销记录
#[derive(Debug, Clone, Copy)]
struct Undo {
    /// `None` 表示那次读取到了结束
    ch: Option<char>,
    before: Position,
}

/// token 的去向
pub(super) enum Outbox {
    /// 同线程运行：按顺序收集
    Local(Vec<Token>),
    /// 生产者线程：阻塞交付给消费者
    Channel(SyncSender<Token>),
}

/// 扫描引擎
///
/// 一次扫描会话独占：字符源、扫描缓冲区、位置和 token 出口
pub struct Engine<S> {
    source: BacktrackSource<S>,
    buffer: String,
    pos: Position,
    token_start: Position,
    undo: Option<Undo>,
    pub(super) eof: bool,
    /// 已发布错误 token
    pub(super) halted: bool,
    pub(super) cancel: CancelToken,
    pub(super) outbox: Outbox,
    pub(super) config: ScanConfig,
}

impl<S: CharSource> Engine<S> {
    /// 使用全局配置创建引擎
    pub fn new(source: S) -> Self {
        Self::with_config(source, config::current().scan)
    }

    pub fn with_config(source: S, config: ScanConfig) -> Self {
        trace!(
            target: ENGINE_TARGET,
            capacity = config.channel_capacity,
            "Creating new Engine"
        );
        Self {
            source: BacktrackSource::new(source),
            buffer: String::new(),
            pos: Position::start(),
            token_start: Position::start(),
            undo: None,
            eof: false,
            halted: false,
            cancel: CancelToken::new(),
            outbox: Outbox::Local(Vec::new()),
            config,
        }
    }

    /// 指定 token 通道容量（0 为同步交接）
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        let mut scan = config::current().scan;
        scan.channel_capacity = capacity;
        Self::with_config(source, scan)
    }

    /// 取消令牌，可在运行前交给其他线程
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn publish(&mut self, token: Token) {
        if self.halted || self.cancel.is_cancelled() {
            debug!(target: ENGINE_TARGET, %token, "Dropping token after halt");
            return;
        }
        debug!(target: ENGINE_TARGET, %token, "Publishing token");
        match &mut self.outbox {
            Outbox::Local(tokens) => tokens.push(token),
            Outbox::Channel(sender) => {
                if sender.send(token).is_err() {
                    debug!(target: ENGINE_TARGET, "Consumer disconnected, cancelling");
                    self.cancel.cancel();
                }
            }
        }
    }

    /// 字符源失败：报告一次并停止
    fn fail(&mut self, err: std::io::Error) {
        let token = Token::new(TokenType::ERROR, err.to_string(), self.pos);
        self.publish(token);
        self.halted = true;
        self.eof = true;
    }

    #[cfg(test)]
    pub(super) fn take_published(&mut self) -> Vec<Token> {
        match &mut self.outbox {
            Outbox::Local(tokens) => mem::take(tokens),
            Outbox::Channel(_) => Vec::new(),
        }
    }
}

impl Engine<StrSource> {
    /// 扫描内存文本
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(StrSource::new(text))
    }
}

impl<R: std::io::Read + Send> Engine<ReaderSource<R>> {
    /// 扫描任意 `io::Read`（UTF-8）
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> Lexer for Engine<S> {
    fn next(&mut self) -> Option<char> {
        let before = self.pos;
        let ch = match self.source.read() {
            Fetched::Char(c) => {
                self.pos.advance(c);
                self.buffer.push(c);
                trace!(target: ENGINE_TARGET, ?c, position = %self.pos, "next");
                Some(c)
            }
            Fetched::End => {
                self.eof = true;
                None
            }
            Fetched::Failed(e) => {
                self.fail(e);
                None
            }
        };
        self.undo = Some(Undo { ch, before });
        ch
    }

    fn try_backup(&mut self) -> Result<(), ScanError> {
        let undo = self.undo.take().ok_or(ScanError::NothingToBackup)?;
        if let Some(c) = undo.ch {
            self.buffer.pop();
            self.source.unread(c);
        }
        self.pos = undo.before;
        trace!(target: ENGINE_TARGET, ch = ?undo.ch, position = %self.pos, "backup");
        Ok(())
    }

    fn emit_extra(&mut self, kind: TokenType, extra: Option<Extra>) {
        let token = Token {
            kind,
            text: mem::take(&mut self.buffer),
            position: self.token_start,
            extra,
        };
        self.publish(token);
        self.token_start = self.pos;
        self.undo = None;
    }

    fn ignore(&mut self) {
        debug!(
            target: ENGINE_TARGET,
            text = %self.buffer,
            start = %self.token_start,
            "Ignoring span"
        );
        self.buffer.clear();
        self.token_start = self.pos;
        self.undo = None;
    }

    fn errorf(&mut self, kind: TokenType, args: fmt::Arguments<'_>) -> Option<StateFn> {
        let token = Token::new(kind, args.to_string(), self.pos);
        self.publish(token);
        self.halted = true;
        None
    }

    fn position(&self) -> Position {
        self.pos
    }

    fn value(&self) -> &str {
        &self.buffer
    }
}
