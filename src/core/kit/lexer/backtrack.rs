//! 可回退字符源
//!
//! 在 [`CharSource`] 之上加一个单字符回退槽，并锁存结束/失败状态：
//! 结束之后每次读取都返回 [`Fetched::End`]，失败只报告一次。

use std::io;

use tracing::{trace, warn};

use super::source::{CharSource, SOURCE_TARGET};

/// 一次读取的结果
#[derive(Debug)]
pub enum Fetched {
    Char(char),
    End,
    /// 底层失败（仅出现一次，之后均为 `End`）
    Failed(io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Exhausted,
    Failed,
}

/// 带单字符回退的字符源
pub struct BacktrackSource<S> {
    source: S,
    unread: Option<char>,
    state: State,
}

impl<S: CharSource> BacktrackSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            unread: None,
            state: State::Open,
        }
    }

    /// 读取下一个字符，优先返回回退槽中的字符
    pub fn read(&mut self) -> Fetched {
        if let Some(c) = self.unread.take() {
            return Fetched::Char(c);
        }
        if self.state != State::Open {
            return Fetched::End;
        }
        match self.source.read_char() {
            Ok(Some(c)) => Fetched::Char(c),
            Ok(None) => {
                trace!(target: SOURCE_TARGET, "Source exhausted");
                self.state = State::Exhausted;
                Fetched::End
            }
            Err(e) => {
                warn!(target: SOURCE_TARGET, error = %e, "Source read failed");
                self.state = State::Failed;
                Fetched::Failed(e)
            }
        }
    }

    /// 把字符放回回退槽
    ///
    /// 槽中已有字符说明调用方连续回退了两次，属于契约违规
    pub fn unread(&mut self, c: char) {
        debug_assert!(self.unread.is_none(), "unread slot already occupied");
        self.unread = Some(c);
    }
}
