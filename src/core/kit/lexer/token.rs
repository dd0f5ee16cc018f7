//! Token 结构

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::position::Position;

/// Token 类型标签
///
/// 具体语法自行定义非负常量；负值保留给错误伪 token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenType(pub i32);

impl TokenType {
    /// 引擎使用的错误类型（字符源读取失败）
    pub const ERROR: TokenType = TokenType(-1);

    pub fn is_error(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TokenType {
    fn from(value: i32) -> Self {
        TokenType(value)
    }
}

/// 附加负载（例如已解析的字面量值）
pub type Extra = Arc<dyn Any + Send + Sync>;

/// 扫描器产出的 token
///
/// 不可变；只有 token 会跨越生产者/消费者边界
#[derive(Clone)]
pub struct Token {
    pub kind: TokenType,
    /// 消费的原文；错误 token 为错误消息
    pub text: String,
    /// 起始位置；错误 token 为出错时的当前位置
    pub position: Position,
    pub extra: Option<Extra>,
}

impl Token {
    pub fn new(kind: TokenType, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }

    /// 按具体类型取出附加负载
    pub fn extra<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extra.as_deref().and_then(|e| e.downcast_ref::<T>())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("text", &self.text)
            .field("position", &self.position)
            .field("extra", &self.extra.is_some())
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}({}): token={} {:?}",
            self.position.line, self.position.column, self.position.offset, self.kind, self.text
        )
    }
}
