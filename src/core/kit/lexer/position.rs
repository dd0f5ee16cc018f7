//! 源代码位置追踪
//!
//! 所有坐标均为 0-based：
//! - line: 已消费的换行符个数
//! - column: 自上一个换行符（或起点）以来的字符数
//! - offset: 已消费的字符数（Unicode 码点，不是字节）

use std::fmt;

/// 源代码位置
///
/// 值语义：`Copy` 即快照，快照之间没有共享状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    /// 行号，0-based
    pub line: usize,
    /// 列号，0-based，Unicode码点计数
    pub column: usize,
    /// 字符偏移，0-based
    pub offset: usize,
}

impl Position {
    /// 创建新位置
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// 输入起始位置
    pub fn start() -> Self {
        Self::default()
    }

    /// 前进一个字符
    pub fn advance(&mut self, c: char) {
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.line, self.column, self.offset)
    }
}
