//! 测试辅助工具
//!
//! 一个最小的词法：跳过空白，把连续的非空白字符作为一个单词

#![allow(dead_code)]

use std::io::{self, Read};
use std::sync::mpsc::Sender;

use statelex::{CharSource, Lexer, StateFn, Token, TokenType};

pub const WORD: TokenType = TokenType(0);

pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// 跳过连续空白
pub fn lex_skip_spaces(lex: &mut dyn Lexer) -> Option<StateFn> {
    while lex.next().is_some_and(is_space) {}
    lex.backup();
    lex.ignore();
    Some(StateFn::new(lex_word))
}

/// 读取一个单词
pub fn lex_word(lex: &mut dyn Lexer) -> Option<StateFn> {
    loop {
        match lex.peek() {
            Some(c) if is_space(c) => {
                lex.emit(WORD);
                return Some(StateFn::new(lex_skip_spaces));
            }
            None => {
                lex.emit(WORD);
                return None;
            }
            Some(_) => {
                lex.next();
            }
        }
    }
}

pub fn start() -> StateFn {
    StateFn::new(lex_skip_spaces)
}

/// (text, line, column, offset)
pub fn summary(token: &Token) -> (String, usize, usize, usize) {
    (token.text.clone(), token.line(), token.column(), token.offset())
}

/// 先返回给定数据，之后每次读取都失败
pub struct BrokenReader {
    data: Option<Vec<u8>>,
}

impl BrokenReader {
    pub fn new(data: &str) -> Self {
        Self {
            data: Some(data.as_bytes().to_vec()),
        }
    }
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            None => Err(io::Error::other("broken")),
        }
    }
}

/// 无限产出 "a a a ..."，被丢弃时发出通知
pub struct EndlessWords {
    space: bool,
    dropped: Sender<()>,
}

impl EndlessWords {
    pub fn new(dropped: Sender<()>) -> Self {
        Self {
            space: false,
            dropped,
        }
    }
}

impl CharSource for EndlessWords {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let c = if self.space { ' ' } else { 'a' };
        self.space = !self.space;
        Ok(Some(c))
    }
}

impl Drop for EndlessWords {
    fn drop(&mut self) {
        let _ = self.dropped.send(());
    }
}
