//! 字符源抽象
//!
//! 引擎只依赖 [`CharSource`]：一个顺序产出字符的来源。
//! 提供两种实现：
//! - [`StrSource`]：内存中的文本
//! - [`ReaderSource`]：任意 `io::Read`，增量 UTF-8 解码

use std::io::{self, BufRead, BufReader, Read};

use tracing::warn;

/// 日志目标
pub const SOURCE_TARGET: &str = "statelex::source";

/// Unicode替换字符（用于解码错误恢复）
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// 顺序字符源
///
/// - `Ok(Some(c))`：下一个字符
/// - `Ok(None)`：正常结束
/// - `Err(e)`：读取失败，由引擎转换为错误 token
pub trait CharSource: Send {
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }
}

/// 内存文本字符源
#[derive(Debug, Clone)]
pub struct StrSource {
    text: String,
    cursor: usize,
}

impl StrSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }
}

impl CharSource for StrSource {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let next = self.text[self.cursor..].chars().next();
        if let Some(c) = next {
            self.cursor += c.len_utf8();
        }
        Ok(next)
    }
}

/// 基于 `io::Read` 的字符源
///
/// 非法 UTF-8 不视为读取失败：记录警告并产出替换字符
pub struct ReaderSource<R> {
    reader: BufReader<R>,
    /// 解码多字节序列时读多的一个字节
    pending: Option<u8>,
    /// 已读取的字节数（仅用于日志）
    bytes_read: usize,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: None,
            bytes_read: 0,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            self.bytes_read += 1;
            return Ok(Some(byte));
        }
        let byte = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                // EINTR 不是失败
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if byte.is_some() {
            self.reader.consume(1);
            self.bytes_read += 1;
        }
        Ok(byte)
    }
}

impl<R: Read + Send> CharSource for ReaderSource<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };

        let Some(len) = utf8_sequence_length(lead) else {
            warn!(
                target: SOURCE_TARGET,
                byte_offset = self.bytes_read - 1,
                "Invalid UTF-8 lead byte: 0x{:02X}",
                lead
            );
            return Ok(Some(REPLACEMENT_CHAR));
        };

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(len).skip(1) {
            match self.read_byte()? {
                Some(byte) if is_continuation(byte) => *slot = byte,
                Some(byte) => {
                    // 非续字节留给下一次解码
                    self.pending = Some(byte);
                    self.bytes_read -= 1;
                    warn!(
                        target: SOURCE_TARGET,
                        byte_offset = self.bytes_read,
                        "Invalid UTF-8 continuation byte: 0x{:02X}",
                        byte
                    );
                    return Ok(Some(REPLACEMENT_CHAR));
                }
                None => {
                    warn!(
                        target: SOURCE_TARGET,
                        byte_offset = self.bytes_read,
                        "Incomplete UTF-8 sequence at EOF: expected {} bytes",
                        len
                    );
                    return Ok(Some(REPLACEMENT_CHAR));
                }
            }
        }

        match std::str::from_utf8(&bytes[..len]) {
            Ok(s) => Ok(s.chars().next()),
            Err(e) => {
                warn!(
                    target: SOURCE_TARGET,
                    byte_offset = self.bytes_read - len,
                    "UTF-8 decode error for bytes {:02X?}: {}",
                    &bytes[..len],
                    e
                );
                Ok(Some(REPLACEMENT_CHAR))
            }
        }
    }
}

/// 获取UTF-8序列长度
fn utf8_sequence_length(lead_byte: u8) -> Option<usize> {
    match lead_byte {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None, // 续字节或超出范围
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
