//! 扫描错误类型
//!
//! 语法层面的词法错误以错误 token 的形式出现在 token 流中，
//! 这里只包含引擎自身的失败。

use std::io;

/// 扫描引擎错误
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 没有可回退的字符
    #[error("backup called with no character to undo")]
    NothingToBackup,

    /// 生产者线程创建失败
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),

    /// 线程名包含 NUL 字节
    #[error("invalid scanner thread name {0:?}: contains a NUL byte")]
    InvalidThreadName(String),

    /// 生产者线程 panic
    #[error("scanner thread panicked: {0}")]
    ProducerPanicked(String),
}

impl ScanError {
    /// 从 `JoinHandle::join` 的 panic 负载中提取消息
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        ScanError::ProducerPanicked(message)
    }
}
