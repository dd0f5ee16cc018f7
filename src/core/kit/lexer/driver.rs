//! 状态机驱动
//!
//! 反复调用当前状态函数，直到：
//! - 状态函数返回 `None`
//! - 字符源已到结尾
//! - 已发布错误 token
//! - 收到取消请求
//!
//! 两种运行方式：[`Engine::run`] 在生产者线程上运行并通过有界通道
//! 交付 token；[`Engine::tokenize`] 在当前线程运行并收集全部 token。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, debug_span, trace};

use super::engine::{Engine, Outbox, StateFn};
use super::error::ScanError;
use super::source::CharSource;
use super::token::Token;

/// 日志目标
pub const DRIVER_TARGET: &str = "statelex::driver";

/// 协作式取消令牌
///
/// 驱动在每次状态转移之间检查，引擎在发布 token 前检查
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl<S: CharSource> Engine<S> {
    /// 在当前线程运行状态机，按发布顺序返回所有 token
    pub fn tokenize(mut self, start: StateFn) -> Vec<Token> {
        self.drive(start);
        match self.outbox {
            Outbox::Local(tokens) => tokens,
            Outbox::Channel(_) => Vec::new(),
        }
    }

    fn drive(&mut self, start: StateFn) {
        let _span = debug_span!(target: DRIVER_TARGET, "scan").entered();
        let mut state = Some(start);
        let mut steps = 0usize;

        while let Some(current) = state.take() {
            if self.eof || self.halted || self.cancel.is_cancelled() {
                break;
            }
            trace!(target: DRIVER_TARGET, step = steps, "Entering state");
            state = current.call(self);
            steps += 1;
        }

        debug!(
            target: DRIVER_TARGET,
            steps,
            eof = self.eof,
            halted = self.halted,
            cancelled = self.cancel.is_cancelled(),
            "State machine finished"
        );
    }
}

impl<S: CharSource + 'static> Engine<S> {
    /// 在生产者线程上运行状态机
    ///
    /// 返回的 [`TokenStream`] 是消费端；通道容量取自 [`ScanConfig`]，
    /// 为 0 时每个 token 都要等消费者取走才继续扫描。
    ///
    /// [`ScanConfig`]: statelex_config::ScanConfig
    pub fn run(mut self, start: StateFn) -> Result<TokenStream, ScanError> {
        // std 在线程名含 NUL 时直接 panic
        if self.config.thread_name.contains('\0') {
            return Err(ScanError::InvalidThreadName(self.config.thread_name.clone()));
        }
        let (sender, receiver) = mpsc::sync_channel(self.config.channel_capacity);
        self.outbox = Outbox::Channel(sender);
        let cancel = self.cancel.clone();
        let name = self.config.thread_name.clone();

        debug!(
            target: DRIVER_TARGET,
            thread = %name,
            capacity = self.config.channel_capacity,
            "Spawning scanner thread"
        );
        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || {
                let mut engine = self;
                engine.drive(start);
                // engine 在此被丢弃，发送端随之关闭
            })
            .map_err(ScanError::Spawn)?;

        Ok(TokenStream {
            receiver,
            cancel,
            handle: Some(handle),
        })
    }
}

/// token 流（消费端）
///
/// 按发布顺序产出 token；关闭后不再产出。
/// 丢弃时会请求取消并断开通道，阻塞在发送上的生产者随之退出。
pub struct TokenStream {
    receiver: Receiver<Token>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl TokenStream {
    /// 请求停止扫描；之后 `next` 返回 `None`
    ///
    /// 丢弃通道中剩余的 token，返回时生产者已不再阻塞在发送上
    pub fn cancel(&self) {
        debug!(target: DRIVER_TARGET, "Cancellation requested by consumer");
        self.cancel.cancel();
        self.drain();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 丢弃剩余 token 并等待生产者线程结束
    ///
    /// 生产者 panic（例如 backup 契约违规）时返回
    /// [`ScanError::ProducerPanicked`]
    pub fn join(mut self) -> Result<(), ScanError> {
        self.drain();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(ScanError::from_panic),
            None => Ok(()),
        }
    }

    fn drain(&self) {
        let mut discarded = 0usize;
        while self.receiver.recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(target: DRIVER_TARGET, discarded, "Discarded unread tokens");
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.cancel.is_cancelled() {
            // 让生产者从阻塞的发送中返回
            self.drain();
            return None;
        }
        self.receiver.recv().ok()
    }
}

impl Drop for TokenStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
