//! 会话生命周期
//!
//! 每种端点拥有一把 [`SessionMutex`]，在端点构造时创建且只创建一次。
//! `open` 阻塞直到上一个会话关闭，然后把会话状态重置为初始值；
//! 会话对象被 drop 即为 close。

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use sync::{ArcSessionGuard, SessionMutex};

/// 一种端点的会话锁及其会话状态
pub struct SessionSlot<S> {
    mutex: Arc<SessionMutex<S>>,
}

impl<S: Default> SessionSlot<S> {
    /// 创建会话锁
    pub fn new() -> Self {
        Self {
            mutex: Arc::new(SessionMutex::new(S::default())),
        }
    }

    /// 开始一个会话：阻塞直到没有其它会话，然后重置状态
    pub fn open(&self) -> ArcSessionGuard<S> {
        let mut guard = self.mutex.lock_arc();
        *guard = S::default();
        guard
    }

    /// 不阻塞地尝试开始会话
    pub fn try_open(&self) -> Option<ArcSessionGuard<S>> {
        let mut guard = self.mutex.try_lock_arc()?;
        *guard = S::default();
        Some(guard)
    }

    /// 当前是否有会话打开
    pub fn is_open(&self) -> bool {
        self.mutex.is_locked()
    }
}

impl<S: Default> Default for SessionSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// 单次读写约定的通用状态
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneShot {
    /// 已接受过一次写入
    pub written: bool,
    /// 已进行过一次读取
    pub read: bool,
}

/// 降级模式标志
///
/// 启动时注册失败则置位，此后所有读取都返回哨兵；只能通过重建服务清除。
#[derive(Debug, Clone, Default)]
pub struct DegradedFlag(Arc<AtomicBool>);

impl DegradedFlag {
    /// 创建未置位的标志
    pub fn new() -> Self {
        Self::default()
    }

    /// 置位
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// 是否已置位
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
