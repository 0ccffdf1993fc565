//! 等待队列操作的 Mock 实现

use core::hint;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sync::WaitOps;

/// Mock 等待队列
///
/// 主机测试由操作系统线程调度，这里以忙等代替睡眠，只统计等待和唤醒次数。
pub struct MockWaitOps {
    pub waits: AtomicUsize,
    pub wakes: AtomicUsize,
}

impl MockWaitOps {
    pub const fn new() -> Self {
        Self {
            waits: AtomicUsize::new(0),
            wakes: AtomicUsize::new(0),
        }
    }
}

impl WaitOps for MockWaitOps {
    fn wait_while_locked(&self, locked: &AtomicBool) {
        self.waits.fetch_add(1, Ordering::Relaxed);
        while locked.load(Ordering::Acquire) {
            hint::spin_loop();
        }
    }

    fn wake_one(&self, _locked: &AtomicBool) {
        self.wakes.fetch_add(1, Ordering::Relaxed);
    }
}

/// 全局 Mock 实例
pub static MOCK_WAIT_OPS: MockWaitOps = MockWaitOps::new();
