//! 架构相关操作的 Mock 实现

use core::sync::atomic::{AtomicUsize, Ordering};

use sync::ArchOps;

const SIE: usize = 0x2;

/// Mock 架构操作
///
/// 主机测试是多线程的，这里不模拟真实的中断开关，只统计关中断次数。
pub struct MockArchOps {
    pub disable_count: AtomicUsize,
}

impl MockArchOps {
    pub const fn new() -> Self {
        Self {
            disable_count: AtomicUsize::new(0),
        }
    }
}

impl ArchOps for MockArchOps {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        self.disable_count.fetch_add(1, Ordering::Relaxed);
        SIE
    }

    unsafe fn restore_interrupts(&self, _flags: usize) {}

    fn interrupt_enable_mask(&self) -> usize {
        SIE
    }
}

/// 全局 Mock 实例
pub static MOCK_ARCH_OPS: MockArchOps = MockArchOps::new();
