//! 测试支持 crate
//!
//! 提供 Mock 实现和测试工具

#![no_std]

pub mod mock;

use core::sync::atomic::{AtomicUsize, Ordering};

// 0 = uninit, 1 = initializing, 2 = ready
static SYNC_INIT: AtomicUsize = AtomicUsize::new(0);

/// 向 `sync` 注册全局 [`mock::arch::MOCK_ARCH_OPS`] 和 [`mock::wait::MOCK_WAIT_OPS`]
///
/// 可在每个测试开头调用；只有第一次调用会真正注册，并发调用者等待注册完成。
pub fn init_sync_arch_ops() {
    match SYNC_INIT.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {
            // SAFETY: 只有赢得 CAS 的调用者执行注册
            unsafe {
                sync::register_arch_ops(&mock::arch::MOCK_ARCH_OPS);
                sync::register_wait_ops(&mock::wait::MOCK_WAIT_OPS);
            }
            SYNC_INIT.store(2, Ordering::Release);
        }
        Err(_) => {
            while SYNC_INIT.load(Ordering::Acquire) != 2 {
                core::hint::spin_loop();
            }
        }
    }
}
