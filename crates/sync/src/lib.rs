//! 同步原语
//!
//! 向内省端点提供锁和同步原语：
//! - [`SpinLock`] / [`RwLock`]：关中断的短临界区锁，保护会话暂存数据和设备注册表；
//! - [`SessionMutex`]：不关中断、可跨系统调用持有的会话锁。
//!
//! # 架构依赖
//!
//! 此 crate 通过 `ArchOps` trait 抽象中断控制，通过 `WaitOps` trait 让会话锁的
//! 等待者睡眠。使用前必须调用 `register_arch_ops` 和 `register_wait_ops` 注册实现。

#![no_std]

mod intr_guard;
mod raw_spin_lock;
mod rwlock;
mod session_lock;
mod spin_lock;
mod wait_ops;

pub use intr_guard::*;
pub use raw_spin_lock::*;
pub use rwlock::*;
pub use session_lock::*;
pub use spin_lock::*;
pub use wait_ops::{WaitOps, register_wait_ops};

use core::sync::atomic::{AtomicUsize, Ordering};

/// 架构相关操作的 trait
///
/// 由宿主内核实现并注册，提供中断控制
pub trait ArchOps: Send + Sync {
    /// 读取并禁用中断，返回之前的状态
    ///
    /// # Safety
    /// 调用者必须确保在适当的上下文中调用
    unsafe fn read_and_disable_interrupts(&self) -> usize;

    /// 恢复中断状态
    ///
    /// # Safety
    /// flags 必须是之前 read_and_disable_interrupts 返回的值
    unsafe fn restore_interrupts(&self, flags: usize);

    /// 中断使能位在 flags 中的掩码
    fn interrupt_enable_mask(&self) -> usize;
}

/// 全局架构操作实例（存储 fat pointer 的两个部分）
static ARCH_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static ARCH_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册架构操作实现
///
/// # Safety
/// 必须在单线程环境下调用，且只能调用一次
pub unsafe fn register_arch_ops(ops: &'static dyn ArchOps) {
    let ptr = ops as *const dyn ArchOps;
    // SAFETY: fat pointer 的布局是 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn ArchOps, (usize, usize)>(ptr) };
    ARCH_OPS_DATA.store(data, Ordering::Release);
    ARCH_OPS_VTABLE.store(vtable, Ordering::Release);
}

/// 获取架构操作实例
#[inline]
pub(crate) fn arch_ops() -> &'static dyn ArchOps {
    let data = ARCH_OPS_DATA.load(Ordering::Acquire);
    let vtable = ARCH_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        #[cfg(test)]
        {
            return &tests::DUMMY_ARCH_OPS;
        }
        #[cfg(not(test))]
        panic!("sync: ArchOps not registered, call register_arch_ops first");
    }
    // SAFETY: data 和 vtable 是通过 register_arch_ops 设置的有效指针
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn ArchOps>((data, vtable)) }
}

#[cfg(test)]
mod tests {
    use super::ArchOps;

    pub(crate) struct DummyArchOps;

    impl ArchOps for DummyArchOps {
        unsafe fn read_and_disable_interrupts(&self) -> usize {
            0
        }

        unsafe fn restore_interrupts(&self, _flags: usize) {}

        fn interrupt_enable_mask(&self) -> usize {
            0x2
        }
    }

    pub(crate) static DUMMY_ARCH_OPS: DummyArchOps = DummyArchOps;

    #[test]
    fn test_arch_ops_fallback_does_not_panic() {
        let flags = unsafe { super::arch_ops().read_and_disable_interrupts() };
        unsafe { super::arch_ops().restore_interrupts(flags) };
        assert_eq!(super::arch_ops().interrupt_enable_mask(), 0x2);
    }
}
