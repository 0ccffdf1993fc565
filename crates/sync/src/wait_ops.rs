//! 会话锁的睡眠/唤醒钩子
//!
//! 会话锁可能跨系统调用被长期持有，等待者不能一直自旋。宿主内核用自己的等待队列
//! 实现 [`WaitOps`] 并通过 [`register_wait_ops`] 注册，等待者因此被调度出去。

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 宿主提供的等待队列操作
pub trait WaitOps: Send + Sync {
    /// `locked` 仍为 true 时让当前任务睡眠，直到在同一把锁上被唤醒
    ///
    /// 实现必须在等待队列自身的锁内重新检查 `locked`，否则会丢失唤醒。
    /// 允许虚假返回，调用者会重试。
    fn wait_while_locked(&self, locked: &AtomicBool);

    /// 唤醒一个在 `locked` 上睡眠的任务
    fn wake_one(&self, locked: &AtomicBool);
}

static WAIT_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static WAIT_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册等待队列实现
///
/// # Safety
/// 必须在任何会话锁发生竞争之前调用，且只能调用一次
pub unsafe fn register_wait_ops(ops: &'static dyn WaitOps) {
    let ptr = ops as *const dyn WaitOps;
    // SAFETY: fat pointer 的布局是 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn WaitOps, (usize, usize)>(ptr) };
    WAIT_OPS_VTABLE.store(vtable, Ordering::Release);
    WAIT_OPS_DATA.store(data, Ordering::Release);
}

/// 获取等待队列实现
pub(crate) fn wait_ops() -> &'static dyn WaitOps {
    let data = WAIT_OPS_DATA.load(Ordering::Acquire);
    let vtable = WAIT_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        #[cfg(test)]
        {
            return &tests::SPIN_WAIT_OPS;
        }
        #[cfg(not(test))]
        panic!("sync: WaitOps not registered, call register_wait_ops first");
    }
    // SAFETY: data 和 vtable 是通过 register_wait_ops 设置的有效指针
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn WaitOps>((data, vtable)) }
}
