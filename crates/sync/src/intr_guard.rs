//! 中断保护器
//!
//! 创建时关闭本地中断，销毁时恢复。只阻止本地 CPU 上的中断重入，
//! 跨 CPU 的互斥仍由外层的自旋锁负责。

use crate::arch_ops;

/// 中断保护器，基于 RAII 实现中断保护。
///
/// ```ignore
/// {
///     let _guard = IntrGuard::new(); // 关中断
///     // 遍历设备注册表
/// } // 恢复中断状态
/// ```
pub struct IntrGuard {
    flags: usize,
}

impl IntrGuard {
    /// 关闭中断并保存之前的状态。
    pub fn new() -> Self {
        // SAFETY: 保存的 flags 只会在 drop 时原样恢复
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };
        IntrGuard { flags }
    }

    /// 进入临界区前中断是否处于开启状态。
    pub fn was_enabled(&self) -> bool {
        self.flags & arch_ops().interrupt_enable_mask() != 0
    }
}

impl Default for IntrGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntrGuard {
    fn drop(&mut self) {
        // SAFETY: flags 来自 new() 中的 read_and_disable_interrupts
        unsafe { arch_ops().restore_interrupts(self.flags) };
    }
}
