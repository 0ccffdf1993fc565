//! 读写自旋锁
//!
//! 允许多个读者并发，写者独占。读写两侧都关中断。
//! 设备注册表用它实现“遍历期间阻止结构变更、但不阻塞其它读者”。

use core::{
    cell::UnsafeCell,
    hint,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::intr_guard::IntrGuard;

/// 状态字最高位表示写者持有，其余位为读者计数
const WRITER: usize = 1 << (usize::BITS - 1);

/// 读写自旋锁
///
/// 不保证写者不饿死；适用于读多写少且持锁时间短的数据。
#[derive(Debug)]
pub struct RwLock<T> {
    state: AtomicUsize,
    data: UnsafeCell<T>,
}

impl<T> RwLock<T> {
    /// 创建一个新的读写锁
    pub const fn new(data: T) -> Self {
        Self {
            state: AtomicUsize::new(0),
            data: UnsafeCell::new(data),
        }
    }

    /// 获取共享读锁
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        let intr_guard = IntrGuard::new();
        loop {
            let state = self.state.load(Ordering::Relaxed);
            if state & WRITER == 0
                && self
                    .state
                    .compare_exchange_weak(state, state + 1, Ordering::Acquire, Ordering::Relaxed)
                    .is_ok()
            {
                break;
            }
            hint::spin_loop();
        }
        RwLockReadGuard {
            lock: self,
            _intr_guard: intr_guard,
        }
    }

    /// 获取独占写锁
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        let intr_guard = IntrGuard::new();
        while self
            .state
            .compare_exchange_weak(0, WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }
        RwLockWriteGuard {
            lock: self,
            _intr_guard: intr_guard,
        }
    }

    /// 当前读者数量 (仅用于调试/测试)
    pub fn reader_count(&self) -> usize {
        self.state.load(Ordering::Relaxed) & !WRITER
    }

    /// 是否有写者持有 (仅用于调试/测试)
    pub fn is_write_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed) & WRITER != 0
    }
}

impl<T: Default> Default for RwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// 共享读锁保护器
pub struct RwLockReadGuard<'a, T> {
    lock: &'a RwLock<T>,
    _intr_guard: IntrGuard,
}

impl<T> Deref for RwLockReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: 读者计数非零期间没有写者
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for RwLockReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_sub(1, Ordering::Release);
    }
}

/// 独占写锁保护器
pub struct RwLockWriteGuard<'a, T> {
    lock: &'a RwLock<T>,
    _intr_guard: IntrGuard,
}

impl<T> Deref for RwLockWriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: 写者独占
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for RwLockWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: 写者独占
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for RwLockWriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_and(!WRITER, Ordering::Release);
    }
}

// SAFETY: 读者共享 &T，写者独占 &mut T
unsafe impl<T: Send> Send for RwLock<T> {}
unsafe impl<T: Send + Sync> Sync for RwLock<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_share() {
        let lock = RwLock::new(5);
        let a = lock.read();
        let b = lock.read();
        assert_eq!(*a + *b, 10);
        assert_eq!(lock.reader_count(), 2);
        drop(a);
        drop(b);
        assert_eq!(lock.reader_count(), 0);
    }

    #[test]
    fn test_writer_excludes() {
        let lock = RwLock::new(0);
        {
            let mut w = lock.write();
            *w = 7;
            assert!(lock.is_write_locked());
            assert_eq!(lock.reader_count(), 0);
        }
        assert!(!lock.is_write_locked());
        assert_eq!(*lock.read(), 7);
    }
}
