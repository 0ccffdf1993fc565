//! 会话锁
//!
//! 端点会话从 open 持续到 close，跨越多次系统调用，期间可能被调度到其它 CPU，
//! 因此不能像 [`SpinLock`](crate::SpinLock) 那样关中断，也不能让等待者自旋。
//! 竞争时等待者通过 [`WaitOps`](crate::WaitOps) 睡眠，释放者唤醒其中一个。
//! 保护器可以在线程之间转移（`GuardSend`），由 `lock_api` 负责 RAII 与 `Arc` 保护器。

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lock_api::{GuardSend, RawMutex};

use crate::wait_ops::wait_ops;

/// 会话锁的原始实现
///
/// 不可重入：同一调用者重复获取会像其它调用者一样阻塞。不保证公平。
#[derive(Debug)]
pub struct RawSessionLock {
    locked: AtomicBool,
    // 正在 lock() 中等待的任务数，为 0 时 unlock 不调用 wake_one
    waiters: AtomicUsize,
}

// SAFETY: 获取使用 Acquire，释放使用 Release，同一时刻至多一个持有者
unsafe impl RawMutex for RawSessionLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSessionLock {
        locked: AtomicBool::new(false),
        waiters: AtomicUsize::new(0),
    };

    type GuardMarker = GuardSend;

    fn lock(&self) {
        if self.try_lock() {
            return;
        }
        self.waiters.fetch_add(1, Ordering::SeqCst);
        // 与 unlock 的 store/load 构成 SeqCst 配对，避免双方都错过对方
        while self
            .locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            wait_ops().wait_while_locked(&self.locked);
        }
        self.waiters.fetch_sub(1, Ordering::SeqCst);
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
        if self.waiters.load(Ordering::SeqCst) > 0 {
            wait_ops().wake_one(&self.locked);
        }
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// 由会话锁保护的数据
pub type SessionMutex<T> = lock_api::Mutex<RawSessionLock, T>;

/// 持有 `Arc<SessionMutex<T>>` 的保护器，生命周期不受借用约束
pub type ArcSessionGuard<T> = lock_api::ArcMutexGuard<RawSessionLock, T>;

#[cfg(test)]
mod tests {
    extern crate alloc;
    extern crate std;

    use super::*;
    use crate::{WaitOps, register_wait_ops};
    use alloc::sync::Arc;
    use core::sync::atomic::AtomicUsize;
    use std::sync::{Mutex, Once};
    use std::thread;
    use std::time::Duration;
    use std::vec::Vec;

    /// 让出 CPU 的等待实现，记录等待和唤醒过的锁地址
    struct YieldWaitOps {
        waited: Mutex<Vec<usize>>,
        woken: Mutex<Vec<usize>>,
    }

    impl WaitOps for YieldWaitOps {
        fn wait_while_locked(&self, locked: &AtomicBool) {
            self.waited.lock().unwrap().push(locked as *const _ as usize);
            while locked.load(Ordering::Acquire) {
                thread::yield_now();
            }
        }

        fn wake_one(&self, locked: &AtomicBool) {
            self.woken.lock().unwrap().push(locked as *const _ as usize);
        }
    }

    static YIELD_WAIT_OPS: YieldWaitOps = YieldWaitOps {
        waited: Mutex::new(Vec::new()),
        woken: Mutex::new(Vec::new()),
    };

    fn init_wait_ops() {
        static ONCE: Once = Once::new();
        // SAFETY: Once 保证只注册一次
        ONCE.call_once(|| unsafe { register_wait_ops(&YIELD_WAIT_OPS) });
    }

    #[test]
    fn test_contended_lock_sleeps_through_wait_ops() {
        static MUTEX: SessionMutex<u32> = SessionMutex::new(0);
        init_wait_ops();
        // SAFETY: 只读取原始锁的原子字段
        let raw = unsafe { MUTEX.raw() };
        let addr = &raw.locked as *const _ as usize;

        let held = MUTEX.lock();
        let waiter = thread::spawn(|| *MUTEX.lock() += 1);
        while !YIELD_WAIT_OPS.waited.lock().unwrap().contains(&addr) {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(raw.waiters.load(Ordering::SeqCst), 1);

        drop(held);
        waiter.join().unwrap();
        assert!(YIELD_WAIT_OPS.woken.lock().unwrap().contains(&addr));
        assert_eq!(raw.waiters.load(Ordering::SeqCst), 0);
        assert_eq!(*MUTEX.lock(), 1);
    }

    #[test]
    fn test_arc_guard_releases_on_drop() {
        let mutex = Arc::new(SessionMutex::new(0u32));
        let mut guard = mutex.lock_arc();
        *guard += 1;
        assert!(mutex.is_locked());
        assert!(mutex.try_lock().is_none());
        drop(guard);
        assert!(!mutex.is_locked());
        assert_eq!(*mutex.lock(), 1);
    }

    #[test]
    fn test_guard_can_move_between_threads() {
        let mutex = Arc::new(SessionMutex::new(()));
        let guard = mutex.lock_arc();
        thread::spawn(move || drop(guard)).join().unwrap();
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_contended_increments() {
        let mutex = Arc::new(SessionMutex::new(0usize));
        let done = Arc::new(AtomicUsize::new(0));
        let handles: std::vec::Vec<_> = (0..4)
            .map(|_| {
                let mutex = mutex.clone();
                let done = done.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        *mutex.lock_arc() += 1;
                    }
                    done.fetch_add(1, Ordering::Relaxed);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(done.load(Ordering::Relaxed), 4);
        assert_eq!(*mutex.lock(), 4000);
    }
}
