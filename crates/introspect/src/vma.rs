//! VMA 端点
//!
//! 两阶段协议：先写入目标 PID（`vma_arg`），再读取该进程的内存区域列表（`vma`）。
//! 两个节点属于同一种端点，共用一把会话锁。

use alloc::sync::Arc;

use sync::{ArcSessionGuard, SpinLock};

use crate::buffer::{Response, ResponseBuffer};
use crate::config::IntrospectConfig;
use crate::error::{IntrospectError, Result};
use crate::format::write_region;
use crate::ops::ProcessTable;
use crate::session::{DegradedFlag, OneShot, SessionSlot};

/// VMA 会话状态
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VmaState {
    /// 目标 PID
    pub target: Option<i32>,
    /// 单次读写约定
    pub io: OneShot,
}

struct VmaInner {
    slot: SessionSlot<VmaState>,
    // `vma_arg` 会话写入、下一个 `vma` 会话取走的 PID
    staged: SpinLock<Option<i32>>,
    processes: Arc<dyn ProcessTable>,
    config: IntrospectConfig,
    degraded: DegradedFlag,
}

/// VMA 端点
#[derive(Clone)]
pub struct VmaEndpoint {
    inner: Arc<VmaInner>,
}

impl VmaEndpoint {
    /// 创建端点；会话锁在此创建，此后不再重建
    pub fn new(
        processes: Arc<dyn ProcessTable>,
        config: IntrospectConfig,
        degraded: DegradedFlag,
    ) -> Self {
        Self {
            inner: Arc::new(VmaInner {
                slot: SessionSlot::new(),
                staged: SpinLock::new(None),
                processes,
                config,
                degraded,
            }),
        }
    }

    /// 打开会话，阻塞直到上一个会话关闭
    pub fn open(&self) -> VmaSession {
        let state = self.inner.slot.open();
        log::debug!("introspect: vma session opened");
        VmaSession {
            inner: self.inner.clone(),
            state,
        }
    }

    /// 为 `vma_arg` 打开会话，并丢弃之前暂存的目标
    ///
    /// 本次写入失败时，下一个 `vma` 会话表现得如同从未写入过目标。
    pub(crate) fn open_arg(&self) -> VmaSession {
        let session = self.open();
        *self.inner.staged.lock() = None;
        session
    }

    /// 打开会话并接管 `vma_arg` 暂存的目标
    pub(crate) fn open_staged(&self) -> VmaSession {
        let mut session = self.open();
        session.state.target = self.inner.staged.lock().take();
        session
    }

    /// 当前是否有会话打开
    pub fn is_open(&self) -> bool {
        self.inner.slot.is_open()
    }
}

/// 一个打开的 VMA 会话；drop 即关闭
pub struct VmaSession {
    inner: Arc<VmaInner>,
    state: ArcSessionGuard<VmaState>,
}

impl VmaSession {
    /// 设置目标进程
    ///
    /// 成功时返回消耗的字节数，即 `payload.len()`。失败时不保存任何内容，
    /// 也不占用本会话唯一的一次写入机会。
    pub fn set_target(&mut self, payload: &[u8]) -> Result<usize> {
        if self.state.io.written {
            log::warn!("introspect: vma_arg written twice in one session");
            return Err(IntrospectError::ProtocolViolation);
        }
        if payload.len() > self.inner.config.arg_capacity {
            log::warn!(
                "introspect: vma_arg payload of {} bytes exceeds {}",
                payload.len(),
                self.inner.config.arg_capacity
            );
            return Err(IntrospectError::InputTooLarge);
        }
        let pid = parse_pid(payload).inspect_err(|_| {
            log::warn!("introspect: PID is not decimal");
        })?;

        self.state.target = Some(pid);
        self.state.io.written = true;
        log::info!("introspect: target PID set to {}", pid);
        Ok(payload.len())
    }

    /// 当前目标
    pub fn target(&self) -> Option<i32> {
        self.state.target
    }

    /// 读取目标进程的内存区域列表
    ///
    /// 查找失败或降级模式下返回哨兵；每个会话只能调用一次。
    pub fn fetch(&mut self) -> Result<Response> {
        if self.state.io.read {
            log::warn!("introspect: vma read twice in one session");
            return Err(IntrospectError::ProtocolViolation);
        }
        self.state.io.read = true;

        if self.inner.degraded.is_set() {
            log::warn!("introspect: degraded mode, returning sentinel");
            return Ok(Response::degraded());
        }

        log::info!("introspect: trying to get memory regions");
        let Some(pid) = self.state.target else {
            log::warn!("introspect: no target PID written");
            return Ok(Response::lookup_failed());
        };
        let Some(task) = self.inner.processes.find_task(pid) else {
            log::warn!("introspect: wrong PID {}", pid);
            return Ok(Response::lookup_failed());
        };

        let regions = task.memory_regions();
        if regions.is_empty() {
            log::warn!("introspect: PID {} has no memory regions", pid);
            return Ok(Response::lookup_failed());
        }

        let mut buf = ResponseBuffer::new(self.inner.config.response_capacity);
        for region in &regions {
            if write_region(&mut buf, region).is_err() {
                log::warn!(
                    "introspect: {} regions of PID {} exceed {} bytes",
                    regions.len(),
                    pid,
                    buf.capacity()
                );
                return Err(IntrospectError::ResponseTooLarge);
            }
        }
        Ok(Response::data(buf.into_string()))
    }

    /// 把已写入的目标交给下一个 `vma` 会话
    pub(crate) fn stage_target(&self) {
        if let Some(pid) = self.state.target {
            *self.inner.staged.lock() = Some(pid);
        }
    }
}

impl Drop for VmaSession {
    fn drop(&mut self) {
        log::debug!("introspect: vma session closed");
    }
}

/// 解析十进制有符号整数，允许一个结尾换行
pub fn parse_pid(payload: &[u8]) -> Result<i32> {
    let digits = payload.strip_suffix(b"\n").unwrap_or(payload);
    let text = core::str::from_utf8(digits).map_err(|_| IntrospectError::MalformedInput)?;
    text.parse::<i32>().map_err(|_| IntrospectError::MalformedInput)
}
