//! NetDev 端点
//!
//! 只读：持注册表读锁遍历全部网络设备，每台设备输出一个描述块。

use alloc::sync::Arc;
use core::ops::ControlFlow;

use sync::ArcSessionGuard;

use crate::buffer::{Response, ResponseBuffer};
use crate::config::IntrospectConfig;
use crate::error::{IntrospectError, Result};
use crate::format::write_net_device;
use crate::ops::NetDeviceRegistry;
use crate::session::{DegradedFlag, OneShot, SessionSlot};

struct NetDevInner {
    slot: SessionSlot<OneShot>,
    devices: Arc<dyn NetDeviceRegistry>,
    config: IntrospectConfig,
    degraded: DegradedFlag,
}

/// NetDev 端点
#[derive(Clone)]
pub struct NetDevEndpoint {
    inner: Arc<NetDevInner>,
}

impl NetDevEndpoint {
    /// 创建端点；会话锁在此创建，此后不再重建
    pub fn new(
        devices: Arc<dyn NetDeviceRegistry>,
        config: IntrospectConfig,
        degraded: DegradedFlag,
    ) -> Self {
        Self {
            inner: Arc::new(NetDevInner {
                slot: SessionSlot::new(),
                devices,
                config,
                degraded,
            }),
        }
    }

    /// 打开会话，阻塞直到上一个会话关闭
    pub fn open(&self) -> NetDevSession {
        let state = self.inner.slot.open();
        log::debug!("introspect: netdev session opened");
        NetDevSession {
            inner: self.inner.clone(),
            state,
        }
    }

    /// 当前是否有会话打开
    pub fn is_open(&self) -> bool {
        self.inner.slot.is_open()
    }
}

/// 一个打开的 NetDev 会话；drop 即关闭
pub struct NetDevSession {
    inner: Arc<NetDevInner>,
    state: ArcSessionGuard<OneShot>,
}

impl NetDevSession {
    /// 读取网络设备注册表
    ///
    /// 注册表为空或降级模式下返回哨兵；每个会话只能调用一次。
    pub fn fetch(&mut self) -> Result<Response> {
        if self.state.read {
            log::warn!("introspect: netdev read twice in one session");
            return Err(IntrospectError::ProtocolViolation);
        }
        self.state.read = true;

        if self.inner.degraded.is_set() {
            log::warn!("introspect: degraded mode, returning sentinel");
            return Ok(Response::degraded());
        }

        log::info!("introspect: trying to get network devices");
        let mut buf = ResponseBuffer::new(self.inner.config.response_capacity);
        let mut count = 0usize;
        self.inner.devices.walk(&mut |dev| {
            if write_net_device(&mut buf, dev).is_err() {
                return ControlFlow::Break(());
            }
            count += 1;
            ControlFlow::Continue(())
        });

        if buf.overflowed() {
            log::warn!(
                "introspect: network devices exceed {} bytes after {} entries",
                buf.capacity(),
                count
            );
            return Err(IntrospectError::ResponseTooLarge);
        }
        if count == 0 {
            log::warn!("introspect: device registry is empty");
            return Ok(Response::lookup_failed());
        }
        Ok(Response::data(buf.into_string()))
    }
}

impl Drop for NetDevSession {
    fn drop(&mut self) {
        log::debug!("introspect: netdev session closed");
    }
}
