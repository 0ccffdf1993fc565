//! debugfs 节点层
//!
//! 把三个节点的 open/read/write/release 映射到两种端点的会话上，
//! 并负责启动时的节点注册与退出时的清理。
//!
//! | 节点 | 端点 | 操作 |
//! |------|------|------|
//! | `vma` | VMA | read |
//! | `vma_arg` | VMA | write |
//! | `netdev` | NetDev | read |

use alloc::sync::Arc;

use uapi::introspect::{NETDEV_FILE_NAME, VMA_ARG_FILE_NAME, VMA_FILE_NAME};

use crate::buffer::Response;
use crate::config::IntrospectConfig;
use crate::error::{IntrospectError, Result};
use crate::netdev::{NetDevEndpoint, NetDevSession};
use crate::ops::{NetDeviceRegistry, NodeRegistrar, ProcessTable};
use crate::session::DegradedFlag;
use crate::vma::{VmaEndpoint, VmaSession};

/// debugfs 节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// 内存区域列表
    Vma,
    /// 目标 PID
    VmaArg,
    /// 网络设备列表
    NetDev,
}

impl Node {
    /// 注册顺序
    pub const ALL: [Node; 3] = [Node::Vma, Node::VmaArg, Node::NetDev];

    /// 文件名
    pub fn name(self) -> &'static str {
        match self {
            Node::Vma => VMA_FILE_NAME,
            Node::VmaArg => VMA_ARG_FILE_NAME,
            Node::NetDev => NETDEV_FILE_NAME,
        }
    }

    /// 权限位
    pub fn mode(self) -> u32 {
        match self {
            Node::Vma | Node::NetDev => 0o444,
            Node::VmaArg => 0o222,
        }
    }

    /// 按文件名查找节点
    pub fn from_name(name: &str) -> Option<Node> {
        Node::ALL.into_iter().find(|n| n.name() == name)
    }
}

/// 内省服务：两个端点加降级标志
pub struct Introspect {
    config: IntrospectConfig,
    degraded: DegradedFlag,
    vma: VmaEndpoint,
    netdev: NetDevEndpoint,
}

impl Introspect {
    /// 用给定的提供者创建服务
    pub fn new(
        config: IntrospectConfig,
        processes: Arc<dyn ProcessTable>,
        devices: Arc<dyn NetDeviceRegistry>,
    ) -> Self {
        let degraded = DegradedFlag::new();
        Self {
            vma: VmaEndpoint::new(processes, config, degraded.clone()),
            netdev: NetDevEndpoint::new(devices, config, degraded.clone()),
            config,
            degraded,
        }
    }

    /// 创建 debugfs 目录和节点
    ///
    /// 任一步失败都会置位降级标志；已创建的节点保持可用，但所有读取只返回哨兵。
    pub fn init(&self, registrar: &dyn NodeRegistrar) -> Result<()> {
        log::info!("introspect: initializing debugfs endpoints");
        let dir = self.config.dir_name;
        let result = registrar.create_dir(dir).and_then(|()| {
            Node::ALL
                .into_iter()
                .try_for_each(|node| registrar.create_file(dir, node, node.mode()))
        });

        match result {
            Ok(()) => {
                log::info!("introspect: debugfs endpoints ready under {}", dir);
                Ok(())
            }
            Err(err) => {
                log::error!("introspect: cannot create debugfs entries: {}", err);
                self.degraded.set();
                Err(IntrospectError::RegistrationFailed)
            }
        }
    }

    /// 删除节点和目录
    pub fn exit(&self, registrar: &dyn NodeRegistrar) {
        let dir = self.config.dir_name;
        for node in Node::ALL {
            registrar.remove_file(dir, node);
        }
        registrar.remove_dir(dir);
        log::info!("introspect: debugfs endpoints removed");
    }

    /// 打开节点；同一端点已有会话时阻塞
    pub fn open(&self, node: Node) -> OpenFile {
        let session = match node {
            Node::Vma => NodeSession::Vma(self.vma.open_staged()),
            Node::VmaArg => NodeSession::VmaArg(self.vma.open_arg()),
            Node::NetDev => NodeSession::NetDev(self.netdev.open()),
        };
        OpenFile { session }
    }

    /// VMA 端点
    pub fn vma(&self) -> &VmaEndpoint {
        &self.vma
    }

    /// NetDev 端点
    pub fn netdev(&self) -> &NetDevEndpoint {
        &self.netdev
    }

    /// 是否处于降级模式
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_set()
    }

    /// 当前配置
    pub fn config(&self) -> &IntrospectConfig {
        &self.config
    }
}

enum NodeSession {
    Vma(VmaSession),
    VmaArg(VmaSession),
    NetDev(NetDevSession),
}

/// 打开的节点；drop 即 release
pub struct OpenFile {
    session: NodeSession,
}

impl OpenFile {
    /// 所属节点
    pub fn node(&self) -> Node {
        match self.session {
            NodeSession::Vma(_) => Node::Vma,
            NodeSession::VmaArg(_) => Node::VmaArg,
            NodeSession::NetDev(_) => Node::NetDev,
        }
    }

    /// 读取整个响应
    ///
    /// 只有偏移为 0 的第一次读取会生成响应；`buf` 必须放得下全部内容，
    /// 否则读取失败且本会话的读取机会已用掉。
    pub fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<usize> {
        if offset > 0 {
            return Err(IntrospectError::ProtocolViolation);
        }
        let response = self.fetch()?;
        copy_out(&response, buf)
    }

    /// 获取响应（带状态）；与 [`OpenFile::read`] 共用本会话唯一一次读取
    pub fn fetch(&mut self) -> Result<Response> {
        match &mut self.session {
            NodeSession::Vma(s) => s.fetch(),
            NodeSession::NetDev(s) => s.fetch(),
            NodeSession::VmaArg(_) => Err(IntrospectError::NotSupported),
        }
    }

    /// 写入目标 PID，只有 `vma_arg` 支持
    pub fn write(&mut self, offset: usize, buf: &[u8]) -> Result<usize> {
        let NodeSession::VmaArg(session) = &mut self.session else {
            return Err(IntrospectError::NotSupported);
        };
        if offset > 0 {
            return Err(IntrospectError::ProtocolViolation);
        }
        let consumed = session.set_target(buf)?;
        session.stage_target();
        Ok(consumed)
    }

    /// 显式关闭，等价于 drop
    pub fn release(self) {}
}

fn copy_out(response: &Response, buf: &mut [u8]) -> Result<usize> {
    let bytes = response.as_bytes();
    let Some(dst) = buf.get_mut(..bytes.len()) else {
        log::warn!(
            "introspect: read buffer of {} bytes cannot hold {} byte response",
            buf.len(),
            bytes.len()
        );
        return Err(IntrospectError::BufferTooSmall);
    };
    dst.copy_from_slice(bytes);
    Ok(bytes.len())
}
