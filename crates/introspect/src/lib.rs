//! # 内省端点 (introspect)
//!
//! 通过 debugfs 下的三个伪文件向用户态导出两类内核状态：
//!
//! - `vma_arg` + `vma`：先写入 PID，再读出该进程的内存区域列表；
//! - `netdev`：读出网络设备注册表。
//!
//! ## 会话约定
//!
//! 每种端点同一时刻只允许一个会话（open 到 close）。会话内至多接受一次写入、
//! 一次读取，多余的调用失败而不是重复或追加。读取要么一次性拿到完整响应，要么失败。
//!
//! 目标不存在、注册表为空、服务处于降级模式时，读取仍然成功，返回
//! [`uapi::introspect::SENTINEL`]；[`Response::status`] 给出机器可读的状态。
//!
//! ## 外部依赖
//!
//! PID 解析、内存区域枚举、设备注册表与节点注册由宿主通过 [`ops`] 中的 trait 提供。

#![no_std]

extern crate alloc;

pub mod buffer;
pub mod config;
pub mod debugfs;
pub mod error;
pub mod format;
pub mod netdev;
pub mod ops;
pub mod record;
pub mod registry;
pub mod session;
pub mod vma;

pub use buffer::{Response, ResponseBuffer, ResponseStatus};
pub use config::IntrospectConfig;
pub use debugfs::{Introspect, Node, OpenFile};
pub use error::{IntrospectError, Result};
pub use netdev::{NetDevEndpoint, NetDevSession};
pub use ops::{NetDeviceRegistry, NodeRegistrar, ProcessTable, TaskInfo};
pub use record::{IffFlags, LinkState, MacAddr, MemoryRegion, NetDeviceRecord, VmFlags};
pub use registry::NetDeviceTable;
pub use session::DegradedFlag;
pub use vma::{VmaEndpoint, VmaSession, parse_pid};
