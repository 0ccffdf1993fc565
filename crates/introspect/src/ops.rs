//! 外部提供者 trait 定义
//!
//! 端点只负责协议与格式化；PID 解析、内存区域枚举、设备注册表遍历和
//! debugfs 节点注册都由宿主内核提供。测试中用假实现替换。

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use crate::debugfs::Node;
use crate::error::IntrospectError;
use crate::record::{MemoryRegion, NetDeviceRecord};

/// 进程表：把数字 PID 翻译为进程句柄
pub trait ProcessTable: Send + Sync {
    /// 查找存活的进程，找不到时返回 None
    ///
    /// PID 按用户写入的有符号值原样传入，负数必然找不到。
    fn find_task(&self, pid: i32) -> Option<Arc<dyn TaskInfo>>;
}

/// 进程句柄
pub trait TaskInfo: Send + Sync {
    /// 按进程自身区域链表的顺序返回全部内存区域
    ///
    /// 内核线程没有地址空间，返回空列表。
    fn memory_regions(&self) -> Vec<MemoryRegion>;
}

/// 网络设备注册表
pub trait NetDeviceRegistry: Send + Sync {
    /// 持有注册表读锁，按注册顺序对每台设备调用 `visit`
    ///
    /// `visit` 返回 `Break` 时提前结束遍历。读锁在本方法返回前释放。
    fn walk(&self, visit: &mut dyn FnMut(&NetDeviceRecord) -> ControlFlow<()>);
}

/// debugfs 目录与节点的注册器
pub trait NodeRegistrar {
    /// 创建目录
    fn create_dir(&self, name: &str) -> Result<(), IntrospectError>;

    /// 在目录下创建节点
    fn create_file(&self, dir: &str, node: Node, mode: u32) -> Result<(), IntrospectError>;

    /// 删除节点
    fn remove_file(&self, dir: &str, node: Node);

    /// 删除目录
    fn remove_dir(&self, name: &str);
}
