//! 内核网络设备注册表
//!
//! 驱动在探测/移除时修改注册表（写锁），NetDev 端点遍历时只取读锁。

use alloc::vec::Vec;
use core::ops::ControlFlow;

use sync::RwLock;

use crate::ops::NetDeviceRegistry;
use crate::record::NetDeviceRecord;

/// 按注册顺序保存网络设备
#[derive(Default)]
pub struct NetDeviceTable {
    devices: RwLock<Vec<NetDeviceRecord>>,
}

impl NetDeviceTable {
    /// 创建空注册表
    pub const fn new() -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
        }
    }

    /// 追加设备；同名设备已存在时返回 false
    pub fn register(&self, dev: NetDeviceRecord) -> bool {
        let mut devices = self.devices.write();
        if devices.iter().any(|d| d.name == dev.name) {
            log::warn!("introspect: net device {} already registered", dev.name);
            return false;
        }
        devices.push(dev);
        true
    }

    /// 按名字移除设备，返回被移除的记录
    pub fn unregister(&self, name: &str) -> Option<NetDeviceRecord> {
        let mut devices = self.devices.write();
        let idx = devices.iter().position(|d| d.name == name)?;
        Some(devices.remove(idx))
    }

    /// 设备数量
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// 是否没有设备
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NetDeviceRegistry for NetDeviceTable {
    fn walk(&self, visit: &mut dyn FnMut(&NetDeviceRecord) -> ControlFlow<()>) {
        let devices = self.devices.read();
        for dev in devices.iter() {
            if visit(dev).is_break() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MacAddr;
    use alloc::string::String;

    fn names(table: &NetDeviceTable) -> Vec<String> {
        let mut out = Vec::new();
        table.walk(&mut |d| {
            out.push(d.name.clone());
            ControlFlow::Continue(())
        });
        out
    }

    #[test]
    fn test_register_keeps_order_and_rejects_duplicates() {
        test_support::init_sync_arch_ops();
        let table = NetDeviceTable::new();
        assert!(table.register(NetDeviceRecord::loopback()));
        assert!(table.register(NetDeviceRecord::ethernet("eth0", MacAddr([2, 0, 0, 0, 0, 1]))));
        assert!(!table.register(NetDeviceRecord::loopback()));
        assert_eq!(names(&table), ["lo", "eth0"]);
    }

    #[test]
    fn test_unregister() {
        test_support::init_sync_arch_ops();
        let table = NetDeviceTable::new();
        table.register(NetDeviceRecord::loopback());
        table.register(NetDeviceRecord::ethernet("eth0", MacAddr::default()));
        assert_eq!(table.unregister("lo").map(|d| d.name), Some(String::from("lo")));
        assert!(table.unregister("lo").is_none());
        assert_eq!(names(&table), ["eth0"]);
    }

    #[test]
    fn test_walk_stops_on_break() {
        test_support::init_sync_arch_ops();
        let table = NetDeviceTable::new();
        table.register(NetDeviceRecord::ethernet("eth0", MacAddr::default()));
        table.register(NetDeviceRecord::ethernet("eth1", MacAddr::default()));
        let mut seen = 0;
        table.walk(&mut |_| {
            seen += 1;
            ControlFlow::Break(())
        });
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_walk_holds_read_lock() {
        test_support::init_sync_arch_ops();
        let table = NetDeviceTable::new();
        table.register(NetDeviceRecord::loopback());
        table.walk(&mut |_| {
            assert_eq!(table.devices.reader_count(), 1);
            assert!(!table.devices.is_write_locked());
            ControlFlow::Continue(())
        });
        assert_eq!(table.devices.reader_count(), 0);
    }
}
