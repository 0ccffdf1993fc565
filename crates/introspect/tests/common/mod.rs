//! 集成测试共用的假提供者

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use introspect::{
    Introspect, IntrospectConfig, IntrospectError, MemoryRegion, NetDeviceTable, Node,
    NodeRegistrar, ProcessTable, TaskInfo, VmFlags,
};

/// 固定内存区域列表的进程
pub struct FakeTask {
    pub regions: Vec<MemoryRegion>,
}

impl TaskInfo for FakeTask {
    fn memory_regions(&self) -> Vec<MemoryRegion> {
        self.regions.clone()
    }
}

/// 以 PID 为键的进程表
#[derive(Default)]
pub struct FakeProcessTable {
    tasks: HashMap<i32, Arc<FakeTask>>,
}

impl FakeProcessTable {
    pub fn with_task(mut self, pid: i32, regions: Vec<MemoryRegion>) -> Self {
        self.tasks.insert(pid, Arc::new(FakeTask { regions }));
        self
    }
}

impl ProcessTable for FakeProcessTable {
    fn find_task(&self, pid: i32) -> Option<Arc<dyn TaskInfo>> {
        self.tasks
            .get(&pid)
            .map(|t| Arc::clone(t) as Arc<dyn TaskInfo>)
    }
}

/// 进程 1234 的两个区域
pub fn sample_regions() -> Vec<MemoryRegion> {
    vec![
        MemoryRegion::anonymous(0x1000, 0x2000, VmFlags::from_bits_retain(5)),
        MemoryRegion::file_backed(0x5000, 0x6000, VmFlags::from_bits_retain(3), 2, "libc.so"),
    ]
}

/// 记录调用序列，可在指定步骤失败的注册器
#[derive(Default)]
pub struct FakeRegistrar {
    pub fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRegistrar {
    pub fn failing_on(name: &'static str) -> Self {
        Self {
            fail_on: Some(name),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String, name: &str) -> Result<(), IntrospectError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(name) {
            Err(IntrospectError::RegistrationFailed)
        } else {
            Ok(())
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl NodeRegistrar for FakeRegistrar {
    fn create_dir(&self, name: &str) -> Result<(), IntrospectError> {
        self.record(format!("mkdir {name}"), name)
    }

    fn create_file(&self, dir: &str, node: Node, mode: u32) -> Result<(), IntrospectError> {
        self.record(format!("create {dir}/{} {mode:o}", node.name()), node.name())
    }

    fn remove_file(&self, dir: &str, node: Node) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("remove {dir}/{}", node.name()));
    }

    fn remove_dir(&self, name: &str) {
        self.calls.lock().unwrap().push(format!("rmdir {name}"));
    }
}

/// 含进程 1234 的服务与它的设备注册表
pub fn service(devices: Arc<NetDeviceTable>) -> Introspect {
    service_with(IntrospectConfig::default(), devices)
}

pub fn service_with(config: IntrospectConfig, devices: Arc<NetDeviceTable>) -> Introspect {
    test_support::init_sync_arch_ops();
    let processes = FakeProcessTable::default()
        .with_task(1234, sample_regions())
        .with_task(2, Vec::new());
    Introspect::new(config, Arc::new(processes), devices)
}

pub fn empty_devices() -> Arc<NetDeviceTable> {
    test_support::init_sync_arch_ops();
    Arc::new(NetDeviceTable::new())
}

/// 读取一个节点的全部内容
pub fn read_node(svc: &Introspect, node: Node) -> Result<String, IntrospectError> {
    let mut file = svc.open(node);
    let mut buf = vec![0u8; svc.config().response_capacity];
    let n = file.read(0, &mut buf)?;
    Ok(String::from_utf8(buf[..n].to_vec()).expect("utf8 response"))
}
