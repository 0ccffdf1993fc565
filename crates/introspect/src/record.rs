//! 端点输出的记录类型
//!
//! 这些结构体是格式化器的输入，每次读取时由提供者现场生成，不做缓存。

use alloc::string::String;
use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// 内存区域标志（与 Linux `vm_flags` 低位一致）
    ///
    /// 提供者可能带来未列出的位，格式化时按原值输出。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VmFlags: u64 {
        const READ = 0x0000_0001;
        const WRITE = 0x0000_0002;
        const EXEC = 0x0000_0004;
        const SHARED = 0x0000_0008;
        const MAYREAD = 0x0000_0010;
        const MAYWRITE = 0x0000_0020;
        const MAYEXEC = 0x0000_0040;
        const MAYSHARE = 0x0000_0080;
        const GROWSDOWN = 0x0000_0100;
        const PFNMAP = 0x0000_0400;
        const LOCKED = 0x0000_2000;
        const IO = 0x0000_4000;
        const DONTEXPAND = 0x0004_0000;
        const ACCOUNT = 0x0010_0000;
        const HUGETLB = 0x0040_0000;
    }
}

/// 进程虚拟地址空间中的一个连续区域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    /// 起始地址
    pub start: usize,
    /// 结束地址（不含）
    pub end: usize,
    /// 区域标志
    pub flags: VmFlags,
    /// 以页为单位的文件偏移
    pub pgoff: usize,
    /// 映射的文件名，匿名映射为 None
    pub file: Option<String>,
}

impl MemoryRegion {
    /// 创建匿名映射区域
    pub fn anonymous(start: usize, end: usize, flags: VmFlags) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            end,
            flags,
            pgoff: 0,
            file: None,
        }
    }

    /// 创建文件映射区域
    pub fn file_backed(
        start: usize,
        end: usize,
        flags: VmFlags,
        pgoff: usize,
        file: impl Into<String>,
    ) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            end,
            flags,
            pgoff,
            file: Some(file.into()),
        }
    }

    /// 区域长度（字节）
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// 是否为空区域
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

bitflags! {
    /// 网络设备接口标志（`IFF_*`）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IffFlags: u32 {
        const UP = 0x1;
        const BROADCAST = 0x2;
        const DEBUG = 0x4;
        const LOOPBACK = 0x8;
        const POINTOPOINT = 0x10;
        const NOTRAILERS = 0x20;
        const RUNNING = 0x40;
        const NOARP = 0x80;
        const PROMISC = 0x100;
        const ALLMULTI = 0x200;
        const MASTER = 0x400;
        const SLAVE = 0x800;
        const MULTICAST = 0x1000;
    }
}

bitflags! {
    /// 网络设备链路状态位（`__LINK_STATE_*` 对应的掩码）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LinkState: u64 {
        const START = 1 << 0;
        const PRESENT = 1 << 1;
        const NOCARRIER = 1 << 2;
        const LINKWATCH_PENDING = 1 << 3;
        const DORMANT = 1 << 4;
        const TESTING = 1 << 5;
    }
}

/// 以太网硬件地址，按 `aa:bb:cc:dd:ee:ff` 形式显示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// 全 1 广播地址
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

/// `ARPHRD_*` 链路类型
pub mod link_type {
    /// 以太网
    pub const ETHER: u16 = 1;
    /// 回环
    pub const LOOPBACK: u16 = 772;
}

/// 网络设备注册表中一台设备的快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetDeviceRecord {
    /// 接口名
    pub name: String,
    /// 共享内存起始地址
    pub mem_start: usize,
    /// 共享内存结束地址
    pub mem_end: usize,
    /// I/O 基地址
    pub base_addr: usize,
    /// 中断号
    pub irq: i32,
    /// 链路状态位
    pub state: LinkState,
    /// 硬件地址
    pub dev_addr: MacAddr,
    /// 广播地址
    pub broadcast: MacAddr,
    /// 接口标志
    pub flags: IffFlags,
    /// 当前 MTU
    pub mtu: u32,
    /// 允许的最小 MTU
    pub min_mtu: u32,
    /// 允许的最大 MTU
    pub max_mtu: u32,
    /// 链路类型（`ARPHRD_*`）
    pub link_type: u16,
    /// 最小链路层头长度
    pub min_header_len: u8,
    /// 名字来源（`NET_NAME_*`）
    pub name_assign_type: u8,
    /// 设备组
    pub group: i32,
    /// 额外预留的头部空间
    pub needed_headroom: u16,
    /// 额外预留的尾部空间
    pub needed_tailroom: u16,
}

impl NetDeviceRecord {
    /// 以太网设备的常见默认值
    pub fn ethernet(name: impl Into<String>, dev_addr: MacAddr) -> Self {
        Self {
            name: name.into(),
            mem_start: 0,
            mem_end: 0,
            base_addr: 0,
            irq: 0,
            state: LinkState::PRESENT | LinkState::START,
            dev_addr,
            broadcast: MacAddr::BROADCAST,
            flags: IffFlags::UP | IffFlags::BROADCAST | IffFlags::RUNNING | IffFlags::MULTICAST,
            mtu: 1500,
            min_mtu: 68,
            max_mtu: 65535,
            link_type: link_type::ETHER,
            min_header_len: 14,
            name_assign_type: 0,
            group: 0,
            needed_headroom: 0,
            needed_tailroom: 0,
        }
    }

    /// 回环设备
    pub fn loopback() -> Self {
        Self {
            name: "lo".into(),
            mem_start: 0,
            mem_end: 0,
            base_addr: 0,
            irq: 0,
            state: LinkState::PRESENT | LinkState::START,
            dev_addr: MacAddr::default(),
            broadcast: MacAddr::default(),
            flags: IffFlags::UP | IffFlags::LOOPBACK | IffFlags::RUNNING,
            mtu: 65536,
            min_mtu: 0,
            max_mtu: 0,
            link_type: link_type::LOOPBACK,
            min_header_len: 0,
            name_assign_type: 0,
            group: 0,
            needed_headroom: 0,
            needed_tailroom: 0,
        }
    }
}
