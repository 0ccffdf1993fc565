//! 记录格式化器
//!
//! 把单条记录写成固定格式的文本。模板永远是字面量，记录中的字符串
//! （文件名、接口名）只作为参数传入。

use core::fmt::{self, Write};

use uapi::introspect::ANON_MAPPING;

use crate::record::{MemoryRegion, NetDeviceRecord};

/// 写出一行内存区域描述
///
/// `<start> - <end>, flags = <flags>, pgoff = <pgoff>, mapped file: <file>`
pub fn write_region(out: &mut impl Write, region: &MemoryRegion) -> fmt::Result {
    let file = region.file.as_deref().unwrap_or(ANON_MAPPING);
    writeln!(
        out,
        "{:#x} - {:#x}, flags = {}, pgoff = {}, mapped file: {}",
        region.start,
        region.end,
        region.flags.bits(),
        region.pgoff,
        file
    )
}

/// 写出一台网络设备的描述块
pub fn write_net_device(out: &mut impl Write, dev: &NetDeviceRecord) -> fmt::Result {
    writeln!(out, "Found network device:")?;
    writeln!(out, "\tname: {}", dev.name)?;
    writeln!(out, "\tmem_start: {:#x}", dev.mem_start)?;
    writeln!(out, "\tmem_end: {:#x}", dev.mem_end)?;
    writeln!(out, "\tbase_addr: {:#x}", dev.base_addr)?;
    writeln!(out, "\tirq: {}", dev.irq)?;
    writeln!(out, "\tstate: {}", dev.state.bits())?;
    writeln!(out, "\tdev_addr: {}", dev.dev_addr)?;
    writeln!(out, "\tbroadcast: {}", dev.broadcast)?;
    writeln!(out, "\tflags: {}", dev.flags.bits())?;
    writeln!(out, "\tmtu: {}", dev.mtu)?;
    writeln!(out, "\tmin_mtu: {}", dev.min_mtu)?;
    writeln!(out, "\tmax_mtu: {}", dev.max_mtu)?;
    writeln!(out, "\ttype: {}", dev.link_type)?;
    writeln!(out, "\tmin_header_len: {}", dev.min_header_len)?;
    writeln!(out, "\tname_assign_type: {}", dev.name_assign_type)?;
    writeln!(out, "\tgroup: {}", dev.group)?;
    writeln!(out, "\tneeded_headroom: {}", dev.needed_headroom)?;
    writeln!(out, "\tneeded_tailroom: {}", dev.needed_tailroom)
}

/// 设备描述块的行数（标题行加字段行）
pub const NET_DEVICE_BLOCK_LINES: usize = 19;
