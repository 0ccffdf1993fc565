//! 内省端点的用户态接口
//!
//! 目录与文件名、缓冲区大小以及错误哨兵文本。内核侧 `introspect` crate
//! 和 `client` 都从这里取值。

/// debugfs 下的目录名
pub const DEBUGFS_DIR_NAME: &str = "introspect";

/// 默认的 debugfs 挂载点
pub const DEBUGFS_MOUNT_POINT: &str = "/sys/kernel/debug";

/// 读取内存区域列表的文件名
pub const VMA_FILE_NAME: &str = "vma";

/// 写入目标 PID 的文件名
pub const VMA_ARG_FILE_NAME: &str = "vma_arg";

/// 读取网络设备列表的文件名
pub const NETDEV_FILE_NAME: &str = "netdev";

/// 单次响应的最大字节数
///
/// 每行内存区域描述约 80 字节，128 KiB 可容纳约 1500 个区域。
pub const BUFFER_SIZE: usize = 128 * 1024;

/// `vma_arg` 单次写入的最大字节数
pub const ARG_BUFFER_SIZE: usize = 1024;

/// 查询失败时代替真实数据返回的文本
///
/// 读取本身仍然成功；调用方只能通过比较文本识别它。
pub const SENTINEL: &str = "introspect: requested data is unavailable\n";

/// 匿名映射在 `mapped file` 字段中的占位文本
pub const ANON_MAPPING: &str = "[ anon ]";
