//! Mock 实现模块
//!
//! 提供架构相关操作的 Mock 实现，用于主机上的测试

pub mod arch;
pub mod wait;
