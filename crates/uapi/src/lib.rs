//! 与用户空间共用定义和声明
//!
//! 包含内省端点的路径、缓冲区大小、错误哨兵文本和 errno 常量，
//! 确保内核侧实现与用户态客户端的一致性。

#![no_std]
#![allow(dead_code)]
// uapi 中包含大量与 Linux 兼容的常量定义；逐项补 `///` 噪声较大。
#![allow(missing_docs)]

pub mod errno;
pub mod introspect;
