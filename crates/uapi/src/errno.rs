//! 内省端点使用到的 POSIX errno 值
//!
//! 与 Linux `include/uapi/asm-generic/errno-base.h` / `errno.h` 保持一致。

pub const ENOMEM: i32 = 12;
pub const EFAULT: i32 = 14;
pub const EINVAL: i32 = 22;
pub const EFBIG: i32 = 27;
pub const EOVERFLOW: i32 = 75;
pub const EMSGSIZE: i32 = 90;
