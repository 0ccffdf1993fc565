//! 端点错误类型
//!
//! 只包含“调用失败”类错误，可通过 [`IntrospectError::to_errno()`] 转换为系统调用错误码。
//! 查找失败和降级模式不是错误：读取成功并返回哨兵文本，见 [`ResponseStatus`](crate::ResponseStatus)。

use core::fmt;

use uapi::errno::{EFAULT, EFBIG, EINVAL, EMSGSIZE, ENOMEM, EOVERFLOW};

/// 端点错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrospectError {
    /// 同一会话中的第二次写或第二次读，或首次访问时偏移非零 (-EFAULT)
    ProtocolViolation,
    /// 写入内容超过参数容量 (-EFBIG)
    InputTooLarge,
    /// 写入内容不是十进制整数 (-EINVAL)
    MalformedInput,
    /// 格式化结果超过响应缓冲区容量 (-EOVERFLOW)
    ResponseTooLarge,
    /// 调用方的读缓冲区放不下整个响应 (-EMSGSIZE)
    BufferTooSmall,
    /// 节点不支持该操作，如读 `vma_arg` (-EINVAL)
    NotSupported,
    /// 启动时注册 debugfs 节点失败 (-ENOMEM)
    RegistrationFailed,
}

impl IntrospectError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            IntrospectError::ProtocolViolation => EFAULT,
            IntrospectError::InputTooLarge => EFBIG,
            IntrospectError::MalformedInput => EINVAL,
            IntrospectError::ResponseTooLarge => EOVERFLOW,
            IntrospectError::BufferTooSmall => EMSGSIZE,
            IntrospectError::NotSupported => EINVAL,
            IntrospectError::RegistrationFailed => ENOMEM,
        };
        -(errno as isize)
    }
}

impl fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            IntrospectError::ProtocolViolation => "operation already performed on this session",
            IntrospectError::InputTooLarge => "input exceeds argument capacity",
            IntrospectError::MalformedInput => "input is not a decimal integer",
            IntrospectError::ResponseTooLarge => "response exceeds buffer capacity",
            IntrospectError::BufferTooSmall => "read buffer smaller than response",
            IntrospectError::NotSupported => "operation not supported by this node",
            IntrospectError::RegistrationFailed => "debugfs registration failed",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for IntrospectError {}

/// 端点操作结果
pub type Result<T> = core::result::Result<T, IntrospectError>;
