//! 端点配置

use uapi::introspect::{ARG_BUFFER_SIZE, BUFFER_SIZE, DEBUGFS_DIR_NAME};

/// 内省端点配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrospectConfig {
    /// 单次响应的最大字节数
    pub response_capacity: usize,
    /// `vma_arg` 单次写入的最大字节数
    pub arg_capacity: usize,
    /// debugfs 目录名
    pub dir_name: &'static str,
}

impl IntrospectConfig {
    /// 默认配置，取值来自 `uapi::introspect`
    pub const DEFAULT: Self = Self {
        response_capacity: BUFFER_SIZE,
        arg_capacity: ARG_BUFFER_SIZE,
        dir_name: DEBUGFS_DIR_NAME,
    };

    /// 替换响应容量
    pub const fn with_response_capacity(mut self, capacity: usize) -> Self {
        self.response_capacity = capacity;
        self
    }

    /// 替换参数容量
    pub const fn with_arg_capacity(mut self, capacity: usize) -> Self {
        self.arg_capacity = capacity;
        self
    }

    /// 替换目录名
    pub const fn with_dir_name(mut self, name: &'static str) -> Self {
        self.dir_name = name;
        self
    }
}

impl Default for IntrospectConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
