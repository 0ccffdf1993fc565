//! 响应缓冲区
//!
//! 每次读取都新建一个固定容量的缓冲区，格式化器通过 [`core::fmt::Write`] 写入。
//! 超出容量的写入被整体拒绝，调用方据此让读取失败，而不是截断输出。

use alloc::string::String;
use core::fmt;

use uapi::introspect::SENTINEL;

/// 固定容量的文本缓冲区
#[derive(Debug)]
pub struct ResponseBuffer {
    text: String,
    capacity: usize,
    overflowed: bool,
}

impl ResponseBuffer {
    /// 创建容量为 `capacity` 字节的缓冲区
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    /// 容量（字节）
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 已写入的字节数
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 是否有写入因超出容量而被拒绝
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// 当前内容
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 取出内容
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Write for ResponseBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.overflowed || self.text.len() + s.len() > self.capacity {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }
}

/// 响应状态，与文本一起返回，供机器消费者区分真实数据和哨兵
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// 文本为真实数据
    Ok,
    /// 目标不存在：未写入 PID、PID 无效、进程无内存区域或注册表为空
    LookupFailed,
    /// 启动注册失败，服务处于降级模式
    Degraded,
}

/// 一次读取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: ResponseStatus,
    text: String,
}

impl Response {
    /// 真实数据
    pub fn data(text: String) -> Self {
        Self {
            status: ResponseStatus::Ok,
            text,
        }
    }

    /// 查找失败的哨兵
    pub fn lookup_failed() -> Self {
        Self::sentinel(ResponseStatus::LookupFailed)
    }

    /// 降级模式的哨兵
    pub fn degraded() -> Self {
        Self::sentinel(ResponseStatus::Degraded)
    }

    fn sentinel(status: ResponseStatus) -> Self {
        Self {
            status,
            text: String::from(SENTINEL),
        }
    }

    /// 响应状态
    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// 是否为哨兵
    pub fn is_sentinel(&self) -> bool {
        self.status != ResponseStatus::Ok
    }

    /// 响应文本
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 响应字节，复制给用户态的就是这些
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// 取出文本
    pub fn into_text(self) -> String {
        self.text
    }
}
