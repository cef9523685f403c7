//! 嗅探层错误。
//!
//! 嗅探本身不会失败：无法判定时返回 `None`。这里只收录调用方传入非法参数的情形，
//! 流式入口的 I/O 错误直接以 `std::io::Error` 原样上抛。

use thiserror::Error;

/// 嗅探参数错误。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SniffError {
    /// `offset + length` 超出了底层字节数组的范围。
    #[error("byte range (offset={offset}, length={length}) exceeds input of {available} bytes")]
    RangeOutOfBounds {
        /// 调用方给出的起始偏移。
        offset: usize,
        /// 调用方给出的长度。
        length: usize,
        /// 底层数组的实际长度。
        available: usize,
    },
}
