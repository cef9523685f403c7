//! 诊断用的有界输入渲染。
//!
//! 嗅探失败时需要把“原始输入长什么样”带进错误信息，但负载可能很大。
//! [`InputPreview`] 只保留开头若干单元，并记录被截断的数量。

use alloc::string::String;
use core::fmt::{self, Write as _};

/// 默认最多渲染的单元数。
pub const PREVIEW_LIMIT: usize = 64;

/// 有界、可读的输入快照。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputPreview {
    rendered: String,
    omitted: usize,
    range: Option<(usize, usize)>,
    text: bool,
}

impl InputPreview {
    /// 以默认上限渲染字节输入。
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::bytes(data, PREVIEW_LIMIT)
    }

    /// 以默认上限渲染字节数组中的区间，并附带 `offset`/`length`。
    pub fn from_range(data: &[u8], offset: usize, length: usize) -> Self {
        Self::range(data, offset, length, PREVIEW_LIMIT)
    }

    /// 以默认上限渲染文本输入。
    pub fn from_text(text: &str) -> Self {
        Self::text(text, PREVIEW_LIMIT)
    }

    /// 渲染至多 `limit` 个字节，非打印字节使用 ASCII 转义。
    pub fn bytes(data: &[u8], limit: usize) -> Self {
        let shown = &data[..data.len().min(limit)];
        let mut rendered = String::with_capacity(shown.len());
        for byte in shown {
            // 写入 String 不会失败。
            let _ = write!(rendered, "{}", core::ascii::escape_default(*byte));
        }
        Self {
            rendered,
            omitted: data.len() - shown.len(),
            range: None,
            text: false,
        }
    }

    /// 渲染区间内至多 `limit` 个字节。
    ///
    /// 区间越界时只渲染仍落在数组内的部分，`offset`/`length` 保持调用方原值。
    pub fn range(data: &[u8], offset: usize, length: usize, limit: usize) -> Self {
        let start = offset.min(data.len());
        let end = offset.saturating_add(length).min(data.len());
        let mut preview = Self::bytes(&data[start..end], limit);
        preview.range = Some((offset, length));
        preview
    }

    /// 渲染至多 `limit` 个字符，控制字符按 Rust 字符串字面量规则转义。
    pub fn text(text: &str, limit: usize) -> Self {
        let mut rendered = String::new();
        let mut total = 0usize;
        for (index, ch) in text.chars().enumerate() {
            total = index + 1;
            if index < limit {
                let _ = write!(rendered, "{}", ch.escape_debug());
            }
        }
        Self {
            rendered,
            omitted: total.saturating_sub(limit),
            range: None,
            text: true,
        }
    }

    /// 被截断未渲染的单元数。
    pub fn omitted(&self) -> usize {
        self.omitted
    }

    /// 字节区间输入的 `(offset, length)`。
    pub fn range_bounds(&self) -> Option<(usize, usize)> {
        self.range
    }
}

impl fmt::Display for InputPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((offset, length)) = self.range {
            write!(f, "(offset={offset}, length={length}): ")?;
        }
        if self.text {
            write!(f, "\"{}\"", self.rendered)?;
        } else {
            write!(f, "b\"{}\"", self.rendered)?;
        }
        if self.omitted > 0 {
            write!(f, "...(+{} more)", self.omitted)?;
        }
        Ok(())
    }
}
