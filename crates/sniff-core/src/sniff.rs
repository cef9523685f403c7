//! 格式嗅探核心算法。
//!
//! # 判定顺序（How）
//! 在最多 [`GUESS_HEADER_LENGTH`] 个单元的窗口上按严格优先级求值：
//! 1. 首单元为 `{` → JSON；
//! 2. 前三单元等于 Smile 魔数 → Smile；
//! 3. 前三单元等于 `---` → YAML；
//! 4. 输入允许二进制且前四字节构成 CBOR 自描述对象头 → CBOR；
//! 5. 在 `1..窗口长度` 内扫描到任意 `{` → JSON（容忍前导空白或 BOM）；
//! 6. 其余情况无法判定。
//!
//! 所有输入形态共用 [`sniff`]，便捷入口只负责构造对应的 [`HeaderSource`]。

#[cfg(feature = "std")]
use std::io::Read;

use tracing::trace;

use crate::error::SniffError;
use crate::format::FormatId;
use crate::magic::{
    GUESS_HEADER_LENGTH, OBJECT_START, SMILE_HEADER, YAML_DOCUMENT_START, is_cbor_object_header,
};
use crate::source::{CharSource, HeaderSource, SliceSource};

#[cfg(feature = "std")]
use crate::source::{StreamSniff, StreamSource};

const OBJECT_START_UNIT: u32 = OBJECT_START as u32;

/// 在任意 [`HeaderSource`] 上执行嗅探。
///
/// # 契约说明（What）
/// - 结论只取决于窗口内的单元，窗口之外的数据不会被访问；
/// - 源的读取错误原样返回，不做重试；
/// - 返回 `Ok(None)` 表示无法判定，并非错误。
pub fn sniff<S: HeaderSource>(source: &mut S) -> Result<Option<FormatId>, S::Error> {
    let verdict = classify(source)?;
    trace!(shape = S::SHAPE, format = ?verdict, "sniffed content header");
    Ok(verdict)
}

fn classify<S: HeaderSource>(source: &mut S) -> Result<Option<FormatId>, S::Error> {
    let Some(first) = source.unit_at(0)? else {
        return Ok(None);
    };
    if first == OBJECT_START_UNIT {
        return Ok(Some(FormatId::Json));
    }

    let second = source.unit_at(1)?;
    let third = match second {
        Some(_) => source.unit_at(2)?,
        None => None,
    };

    if let (Some(second), Some(third)) = (second, third) {
        let header = [first, second, third];
        if header_matches(&header, &SMILE_HEADER) {
            return Ok(Some(FormatId::Compact));
        }
        if header_matches(&header, &YAML_DOCUMENT_START) {
            return Ok(Some(FormatId::Yaml));
        }
        if S::SUPPORTS_BINARY
            && let Some(fourth) = source.unit_at(3)?
            && is_cbor_units(first, second, third, fourth)
        {
            return Ok(Some(FormatId::BinaryObject));
        }
    }

    for index in 1..GUESS_HEADER_LENGTH {
        match source.unit_at(index)? {
            Some(OBJECT_START_UNIT) => return Ok(Some(FormatId::Json)),
            Some(_) => {}
            None => break,
        }
    }

    Ok(None)
}

fn header_matches(units: &[u32; 3], magic: &[u8; 3]) -> bool {
    units
        .iter()
        .zip(magic.iter())
        .all(|(unit, byte)| *unit == u32::from(*byte))
}

fn is_cbor_units(b0: u32, b1: u32, b2: u32, b3: u32) -> bool {
    match (
        u8::try_from(b0),
        u8::try_from(b1),
        u8::try_from(b2),
        u8::try_from(b3),
    ) {
        (Ok(b0), Ok(b1), Ok(b2), Ok(b3)) => is_cbor_object_header(b0, b1, b2, b3),
        _ => false,
    }
}

/// 嗅探内存字节切片。
pub fn sniff_bytes(data: &[u8]) -> Option<FormatId> {
    let Ok(verdict) = sniff(&mut SliceSource::new(data));
    verdict
}

/// 嗅探字节数组中 `[offset, offset + length)` 的区间。
///
/// 区间越界时返回 [`SniffError::RangeOutOfBounds`]，而非像切片下标那样 panic。
pub fn sniff_range(data: &[u8], offset: usize, length: usize) -> Result<Option<FormatId>, SniffError> {
    let range = offset
        .checked_add(length)
        .and_then(|end| data.get(offset..end))
        .ok_or(SniffError::RangeOutOfBounds {
            offset,
            length,
            available: data.len(),
        })?;
    Ok(sniff_bytes(range))
}

/// 嗅探字符序列。
///
/// 字符输入被视为文本，CBOR 永远不会从这里被识别出来。
pub fn sniff_str(text: &str) -> Option<FormatId> {
    let Ok(verdict) = sniff(&mut CharSource::new(text));
    verdict
}

/// 嗅探一次性字节流。
///
/// 读取游标会被推进，返回的 [`StreamSniff::prefix`] 即被消费的全部字节；
/// 需要继续解析正文时请使用 [`StreamSniff::replay`] 重新拼接。
/// 流在给出结论之前结束时返回 `format: None`，不视为错误。
#[cfg(feature = "std")]
pub fn sniff_reader<R: Read>(reader: R) -> std::io::Result<StreamSniff> {
    let mut source = StreamSource::new(reader);
    let format = sniff(&mut source)?;
    let (_, prefix) = source.into_parts();
    Ok(StreamSniff { format, prefix })
}
