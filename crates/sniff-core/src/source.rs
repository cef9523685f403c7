//! 有界可窥视输入源。
//!
//! # 设计背景（Why）
//! - 字节切片、字符序列与一次性字节流的访问代价各不相同，但判定规则只有一套；
//! - 把“按下标窥视窗口内第 N 个单元”抽象为 [`HeaderSource`]，核心算法只需书写一次，
//!   各输入形态仅提供薄适配器。
//!
//! # 契约说明（What）
//! - 适配器只暴露前 [`GUESS_HEADER_LENGTH`] 个单元，越界下标一律视为输入结束；
//! - 单元以 `u32` 表示：字节按无符号值提升，字符取其 Unicode 码点，魔数常量按相同规则比较。

use core::convert::Infallible;

#[cfg(feature = "std")]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::io::{self, Read};

#[cfg(feature = "std")]
use crate::format::FormatId;
use crate::magic::GUESS_HEADER_LENGTH;

/// 嗅探算法所需的最小输入能力：在窗口内按下标读取单元。
pub trait HeaderSource {
    /// 读取单元时可能出现的错误；纯内存适配器使用 [`Infallible`]。
    type Error;

    /// 是否允许识别纯二进制格式（CBOR）。字符序列输入为 `false`。
    const SUPPORTS_BINARY: bool;

    /// 输入形态名称，仅用于日志。
    const SHAPE: &'static str;

    /// 返回窗口内第 `index` 个单元；输入在此之前结束时返回 `Ok(None)`。
    ///
    /// 调用方保证 `index` 单调地按需递增，流式适配器据此只读取判定所需的字节。
    fn unit_at(&mut self, index: usize) -> Result<Option<u32>, Self::Error>;
}

/// 随机访问字节切片适配器。
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'a> {
    window: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// 以切片开头最多 [`GUESS_HEADER_LENGTH`] 字节构造窗口。
    pub fn new(data: &'a [u8]) -> Self {
        let len = data.len().min(GUESS_HEADER_LENGTH);
        Self {
            window: &data[..len],
        }
    }

    /// 实际参与判定的窗口。
    pub fn window(&self) -> &'a [u8] {
        self.window
    }
}

impl HeaderSource for SliceSource<'_> {
    type Error = Infallible;
    const SUPPORTS_BINARY: bool = true;
    const SHAPE: &'static str = "bytes";

    fn unit_at(&mut self, index: usize) -> Result<Option<u32>, Self::Error> {
        Ok(self.window.get(index).map(|byte| u32::from(*byte)))
    }
}

/// 字符序列适配器。
///
/// 构造时即截取前 [`GUESS_HEADER_LENGTH`] 个字符，其后内容不会被访问。
#[derive(Clone, Copy, Debug)]
pub struct CharSource {
    units: [u32; GUESS_HEADER_LENGTH],
    len: usize,
}

impl CharSource {
    /// 从文本开头截取窗口。
    pub fn new(text: &str) -> Self {
        let mut units = [0u32; GUESS_HEADER_LENGTH];
        let mut len = 0;
        for (slot, ch) in units.iter_mut().zip(text.chars()) {
            *slot = u32::from(ch);
            len += 1;
        }
        Self { units, len }
    }

    /// 窗口内的字符数。
    pub fn len(&self) -> usize {
        self.len
    }

    /// 窗口是否为空。
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl HeaderSource for CharSource {
    type Error = Infallible;
    const SUPPORTS_BINARY: bool = false;
    const SHAPE: &'static str = "chars";

    fn unit_at(&mut self, index: usize) -> Result<Option<u32>, Self::Error> {
        Ok(self.units[..self.len].get(index).copied())
    }
}

/// 一次性、不可回退字节流适配器。
///
/// # 教案式说明
/// - **意图（Why）**：流无法回退，窥视即消费；把消费掉的字节完整记录下来，
///   调用方才能在后续解析正文时补回这段前缀；
/// - **逻辑（How）**：`unit_at` 按需逐字节读取，直到覆盖请求的下标或遇到流结束；
/// - **契约（What）**：最多读取 [`GUESS_HEADER_LENGTH`] 字节；I/O 错误立即上抛，
///   仅对 `Interrupted` 按标准库惯例重读。
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct StreamSource<R> {
    reader: R,
    prefix: Vec<u8>,
    exhausted: bool,
}

#[cfg(feature = "std")]
impl<R: Read> StreamSource<R> {
    /// 包装底层读取器。
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            prefix: Vec::with_capacity(GUESS_HEADER_LENGTH),
            exhausted: false,
        }
    }

    /// 已经从底层读取器消费的字节。
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// 拆出底层读取器与已消费前缀。
    pub fn into_parts(self) -> (R, Vec<u8>) {
        (self.reader, self.prefix)
    }

    fn pull_one(&mut self) -> io::Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(_) => {
                    self.prefix.push(byte[0]);
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(feature = "std")]
impl<R: Read> HeaderSource for StreamSource<R> {
    type Error = io::Error;
    const SUPPORTS_BINARY: bool = true;
    const SHAPE: &'static str = "stream";

    fn unit_at(&mut self, index: usize) -> Result<Option<u32>, Self::Error> {
        if index >= GUESS_HEADER_LENGTH {
            return Ok(None);
        }
        while self.prefix.len() <= index && !self.exhausted {
            self.pull_one()?;
        }
        Ok(self.prefix.get(index).map(|byte| u32::from(*byte)))
    }
}

/// 流式嗅探结果：格式结论加上被消费的前缀。
#[cfg(feature = "std")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamSniff {
    /// 判定结果，`None` 表示数据不足或无法识别。
    pub format: Option<FormatId>,
    /// 嗅探过程中从流中读出的全部字节，按读取顺序排列。
    pub prefix: Vec<u8>,
}

#[cfg(feature = "std")]
impl StreamSniff {
    /// 把已消费的前缀重新接回剩余流之前，得到完整输入。
    pub fn replay<R: Read>(self, rest: R) -> io::Chain<io::Cursor<Vec<u8>>, R> {
        io::Cursor::new(self.prefix).chain(rest)
    }
}
