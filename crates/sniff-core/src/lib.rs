#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # sniff-core
//!
//! ## 教案意图（Why）
//! - **职责定位**：仅凭数据开头最多 [`GUESS_HEADER_LENGTH`] 个单元判断其结构化编码格式
//!   （JSON / Smile / YAML / CBOR），并把结果交给上层分发器选择编解码器；
//! - **一致性要求**：字节切片、字符序列、一次性字节流三种输入形态对同一前缀必须给出相同结论，
//!   唯一例外是纯二进制的 CBOR 永远不会从字符序列中识别出来。
//!
//! ## 结构概览（How）
//! - [`format`]：封闭的 [`FormatId`] 枚举及其名称、媒体类型；
//! - [`magic`]：魔数与阈值常量，以及 CBOR 四字节对象头判定；
//! - [`source`]：有界可窥视输入源 [`HeaderSource`] 与三种适配器；
//! - [`sniff`]：唯一的核心判定算法及便捷入口；
//! - [`preview`]：诊断信息使用的有界输入渲染。
//!
//! ## 契约说明（What）
//! - 切片与字符串嗅探是纯函数，可在任意线程并发调用；
//! - 流式嗅探会推进底层读取游标，消耗的字节通过 [`StreamSniff`] 显式返回；
//! - 无法判定时返回 `None`，是否视为失败由调用方决定。

extern crate alloc;

pub mod error;
pub mod format;
pub mod magic;
pub mod preview;
pub mod sniff;
pub mod source;

pub use crate::error::SniffError;
pub use crate::format::{FormatId, UnknownFormatName};
pub use crate::magic::GUESS_HEADER_LENGTH;
pub use crate::preview::{InputPreview, PREVIEW_LIMIT};
pub use crate::sniff::{sniff, sniff_bytes, sniff_range, sniff_str};
pub use crate::source::{CharSource, HeaderSource, SliceSource};

#[cfg(feature = "std")]
pub use crate::sniff::sniff_reader;
#[cfg(feature = "std")]
pub use crate::source::{StreamSniff, StreamSource};
