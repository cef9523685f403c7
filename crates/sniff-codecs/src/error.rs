//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义格式分发与编解码阶段的失败语义，调用方可以只匹配一个枚举；
//! - 每个变体都携带稳定错误码（见 [`codes`]），便于日志与告警聚合。
//!
//! ## 设计要求（What）
//! - 所有错误都是本地、同步、不可重试的失败，直接交还调用方；
//! - 嗅探失败只携带有界的输入预览，避免把整段负载拼进错误信息。

use std::fmt::Display;
use std::io;

use sniff_core::{FormatId, InputPreview, SniffError, UnknownFormatName};
use thiserror::Error;

/// 稳定错误码常量。
pub mod codes {
    /// 输入无法判定格式。
    pub const DETECT_UNDETERMINED: &str = "sniff.detect.undetermined";
    /// 格式名称不在封闭集合内。
    pub const DISPATCH_UNRECOGNIZED: &str = "sniff.dispatch.unrecognized_format";
    /// 字节区间越界。
    pub const INPUT_RANGE: &str = "sniff.input.range";
    /// 底层读写失败。
    pub const IO: &str = "sniff.io";
    /// 编码失败。
    pub const CODEC_ENCODE: &str = "sniff.codec.encode";
    /// 解码失败。
    pub const CODEC_DECODE: &str = "sniff.codec.decode";
    /// 配置非法。
    pub const CONFIG_INVALID: &str = "sniff.config.invalid";
}

/// 分发器与编解码器的错误域。
#[derive(Debug, Error)]
pub enum ContentError {
    /// 需要确定格式的入口未能从输入中嗅探出格式。
    ///
    /// `input` 为有界渲染，字节区间输入会附带 `offset`/`length`。
    #[error("failed to derive content format from {input}")]
    DetectionFailure {
        /// 原始输入的有界快照。
        input: InputPreview,
    },

    /// 请求的格式标识不在 JSON/Smile/YAML/CBOR 之内。
    #[error("no matching content format for `{name}`")]
    UnrecognizedFormat {
        /// 调用方提供的原始标识。
        name: String,
    },

    /// 字节区间参数越界。
    #[error(transparent)]
    Range(#[from] SniffError),

    /// 读取输入流或写出到 sink 时的 I/O 错误。
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// 文档无法以目标格式写出。
    #[error("failed to encode {format} content: {detail}")]
    Encode {
        /// 目标格式。
        format: FormatId,
        /// 可读的失败原因。
        detail: String,
    },

    /// 字节无法按目标格式解析。
    #[error("failed to decode {format} content: {detail}")]
    Decode {
        /// 目标格式。
        format: FormatId,
        /// 可读的失败原因。
        detail: String,
    },

    /// 配置无法解析或取值非法。
    #[error("invalid registry settings: {detail}")]
    Settings {
        /// 可读的失败原因。
        detail: String,
    },
}

impl ContentError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            ContentError::DetectionFailure { .. } => codes::DETECT_UNDETERMINED,
            ContentError::UnrecognizedFormat { .. } => codes::DISPATCH_UNRECOGNIZED,
            ContentError::Range(_) => codes::INPUT_RANGE,
            ContentError::Io(_) => codes::IO,
            ContentError::Encode { .. } => codes::CODEC_ENCODE,
            ContentError::Decode { .. } => codes::CODEC_DECODE,
            ContentError::Settings { .. } => codes::CONFIG_INVALID,
        }
    }

    pub(crate) fn encode(format: FormatId, detail: impl Display) -> Self {
        ContentError::Encode {
            format,
            detail: detail.to_string(),
        }
    }

    pub(crate) fn decode(format: FormatId, detail: impl Display) -> Self {
        ContentError::Decode {
            format,
            detail: detail.to_string(),
        }
    }
}

impl From<UnknownFormatName> for ContentError {
    fn from(value: UnknownFormatName) -> Self {
        ContentError::UnrecognizedFormat { name: value.name }
    }
}
