//! 结构化数据格式标识。

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// `FormatId` 是嗅探器可能给出的四种格式结论。
///
/// # 教案式说明
/// - **意图（Why）**：以封闭枚举承载格式标签，使分发器的 `match` 在编译期即覆盖全部分支；
/// - **契约（What）**：值语义、无身份，可自由复制与跨线程传递；
/// - **命名**：`Compact` 对应 Smile（二进制 JSON 超集），`BinaryObject` 对应 CBOR。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatId {
    /// 文本 JSON。
    Json,
    /// Smile：带 `":)\n"` 魔数头的紧凑二进制 JSON 超集。
    Compact,
    /// YAML 文档，以 `---` 开头时可被识别。
    Yaml,
    /// CBOR，仅在携带自描述标签且首个值为对象时可被识别。
    BinaryObject,
}

impl FormatId {
    /// 按声明顺序列出全部格式。
    pub const ALL: [FormatId; 4] = [
        FormatId::Json,
        FormatId::Compact,
        FormatId::Yaml,
        FormatId::BinaryObject,
    ];

    /// 稳定的小写名称，用于配置与日志。
    pub const fn name(self) -> &'static str {
        match self {
            FormatId::Json => "json",
            FormatId::Compact => "smile",
            FormatId::Yaml => "yaml",
            FormatId::BinaryObject => "cbor",
        }
    }

    /// 对应的 IANA 风格媒体类型。
    pub const fn media_type(self) -> &'static str {
        match self {
            FormatId::Json => "application/json",
            FormatId::Compact => "application/smile",
            FormatId::Yaml => "application/yaml",
            FormatId::BinaryObject => "application/cbor",
        }
    }

    /// 是否为二进制格式。
    pub const fn is_binary(self) -> bool {
        matches!(self, FormatId::Compact | FormatId::BinaryObject)
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 格式名称无法识别。
///
/// 通常出现在格式标识来自外部配置等开放取值的场景，`name` 保留原始输入便于排障。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no matching content format for `{name}`")]
pub struct UnknownFormatName {
    /// 调用方提供的原始名称。
    pub name: String,
}

impl FromStr for FormatId {
    type Err = UnknownFormatName;

    /// 解析格式名称。
    ///
    /// 接受 [`FormatId::name`]、[`FormatId::media_type`] 以及 `compact`、`binary-object`、`yml`
    /// 等别名，大小写不敏感，首尾空白会被忽略。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let matches = |candidate: &str| trimmed.eq_ignore_ascii_case(candidate);

        FormatId::ALL
            .into_iter()
            .find(|id| matches(id.name()) || matches(id.media_type()))
            .or_else(|| {
                if matches("compact") {
                    Some(FormatId::Compact)
                } else if matches("yml") {
                    Some(FormatId::Yaml)
                } else if matches("binary-object") || matches("binary_object") {
                    Some(FormatId::BinaryObject)
                } else {
                    None
                }
            })
            .ok_or_else(|| UnknownFormatName {
                name: value.to_string(),
            })
    }
}
