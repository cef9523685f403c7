use std::io::{Read, Write};

use serde_json::Value;
use sniff_core::FormatId;

use crate::cbor::CborCodec;
use crate::error::ContentError;
use crate::json::JsonCodec;
use crate::smile::SmileCodec;
use crate::yaml::YamlCodec;

/// `ContentCodec` 是分发器交给调用方的“编解码器”对象。
///
/// # 设计背景（Why）
/// - 分发器只按 [`FormatId`] 选择实现，调用方面对的是统一的对象层接口；
/// - 文档模型统一为 [`serde_json::Value`]，四种格式之间可以无损互转 JSON 兼容的数据。
///
/// # 契约说明（What）
/// - 实现必须无状态或内部只读，满足 `Send + Sync + 'static`，可作为进程级单例共享；
/// - `write_value` 写出一个完整文档，包含格式要求的头部（Smile 魔数、YAML `---`、CBOR 自描述标签）；
/// - `read_value` 接受同一格式写出的字节，返回的值与写入前相等。
pub trait ContentCodec: Send + Sync + 'static {
    /// 该实现对应的格式。
    fn format(&self) -> FormatId;

    /// 媒体类型。
    fn media_type(&self) -> &'static str {
        self.format().media_type()
    }

    /// 将文档写入 `sink`。
    fn write_value(&self, value: &Value, sink: &mut dyn Write) -> Result<(), ContentError>;

    /// 从完整字节解析文档。
    fn read_value(&self, data: &[u8]) -> Result<Value, ContentError>;

    /// 将文档编码为新分配的字节。
    fn to_vec(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
        let mut out = Vec::new();
        self.write_value(value, &mut out)?;
        Ok(out)
    }

    /// 读尽 `reader` 后解析文档。
    fn read_from(&self, reader: &mut dyn Read) -> Result<Value, ContentError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.read_value(&data)
    }
}

impl std::fmt::Debug for dyn ContentCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCodec")
            .field("format", &self.format())
            .field("media_type", &self.media_type())
            .finish()
    }
}

static JSON: JsonCodec = JsonCodec::COMPACT;
static JSON_PRETTY: JsonCodec = JsonCodec::PRETTY;
static SMILE: SmileCodec = SmileCodec;
static YAML: YamlCodec = YamlCodec;
static CBOR: CborCodec = CborCodec;

/// 返回格式对应的进程级编解码器，JSON 使用紧凑输出。
pub fn codec_for(format: FormatId) -> &'static dyn ContentCodec {
    codec_with(format, false)
}

pub(crate) fn codec_with(format: FormatId, pretty_json: bool) -> &'static dyn ContentCodec {
    match format {
        FormatId::Json if pretty_json => &JSON_PRETTY,
        FormatId::Json => &JSON,
        FormatId::Compact => &SMILE,
        FormatId::Yaml => &YAML,
        FormatId::BinaryObject => &CBOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_resolves_to_its_own_codec() {
        for format in FormatId::ALL {
            let codec = codec_for(format);
            assert_eq!(codec.format(), format);
            assert_eq!(codec.media_type(), format.media_type());
        }
    }

    #[test]
    fn debug_names_the_format() {
        let rendered = format!("{:?}", codec_for(FormatId::Yaml));
        assert!(rendered.contains("Yaml"));
        assert!(rendered.contains("application/yaml"));
    }
}
