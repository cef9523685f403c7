use std::io::Write;

use serde_json::Value;
use sniff_core::FormatId;

use crate::codec::ContentCodec;
use crate::error::ContentError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 文本 JSON 编解码器。
///
/// 嗅探允许 `{` 之前存在空白或 BOM，解析端相应地跳过 UTF-8 BOM。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// 紧凑输出。
    pub const COMPACT: JsonCodec = JsonCodec { pretty: false };
    /// 带缩进的输出。
    pub const PRETTY: JsonCodec = JsonCodec { pretty: true };

    /// 是否带缩进输出。
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl ContentCodec for JsonCodec {
    fn format(&self) -> FormatId {
        FormatId::Json
    }

    fn write_value(&self, value: &Value, sink: &mut dyn Write) -> Result<(), ContentError> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *sink, value)
        } else {
            serde_json::to_writer(&mut *sink, value)
        };
        result.map_err(|err| ContentError::encode(FormatId::Json, err))
    }

    fn read_value(&self, data: &[u8]) -> Result<Value, ContentError> {
        let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        serde_json::from_slice(body).map_err(|err| ContentError::decode(FormatId::Json, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_and_pretty_outputs() {
        let doc = json!({"a": [1, 2]});
        let compact = JsonCodec::COMPACT.to_vec(&doc).unwrap();
        assert_eq!(compact, br#"{"a":[1,2]}"#);

        let pretty = JsonCodec::PRETTY.to_vec(&doc).unwrap();
        assert!(pretty.contains(&b'\n'));
        assert_eq!(JsonCodec::PRETTY.read_value(&pretty).unwrap(), doc);
    }

    #[test]
    fn bom_and_leading_whitespace_are_tolerated() {
        let doc = JsonCodec::COMPACT
            .read_value(b"\xEF\xBB\xBF  {\"k\":true}")
            .unwrap();
        assert_eq!(doc, json!({"k": true}));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = JsonCodec::COMPACT.read_value(b"{not json").unwrap_err();
        assert!(matches!(err, ContentError::Decode { format: FormatId::Json, .. }));
    }
}
