use std::io::Write;

use serde_json::Value;
use sniff_core::FormatId;
use sniff_core::magic::CBOR_SELF_DESCRIBE_PREFIX;

use crate::codec::ContentCodec;
use crate::error::ContentError;

/// CBOR 编解码器。
///
/// 写出端先输出自描述标签 55799（`0xD9 0xD9 0xF7`），使对象文档能被嗅探为
/// [`FormatId::BinaryObject`]；读取端剥离该标签后交给 `ciborium` 解析。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CborCodec;

impl ContentCodec for CborCodec {
    fn format(&self) -> FormatId {
        FormatId::BinaryObject
    }

    fn write_value(&self, value: &Value, sink: &mut dyn Write) -> Result<(), ContentError> {
        sink.write_all(&CBOR_SELF_DESCRIBE_PREFIX)?;
        ciborium::into_writer(value, &mut *sink)
            .map_err(|err| ContentError::encode(FormatId::BinaryObject, format!("{err:?}")))
    }

    fn read_value(&self, data: &[u8]) -> Result<Value, ContentError> {
        let body = data
            .strip_prefix(&CBOR_SELF_DESCRIBE_PREFIX[..])
            .unwrap_or(data);
        ciborium::from_reader(body)
            .map_err(|err| ContentError::decode(FormatId::BinaryObject, format!("{err:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_carries_self_describe_tag_and_map_header() {
        let out = CborCodec.to_vec(&json!({"a": 1})).unwrap();
        assert_eq!(&out[..3], &CBOR_SELF_DESCRIBE_PREFIX);
        // 0xA1：包含一个键值对的映射。
        assert_eq!(out[3], 0xA1);
        assert_eq!(CborCodec.read_value(&out).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn untagged_input_is_accepted() {
        // {"k": -2}
        let data = [0xA1, 0x61, b'k', 0x21];
        assert_eq!(CborCodec.read_value(&data).unwrap(), json!({"k": -2}));
    }

    #[test]
    fn truncated_input_is_a_decode_error() {
        let err = CborCodec.read_value(&[0xD9, 0xD9, 0xF7, 0xA1, 0x61]).unwrap_err();
        assert_eq!(err.code(), crate::error::codes::CODEC_DECODE);
    }
}
