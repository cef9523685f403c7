use std::io::Write;

use serde_json::Value;
use sniff_core::FormatId;
use sniff_core::magic::YAML_DOCUMENT_START;

use crate::codec::ContentCodec;
use crate::error::ContentError;

/// YAML 编解码器。
///
/// 输出总以 `---` 文档起始标记开头，否则嗅探器无法从字节中认出 YAML。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl ContentCodec for YamlCodec {
    fn format(&self) -> FormatId {
        FormatId::Yaml
    }

    fn write_value(&self, value: &Value, sink: &mut dyn Write) -> Result<(), ContentError> {
        let body =
            serde_yaml::to_string(value).map_err(|err| ContentError::encode(FormatId::Yaml, err))?;
        if !body.as_bytes().starts_with(&YAML_DOCUMENT_START) {
            sink.write_all(&YAML_DOCUMENT_START)?;
            sink.write_all(b"\n")?;
        }
        sink.write_all(body.as_bytes())?;
        Ok(())
    }

    fn read_value(&self, data: &[u8]) -> Result<Value, ContentError> {
        serde_yaml::from_slice(data).map_err(|err| ContentError::decode(FormatId::Yaml, err))
    }
}
