use std::io::{Read, Write};

use serde_json::Value;
use sniff_core::{
    FormatId, InputPreview, StreamSniff, sniff_bytes, sniff_range, sniff_reader, sniff_str,
};
use tracing::debug;

use crate::builder::ContentBuilder;
use crate::codec::{ContentCodec, codec_with};
use crate::error::ContentError;
use crate::settings::RegistrySettings;

/// `FormatRegistry` 把格式标识解析为编解码器与写出器，并提供“先嗅探再分发”的入口。
///
/// # 设计背景（Why）
/// - 参考 HTTP `Content-Type` 协商：调用方要么明确给出格式，要么交由嗅探器从数据前缀推断；
/// - 格式集合封闭，`FormatId` 路径在编译期穷尽；字符串路径（如来自配置）在运行期校验。
///
/// # 契约说明（What）
/// - 返回的编解码器是进程级单例，可跨线程共享；
/// - 返回的写出器归调用方所有；
/// - 无法判定格式时，若配置了回退格式则使用之，否则返回 [`ContentError::DetectionFailure`]。
#[derive(Clone, Debug, Default)]
pub struct FormatRegistry {
    settings: RegistrySettings,
    fallback: Option<FormatId>,
}

impl FormatRegistry {
    /// 基于配置构建分发器；回退格式名称非法时返回 [`ContentError::UnrecognizedFormat`]。
    pub fn new(settings: RegistrySettings) -> Result<Self, ContentError> {
        let fallback = settings.fallback()?;
        Ok(Self { settings, fallback })
    }

    /// 从 TOML 配置构建分发器。
    pub fn from_toml_str(source: &str) -> Result<Self, ContentError> {
        Self::new(RegistrySettings::from_toml_str(source)?)
    }

    /// 当前配置。
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// 格式对应的编解码器。
    pub fn encoder_for(&self, format: FormatId) -> &'static dyn ContentCodec {
        codec_with(format, self.settings.pretty_json)
    }

    /// 按名称解析编解码器。
    pub fn encoder_for_name(&self, name: &str) -> Result<&'static dyn ContentCodec, ContentError> {
        let format = name.parse::<FormatId>()?;
        Ok(self.encoder_for(format))
    }

    /// 写入内存缓冲的写出器。
    pub fn builder_for(&self, format: FormatId) -> ContentBuilder<Vec<u8>> {
        self.builder_for_sink(format, Vec::new())
    }

    /// 写入任意 sink 的写出器。
    pub fn builder_for_sink<W: Write>(&self, format: FormatId, sink: W) -> ContentBuilder<W> {
        ContentBuilder::new(self.encoder_for(format), sink)
    }

    /// 按名称构建内存写出器。
    pub fn builder_for_name(&self, name: &str) -> Result<ContentBuilder<Vec<u8>>, ContentError> {
        let format = name.parse::<FormatId>()?;
        Ok(self.builder_for(format))
    }

    /// 嗅探字节并返回编解码器。
    pub fn content_for_bytes(&self, data: &[u8]) -> Result<&'static dyn ContentCodec, ContentError> {
        self.resolve(sniff_bytes(data), || {
            InputPreview::bytes(data, self.settings.preview_limit)
        })
    }

    /// 嗅探字节区间并返回编解码器；失败信息携带 `offset`/`length`。
    pub fn content_for_range(
        &self,
        data: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<&'static dyn ContentCodec, ContentError> {
        let verdict = sniff_range(data, offset, length)?;
        self.resolve(verdict, || {
            InputPreview::range(data, offset, length, self.settings.preview_limit)
        })
    }

    /// 嗅探文本并返回编解码器；文本输入永远不会得到 CBOR。
    pub fn content_for_str(&self, text: &str) -> Result<&'static dyn ContentCodec, ContentError> {
        self.resolve(sniff_str(text), || {
            InputPreview::text(text, self.settings.preview_limit)
        })
    }

    /// 嗅探字节流并返回编解码器与被消费的前缀。
    ///
    /// 流的读取位置已被推进，继续解析正文时请用 [`StreamSniff::replay`] 补回前缀。
    pub fn content_for_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<(&'static dyn ContentCodec, StreamSniff), ContentError> {
        let sniffed = sniff_reader(reader)?;
        let codec = self.resolve(sniffed.format, || {
            InputPreview::bytes(&sniffed.prefix, self.settings.preview_limit)
        })?;
        Ok((codec, sniffed))
    }

    /// 嗅探并解析完整的内存文档。
    pub fn parse_bytes(&self, data: &[u8]) -> Result<Value, ContentError> {
        self.content_for_bytes(data)?.read_value(data)
    }

    /// 嗅探并解析文本文档。
    pub fn parse_str(&self, text: &str) -> Result<Value, ContentError> {
        self.content_for_str(text)?.read_value(text.as_bytes())
    }

    /// 嗅探并解析整个字节流，嗅探消费的前缀会被补回。
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Value, ContentError> {
        let (codec, sniffed) = self.content_for_reader(&mut reader)?;
        codec.read_from(&mut sniffed.replay(reader))
    }

    fn resolve(
        &self,
        verdict: Option<FormatId>,
        preview: impl FnOnce() -> InputPreview,
    ) -> Result<&'static dyn ContentCodec, ContentError> {
        match (verdict, self.fallback) {
            (Some(format), _) => {
                debug!(format = %format, "dispatching sniffed content");
                Ok(self.encoder_for(format))
            }
            (None, Some(fallback)) => {
                debug!(fallback = %fallback, "content format undetermined, using fallback");
                Ok(self.encoder_for(fallback))
            }
            (None, None) => {
                let input = preview();
                debug!(input = %input, "content format undetermined");
                Err(ContentError::DetectionFailure { input })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn names_resolve_through_the_closed_set() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.encoder_for_name("smile").unwrap().format(),
            FormatId::Compact
        );
        let err = registry.builder_for_name("protobuf").unwrap_err();
        assert!(matches!(
            err,
            ContentError::UnrecognizedFormat { ref name } if name == "protobuf"
        ));
    }

    #[test]
    fn pretty_setting_reaches_json_builders() {
        let registry = FormatRegistry::from_toml_str("pretty_json = true").unwrap();
        let mut builder = registry.builder_for(FormatId::Json);
        builder.value(&json!({"a": 1})).unwrap();
        assert_eq!(builder.as_bytes(), b"{\n  \"a\": 1\n}");
    }

    #[test]
    fn undetermined_input_fails_with_bounded_preview() {
        let registry = FormatRegistry::new(RegistrySettings {
            preview_limit: 4,
            ..RegistrySettings::default()
        })
        .unwrap();
        let err = registry.content_for_bytes(b"plain old text").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to derive content format from b\"plai\"...(+10 more)"
        );
    }

    #[test]
    fn range_failure_reports_offset_and_length() {
        let registry = FormatRegistry::default();
        let err = registry.content_for_range(b"xxabyy", 2, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to derive content format from (offset=2, length=2): b\"ab\""
        );
        let err = registry.content_for_range(b"xx", 1, 5).unwrap_err();
        assert!(matches!(err, ContentError::Range(_)));
    }

    #[test]
    fn fallback_format_replaces_detection_failure() {
        let registry = FormatRegistry::from_toml_str("fallback_format = \"yaml\"").unwrap();
        let codec = registry.content_for_str("key: value").unwrap();
        assert_eq!(codec.format(), FormatId::Yaml);
        assert_eq!(
            registry.parse_str("key: value").unwrap(),
            json!({"key": "value"})
        );
    }

    #[test]
    fn text_input_never_dispatches_to_cbor() {
        let registry = FormatRegistry::default();
        let err = registry.content_for_str("\u{d9}\u{d9}\u{f7}\u{a1}").unwrap_err();
        assert_eq!(err.code(), crate::error::codes::DETECT_UNDETERMINED);
    }

    #[test]
    fn reader_parse_replays_the_consumed_prefix() {
        let registry = FormatRegistry::default();
        let value = registry
            .parse_reader(&b"  {\"a\": [1, 2, 3]}"[..])
            .unwrap();
        assert_eq!(value, json!({"a": [1, 2, 3]}));
    }

    #[test]
    #[traced_test]
    fn dispatch_decisions_are_logged() {
        let registry = FormatRegistry::default();
        registry.content_for_bytes(b"---\na: 1").unwrap();
        assert!(logs_contain("dispatching sniffed content"));
        let _ = registry.content_for_bytes(b"??");
        assert!(logs_contain("content format undetermined"));
    }
}
