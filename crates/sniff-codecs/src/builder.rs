//! 绑定输出 sink 的文档写出器。

use std::io::Write;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use sniff_core::FormatId;

use crate::codec::{ContentCodec, codec_for};
use crate::error::ContentError;

/// `ContentBuilder` 以选定格式向 sink 写出一个文档。
///
/// # 教案式说明
/// - **意图（Why）**：分发器按格式构造写出器后即交出所有权，写出器的生命周期（flush/回收 sink）归调用方；
/// - **逻辑（How）**：`value`/`serialize` 把文档交给内部 [`ContentCodec`] 写入 sink；
///   `into_inner` 先 flush 再交还 sink；
/// - **契约（What）**：每个写出器只写一个文档，第二次写入返回
///   [`ContentError::Encode`]，避免在同一输出中拼出多个魔数头。
#[derive(Debug)]
pub struct ContentBuilder<W: Write> {
    codec: &'static dyn ContentCodec,
    sink: W,
    written: bool,
}

impl<W: Write> ContentBuilder<W> {
    /// 基于编解码器与 sink 构建写出器。
    pub fn new(codec: &'static dyn ContentCodec, sink: W) -> Self {
        Self {
            codec,
            sink,
            written: false,
        }
    }

    /// 写出器的目标格式。
    pub fn format(&self) -> FormatId {
        self.codec.format()
    }

    /// 内部使用的编解码器。
    pub fn codec(&self) -> &'static dyn ContentCodec {
        self.codec
    }

    /// 是否已经写出文档。
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// 写出一个文档。
    pub fn value(&mut self, value: &Value) -> Result<&mut Self, ContentError> {
        if self.written {
            return Err(ContentError::encode(
                self.format(),
                "document already written to this builder",
            ));
        }
        self.codec.write_value(value, &mut self.sink)?;
        self.written = true;
        Ok(self)
    }

    /// 先经 `serde_json` 转换为文档模型，再写出。
    pub fn serialize<T: Serialize + ?Sized>(&mut self, item: &T) -> Result<&mut Self, ContentError> {
        let value =
            serde_json::to_value(item).map_err(|err| ContentError::encode(self.format(), err))?;
        self.value(&value)
    }

    /// 刷新 sink。
    pub fn flush(&mut self) -> Result<(), ContentError> {
        self.sink.flush()?;
        Ok(())
    }

    /// 借用 sink。
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// 刷新后交还 sink。
    pub fn into_inner(mut self) -> Result<W, ContentError> {
        self.flush()?;
        Ok(self.sink)
    }
}

impl ContentBuilder<Vec<u8>> {
    /// 已写出的字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.sink
    }

    /// 冻结为只读 [`Bytes`]。
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.sink)
    }
}

/// 内存 JSON 写出器。
pub fn json_builder() -> ContentBuilder<Vec<u8>> {
    content_builder(FormatId::Json)
}

/// 写入 `sink` 的 JSON 写出器。
pub fn json_builder_to<W: Write>(sink: W) -> ContentBuilder<W> {
    content_builder_to(FormatId::Json, sink)
}

/// 内存 Smile 写出器。
pub fn smile_builder() -> ContentBuilder<Vec<u8>> {
    content_builder(FormatId::Compact)
}

/// 写入 `sink` 的 Smile 写出器。
pub fn smile_builder_to<W: Write>(sink: W) -> ContentBuilder<W> {
    content_builder_to(FormatId::Compact, sink)
}

/// 内存 YAML 写出器。
pub fn yaml_builder() -> ContentBuilder<Vec<u8>> {
    content_builder(FormatId::Yaml)
}

/// 写入 `sink` 的 YAML 写出器。
pub fn yaml_builder_to<W: Write>(sink: W) -> ContentBuilder<W> {
    content_builder_to(FormatId::Yaml, sink)
}

/// 内存 CBOR 写出器。
pub fn cbor_builder() -> ContentBuilder<Vec<u8>> {
    content_builder(FormatId::BinaryObject)
}

/// 写入 `sink` 的 CBOR 写出器。
pub fn cbor_builder_to<W: Write>(sink: W) -> ContentBuilder<W> {
    content_builder_to(FormatId::BinaryObject, sink)
}

/// 指定格式的内存写出器。
pub fn content_builder(format: FormatId) -> ContentBuilder<Vec<u8>> {
    content_builder_to(format, Vec::new())
}

/// 指定格式、写入 `sink` 的写出器。
pub fn content_builder_to<W: Write>(format: FormatId, sink: W) -> ContentBuilder<W> {
    ContentBuilder::new(codec_for(format), sink)
}
