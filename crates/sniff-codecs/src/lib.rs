#![warn(missing_docs)]

//! # sniff-codecs
//!
//! ## 教案意图（Why）
//! - **职责定位**：在 [`sniff_core`] 的判定结果之上，为四种结构化格式提供编解码器与文档写出器，
//!   并给出“按名称”与“按内容”两条分发路径；
//! - **依赖取舍**：JSON 与 YAML 复用 `serde_json`/`serde_yaml`，CBOR 复用 `ciborium`，
//!   Smile 没有成熟的 Rust 实现，由 [`smile`] 模块自带最小编码器。
//!
//! ## 结构概览（How）
//! - [`codec`]：对象安全的 [`ContentCodec`] 及各格式的进程级单例；
//! - [`builder`]：绑定 sink 的 [`ContentBuilder`]，一次写出一个文档；
//! - [`registry`]：[`FormatRegistry`]，名称解析、嗅探分发与回退策略；
//! - [`settings`]：分发器的 TOML 配置；
//! - [`error`]：带稳定错误码的 [`ContentError`]。
//!
//! ## 契约说明（What）
//! - 所有格式共享 [`serde_json::Value`] 作为文档模型；
//! - 任一写出器的输出重新嗅探后都得到同一格式（CBOR 仅限对象文档）；
//! - 库只发 `tracing` 事件，不安装 Subscriber。

pub mod builder;
pub mod cbor;
pub mod codec;
pub mod error;
pub mod json;
pub mod registry;
pub mod settings;
pub mod smile;
pub mod yaml;

pub use crate::builder::{
    ContentBuilder, cbor_builder, cbor_builder_to, content_builder, content_builder_to,
    json_builder, json_builder_to, smile_builder, smile_builder_to, yaml_builder, yaml_builder_to,
};
pub use crate::codec::{ContentCodec, codec_for};
pub use crate::error::ContentError;
pub use crate::registry::FormatRegistry;
pub use crate::settings::RegistrySettings;
pub use sniff_core::{FormatId, InputPreview, StreamSniff};
