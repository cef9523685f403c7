//! 写出器输出与嗅探器之间的闭环回归。
//!
//! # 教案式说明
//! - **Why**：分发器“按内容”路径的前提是每种写出器产出的头部都能被嗅探回同一格式；
//!   一旦某个编码器调整了头部（例如去掉 CBOR 自描述标签），这里会第一时间失败；
//! - **How**：用 `proptest` 生成 JSON 兼容的对象文档，经四种写出器编码后重新嗅探并解析；
//! - **What**：嗅探结果与写出格式一致，解析结果与原文档相等。

use proptest::prelude::*;
use serde_json::{Map, Number, Value, json};
use sniff_codecs::{FormatId, FormatRegistry, RegistrySettings, content_builder};
use sniff_core::{sniff_bytes, sniff_reader};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1_000_000i32..1_000_000)
            .prop_map(|n| Number::from_f64(f64::from(n) / 8.0).map_or(Value::Null, Value::Number)),
        "[a-z0-9 é]{0,80}".prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z_]{1,12}", value(), 0..8)
        .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
}

proptest! {
    #[test]
    fn every_builder_output_sniffs_back_to_its_format(doc in document()) {
        let registry = FormatRegistry::default();
        for format in FormatId::ALL {
            let mut builder = content_builder(format);
            builder.value(&doc).unwrap();
            let bytes = builder.into_bytes();

            prop_assert_eq!(sniff_bytes(&bytes), Some(format));
            let codec = registry.content_for_bytes(&bytes).unwrap();
            prop_assert_eq!(codec.format(), format);
            prop_assert_eq!(&codec.read_value(&bytes).unwrap(), &doc);
        }
    }

    #[test]
    fn streamed_documents_parse_after_sniffing(doc in document()) {
        let registry = FormatRegistry::default();
        for format in FormatId::ALL {
            let bytes = content_builder(format).value(&doc).map(|b| b.as_bytes().to_vec()).unwrap();
            prop_assert_eq!(registry.parse_reader(&bytes[..]).unwrap(), doc.clone());
        }
    }
}

#[test]
fn pretty_json_still_sniffs_as_json() {
    let registry = FormatRegistry::new(RegistrySettings {
        pretty_json: true,
        ..RegistrySettings::default()
    })
    .unwrap();
    let mut builder = registry.builder_for(FormatId::Json);
    builder.value(&json!({"nested": {"list": [1, 2]}})).unwrap();
    assert!(builder.as_bytes().starts_with(b"{\n"));
    assert_eq!(sniff_bytes(builder.as_bytes()), Some(FormatId::Json));
}

#[test]
fn sink_builders_write_through_to_the_caller() {
    let registry = FormatRegistry::default();
    let mut sink = Vec::new();
    {
        let mut builder = registry.builder_for_sink(FormatId::Compact, &mut sink);
        builder.value(&json!({"user": "kimchy"})).unwrap();
        builder.flush().unwrap();
    }
    let sniffed = sniff_reader(&sink[..]).unwrap();
    assert_eq!(sniffed.format, Some(FormatId::Compact));
    assert_eq!(sniffed.prefix, &sink[..3]);
}

#[test]
fn cbor_scalars_are_not_detectable_without_an_object_header() {
    let mut builder = content_builder(FormatId::BinaryObject);
    builder.value(&json!([1, 2, 3])).unwrap();
    // 自描述标签之后紧跟数组头，第四字节不是映射类型。
    assert_eq!(sniff_bytes(builder.as_bytes()), None);
}
