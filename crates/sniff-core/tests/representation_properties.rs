//! 三种输入形态的一致性性质验证。
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：嗅探规则只有一套，字节切片、字符序列、一次性字节流必须对相同前缀给出相同结论；
//!   唯一例外是 CBOR 不会从字符序列中识别。
//! - **设计手法 (How)**：同一组金样向量依次送入全部适配器；再以 Proptest 随机生成输入，断言窗口外数据不影响结论、
//!   流式嗅探消费的字节是输入的前缀且不超过窗口。
//! - **合同 (What)**：任一性质失败都会给出最小化后的反例输入，直接指向出现分歧的适配器。

use proptest::prelude::*;
use sniff_core::magic::{CBOR_SELF_DESCRIBE_PREFIX, SMILE_HEADER};
use sniff_core::{FormatId, GUESS_HEADER_LENGTH, sniff_bytes, sniff_range, sniff_reader, sniff_str};

/// 金样向量：输入与期望结论。
const VECTORS: &[(&[u8], Option<FormatId>)] = &[
    (b"{}", Some(FormatId::Json)),
    (b"{", Some(FormatId::Json)),
    (b"  {\"a\":1}", Some(FormatId::Json)),
    (b" {", Some(FormatId::Json)),
    (b"\r\n\t{\"k\":[1,2]}", Some(FormatId::Json)),
    (b":)\n\x00\xFA\xFB", Some(FormatId::Compact)),
    (b":)\n", Some(FormatId::Compact)),
    (b"---\nkey: 1", Some(FormatId::Yaml)),
    (b"---", Some(FormatId::Yaml)),
    (b"\xD9\xD9\xF7\xA1\x61a\x01", Some(FormatId::BinaryObject)),
    (b"\xD9\xD9\xF7\xBF\xFF", Some(FormatId::BinaryObject)),
    (b"\xD9\xD9\xF7\x81\x01", None),
    (b"\xD9\xD9\xF7", None),
    (b"", None),
    (b"x", None),
    (b"xy", None),
    (b"--", None),
    (b"key: value\n", None),
    (b"01234567890123456789{", None),
    (b"0123456789012345678{", Some(FormatId::Json)),
];

fn stream_verdict(data: &[u8]) -> Option<FormatId> {
    sniff_reader(data).expect("in-memory reader never fails").format
}

#[test]
fn golden_vectors_agree_across_byte_adapters() {
    for (input, expected) in VECTORS {
        assert_eq!(sniff_bytes(input), *expected, "slice: {input:?}");
        assert_eq!(stream_verdict(input), *expected, "stream: {input:?}");
        assert_eq!(
            sniff_range(input, 0, input.len()),
            Ok(*expected),
            "range: {input:?}"
        );
    }
}

#[test]
fn golden_vectors_agree_for_text_except_cbor() {
    for (input, expected) in VECTORS {
        let Ok(text) = core::str::from_utf8(input) else {
            continue;
        };
        let expected = expected.filter(|format| *format != FormatId::BinaryObject);
        assert_eq!(sniff_str(text), expected, "chars: {text:?}");
    }
}

#[test]
fn embedded_range_matches_standalone_slice() {
    for (input, expected) in VECTORS {
        let mut padded = b"##".to_vec();
        padded.extend_from_slice(input);
        padded.extend_from_slice(b"{tail}");
        assert_eq!(sniff_range(&padded, 2, input.len()), Ok(*expected));
    }
}

#[test]
fn stream_replay_restores_consumed_bytes() {
    let data = b"---\nname: sniff\n";
    let sniffed = sniff_reader(&data[..]).unwrap();
    assert_eq!(sniffed.format, Some(FormatId::Yaml));

    let mut rest = &data[sniffed.prefix.len()..];
    let mut restored = Vec::new();
    std::io::Read::read_to_end(&mut sniffed.replay(&mut rest), &mut restored).unwrap();
    assert_eq!(restored, data);
}

fn ascii_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..0x80, 0..max_len)
}

proptest! {
    #[test]
    fn prop_slice_and_stream_agree(data in proptest::collection::vec(any::<u8>(), 0..48)) {
        prop_assert_eq!(sniff_bytes(&data), stream_verdict(&data));
    }

    #[test]
    fn prop_text_agrees_with_bytes_for_ascii(data in ascii_bytes(48)) {
        let text = String::from_utf8(data.clone()).unwrap();
        prop_assert_eq!(sniff_str(&text), sniff_bytes(&data));
    }

    #[test]
    fn prop_text_never_reports_cbor(text in ".{0,40}") {
        prop_assert_ne!(sniff_str(&text), Some(FormatId::BinaryObject));
    }

    #[test]
    fn prop_bytes_past_the_window_are_ignored(
        head in proptest::collection::vec(any::<u8>(), GUESS_HEADER_LENGTH),
        tail_a in proptest::collection::vec(any::<u8>(), 0..16),
        tail_b in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut a = head.clone();
        a.extend_from_slice(&tail_a);
        let mut b = head;
        b.extend_from_slice(&tail_b);
        prop_assert_eq!(sniff_bytes(&a), sniff_bytes(&b));
        prop_assert_eq!(stream_verdict(&a), stream_verdict(&b));
    }

    #[test]
    fn prop_leading_brace_is_json(tail in proptest::collection::vec(any::<u8>(), 0..32)) {
        let mut data = vec![b'{'];
        data.extend_from_slice(&tail);
        prop_assert_eq!(sniff_bytes(&data), Some(FormatId::Json));
        prop_assert_eq!(stream_verdict(&data), Some(FormatId::Json));
    }

    #[test]
    fn prop_magic_headers_win(tail in proptest::collection::vec(any::<u8>(), 0..32)) {
        let mut smile = SMILE_HEADER.to_vec();
        smile.extend_from_slice(&tail);
        prop_assert_eq!(sniff_bytes(&smile), Some(FormatId::Compact));

        let mut yaml = b"---".to_vec();
        yaml.extend_from_slice(&tail);
        prop_assert_eq!(sniff_bytes(&yaml), Some(FormatId::Yaml));
    }

    #[test]
    fn prop_cbor_object_header_wins(
        map_header in 0xA0u8..=0xBF,
        tail in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut data = CBOR_SELF_DESCRIBE_PREFIX.to_vec();
        data.push(map_header);
        data.extend_from_slice(&tail);
        prop_assert_eq!(sniff_bytes(&data), Some(FormatId::BinaryObject));
        prop_assert_eq!(stream_verdict(&data), Some(FormatId::BinaryObject));
    }

    #[test]
    fn prop_stream_consumes_a_bounded_prefix(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let sniffed = sniff_reader(&data[..]).unwrap();
        prop_assert!(sniffed.prefix.len() <= GUESS_HEADER_LENGTH);
        prop_assert_eq!(&data[..sniffed.prefix.len()], &sniffed.prefix[..]);
    }
}
