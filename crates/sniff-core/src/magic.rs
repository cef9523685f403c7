//! 魔数与阈值常量。
//!
//! 这些值必须与各格式的线上编码逐位一致，任何改动都会让既有数据的嗅探结论发生变化。

/// 嗅探窗口长度：最多检查输入开头的 20 个单元（字节或字符）。
pub const GUESS_HEADER_LENGTH: usize = 20;

/// JSON 对象起始字符。
pub const OBJECT_START: u8 = b'{';

/// Smile 魔数头 `":)\n"`。
pub const SMILE_HEADER: [u8; 3] = [0x3A, 0x29, 0x0A];

/// Smile 写出端在魔数头之后追加的版本/标志字节：版本 0，不启用共享名称与共享字符串。
pub const SMILE_VERSION_FLAGS: u8 = 0x00;

/// YAML 文档起始标记。
pub const YAML_DOCUMENT_START: [u8; 3] = *b"---";

/// CBOR 主类型掩码（高 3 位）。
pub const CBOR_MAJOR_TYPE_MASK: u8 = 0xE0;

/// CBOR 主类型 6：标签。
pub const CBOR_MAJOR_TYPE_TAG: u8 = 6 << 5;

/// CBOR 主类型 5：映射（对象）。
pub const CBOR_MAJOR_TYPE_OBJECT: u8 = 5 << 5;

/// CBOR 自描述标签值 55799。
pub const CBOR_TAG_SELF_DESCRIBE: u16 = 0xD9F7;

/// 自描述标签的标准编码：`0xD9` 表示“标签 + 2 字节参数”，随后是 `0xD9F7`。
pub const CBOR_SELF_DESCRIBE_PREFIX: [u8; 3] = [0xD9, 0xD9, 0xF7];

/// 判断字节的高 3 位是否为给定主类型。
#[inline]
pub const fn has_major_type(major: u8, byte: u8) -> bool {
    byte & CBOR_MAJOR_TYPE_MASK == major
}

/// 判断四个字节是否构成“自描述标签 + 对象”的 CBOR 头。
///
/// - `b0` 必须是标签主类型；
/// - `(b1 << 8) | b2` 必须等于 [`CBOR_TAG_SELF_DESCRIBE`]；
/// - `b3` 是首个真实值的头字节，必须是对象主类型，相当于 JSON 的前导 `{`。
#[inline]
pub const fn is_cbor_object_header(b0: u8, b1: u8, b2: u8, b3: u8) -> bool {
    has_major_type(CBOR_MAJOR_TYPE_TAG, b0)
        && u16::from_be_bytes([b1, b2]) == CBOR_TAG_SELF_DESCRIBE
        && has_major_type(CBOR_MAJOR_TYPE_OBJECT, b3)
}
