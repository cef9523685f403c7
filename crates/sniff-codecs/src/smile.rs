//! Smile 编解码器。
//!
//! Smile 是带 `":)\n"` 魔数头的二进制 JSON 超集。这里实现其不带共享回引用的子集：
//! 写出端关闭共享名称与共享字符串，读取端遇到回引用令牌时报错。
//!
//! 令牌布局（值模式）：
//! - `0x20` 空串，`0x21`..`0x23` null/false/true，`0x24`/`0x25` 32/64 位变长整数，
//!   `0x28`/`0x29` float/double；
//! - `0x40`..`0x7F` 短 ASCII 串，`0x80`..`0xBF` 短 Unicode 串，`0xC0`..`0xDF` 小整数；
//! - `0xE0`/`0xE4` 以 `0xFC` 结尾的长串，`0xF8`/`0xF9` 数组，`0xFA`/`0xFB` 对象。
//!
//! 键模式：`0x20` 空键，`0x34` 长键，`0x80`..`0xBF` 短 ASCII 键，`0xC0`..`0xF7` 短 Unicode 键。

use std::io::Write;

use serde_json::{Map, Number, Value};
use sniff_core::FormatId;
use sniff_core::magic::{SMILE_HEADER, SMILE_VERSION_FLAGS};

use crate::codec::ContentCodec;
use crate::error::ContentError;

const TOKEN_EMPTY_STRING: u8 = 0x20;
const TOKEN_NULL: u8 = 0x21;
const TOKEN_FALSE: u8 = 0x22;
const TOKEN_TRUE: u8 = 0x23;
const TOKEN_INT32: u8 = 0x24;
const TOKEN_INT64: u8 = 0x25;
const TOKEN_FLOAT32: u8 = 0x28;
const TOKEN_FLOAT64: u8 = 0x29;
const TOKEN_TINY_ASCII: u8 = 0x40;
const TOKEN_SHORT_ASCII: u8 = 0x60;
const TOKEN_TINY_UNICODE: u8 = 0x80;
const TOKEN_SHORT_UNICODE: u8 = 0xA0;
const TOKEN_SMALL_INT: u8 = 0xC0;
const TOKEN_LONG_ASCII: u8 = 0xE0;
const TOKEN_LONG_UNICODE: u8 = 0xE4;
const TOKEN_START_ARRAY: u8 = 0xF8;
const TOKEN_END_ARRAY: u8 = 0xF9;
const TOKEN_START_OBJECT: u8 = 0xFA;
const TOKEN_END_OBJECT: u8 = 0xFB;
const TOKEN_END_STRING: u8 = 0xFC;
const TOKEN_END_CONTENT: u8 = 0xFF;

const KEY_EMPTY: u8 = 0x20;
const KEY_LONG: u8 = 0x34;
const KEY_SHORT_ASCII: u8 = 0x80;
const KEY_SHORT_UNICODE: u8 = 0xC0;

/// 嵌套深度上限，超出即视为解码失败。
const MAX_DEPTH: usize = 512;

/// Smile 编解码器。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmileCodec;

impl ContentCodec for SmileCodec {
    fn format(&self) -> FormatId {
        FormatId::Compact
    }

    fn write_value(&self, value: &Value, sink: &mut dyn Write) -> Result<(), ContentError> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(&SMILE_HEADER);
        out.push(SMILE_VERSION_FLAGS);
        write_value(value, &mut out)?;
        sink.write_all(&out)?;
        Ok(())
    }

    fn read_value(&self, data: &[u8]) -> Result<Value, ContentError> {
        SmileReader::new(data).read_document()
    }
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), ContentError> {
    match value {
        Value::Null => out.push(TOKEN_NULL),
        Value::Bool(false) => out.push(TOKEN_FALSE),
        Value::Bool(true) => out.push(TOKEN_TRUE),
        Value::Number(number) => write_number(number, out)?,
        Value::String(text) => write_string(text, out),
        Value::Array(items) => {
            out.push(TOKEN_START_ARRAY);
            for item in items {
                write_value(item, out)?;
            }
            out.push(TOKEN_END_ARRAY);
        }
        Value::Object(fields) => {
            out.push(TOKEN_START_OBJECT);
            for (key, item) in fields {
                write_key(key, out);
                write_value(item, out)?;
            }
            out.push(TOKEN_END_OBJECT);
        }
    }
    Ok(())
}

fn write_number(number: &Number, out: &mut Vec<u8>) -> Result<(), ContentError> {
    if let Some(int) = number.as_i64() {
        write_int(int, out);
    } else if number.is_u64() {
        return Err(ContentError::encode(
            FormatId::Compact,
            format!("unsigned integer {number} exceeds the 64-bit signed range"),
        ));
    } else if let Some(float) = number.as_f64() {
        out.push(TOKEN_FLOAT64);
        let bits = float.to_bits();
        for group in (0..10).rev() {
            out.push(((bits >> (group * 7)) & 0x7F) as u8);
        }
    }
    Ok(())
}

fn write_int(int: i64, out: &mut Vec<u8>) {
    if (-16..=15).contains(&int) {
        out.push(TOKEN_SMALL_INT + zigzag_encode(int) as u8);
    } else if let Ok(int32) = i32::try_from(int) {
        out.push(TOKEN_INT32);
        write_vint(zigzag_encode(i64::from(int32)), out);
    } else {
        out.push(TOKEN_INT64);
        write_vint(zigzag_encode(int), out);
    }
}

fn write_string(text: &str, out: &mut Vec<u8>) {
    let bytes = text.as_bytes();
    let len = bytes.len();
    if len == 0 {
        out.push(TOKEN_EMPTY_STRING);
        return;
    }
    let token = if text.is_ascii() {
        match len {
            1..=32 => Some(TOKEN_TINY_ASCII + (len - 1) as u8),
            33..=64 => Some(TOKEN_SHORT_ASCII + (len - 33) as u8),
            _ => None,
        }
    } else {
        match len {
            2..=33 => Some(TOKEN_TINY_UNICODE + (len - 2) as u8),
            34..=65 => Some(TOKEN_SHORT_UNICODE + (len - 34) as u8),
            _ => None,
        }
    };
    match token {
        Some(token) => {
            out.push(token);
            out.extend_from_slice(bytes);
        }
        None => {
            out.push(if text.is_ascii() {
                TOKEN_LONG_ASCII
            } else {
                TOKEN_LONG_UNICODE
            });
            out.extend_from_slice(bytes);
            out.push(TOKEN_END_STRING);
        }
    }
}

fn write_key(key: &str, out: &mut Vec<u8>) {
    let bytes = key.as_bytes();
    let len = bytes.len();
    let token = match len {
        0 => {
            out.push(KEY_EMPTY);
            return;
        }
        1..=64 if key.is_ascii() => Some(KEY_SHORT_ASCII + (len - 1) as u8),
        2..=57 if !key.is_ascii() => Some(KEY_SHORT_UNICODE + (len - 2) as u8),
        _ => None,
    };
    match token {
        Some(token) => {
            out.push(token);
            out.extend_from_slice(bytes);
        }
        None => {
            out.push(KEY_LONG);
            out.extend_from_slice(bytes);
            out.push(TOKEN_END_STRING);
        }
    }
}

/// Smile 变长整数：高位组在前，前置字节携带 7 位且最高位为 0，末字节携带 6 位且最高位为 1。
fn write_vint(value: u64, out: &mut Vec<u8>) {
    let last = 0x80 | (value & 0x3F) as u8;
    let mut rest = value >> 6;
    let mut groups = [0u8; 10];
    let mut count = 0;
    while rest != 0 {
        groups[count] = (rest & 0x7F) as u8;
        rest >>= 7;
        count += 1;
    }
    out.extend(groups[..count].iter().rev());
    out.push(last);
}

fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

struct SmileReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SmileReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_document(mut self) -> Result<Value, ContentError> {
        if !self.data.starts_with(&SMILE_HEADER) {
            return Err(self.fail("missing `:)\\n` header"));
        }
        self.pos = SMILE_HEADER.len();
        let flags = self.next_byte()?;
        if flags >> 4 != 0 {
            return Err(self.fail(format!("unsupported format version {}", flags >> 4)));
        }

        let value = self.read_value(0)?;
        match self.data.get(self.pos..) {
            Some([]) | Some([TOKEN_END_CONTENT]) | None => Ok(value),
            Some(_) => Err(self.fail("trailing bytes after document")),
        }
    }

    fn read_value(&mut self, depth: usize) -> Result<Value, ContentError> {
        if depth > MAX_DEPTH {
            return Err(self.fail("nesting depth exceeds limit"));
        }
        let token = self.next_byte()?;
        match token {
            TOKEN_EMPTY_STRING => Ok(Value::String(String::new())),
            TOKEN_NULL => Ok(Value::Null),
            TOKEN_FALSE => Ok(Value::Bool(false)),
            TOKEN_TRUE => Ok(Value::Bool(true)),
            TOKEN_INT32 | TOKEN_INT64 => {
                let raw = self.read_vint()?;
                Ok(Value::from(zigzag_decode(raw)))
            }
            TOKEN_FLOAT32 => {
                let bits = self.read_7bit_groups(5)?;
                Ok(float_value(f64::from(f32::from_bits(bits as u32))))
            }
            TOKEN_FLOAT64 => {
                let bits = self.read_7bit_groups(10)?;
                Ok(float_value(f64::from_bits(bits)))
            }
            0x40..=0x5F => self.read_text(usize::from(token - TOKEN_TINY_ASCII) + 1),
            0x60..=0x7F => self.read_text(usize::from(token - TOKEN_SHORT_ASCII) + 33),
            0x80..=0x9F => self.read_text(usize::from(token - TOKEN_TINY_UNICODE) + 2),
            0xA0..=0xBF => self.read_text(usize::from(token - TOKEN_SHORT_UNICODE) + 34),
            0xC0..=0xDF => Ok(Value::from(zigzag_decode(u64::from(token - TOKEN_SMALL_INT)))),
            TOKEN_LONG_ASCII | TOKEN_LONG_UNICODE => self.read_terminated_text().map(Value::String),
            TOKEN_START_ARRAY => {
                let mut items = Vec::new();
                loop {
                    if self.peek_byte()? == TOKEN_END_ARRAY {
                        self.pos += 1;
                        return Ok(Value::Array(items));
                    }
                    items.push(self.read_value(depth + 1)?);
                }
            }
            TOKEN_START_OBJECT => {
                let mut fields = Map::new();
                loop {
                    let key_token = self.next_byte()?;
                    let key = match key_token {
                        TOKEN_END_OBJECT => return Ok(Value::Object(fields)),
                        KEY_EMPTY => String::new(),
                        KEY_LONG => self.read_terminated_text()?,
                        0x80..=0xBF => {
                            self.read_string(usize::from(key_token - KEY_SHORT_ASCII) + 1)?
                        }
                        0xC0..=0xF7 => {
                            self.read_string(usize::from(key_token - KEY_SHORT_UNICODE) + 2)?
                        }
                        0x30..=0x33 | 0x40..=0x7F => {
                            return Err(self.fail("shared key back-references are not supported"));
                        }
                        other => {
                            return Err(self.fail(format!("invalid key token 0x{other:02X}")));
                        }
                    };
                    let item = self.read_value(depth + 1)?;
                    fields.insert(key, item);
                }
            }
            0x01..=0x1F | 0xEC..=0xEF => {
                Err(self.fail("shared string back-references are not supported"))
            }
            other => Err(self.fail(format!("unsupported value token 0x{other:02X}"))),
        }
    }

    fn next_byte(&mut self) -> Result<u8, ContentError> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    fn peek_byte(&self) -> Result<u8, ContentError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.fail("unexpected end of input"))
    }

    fn read_vint(&mut self) -> Result<u64, ContentError> {
        let mut value: u64 = 0;
        for _ in 0..10 {
            let byte = self.next_byte()?;
            if byte & 0x80 != 0 {
                return Ok((value << 6) | u64::from(byte & 0x3F));
            }
            value = (value << 7) | u64::from(byte);
        }
        Err(self.fail("variable-length integer is too long"))
    }

    fn read_7bit_groups(&mut self, count: usize) -> Result<u64, ContentError> {
        let mut value: u64 = 0;
        for _ in 0..count {
            let byte = self.next_byte()?;
            value = (value << 7) | u64::from(byte & 0x7F);
        }
        Ok(value)
    }

    fn read_text(&mut self, len: usize) -> Result<Value, ContentError> {
        self.read_string(len).map(Value::String)
    }

    fn read_string(&mut self, len: usize) -> Result<String, ContentError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.fail("string runs past end of input"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        String::from_utf8(bytes.to_vec()).map_err(|err| self.fail(err))
    }

    fn read_terminated_text(&mut self) -> Result<String, ContentError> {
        let len = self.data[self.pos..]
            .iter()
            .position(|byte| *byte == TOKEN_END_STRING)
            .ok_or_else(|| self.fail("unterminated long string"))?;
        let text = self.read_string(len)?;
        self.pos += 1;
        Ok(text)
    }

    fn fail(&self, detail: impl std::fmt::Display) -> ContentError {
        ContentError::decode(FormatId::Compact, format!("{detail} at byte {}", self.pos))
    }
}

fn float_value(float: f64) -> Value {
    Number::from_f64(float).map_or(Value::Null, Value::Number)
}
