//! # Application-Tag Codec
//!
//! Wire encoding for the primitive kinds this core produces itself:
//! enumerated and unsigned codes, booleans, nulls and character strings.
//!
//! ## Format
//!
//! ```text
//! +-----------+-------+-----------+      +----------------------+
//! | tag (4b)  | class | L/V/T (3b)|  ->  | content octets       |
//! +-----------+-------+-----------+      +----------------------+
//!   bits 7..4   bit 3   bits 2..0
//! ```
//!
//! - class is `0` (application) for everything written here;
//! - `L/V/T` 0..=4 is the content length, `5` means an extended length follows;
//! - booleans carry their value in `L/V/T` and have no content.
//!
//! Enumerated and unsigned values use the same content: the code as
//! big-endian octets with leading zero octets dropped (at least one octet).
//!
//! ```rust
//! use bacnet_objects::codec;
//! use bacnet_objects::{Enumerated, FileAccessMethod};
//!
//! let mut buf = Vec::new();
//! codec::encode_enumerated(&mut buf, FileAccessMethod::STREAM_ACCESS);
//! assert_eq!(buf, [0x91, 0x01]);
//!
//! // Undeclared codes decode just as well.
//! let mut input: &[u8] = &[0x92, 0x01, 0x2c];
//! let method: FileAccessMethod = codec::decode_enumerated(&mut input).unwrap();
//! assert_eq!(method.code(), 300);
//! assert_eq!(method.name(), None);
//! ```

use crate::{DecodeError, Enumerated};

/// Application tag numbers.
pub mod tag {
    /// Null.
    pub const NULL: u8 = 0;
    /// Boolean.
    pub const BOOLEAN: u8 = 1;
    /// Unsigned integer.
    pub const UNSIGNED: u8 = 2;
    /// Character string.
    pub const CHARACTER_STRING: u8 = 7;
    /// Enumerated.
    pub const ENUMERATED: u8 = 9;
}

/// Character set code for UTF-8 strings.
pub const CHARSET_UTF8: u8 = 0;

const CONTEXT_CLASS: u8 = 0x08;
const EXTENDED_LENGTH: u8 = 5;

/// A decoded tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    /// Application tag number.
    pub tag: u8,
    /// Content length, or for booleans the value itself.
    pub length_value_type: usize,
}

/// Append an enumerated value.
pub fn encode_enumerated<E: Enumerated>(buf: &mut Vec<u8>, value: E) {
    encode_unsigned_content(buf, tag::ENUMERATED, u64::from(value.code()));
}

/// Read an enumerated value. Any well-formed code succeeds.
///
/// # Errors
///
/// - [`DecodeError::UnexpectedTag`] if the next value is not enumerated
/// - [`DecodeError::InvalidLength`] if the content exceeds 4 octets
/// - [`DecodeError::UnexpectedEnd`] if the buffer is truncated
pub fn decode_enumerated<E: Enumerated>(input: &mut &[u8]) -> Result<E, DecodeError> {
    let code = decode_unsigned_content(input, tag::ENUMERATED, 4)?;
    // At most 4 octets were read.
    Ok(E::for_id(code as u32))
}

/// Append an unsigned integer.
pub fn encode_unsigned(buf: &mut Vec<u8>, value: u64) {
    encode_unsigned_content(buf, tag::UNSIGNED, value);
}

/// Read an unsigned integer.
///
/// # Errors
///
/// Same as [`decode_enumerated`], with an 8-octet limit.
pub fn decode_unsigned(input: &mut &[u8]) -> Result<u64, DecodeError> {
    decode_unsigned_content(input, tag::UNSIGNED, 8)
}

/// Append a boolean.
pub fn encode_boolean(buf: &mut Vec<u8>, value: bool) {
    buf.push((tag::BOOLEAN << 4) | u8::from(value));
}

/// Read a boolean.
pub fn decode_boolean(input: &mut &[u8]) -> Result<bool, DecodeError> {
    let header = expect_header(input, tag::BOOLEAN)?;
    match header.length_value_type {
        0 => Ok(false),
        1 => Ok(true),
        length => Err(DecodeError::InvalidLength {
            tag: tag::BOOLEAN,
            length,
        }),
    }
}

/// Append a null.
pub fn encode_null(buf: &mut Vec<u8>) {
    buf.push(tag::NULL << 4);
}

/// Read a null.
pub fn decode_null(input: &mut &[u8]) -> Result<(), DecodeError> {
    let header = expect_header(input, tag::NULL)?;
    if header.length_value_type != 0 {
        return Err(DecodeError::InvalidLength {
            tag: tag::NULL,
            length: header.length_value_type,
        });
    }
    Ok(())
}

/// Append a UTF-8 character string.
pub fn encode_character_string(buf: &mut Vec<u8>, value: &str) {
    write_header(buf, tag::CHARACTER_STRING, value.len() + 1);
    buf.push(CHARSET_UTF8);
    buf.extend_from_slice(value.as_bytes());
}

/// Read a UTF-8 character string.
///
/// # Errors
///
/// - [`DecodeError::UnsupportedCharset`] for any character set but UTF-8
/// - [`DecodeError::InvalidUtf8`] if the octets are not UTF-8
pub fn decode_character_string(input: &mut &[u8]) -> Result<String, DecodeError> {
    let header = expect_header(input, tag::CHARACTER_STRING)?;
    if header.length_value_type == 0 {
        return Err(DecodeError::InvalidLength {
            tag: tag::CHARACTER_STRING,
            length: 0,
        });
    }
    let content = take(input, header.length_value_type)?;
    let (charset, text) = (content[0], &content[1..]);
    if charset != CHARSET_UTF8 {
        return Err(DecodeError::UnsupportedCharset(charset));
    }
    String::from_utf8(text.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
}

/// Read the next tag header without consuming it.
pub fn peek_header(input: &[u8]) -> Result<TagHeader, DecodeError> {
    let mut cursor = input;
    read_header(&mut cursor)
}

fn encode_unsigned_content(buf: &mut Vec<u8>, tag: u8, value: u64) {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);
    write_header(buf, tag, bytes.len() - skip);
    buf.extend_from_slice(&bytes[skip..]);
}

fn decode_unsigned_content(input: &mut &[u8], tag: u8, max_len: usize) -> Result<u64, DecodeError> {
    let header = expect_header(input, tag)?;
    let length = header.length_value_type;
    if length == 0 || length > max_len {
        return Err(DecodeError::InvalidLength { tag, length });
    }
    let content = take(input, length)?;
    Ok(content.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

fn write_header(buf: &mut Vec<u8>, tag: u8, length: usize) {
    if length < EXTENDED_LENGTH as usize {
        buf.push((tag << 4) | length as u8);
        return;
    }
    buf.push((tag << 4) | EXTENDED_LENGTH);
    if length <= 253 {
        buf.push(length as u8);
    } else if let Ok(short) = u16::try_from(length) {
        buf.push(254);
        buf.extend_from_slice(&short.to_be_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&(length as u32).to_be_bytes());
    }
}

fn expect_header(input: &mut &[u8], expected: u8) -> Result<TagHeader, DecodeError> {
    let header = read_header(input)?;
    if header.tag != expected {
        return Err(DecodeError::UnexpectedTag {
            expected,
            found: header.tag,
        });
    }
    Ok(header)
}

fn read_header(input: &mut &[u8]) -> Result<TagHeader, DecodeError> {
    let first = take(input, 1)?[0];
    let tag = first >> 4;
    if first & CONTEXT_CLASS != 0 {
        return Err(DecodeError::ContextTag { tag });
    }
    let lvt = first & 0x07;
    if tag == tag::BOOLEAN || lvt < EXTENDED_LENGTH {
        return Ok(TagHeader {
            tag,
            length_value_type: lvt as usize,
        });
    }
    if lvt > EXTENDED_LENGTH {
        // Opening/closing markers only appear on context tags.
        return Err(DecodeError::InvalidLength {
            tag,
            length: lvt as usize,
        });
    }
    let length = match take(input, 1)?[0] {
        254 => {
            let b = take(input, 2)?;
            u16::from_be_bytes([b[0], b[1]]) as usize
        }
        255 => {
            let b = take(input, 4)?;
            u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize
        }
        short => short as usize,
    };
    Ok(TagHeader {
        tag,
        length_value_type: length,
    })
}

fn take<'a>(input: &mut &'a [u8], needed: usize) -> Result<&'a [u8], DecodeError> {
    if input.len() < needed {
        return Err(DecodeError::UnexpectedEnd {
            needed,
            remaining: input.len(),
        });
    }
    let (head, tail) = input.split_at(needed);
    *input = tail;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCode, EscalatorOperationDirection, PropertyIdentifier};

    #[test]
    fn enumerated_uses_minimal_octets() {
        let mut buf = Vec::new();
        encode_enumerated(&mut buf, EscalatorOperationDirection::STOPPED);
        assert_eq!(buf, [0x91, 0x01]);

        buf.clear();
        encode_enumerated(&mut buf, PropertyIdentifier::RECORD_COUNT);
        assert_eq!(buf, [0x91, 141]);

        buf.clear();
        encode_enumerated(&mut buf, PropertyIdentifier::PROPERTY_LIST);
        assert_eq!(buf, [0x92, 0x01, 0x73]);
    }

    #[test]
    fn enumerated_zero_has_one_octet() {
        let mut buf = Vec::new();
        encode_enumerated(&mut buf, EscalatorOperationDirection::UNKNOWN);
        assert_eq!(buf, [0x91, 0x00]);
    }

    #[test]
    fn undeclared_enumerated_decodes() {
        let mut buf = Vec::new();
        encode_enumerated(&mut buf, ErrorCode::for_id(70_000));
        let mut input = buf.as_slice();
        let code: ErrorCode = decode_enumerated(&mut input).unwrap();
        assert_eq!(code, ErrorCode::for_id(70_000));
        assert_eq!(code.name(), None);
        assert!(input.is_empty());
    }

    #[test]
    fn enumerated_rejects_wrong_tag() {
        let mut input: &[u8] = &[0x21, 0x05];
        let err = decode_enumerated::<ErrorCode>(&mut input).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedTag {
                expected: tag::ENUMERATED,
                found: tag::UNSIGNED
            }
        );
    }

    #[test]
    fn enumerated_rejects_oversized_content() {
        let mut input: &[u8] = &[0x95, 0x05, 1, 2, 3, 4, 5];
        assert!(matches!(
            decode_enumerated::<ErrorCode>(&mut input),
            Err(DecodeError::InvalidLength { length: 5, .. })
        ));
    }

    #[test]
    fn truncated_input_reports_remaining() {
        let mut input: &[u8] = &[0x93, 0x01];
        assert_eq!(
            decode_unsigned_content(&mut input, tag::ENUMERATED, 4),
            Err(DecodeError::UnexpectedEnd {
                needed: 3,
                remaining: 1
            })
        );
    }

    #[test]
    fn context_tag_is_rejected() {
        let mut input: &[u8] = &[0x09, 0x01];
        assert_eq!(
            decode_unsigned(&mut input),
            Err(DecodeError::ContextTag { tag: 0 })
        );
    }

    #[test]
    fn unsigned_max_value() {
        let mut buf = Vec::new();
        encode_unsigned(&mut buf, u64::MAX);
        assert_eq!(buf[0], 0x25);
        assert_eq!(buf[1], 8);
        let mut input = buf.as_slice();
        assert_eq!(decode_unsigned(&mut input).unwrap(), u64::MAX);
    }

    #[test]
    fn boolean_and_null() {
        let mut buf = Vec::new();
        encode_boolean(&mut buf, true);
        encode_boolean(&mut buf, false);
        encode_null(&mut buf);
        assert_eq!(buf, [0x11, 0x10, 0x00]);

        let mut input = buf.as_slice();
        assert!(decode_boolean(&mut input).unwrap());
        assert!(!decode_boolean(&mut input).unwrap());
        decode_null(&mut input).unwrap();
    }

    #[test]
    fn character_string_extended_length() {
        let text = "firmware-image.bin";
        let mut buf = Vec::new();
        encode_character_string(&mut buf, text);
        assert_eq!(buf[0], 0x75);
        assert_eq!(buf[1] as usize, text.len() + 1);
        assert_eq!(buf[2], CHARSET_UTF8);

        let mut input = buf.as_slice();
        assert_eq!(decode_character_string(&mut input).unwrap(), text);
    }

    #[test]
    fn character_string_long_length() {
        let text = "x".repeat(300);
        let mut buf = Vec::new();
        encode_character_string(&mut buf, &text);
        assert_eq!(&buf[..4], &[0x75, 254, 0x01, 0x2d]);
        let mut input = buf.as_slice();
        assert_eq!(decode_character_string(&mut input).unwrap(), text);
    }

    #[test]
    fn character_string_other_charset() {
        let mut input: &[u8] = &[0x73, 0x04, b'h', b'i'];
        assert_eq!(
            decode_character_string(&mut input),
            Err(DecodeError::UnsupportedCharset(4))
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let input: &[u8] = &[0x91, 0x02];
        let header = peek_header(input).unwrap();
        assert_eq!(header.tag, tag::ENUMERATED);
        assert_eq!(header.length_value_type, 1);
        assert_eq!(input.len(), 2);
    }
}
