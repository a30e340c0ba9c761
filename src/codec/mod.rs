//! Binary wire format for classification summaries, auxiliary data and read pages.
//!
//! All integers are little-endian two's complement, strings are raw bytes followed
//! by a single zero byte, and blobs carry an `int32` size prefix:
//!
//! | Buffer | Layout |
//! |--------|--------|
//! | Classification summary | `name\0` `count:i32` `count × (classId:i32, weightedSum:i32, sum:i32)` |
//! | Auxiliary data | `labelCount:i32` `labelCount × (label\0, size:i32, size bytes)` |
//! | Read page | `nextPageId:i64` `total:i64` `count:i32` `count × ReadBlock` |
//!
//! Decoding is atomic: a function either returns a complete value or an error,
//! never a partially filled structure. Bytes after the declared structure are ignored.
//!
//! ## Example
//!
//! ```
//! use megan_remote::codec::{decode_classification_summary, encode_classification_summary};
//! use megan_remote::core::summary::ClassificationSummary;
//!
//! let summary = ClassificationSummary::new("Taxonomy").with_class(5, 10, 3);
//! let bytes = encode_classification_summary(&summary).unwrap();
//! assert_eq!(decode_classification_summary(&bytes).unwrap(), summary);
//! ```

use thiserror::Error;

pub mod auxiliary;
pub mod reads;
pub mod summary;

pub use auxiliary::{decode_auxiliary_data, encode_auxiliary_data};
pub use reads::{decode_read_block, decode_read_page, encode_read_block, encode_read_page};
pub use summary::{decode_classification_summary, encode_classification_summary};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Buffer underflow: need {needed} more bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Negative element count: {0}")]
    NegativeCount(i32),

    #[error("Negative blob size: {0}")]
    NegativeSize(i32),

    #[error("Negative value for {field}: {value}")]
    NegativeValue { field: &'static str, value: i32 },

    #[error("String is missing its zero terminator")]
    UnterminatedString,

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Duplicate class id: {0}")]
    DuplicateClassId(i32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("String contains a zero byte and cannot be terminated: {0:?}")]
    InteriorNul(String),

    #[error("Too many elements for a 32-bit count: {0}")]
    TooLarge(usize),

    #[error("Negative value {value} for {field}")]
    NegativeValue { field: &'static str, value: i32 },
}

/// Little-endian bytes of a 32-bit integer, least significant byte first
///
/// # Examples
///
/// ```
/// assert_eq!(megan_remote::codec::int_to_bytes(0x0102_0304), [4, 3, 2, 1]);
/// ```
#[must_use]
pub fn int_to_bytes(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Little-endian bytes of a 64-bit integer, least significant byte first
#[must_use]
pub fn long_to_bytes(value: i64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Cursor over an input buffer. Every read checks the remaining length first.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn take(&mut self, needed: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if needed > available {
            return Err(DecodeError::Truncated { needed, available });
        }
        let slice = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.take_array().map(i32::from_le_bytes)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.take_array().map(i64::from_le_bytes)
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.take_array().map(f32::from_le_bytes)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.take_array().map(f64::from_le_bytes)
    }

    /// Read an `int32` element count, rejecting negative values
    pub(crate) fn read_count(&mut self) -> Result<usize, DecodeError> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| DecodeError::NegativeCount(count))
    }

    /// Read an `int32` that must not be negative
    pub(crate) fn read_non_negative(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        let value = self.read_i32()?;
        if value < 0 {
            return Err(DecodeError::NegativeValue { field, value });
        }
        Ok(value)
    }

    /// Read a zero-terminated UTF-8 string
    pub(crate) fn read_cstr(&mut self) -> Result<String, DecodeError> {
        let rest = &self.buf[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedString)?;
        let text = std::str::from_utf8(&rest[..end]).map_err(|_| DecodeError::InvalidUtf8)?;
        self.pos += end + 1;
        Ok(text.to_string())
    }

    /// Capacity to reserve for `count` records of at least `min_record_size` bytes.
    ///
    /// Bounded by what the remaining input could actually hold, so a corrupt count
    /// cannot trigger a huge allocation before the truncation is detected.
    pub(crate) fn capacity_for(&self, count: usize, min_record_size: usize) -> usize {
        count.min(self.remaining() / min_record_size.max(1))
    }
}

pub(crate) fn put_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&int_to_bytes(value));
}

pub(crate) fn put_i64(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&long_to_bytes(value));
}

pub(crate) fn put_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Write an `int32` field that decoders require to be non-negative
pub(crate) fn put_non_negative(out: &mut Vec<u8>, field: &'static str, value: i32) -> Result<(), EncodeError> {
    if value < 0 {
        return Err(EncodeError::NegativeValue { field, value });
    }
    put_i32(out, value);
    Ok(())
}

/// Write an element count or blob size as `int32`
pub(crate) fn put_count(out: &mut Vec<u8>, count: usize) -> Result<(), EncodeError> {
    let count_i32 = i32::try_from(count).map_err(|_| EncodeError::TooLarge(count))?;
    put_i32(out, count_i32);
    Ok(())
}

/// Write a string followed by its zero terminator
pub(crate) fn put_cstr(out: &mut Vec<u8>, text: &str) -> Result<(), EncodeError> {
    if text.as_bytes().contains(&0) {
        return Err(EncodeError::InteriorNul(text.to_string()));
    }
    out.extend_from_slice(text.as_bytes());
    out.push(0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_helpers_are_little_endian() {
        assert_eq!(int_to_bytes(1), [1, 0, 0, 0]);
        assert_eq!(int_to_bytes(-1), [0xff; 4]);
        assert_eq!(int_to_bytes(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(long_to_bytes(0x0102_0304_0506_0708), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(long_to_bytes(i64::MIN), [0, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn test_reader_reports_underflow() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(
            reader.read_i32(),
            Err(DecodeError::Truncated {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_reader_cstr() {
        let mut reader = ByteReader::new(b"abc\0de\0f");
        assert_eq!(reader.read_cstr().unwrap(), "abc");
        assert_eq!(reader.read_cstr().unwrap(), "de");
        assert_eq!(reader.read_cstr(), Err(DecodeError::UnterminatedString));
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_reader_rejects_invalid_utf8() {
        let mut reader = ByteReader::new(&[0xff, 0xfe, 0]);
        assert_eq!(reader.read_cstr(), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_negative_count() {
        let bytes = int_to_bytes(-3);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_count(), Err(DecodeError::NegativeCount(-3)));
    }

    #[test]
    fn test_put_non_negative() {
        let mut out = Vec::new();
        put_non_negative(&mut out, "sum", 7).unwrap();
        assert_eq!(out, [7, 0, 0, 0]);

        assert_eq!(
            put_non_negative(&mut out, "sum", -1),
            Err(EncodeError::NegativeValue { field: "sum", value: -1 })
        );
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_capacity_is_bounded_by_input() {
        let buf = [0u8; 24];
        let reader = ByteReader::new(&buf);
        assert_eq!(reader.capacity_for(1_000_000, 12), 2);
        assert_eq!(reader.capacity_for(1, 12), 1);
    }

    #[test]
    fn test_put_cstr_rejects_interior_nul() {
        let mut out = Vec::new();
        assert!(put_cstr(&mut out, "a\0b").is_err());
        assert!(out.is_empty());
        put_cstr(&mut out, "ok").unwrap();
        assert_eq!(out, b"ok\0");
    }
}
