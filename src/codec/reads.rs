//! Read blocks and read pages.
//!
//! ```text
//! MatchBlock: uid:i64 refName\0 bitScore:f32 percentIdentity:f32 expected:f64
//!             alignedQueryStart:i32 alignedQueryEnd:i32 text\0
//!             classCount:i32 classCount × (classification\0 classId:i32)
//! ReadBlock:  uid:i64 name\0 header\0 sequence\0 length:i32
//!             matchCount:i32 matchCount × MatchBlock
//! ReadPage:   nextPageId:i64 total:i64 count:i32 count × ReadBlock
//! ```

use crate::codec::{
    put_count, put_cstr, put_f32, put_f64, put_i32, put_i64, put_non_negative, ByteReader, DecodeError,
    EncodeError,
};
use crate::core::reads::{MatchBlock, ReadBlock, ReadPage};

const MIN_MATCH_SIZE: usize = 38;
const MIN_READ_SIZE: usize = 19;

/// Decode a single read block, as returned by `getRead`
///
/// # Errors
///
/// Returns a `DecodeError` if the buffer is truncated or malformed.
pub fn decode_read_block(bytes: &[u8]) -> Result<ReadBlock, DecodeError> {
    read_block(&mut ByteReader::new(bytes))
}

/// Decode one page of read blocks
///
/// # Errors
///
/// Returns a `DecodeError` if the buffer is truncated or malformed.
pub fn decode_read_page(bytes: &[u8]) -> Result<ReadPage, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    let next_page_id = reader.read_i64()?;
    let total = reader.read_i64()?;
    let count = reader.read_count()?;

    let mut blocks = Vec::with_capacity(reader.capacity_for(count, MIN_READ_SIZE));
    for _ in 0..count {
        blocks.push(read_block(&mut reader)?);
    }

    Ok(ReadPage {
        next_page_id,
        total,
        blocks,
    })
}

fn read_block(reader: &mut ByteReader<'_>) -> Result<ReadBlock, DecodeError> {
    let uid = reader.read_i64()?;
    let name = reader.read_cstr()?;
    let header = reader.read_cstr()?;
    let sequence = reader.read_cstr()?;
    let length = reader.read_non_negative("length")?;

    let count = reader.read_count()?;
    let mut matches = Vec::with_capacity(reader.capacity_for(count, MIN_MATCH_SIZE));
    for _ in 0..count {
        matches.push(read_match(reader)?);
    }

    Ok(ReadBlock {
        uid,
        name,
        header,
        sequence,
        length,
        matches,
    })
}

fn read_match(reader: &mut ByteReader<'_>) -> Result<MatchBlock, DecodeError> {
    let uid = reader.read_i64()?;
    let ref_name = reader.read_cstr()?;
    let bit_score = reader.read_f32()?;
    let percent_identity = reader.read_f32()?;
    let expected = reader.read_f64()?;
    let aligned_query_start = reader.read_i32()?;
    let aligned_query_end = reader.read_i32()?;
    let text = reader.read_cstr()?;

    let count = reader.read_count()?;
    let mut class_ids = Vec::with_capacity(reader.capacity_for(count, 5));
    for _ in 0..count {
        let classification = reader.read_cstr()?;
        let class_id = reader.read_i32()?;
        class_ids.push((classification, class_id));
    }

    Ok(MatchBlock {
        uid,
        ref_name,
        bit_score,
        percent_identity,
        expected,
        aligned_query_start,
        aligned_query_end,
        text,
        class_ids,
    })
}

/// Encode a single read block
///
/// # Errors
///
/// Returns an `EncodeError` if a string contains a zero byte, a read length is
/// negative or a list is too long.
pub fn encode_read_block(block: &ReadBlock) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    put_block(&mut out, block)?;
    Ok(out)
}

/// Encode one page of read blocks
///
/// # Errors
///
/// Returns an `EncodeError` if a string contains a zero byte, a read length is
/// negative or a list is too long.
pub fn encode_read_page(page: &ReadPage) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    put_i64(&mut out, page.next_page_id);
    put_i64(&mut out, page.total);
    put_count(&mut out, page.blocks.len())?;
    for block in &page.blocks {
        put_block(&mut out, block)?;
    }
    Ok(out)
}

fn put_block(out: &mut Vec<u8>, block: &ReadBlock) -> Result<(), EncodeError> {
    put_i64(out, block.uid);
    put_cstr(out, &block.name)?;
    put_cstr(out, &block.header)?;
    put_cstr(out, &block.sequence)?;
    put_non_negative(out, "length", block.length)?;
    put_count(out, block.matches.len())?;
    for m in &block.matches {
        put_i64(out, m.uid);
        put_cstr(out, &m.ref_name)?;
        put_f32(out, m.bit_score);
        put_f32(out, m.percent_identity);
        put_f64(out, m.expected);
        put_i32(out, m.aligned_query_start);
        put_i32(out, m.aligned_query_end);
        put_cstr(out, &m.text)?;
        put_count(out, m.class_ids.len())?;
        for (classification, class_id) in &m.class_ids {
            put_cstr(out, classification)?;
            put_i32(out, *class_id);
        }
    }
    Ok(())
}
