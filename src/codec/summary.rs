use indexmap::IndexMap;

use crate::codec::{put_count, put_cstr, put_i32, put_non_negative, ByteReader, DecodeError, EncodeError};
use crate::core::summary::{ClassCounts, ClassificationSummary};

/// Bytes per `(classId, weightedSum, sum)` record
const CLASS_RECORD_SIZE: usize = 12;

/// Decode a classification summary buffer.
///
/// # Errors
///
/// Returns `DecodeError::Truncated` if the buffer ends before the declared records,
/// `DecodeError::NegativeCount` for a negative record count,
/// `DecodeError::NegativeValue` for a negative count value, or
/// `DecodeError::DuplicateClassId` if a class id occurs twice.
pub fn decode_classification_summary(bytes: &[u8]) -> Result<ClassificationSummary, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    let name = reader.read_cstr()?;
    let count = reader.read_count()?;

    let mut classes = IndexMap::with_capacity(reader.capacity_for(count, CLASS_RECORD_SIZE));
    for _ in 0..count {
        let class_id = reader.read_i32()?;
        let weighted_sum = reader.read_non_negative("weightedSum")?;
        let sum = reader.read_non_negative("sum")?;

        if classes
            .insert(class_id, ClassCounts::new(weighted_sum, sum))
            .is_some()
        {
            return Err(DecodeError::DuplicateClassId(class_id));
        }
    }

    Ok(ClassificationSummary::from_parts(name, classes))
}

/// Encode a classification summary, classes in the summary's iteration order.
///
/// # Errors
///
/// Returns `EncodeError::InteriorNul` if the name contains a zero byte,
/// `EncodeError::NegativeValue` for a negative count, which decoding would reject, or
/// `EncodeError::TooLarge` if there are more classes than an `int32` can count.
pub fn encode_classification_summary(summary: &ClassificationSummary) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(summary.name().len() + 5 + CLASS_RECORD_SIZE * summary.len());

    put_cstr(&mut out, summary.name())?;
    put_count(&mut out, summary.len())?;
    for (class_id, counts) in summary.iter() {
        put_i32(&mut out, class_id);
        put_non_negative(&mut out, "weightedSum", counts.weighted_sum)?;
        put_non_negative(&mut out, "sum", counts.sum)?;
    }

    Ok(out)
}
