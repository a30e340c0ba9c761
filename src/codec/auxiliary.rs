use indexmap::IndexMap;

use crate::codec::{put_count, put_cstr, ByteReader, DecodeError, EncodeError};
use crate::core::auxiliary::AuxiliaryData;

/// Smallest possible entry: empty label terminator plus the size field
const MIN_ENTRY_SIZE: usize = 5;

/// Decode an auxiliary data buffer.
///
/// A blob whose declared size exceeds the remaining input is a buffer underflow;
/// the whole decode fails and no entry is returned.
///
/// # Errors
///
/// Returns `DecodeError::Truncated` on underflow, `DecodeError::NegativeCount` or
/// `DecodeError::NegativeSize` for negative counts/sizes, or
/// `DecodeError::DuplicateLabel` if a label occurs twice.
pub fn decode_auxiliary_data(bytes: &[u8]) -> Result<AuxiliaryData, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    let count = reader.read_count()?;
    let mut entries = IndexMap::with_capacity(reader.capacity_for(count, MIN_ENTRY_SIZE));

    for _ in 0..count {
        let label = reader.read_cstr()?;
        let size = reader.read_i32()?;
        let size = usize::try_from(size).map_err(|_| DecodeError::NegativeSize(size))?;
        let data = reader.take(size)?.to_vec();

        if entries.contains_key(&label) {
            return Err(DecodeError::DuplicateLabel(label));
        }
        entries.insert(label, data);
    }

    Ok(AuxiliaryData::from_entries(entries))
}

/// Encode auxiliary data, entries in the map's iteration order.
///
/// # Errors
///
/// Returns `EncodeError::InteriorNul` if a label contains a zero byte, or
/// `EncodeError::TooLarge` if a count or blob size does not fit in an `int32`.
pub fn encode_auxiliary_data(data: &AuxiliaryData) -> Result<Vec<u8>, EncodeError> {
    let payload: usize = data
        .iter()
        .map(|(label, blob)| label.len() + MIN_ENTRY_SIZE + blob.len())
        .sum();
    let mut out = Vec::with_capacity(4 + payload);

    put_count(&mut out, data.len())?;
    for (label, blob) in data.iter() {
        put_cstr(&mut out, label)?;
        put_count(&mut out, blob.len())?;
        out.extend_from_slice(blob);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::int_to_bytes;

    fn sample() -> AuxiliaryData {
        [
            ("UserState", b"nodes=1,2,3".to_vec()),
            ("Empty", Vec::new()),
            ("Binary", (0..=255).collect::<Vec<u8>>()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_round_trip() {
        let data = sample();
        let bytes = encode_auxiliary_data(&data).unwrap();
        let decoded = decode_auxiliary_data(&bytes).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(
            decoded.labels().collect::<Vec<_>>(),
            vec!["UserState", "Empty", "Binary"]
        );
        assert_eq!(decoded.get("Empty"), Some(&[][..]));
    }

    #[test]
    fn test_blob_with_zero_bytes() {
        let mut data = AuxiliaryData::new();
        data.insert("SampleAttributes", vec![0, 0, 1, 0]);
        let bytes = encode_auxiliary_data(&data).unwrap();
        assert_eq!(decode_auxiliary_data(&bytes).unwrap(), data);
    }

    #[test]
    fn test_exact_layout() {
        let mut data = AuxiliaryData::new();
        data.insert("ab", vec![9, 8]);
        let bytes = encode_auxiliary_data(&data).unwrap();

        let mut expected = int_to_bytes(1).to_vec();
        expected.extend_from_slice(b"ab\0");
        expected.extend_from_slice(&int_to_bytes(2));
        expected.extend_from_slice(&[9, 8]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_empty_map() {
        let bytes = encode_auxiliary_data(&AuxiliaryData::new()).unwrap();
        assert_eq!(bytes, [0, 0, 0, 0]);
        assert!(decode_auxiliary_data(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_every_truncation_is_rejected() {
        let bytes = encode_auxiliary_data(&sample()).unwrap();
        for len in 0..bytes.len() {
            assert!(
                decode_auxiliary_data(&bytes[..len]).is_err(),
                "truncation at {len} bytes was accepted"
            );
        }
    }

    #[test]
    fn test_short_blob_is_underflow() {
        let mut bytes = int_to_bytes(1).to_vec();
        bytes.extend_from_slice(b"label\0");
        bytes.extend_from_slice(&int_to_bytes(10));
        bytes.extend_from_slice(&[1, 2, 3]);

        assert_eq!(
            decode_auxiliary_data(&bytes),
            Err(DecodeError::Truncated {
                needed: 10,
                available: 3
            })
        );
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let mut bytes = int_to_bytes(1).to_vec();
        bytes.extend_from_slice(b"x\0");
        bytes.extend_from_slice(&int_to_bytes(-4));
        assert_eq!(decode_auxiliary_data(&bytes), Err(DecodeError::NegativeSize(-4)));
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        let mut bytes = int_to_bytes(2).to_vec();
        for _ in 0..2 {
            bytes.extend_from_slice(b"dup\0");
            bytes.extend_from_slice(&int_to_bytes(0));
        }
        assert_eq!(
            decode_auxiliary_data(&bytes),
            Err(DecodeError::DuplicateLabel("dup".to_string()))
        );
    }

    #[test]
    fn test_label_with_zero_byte_cannot_be_encoded() {
        let mut data = AuxiliaryData::new();
        data.insert("bad\0label", vec![1]);
        assert!(matches!(
            encode_auxiliary_data(&data),
            Err(EncodeError::InteriorNul(_))
        ));
    }
}
