use serde::{Deserialize, Serialize};

/// One alignment of a read against a reference sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchBlock {
    /// Unique id of the match within its dataset
    pub uid: i64,

    /// Name of the reference sequence the read aligned to
    pub ref_name: String,

    pub bit_score: f32,

    pub percent_identity: f32,

    /// Expected value (e-value)
    pub expected: f64,

    /// 1-based start of the aligned part of the read
    pub aligned_query_start: i32,

    /// 1-based end of the aligned part of the read
    pub aligned_query_end: i32,

    /// Alignment text as stored by the aligner, empty when not requested
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Class assignments of this match, keyed by classification name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_ids: Vec<(String, i32)>,
}

impl MatchBlock {
    /// Class id of this match in the given classification
    #[must_use]
    pub fn class_id(&self, classification: &str) -> Option<i32> {
        self.class_ids
            .iter()
            .find(|(name, _)| name == classification)
            .map(|&(_, id)| id)
    }
}

/// A sequencing read with its alignments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadBlock {
    /// Unique id of the read within its dataset
    pub uid: i64,

    pub name: String,

    /// FASTA header line, empty when not requested
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub header: String,

    /// Read sequence, empty when not requested
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sequence: String,

    /// Read length in bases (known even when the sequence is not shipped)
    pub length: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchBlock>,
}

impl ReadBlock {
    pub fn num_matches(&self) -> usize {
        self.matches.len()
    }

    /// Highest bit score over all matches
    pub fn best_score(&self) -> Option<f32> {
        self.matches.iter().map(|m| m.bit_score).reduce(f32::max)
    }

    /// Whether any match is assigned to `class_id` in the given classification
    pub fn is_assigned_to(&self, classification: &str, class_id: i32) -> bool {
        self.matches
            .iter()
            .any(|m| m.class_id(classification) == Some(class_id))
    }
}

/// One page of read blocks as returned by a paginated server command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadPage {
    /// Cursor for the next page, `<= 0` when this is the last page
    pub next_page_id: i64,

    /// Total number of reads the server expects to deliver over all pages
    pub total: i64,

    pub blocks: Vec<ReadBlock>,
}

impl ReadPage {
    pub fn has_more(&self) -> bool {
        self.next_page_id > 0
    }
}
