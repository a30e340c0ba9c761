use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Counts recorded for one class of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Read count weighted by read magnitude
    pub weighted_sum: i32,

    /// Plain read count
    pub sum: i32,
}

impl ClassCounts {
    #[must_use]
    pub fn new(weighted_sum: i32, sum: i32) -> Self {
        Self { weighted_sum, sum }
    }
}

/// Per-class counts for one classification scheme of a dataset.
///
/// Class ids are unique. Iteration follows insertion order, which is also the
/// order used when the summary is encoded, so a decoded summary re-encodes to
/// the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    name: String,
    classes: IndexMap<i32, ClassCounts>,
}

impl ClassificationSummary {
    /// Create an empty summary for the named classification
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: IndexMap::new(),
        }
    }

    pub(crate) fn from_parts(name: String, classes: IndexMap<i32, ClassCounts>) -> Self {
        Self { name, classes }
    }

    /// Add a class, replacing the counts if the class id is already present
    #[must_use]
    pub fn with_class(mut self, class_id: i32, weighted_sum: i32, sum: i32) -> Self {
        self.classes
            .insert(class_id, ClassCounts::new(weighted_sum, sum));
        self
    }

    /// Name of the classification, e.g. "Taxonomy"
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, class_id: i32) -> Option<ClassCounts> {
        self.classes.get(&class_id).copied()
    }

    /// Weighted count for a class, zero when the class is absent
    pub fn weighted_sum(&self, class_id: i32) -> i32 {
        self.get(class_id).map_or(0, |c| c.weighted_sum)
    }

    /// Plain count for a class, zero when the class is absent
    pub fn sum(&self, class_id: i32) -> i32 {
        self.get(class_id).map_or(0, |c| c.sum)
    }

    pub fn contains(&self, class_id: i32) -> bool {
        self.classes.contains_key(&class_id)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.classes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, ClassCounts)> + '_ {
        self.classes.iter().map(|(&id, &counts)| (id, counts))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Sum of the plain counts over all classes
    pub fn total(&self) -> i64 {
        self.classes.values().map(|c| i64::from(c.sum)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_missing_class_is_zero() {
        let summary = ClassificationSummary::new("Taxonomy").with_class(5, 10, 3);
        assert_eq!(summary.weighted_sum(5), 10);
        assert_eq!(summary.sum(5), 3);
        assert_eq!(summary.weighted_sum(6), 0);
        assert_eq!(summary.sum(6), 0);
        assert!(!summary.contains(6));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let summary = ClassificationSummary::new("SEED")
            .with_class(9, 1, 1)
            .with_class(2, 1, 1)
            .with_class(5, 1, 1);
        assert_eq!(summary.class_ids().collect::<Vec<_>>(), vec![9, 2, 5]);
    }

    #[test]
    fn test_total() {
        let summary = ClassificationSummary::new("Taxonomy")
            .with_class(1, 4, i32::MAX)
            .with_class(2, 4, 2);
        assert_eq!(summary.total(), i64::from(i32::MAX) + 2);
        assert_eq!(summary.len(), 2);
    }
}
