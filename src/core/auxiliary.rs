use indexmap::IndexMap;

/// Named binary blobs attached to a dataset (user state, sample attributes, ...).
///
/// Labels are unique and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuxiliaryData {
    entries: IndexMap<String, Vec<u8>>,
}

impl AuxiliaryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: IndexMap<String, Vec<u8>>) -> Self {
        Self { entries }
    }

    /// Insert a blob, returning the previous value for the label
    pub fn insert(&mut self, label: impl Into<String>, data: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.entries.insert(label.into(), data.into())
    }

    pub fn get(&self, label: &str) -> Option<&[u8]> {
        self.entries.get(label).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, D: Into<Vec<u8>>> FromIterator<(L, D)> for AuxiliaryData {
    fn from_iter<I: IntoIterator<Item = (L, D)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(label, data)| (label.into(), data.into()))
                .collect(),
        }
    }
}
