use serde::{Deserialize, Serialize};

/// A dataset hosted by a remote server, as reported by the `list` command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Server-side identifier, passed back as the `file` argument of later commands
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Whether the server refuses modifications to this dataset
    pub read_only: bool,
}

impl DatasetDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, read_only: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            read_only,
        }
    }

    /// Parse one line of a dataset listing.
    ///
    /// Lines are tab-separated `id`, `name`, `readOnly`. A line with only an id
    /// uses it as the name as well and is treated as read-only. Blank lines yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use megan_remote::core::types::DatasetDescriptor;
    ///
    /// let d = DatasetDescriptor::parse_line("ds1\tGut sample\tfalse").unwrap();
    /// assert_eq!(d.name, "Gut sample");
    /// assert!(!d.read_only);
    /// ```
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let mut fields = line.split('\t');
        let id = fields.next()?.trim();
        let name = fields
            .next()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id);
        let read_only = fields
            .next()
            .map_or(true, |flag| !flag.trim().eq_ignore_ascii_case("false"));

        Some(Self::new(id, name, read_only))
    }
}

impl std::fmt::Display for DatasetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.id == self.name {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}
