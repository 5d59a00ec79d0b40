use std::collections::HashMap;

/// A resource file held as a list of lines.
///
/// Every line keeps its own terminator (`\n` or `\r\n`), so rendering the
/// document back gives the original bytes for every line that was not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        self.lines.concat()
    }

    /// Line terminator used by the document, judged from its first line.
    pub fn line_ending(&self) -> &'static str {
        match self.lines.first() {
            Some(line) if line.ends_with("\r\n") => "\r\n",
            _ => "\n",
        }
    }
}

/// Captured entries of one locale, keyed by identifier.
///
/// The table itself is unordered: output order always comes from the
/// configured identifier list, see [`EntryTable::ordered`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryTable {
    entries: HashMap<String, String>,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(identifier.into(), text.into());
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Captured texts in the order of `identifiers`, skipping the ones not found.
    pub fn ordered<'a>(
        &'a self,
        identifiers: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        identifiers
            .iter()
            .filter_map(|id| self.get(id).map(|text| (id.as_str(), text)))
    }
}
