//! Permissive CSV parsing for the catalogue feed.
//!
//! The feed is hand-maintained upstream and not always consistent about
//! quoting or line endings, so the parser accepts anything and returns
//! whatever fields it could capture rather than failing.

mod scanner;

pub use scanner::parse_rows;

/// Options controlling how text is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat the first row as the list of field names.
    pub headers: bool,
}

/// Output of [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Raw rows of fields (header mode off).
    Rows(Vec<Vec<String>>),
    /// Header-keyed records (header mode on).
    Records(Vec<Record>),
}

/// A single data row keyed by header name.
///
/// Keys keep the header's column order. Values are whitespace-trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from a header row and a data row by position.
    ///
    /// Missing trailing values become empty strings and columns beyond the
    /// header are keyed `col_<index>`.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let width = header.len().max(row.len());
        let mut record = Record::default();

        for i in 0..width {
            let key = header
                .get(i)
                .map(|h| h.trim())
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("col_{}", i));
            let value = row.get(i).map(|v| v.trim()).unwrap_or("");
            record.insert(key, value.to_string());
        }

        record
    }

    /// Get a value by header name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the value of the first header name in `keys` that is present.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    /// Iterate over `(header, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // Duplicate header names: the later column wins, the earlier position is kept.
    fn insert(&mut self, key: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }
}

/// Parse text with the first row treated as headers.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut rows = parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    rows.map(|row| Record::from_row(&header, &row)).collect()
}

/// Parse text according to `options`.
pub fn parse(text: &str, options: ParseOptions) -> Parsed {
    if options.headers {
        Parsed::Records(parse_records(text))
    } else {
        Parsed::Rows(parse_rows(text))
    }
}
