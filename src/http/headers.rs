//! HTTP header block
//!
//! Headers keep their insertion order, which is also the order they are
//! written on the wire. Lookups are case-insensitive.

use super::{Error, Result, CRLF, MAX_HEADERS};

/// Ordered collection of header fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header block
    pub fn new() -> Self {
        Headers { fields: Vec::new() }
    }

    /// Append a field, keeping any existing field with the same name.
    ///
    /// Fields past [`MAX_HEADERS`] are dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if self.fields.len() >= MAX_HEADERS {
            tracing::warn!(limit = MAX_HEADERS, "header limit reached, dropping field");
            return;
        }
        self.fields.push((name.into(), value.into()));
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Value of `Content-Length`, if present
    pub fn content_length(&self) -> Result<Option<usize>> {
        self.get("Content-Length")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| Error::Parse(format!("Invalid Content-Length: {}", v)))
            })
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate in wire order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Write `Name: value\r\n` for every field
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        for (name, value) in self.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(CRLF.as_bytes());
        }
    }

    /// Split a `Name: value` line, trimming both sides
    pub fn parse_header_line(line: &str) -> Result<(String, String)> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::Parse(format!("No colon in header: {}", line)))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Parse("Empty header name".to_string()));
        }

        Ok((name.to_string(), value.trim().to_string()))
    }

    /// Collect the header lines of a response head, skipping lines that are
    /// not `Name: value` pairs
    pub fn parse_lenient<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        lines
            .filter_map(|line| match Self::parse_header_line(line) {
                Ok(field) => Some(field),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring malformed header line");
                    None
                }
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}
