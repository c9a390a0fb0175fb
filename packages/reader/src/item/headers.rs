//! Ordered, case-insensitive header collection

use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{self, Result};

/// Headers of one batch item.
///
/// Keeps insertion order and the original casing of names; lookups ignore
/// ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchHeaders {
    entries: Vec<(String, String)>,
}

impl BatchHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of the header named `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds a header, failing if a header of the same name already exists.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateHeader` on a case-insensitive name clash.
    pub fn try_insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(error::duplicate_header(name));
        }
        self.entries.push((name, value.into()));
        Ok(())
    }

    /// Adds a header unless one of the same name exists; returns true if added.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    /// Value of the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get("Content-Type")
    }

    /// Headers in insertion order with their original casing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(as_pair)
    }

    /// Converts into an `http::HeaderMap`.
    ///
    /// # Errors
    ///
    /// Fails if a name or value is not valid in an HTTP header.
    pub fn to_header_map(&self) -> std::result::Result<HeaderMap, http::Error> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            map.append(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a BatchHeaders {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(as_pair as fn(&'a (String, String)) -> (&'a str, &'a str))
    }
}

fn as_pair((name, value): &(String, String)) -> (&str, &str) {
    (name.as_str(), value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn lookup_ignores_case_and_keeps_original_names() {
        let mut headers = BatchHeaders::new();
        headers.try_insert("Content-Type", "application/json").unwrap();
        headers.try_insert("OData-Version", "4.0").unwrap();

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.content_type(), Some("application/json"));
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Content-Type", "OData-Version"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut headers = BatchHeaders::new();
        headers.try_insert("If-Match", "*").unwrap();
        let err = headers.try_insert("IF-MATCH", "W/\"1\"").unwrap_err();
        assert_eq!(
            err.kind(),
            &Kind::DuplicateHeader {
                header: "IF-MATCH".to_owned()
            }
        );
        assert!(!headers.insert_if_absent("if-match", "x"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn converts_to_header_map() {
        let mut headers = BatchHeaders::new();
        headers.try_insert("Prefer", "return=minimal").unwrap();
        let map = headers.to_header_map().unwrap();
        assert_eq!(map["prefer"], "return=minimal");

        let mut bad = BatchHeaders::new();
        bad.try_insert("bad name", "x").unwrap();
        assert!(bad.to_header_map().is_err());
    }
}
