//! Multi-valued key/value pairs decoded from query strings and form bodies.

use std::collections::BTreeMap;

/// Decoded `application/x-www-form-urlencoded` data.
///
/// Keys keep every value they were given, in order. Lookups by key return the
/// first value, like most form parsers do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    entries: BTreeMap<String, Vec<String>>,
}

impl Values {
    /// Decodes `key=value&...` data. Undecodable escapes are kept verbatim.
    pub fn parse(input: &[u8]) -> Self {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in url::form_urlencoded::parse(input) {
            entries
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self { entries }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value for `key`, in order of appearance.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether `key` appeared at all, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Distinct keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key was decoded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Byte offsets of every `%` not followed by two hex digits.
pub(crate) fn invalid_escapes(input: &[u8]) -> Vec<usize> {
    input
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .map(|(offset, _)| offset)
        .filter(|&offset| {
            !matches!(
                input.get(offset + 1..offset + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
        })
        .collect()
}
