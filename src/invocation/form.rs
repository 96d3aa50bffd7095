//! Assertions over a URL-encoded form payload.

use std::collections::BTreeMap;

use super::values::Values;
use super::Invocation;

/// Form payload of a recorded request, obtained from
/// [`Invocation::with_url_encoded_form_payload`].
///
/// Assertions consume and return the view so they chain; [`get`](Self::get)
/// borrows it.
#[derive(Debug, Clone)]
pub struct InvocationRequestForm<'a> {
    invocation: &'a Invocation,
    values: Values,
}

impl<'a> InvocationRequestForm<'a> {
    pub(crate) fn new(invocation: &'a Invocation, values: Values) -> Self {
        Self { invocation, values }
    }

    /// First value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key)
    }

    /// The decoded form.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Asserts `key` was submitted with `value`.
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.check_value(key, value);
        self
    }

    /// Asserts every expected pair was submitted. Extra form keys are allowed.
    pub fn with_values<I, K, V>(self, expected: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in sorted(expected) {
            self.check_value(&key, &value);
        }
        self
    }

    /// Asserts the form holds exactly the expected pairs: same number of keys,
    /// each with the expected value.
    pub fn with_values_exactly<I, K, V>(self, expected: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let expected = sorted(expected);
        if expected.len() != self.values.len() {
            self.invocation.reporter().error(&format!(
                "form has {} key(s) {:?} but {} were expected {:?}",
                self.values.len(),
                self.values.keys().collect::<Vec<_>>(),
                expected.len(),
                expected.keys().collect::<Vec<_>>()
            ));
        }
        for (key, value) in &expected {
            self.check_value(key, value);
        }
        self
    }

    fn check_value(&self, key: &str, expected: &str) {
        match self.values.get(key) {
            Some(actual) if actual == expected => {}
            Some(actual) => self.invocation.reporter().error(&format!(
                "form value '{}': expected {:?}, got {:?}",
                key, expected, actual
            )),
            None => self.invocation.reporter().error(&format!(
                "form value '{}': expected {:?}, but the key is missing",
                key, expected
            )),
        }
    }
}

/// Collects expectations into a sorted map so failures are reported in a stable order.
pub(crate) fn sorted<I, K, V>(expected: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    expected
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect()
}
