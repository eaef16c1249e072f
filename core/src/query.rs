//! Ordered URL query-string codec.
//!
//! [`QueryParams`] behaves like the browser's `URLSearchParams`: pairs keep
//! their insertion order, `get` returns the first value for a key and `set`
//! replaces in place. Encoding is `application/x-www-form-urlencoded`, so
//! reserved characters (including `,` inside a value) are percent-encoded.

use thiserror::Error;

/// Errors from query-string encoding and decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The input could not be decoded
    #[error("Malformed query string: {0}")]
    Malformed(String),

    /// The pairs could not be encoded
    #[error("Failed to encode query string: {0}")]
    Encode(String),
}

/// Ordered list of query-string pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Decodes a query string, with or without its leading `?`
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Malformed`] if the input is not valid form encoding.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let raw = input.strip_prefix('?').unwrap_or(input);
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
            .map_err(|e| QueryError::Malformed(e.to_string()))?;
        Ok(Self { pairs })
    }

    /// Returns the first value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`, replacing the first existing entry and
    /// dropping any later duplicates
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if *k == key {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            },
            None => self.pairs.push((key, value)),
        }
    }

    /// Iterates keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// `true` when there are no pairs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the pairs without a leading `?`
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Encode`] if the serializer rejects the pairs.
    pub fn encode(&self) -> Result<String, QueryError> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| QueryError::Encode(e.to_string()))
    }
}
