//! Query cache key naming one remote read operation.
use thiserror::Error;

/// Cache key identifying a cached read, e.g. `post.getAll`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    /// Construct a key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, QueryKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(QueryKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(QueryKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for a compile-time procedure name.
    ///
    /// Intended for constants such as `"post.getAll"`; the name is not
    /// validated beyond a debug assertion.
    pub fn procedure(name: &'static str) -> Self {
        debug_assert!(
            !name.trim().is_empty() && name.trim() == name,
            "procedure names must be non-empty and trimmed"
        );
        Self(name.to_owned())
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for QueryKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("query key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("query key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

#[cfg(test)]
mod tests {
    //! Validates key parsing and whitespace constraints.
    use super::{QueryKey, QueryKeyValidationError};
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn query_key_rejects_blank(#[case] value: &str) {
        let err = QueryKey::new(value).expect_err("blank keys rejected");
        assert_eq!(err, QueryKeyValidationError::Empty);
    }

    #[rstest]
    #[case(" leading")]
    #[case("trailing ")]
    fn query_key_rejects_whitespace_padding(#[case] value: &str) {
        let err = QueryKey::new(value).expect_err("padded key rejected");
        assert_eq!(err, QueryKeyValidationError::ContainsWhitespace);
    }

    #[rstest]
    fn procedure_keys_match_validated_keys() {
        let key = QueryKey::new("post.getAll").expect("valid key");
        assert_eq!(key, QueryKey::procedure("post.getAll"));
        assert_eq!(key.to_string(), "post.getAll");
    }
}
