//! The normalized identifier that scopes all data to one user.

use std::fmt::{self, Display};

use crate::Error;

/// A normalized user key.
///
/// Keys are email-like strings, trimmed and lowercased on construction so
/// `" Alice@Example.COM "` and `"alice@example.com"` address the same rows.
/// Every table in the store is scoped by one of these; there is no
/// cross-user visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserKey(String);

impl UserKey {
    /// Normalize `raw` into a user key.
    ///
    /// # Errors
    /// Returns [Error::EmptyUserKey] if `raw` is empty or whitespace-only.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(Error::EmptyUserKey);
        }

        Ok(Self(normalized))
    }

    /// The key as a string slice, for use in SQL parameters.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
