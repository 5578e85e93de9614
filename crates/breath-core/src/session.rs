//! Signed-in user identity.

use std::fmt;

/// Identifier of the signed-in user (their account email).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for a blank identifier.
    pub fn new(value: &str) -> Option<Self> {
        let value = value.trim();
        (!value.is_empty()).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_not_a_user() {
        assert!(UserId::new("  ").is_none());
        assert_eq!(UserId::new(" a@b.sg ").unwrap().as_str(), "a@b.sg");
    }
}
