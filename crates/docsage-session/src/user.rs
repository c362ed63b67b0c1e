//! User identity newtype.

/// Opaque stable user identifier issued by the chat transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw transport identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw transport identifier.
    pub fn raw(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_raw() {
        let user = UserId::new(12345);
        assert_eq!(user.to_string(), "12345");
        assert_eq!(user.raw(), 12345);
    }

    #[test]
    fn test_from_i64() {
        let user: UserId = 7.into();
        assert_eq!(user, UserId::new(7));
    }
}
