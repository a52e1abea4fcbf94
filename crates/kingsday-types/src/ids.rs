//! Type-safe identifier wrappers.
//!
//! Role identifiers are authored slugs from the content files (e.g.
//! `role_vendor`), not generated values, so the wrapper holds a `String`
//! rather than a UUID. Wrapping them prevents accidental mixing with
//! resource names and counter keys, which are also plain strings at the
//! serialization boundary.

use serde::{Deserialize, Serialize};

/// Identifier of a role, as declared in the role's content file.
///
/// Serialized transparently as the underlying string so persisted
/// documents keep the flat shape the content files use.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Create a role id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return whether the id is empty (an invalid content file).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for RoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RoleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RoleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_transparently() {
        let id = RoleId::from("role_vendor");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"role_vendor\"");
    }

    #[test]
    fn round_trips() {
        let id: RoleId = serde_json::from_str("\"role_finn\"").unwrap_or_default();
        assert_eq!(id.as_str(), "role_finn");
    }
}
