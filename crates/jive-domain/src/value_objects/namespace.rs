//! Namespace value object: an isolated project scope.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a namespace name.
pub const NAMESPACE_MAX_LEN: usize = 50;

/// Names that may never be used as namespaces.
pub const RESERVED_NAMESPACES: &[&str] = &["admin", "system", "config"];

/// The namespace every deployment starts with.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Validated namespace name (`[a-z0-9_-]{1,50}`, reserved names rejected).
///
/// Every entity lives inside exactly one namespace; no reference may cross
/// namespace boundaries. Construction is the validation point, so holding a
/// `Namespace` means the name is well-formed.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Parse and validate a namespace name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceInvalid`] when the name is empty, too long,
    /// contains characters outside `[a-z0-9_-]`, or is reserved.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() || name.len() > NAMESPACE_MAX_LEN {
            return Err(Error::NamespaceInvalid {
                name: name.to_owned(),
            });
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(Error::NamespaceInvalid {
                name: name.to_owned(),
            });
        }
        if RESERVED_NAMESPACES.contains(&name) {
            return Err(Error::NamespaceInvalid {
                name: name.to_owned(),
            });
        }
        Ok(Self(name.to_owned()))
    }

    /// The string form of the namespace.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_owned())
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("default", true)]
    #[case("my-project", true)]
    #[case("proj_1", true)]
    #[case("a", true)]
    #[case("", false)]
    #[case("Has-Upper", false)]
    #[case("with space", false)]
    fn pattern_validation(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(Namespace::parse(name).is_ok(), ok, "name {name:?}");
    }

    #[test]
    fn rejects_overlong_names() {
        assert!(Namespace::parse(&"a".repeat(50)).is_ok());
        assert!(Namespace::parse(&"a".repeat(51)).is_err());
    }

    #[test]
    fn rejects_reserved_names() {
        for name in RESERVED_NAMESPACES {
            assert!(matches!(
                Namespace::parse(name),
                Err(Error::NamespaceInvalid { .. })
            ));
        }
    }

    #[test]
    fn default_is_the_default_namespace() {
        assert_eq!(Namespace::default().as_str(), "default");
    }
}
