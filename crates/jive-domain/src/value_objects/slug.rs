//! Slug value object for memory items.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a memory item slug.
pub const SLUG_MAX_LEN: usize = 100;

/// Validated memory-item slug (`[a-z0-9_-]{1,100}`, unique per namespace).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parse and validate a slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlugInvalid`] when the slug is empty, too long, or
    /// contains characters outside `[a-z0-9_-]`.
    pub fn parse(slug: &str) -> Result<Self> {
        if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
            return Err(Error::SlugInvalid {
                slug: slug.to_owned(),
            });
        }
        if !slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(Error::SlugInvalid {
                slug: slug.to_owned(),
            });
        }
        Ok(Self(slug.to_owned()))
    }

    /// The string form of the slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_pattern() {
        assert!(Slug::parse("react-patterns").is_ok());
        assert!(Slug::parse("db_pool_2").is_ok());
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("Has-Upper").is_err());
        assert!(Slug::parse(&"x".repeat(101)).is_err());
    }
}
