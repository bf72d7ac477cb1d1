//! YAML front matter for memory item files.

use chrono::{DateTime, Utc};
use jive_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Strict front matter carried by every exported memory file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontMatter {
    /// `architecture` or `troubleshoot`
    pub r#type: String,
    /// Namespace-unique slug; must match the file name
    pub slug: String,
    /// Revision counter
    pub version: u32,
    /// Creation timestamp (RFC 3339)
    pub created_on: String,
    /// Last modification timestamp (RFC 3339)
    pub last_updated_on: String,
    /// Usage counter (troubleshoot only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
    /// Success counter (troubleshoot only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_count: Option<u64>,
}

impl FrontMatter {
    /// Parse an RFC 3339 front matter timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the value is not RFC 3339.
    pub fn parse_time(value: &str, field: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                Error::validation_field(format!("invalid timestamp '{value}': {e}"), field)
            })
    }
}

/// Split a document into front matter and Markdown body.
///
/// The document must begin with a `---` fence; the body starts after the
/// closing fence.
///
/// # Errors
///
/// Returns [`Error::Validation`] on a missing fence, unparseable YAML, or
/// missing required fields.
pub fn split_document(content: &str) -> Result<(FrontMatter, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
        .ok_or_else(|| Error::validation("missing front matter opening fence"))?;
    let end = rest
        .find("\n---")
        .ok_or_else(|| Error::validation("missing front matter closing fence"))?;
    let yaml = &rest[..end];
    let body = rest[end + 4..].trim_start_matches(['\r', '\n']);

    let front: FrontMatter = serde_yaml::from_str(yaml)
        .map_err(|e| Error::validation(format!("invalid front matter YAML: {e}")))?;
    if front.slug.is_empty() {
        return Err(Error::validation_field("front matter slug is empty", "slug"));
    }
    Ok((front, body))
}

/// Render front matter ahead of a body.
///
/// # Errors
///
/// Returns [`Error::Validation`] if YAML serialization fails.
pub fn render_document(front: &FrontMatter, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(front)
        .map_err(|e| Error::validation(format!("front matter serialization failed: {e}")))?;
    Ok(format!("---\n{yaml}---\n\n{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrontMatter {
        FrontMatter {
            r#type: "architecture".to_owned(),
            slug: "react-patterns".to_owned(),
            version: 2,
            created_on: "2026-07-01T10:00:00+00:00".to_owned(),
            last_updated_on: "2026-07-02T11:30:00+00:00".to_owned(),
            usage_count: None,
            success_count: None,
        }
    }

    #[test]
    fn document_round_trips() {
        let rendered = render_document(&sample(), "# Title\n\nbody\n").unwrap();
        let (front, body) = split_document(&rendered).unwrap();
        assert_eq!(front.slug, "react-patterns");
        assert_eq!(front.version, 2);
        assert_eq!(body, "# Title\n\nbody\n");
    }

    #[test]
    fn missing_fence_is_fatal() {
        assert!(split_document("# no front matter\n").is_err());
    }

    #[test]
    fn invalid_yaml_is_fatal() {
        let doc = "---\ntype: [unclosed\n---\n\n# T\n";
        assert!(split_document(doc).is_err());
    }

    #[test]
    fn missing_required_field_is_fatal() {
        let doc = "---\ntype: architecture\nversion: 1\n---\n\n# T\n";
        assert!(split_document(doc).is_err());
    }
}
