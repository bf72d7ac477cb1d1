//! Markdown -> memory item parsing.
//!
//! Bodies are split into sections by exact H1/H2 headings (H3 subsections
//! under `## Relationships`); bullet lists and inline-code tokens inside a
//! section are extracted with pulldown-cmark, so minor list-marker variations
//! still parse. Unknown headings are ignored.

use std::collections::HashMap;

use chrono::Utc;
use jive_domain::entities::memory::{
    ArchitectureItem, MemoryItem, MemoryType, TroubleshootItem,
};
use jive_domain::error::{Error, Result};
use jive_domain::value_objects::{MemoryItemId, Slug};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::front_matter::{FrontMatter, split_document};

/// A parsed document plus non-fatal findings.
#[derive(Debug)]
pub struct ParsedDocument {
    /// The reconstructed memory item (fresh id; callers re-key on update)
    pub item: MemoryItem,
    /// Non-fatal findings (missing optional sections, etc.)
    pub warnings: Vec<String>,
}

/// Parse a memory file.
///
/// `expected_filename`, when given, is checked against the front matter slug
/// per the `{type}_{slug}.md` convention; a mismatch is fatal.
///
/// # Errors
///
/// Fatal conditions per the codec contract: invalid YAML, missing required
/// fields, slug/filename mismatch, or a malformed body.
pub fn parse_document(content: &str, expected_filename: Option<&str>) -> Result<ParsedDocument> {
    let (front, body) = split_document(content)?;
    let memory_type: MemoryType = front
        .r#type
        .parse()
        .map_err(|e: String| Error::validation_field(e, "type"))?;
    let slug = Slug::parse(&front.slug)?;

    if let Some(filename) = expected_filename {
        let expected = format!("{}_{}.md", memory_type.as_str(), slug);
        if filename != expected {
            return Err(Error::validation(format!(
                "filename '{filename}' does not match front matter slug (expected '{expected}')"
            )));
        }
    }

    let mut warnings = Vec::new();
    let sections = split_sections(body);
    let title = sections
        .title
        .clone()
        .ok_or_else(|| Error::validation("missing H1 title"))?;

    let created_at = FrontMatter::parse_time(&front.created_on, "created_on")?;
    let updated_at = FrontMatter::parse_time(&front.last_updated_on, "last_updated_on")?;

    let item = match memory_type {
        MemoryType::Architecture => {
            let requirements = sections.text("## Requirements").unwrap_or_else(|| {
                warnings.push("missing '## Requirements' section".to_owned());
                String::new()
            });
            if sections.get("## When to Use").is_none() {
                warnings.push("missing '## When to Use' section".to_owned());
            }
            MemoryItem::Architecture(ArchitectureItem {
                id: MemoryItemId::new(),
                slug,
                title,
                ai_requirements: requirements,
                ai_when_to_use: sections.bullets("## When to Use"),
                keywords: sections.code_tokens("## Keywords"),
                children_slugs: sections.bullets("### Children"),
                related_slugs: sections.bullets("### Related"),
                linked_epic_ids: sections.bullets("## Epic Links"),
                tags: sections.code_tokens("## Tags"),
                version: front.version,
                created_at,
                updated_at,
            })
        }
        MemoryType::Troubleshoot => {
            let use_cases = sections.bullets("## Problem / Use Cases");
            if use_cases.is_empty() {
                return Err(Error::validation_field(
                    "missing or empty '## Problem / Use Cases' section",
                    "ai_use_case",
                ));
            }
            let solutions = sections.text("## Solutions").ok_or_else(|| {
                Error::validation_field("missing '## Solutions' section", "ai_solutions")
            })?;
            MemoryItem::Troubleshoot(TroubleshootItem {
                id: MemoryItemId::new(),
                slug,
                title,
                ai_use_case: use_cases,
                ai_solutions: solutions,
                keywords: sections.code_tokens("## Keywords"),
                tags: sections.code_tokens("## Tags"),
                usage_count: front.usage_count.unwrap_or(0),
                success_count: front.success_count.unwrap_or(0),
                version: front.version,
                created_at,
                updated_at,
            })
        }
    };

    if item.updated_at() > Utc::now() {
        warnings.push("last_updated_on is in the future".to_owned());
    }

    Ok(ParsedDocument { item, warnings })
}

#[derive(Debug, Default)]
struct Sections {
    title: Option<String>,
    by_heading: HashMap<String, String>,
}

impl Sections {
    fn get(&self, heading: &str) -> Option<&String> {
        self.by_heading.get(heading)
    }

    /// Raw section text, trimmed.
    fn text(&self, heading: &str) -> Option<String> {
        self.get(heading).map(|t| t.trim().to_owned())
    }

    /// List-item texts of a bullet section.
    fn bullets(&self, heading: &str) -> Vec<String> {
        let Some(text) = self.get(heading) else {
            return Vec::new();
        };
        let mut entries = Vec::new();
        let mut current: Option<String> = None;
        for event in Parser::new(text) {
            match event {
                Event::Start(Tag::Item) => current = Some(String::new()),
                Event::End(TagEnd::Item) => {
                    if let Some(entry) = current.take() {
                        let entry = entry.trim().to_owned();
                        if !entry.is_empty() {
                            entries.push(entry);
                        }
                    }
                }
                Event::Text(t) => {
                    if let Some(entry) = &mut current {
                        entry.push_str(&t);
                    }
                }
                Event::Code(c) => {
                    if let Some(entry) = &mut current {
                        entry.push_str(&c);
                    }
                }
                _ => {}
            }
        }
        entries
    }

    /// Inline-code tokens of a keyword-style section.
    fn code_tokens(&self, heading: &str) -> Vec<String> {
        let Some(text) = self.get(heading) else {
            return Vec::new();
        };
        Parser::new(text)
            .filter_map(|event| match event {
                Event::Code(code) => Some(code.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Split a body into `(title, heading -> raw section text)`.
///
/// H2 headings open sections; inside `## Relationships`, H3 headings open
/// their own sections so `### Children` / `### Related` address directly.
fn split_sections(body: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<String> = None;
    let mut in_relationships = false;

    for line in body.lines() {
        if let Some(title) = line.strip_prefix("# ") {
            if sections.title.is_none() {
                sections.title = Some(title.trim().to_owned());
                continue;
            }
        }
        if let Some(heading) = line.strip_prefix("## ") {
            let key = format!("## {}", heading.trim());
            in_relationships = key == "## Relationships";
            current = Some(key.clone());
            sections.by_heading.entry(key).or_default();
            continue;
        }
        if in_relationships {
            if let Some(heading) = line.strip_prefix("### ") {
                let key = format!("### {}", heading.trim());
                current = Some(key.clone());
                sections.by_heading.entry(key).or_default();
                continue;
            }
        }
        if let Some(key) = &current {
            let section = sections.by_heading.entry(key.clone()).or_default();
            section.push_str(line);
            section.push('\n');
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCH_DOC: &str = "---\n\
type: architecture\n\
slug: react-patterns\n\
version: 3\n\
created_on: 2026-07-01T10:00:00+00:00\n\
last_updated_on: 2026-07-02T11:30:00+00:00\n\
---\n\
\n\
# React Patterns\n\
\n\
## When to Use\n\
\n\
- Building reusable hooks\n\
- Sharing stateful logic\n\
\n\
## Keywords\n\
\n\
`react` `hooks`\n\
\n\
## Requirements\n\
\n\
Prefer function components.\n\
\n\
Use `useMemo` sparingly.\n\
\n\
## Relationships\n\
\n\
### Children\n\
\n\
- react-forms\n\
\n\
### Related\n\
\n\
- state-management\n\
\n\
## Tags\n\
\n\
`frontend`\n";

    #[test]
    fn parses_architecture_document() {
        let parsed = parse_document(ARCH_DOC, Some("architecture_react-patterns.md")).unwrap();
        let MemoryItem::Architecture(arch) = parsed.item else {
            panic!("expected architecture item");
        };
        assert_eq!(arch.title, "React Patterns");
        assert_eq!(arch.version, 3);
        assert_eq!(
            arch.ai_when_to_use,
            vec!["Building reusable hooks", "Sharing stateful logic"]
        );
        assert_eq!(arch.keywords, vec!["react", "hooks"]);
        assert!(arch.ai_requirements.contains("Prefer function components."));
        assert!(arch.ai_requirements.contains("`useMemo`"));
        assert_eq!(arch.children_slugs, vec!["react-forms"]);
        assert_eq!(arch.related_slugs, vec!["state-management"]);
        assert_eq!(arch.tags, vec!["frontend"]);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn filename_mismatch_is_fatal() {
        let err = parse_document(ARCH_DOC, Some("architecture_other.md")).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn troubleshoot_requires_solutions() {
        let doc = "---\n\
type: troubleshoot\n\
slug: loop-bug\n\
version: 1\n\
created_on: 2026-07-01T10:00:00+00:00\n\
last_updated_on: 2026-07-01T10:00:00+00:00\n\
---\n\
\n\
# Loop Bug\n\
\n\
## Problem / Use Cases\n\
\n\
- Component re-renders forever\n";
        let err = parse_document(doc, None).unwrap_err();
        match err {
            Error::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("ai_solutions"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_optional_sections_warn() {
        let doc = "---\n\
type: architecture\n\
slug: bare\n\
version: 1\n\
created_on: 2026-07-01T10:00:00+00:00\n\
last_updated_on: 2026-07-01T10:00:00+00:00\n\
---\n\
\n\
# Bare\n";
        let parsed = parse_document(doc, None).unwrap();
        assert!(!parsed.warnings.is_empty());
    }

    #[test]
    fn render_parse_round_trip_preserves_fields() {
        let parsed = parse_document(ARCH_DOC, None).unwrap();
        let rendered = super::super::render::render_item(&parsed.item).unwrap();
        let reparsed = parse_document(&rendered, None).unwrap();
        let (MemoryItem::Architecture(a), MemoryItem::Architecture(b)) =
            (&parsed.item, &reparsed.item)
        else {
            panic!("expected architecture items");
        };
        assert_eq!(a.slug, b.slug);
        assert_eq!(a.title, b.title);
        assert_eq!(a.ai_requirements, b.ai_requirements);
        assert_eq!(a.ai_when_to_use, b.ai_when_to_use);
        assert_eq!(a.keywords, b.keywords);
        assert_eq!(a.children_slugs, b.children_slugs);
        assert_eq!(a.related_slugs, b.related_slugs);
        assert_eq!(a.tags, b.tags);
        assert_eq!(a.version, b.version);
        assert_eq!(a.created_at, b.created_at);
        assert_eq!(a.updated_at, b.updated_at);
    }
}
