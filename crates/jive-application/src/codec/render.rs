//! Memory item -> Markdown rendering.

use jive_domain::entities::memory::{ArchitectureItem, MemoryItem, TroubleshootItem};
use jive_domain::error::Result;

use super::front_matter::{FrontMatter, render_document};

/// File name convention: `architecture_{slug}.md` / `troubleshoot_{slug}.md`.
#[must_use]
pub fn filename_for(item: &MemoryItem) -> String {
    format!("{}_{}.md", item.memory_type().as_str(), item.slug())
}

fn push_section(out: &mut String, heading: &str) {
    out.push('\n');
    out.push_str(heading);
    out.push_str("\n\n");
}

fn push_bullets(out: &mut String, heading: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    push_section(out, heading);
    for entry in entries {
        out.push_str("- ");
        out.push_str(entry);
        out.push('\n');
    }
}

fn push_code_tokens(out: &mut String, heading: &str, tokens: &[String]) {
    if tokens.is_empty() {
        return;
    }
    push_section(out, heading);
    let rendered: Vec<String> = tokens.iter().map(|t| format!("`{t}`")).collect();
    out.push_str(&rendered.join(" "));
    out.push('\n');
}

fn render_architecture_body(item: &ArchitectureItem) -> String {
    let mut body = format!("# {}\n", item.title);
    push_bullets(&mut body, "## When to Use", &item.ai_when_to_use);
    push_code_tokens(&mut body, "## Keywords", &item.keywords);

    push_section(&mut body, "## Requirements");
    body.push_str(item.ai_requirements.trim_end());
    body.push('\n');

    if !item.children_slugs.is_empty() || !item.related_slugs.is_empty() {
        body.push_str("\n## Relationships\n");
        push_bullets(&mut body, "### Children", &item.children_slugs);
        push_bullets(&mut body, "### Related", &item.related_slugs);
    }
    push_bullets(&mut body, "## Epic Links", &item.linked_epic_ids);
    push_code_tokens(&mut body, "## Tags", &item.tags);
    body
}

fn render_troubleshoot_body(item: &TroubleshootItem) -> String {
    let mut body = format!("# {}\n", item.title);
    push_bullets(&mut body, "## Problem / Use Cases", &item.ai_use_case);
    push_code_tokens(&mut body, "## Keywords", &item.keywords);

    push_section(&mut body, "## Solutions");
    body.push_str(item.ai_solutions.trim_end());
    body.push('\n');

    push_code_tokens(&mut body, "## Tags", &item.tags);
    body
}

/// Render a memory item into its Markdown file content.
///
/// # Errors
///
/// Returns an error if front matter serialization fails.
pub fn render_item(item: &MemoryItem) -> Result<String> {
    let (usage_count, success_count) = match item {
        MemoryItem::Troubleshoot(ts) => (Some(ts.usage_count), Some(ts.success_count)),
        MemoryItem::Architecture(_) => (None, None),
    };
    let front = FrontMatter {
        r#type: item.memory_type().as_str().to_owned(),
        slug: item.slug().to_string(),
        version: match item {
            MemoryItem::Architecture(a) => a.version,
            MemoryItem::Troubleshoot(t) => t.version,
        },
        created_on: match item {
            MemoryItem::Architecture(a) => a.created_at.to_rfc3339(),
            MemoryItem::Troubleshoot(t) => t.created_at.to_rfc3339(),
        },
        last_updated_on: item.updated_at().to_rfc3339(),
        usage_count,
        success_count,
    };
    let body = match item {
        MemoryItem::Architecture(arch) => render_architecture_body(arch),
        MemoryItem::Troubleshoot(ts) => render_troubleshoot_body(ts),
    };
    render_document(&front, &body)
}
