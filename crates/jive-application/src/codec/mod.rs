//! Markdown codec: YAML front matter + heading-structured bodies.

mod front_matter;
mod parse;
mod render;
mod transfer;

pub use front_matter::{FrontMatter, render_document, split_document};
pub use parse::{ParsedDocument, parse_document};
pub use render::{filename_for, render_item};
pub use transfer::{
    ExportManifest, ExportReport, ImportReport, ManifestEntry, TransferService,
};
