//! Import/export and sync value objects.

use serde::{Deserialize, Serialize};

/// How an import treats existing rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Fail on slugs that already exist
    CreateOnly,
    /// Fail on slugs that do not exist
    UpdateOnly,
    /// Create missing rows, update existing ones
    #[default]
    CreateOrUpdate,
    /// Delete then re-create inside one transaction, preserving `created_on`
    Replace,
}

impl ImportMode {
    /// String form used in tool payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateOnly => "create_only",
            Self::UpdateOnly => "update_only",
            Self::CreateOrUpdate => "create_or_update",
            Self::Replace => "replace",
        }
    }
}

/// Direction of a file <-> store synchronization run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Files win; store rows are created/updated from disk
    FileToDb,
    /// Store wins; files are written from rows
    DbToFile,
    /// Newer `updated_at` wins; store wins ties
    #[default]
    Bidirectional,
}

impl SyncDirection {
    /// String form used in tool payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileToDb => "file_to_db",
            Self::DbToFile => "db_to_file",
            Self::Bidirectional => "bidirectional",
        }
    }
}
