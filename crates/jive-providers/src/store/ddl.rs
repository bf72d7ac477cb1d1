//! Schema DDL for the per-namespace store.
//!
//! Table names follow the logical table set of the platform: `WorkItem`,
//! `ExecutionLog`, `ProgressEvent`, `ArchitectureMemory`,
//! `TroubleshootMemory`, `SearchIndex`. List-valued columns are JSON text;
//! vectors are little-endian f32 BLOBs; timestamps are RFC 3339 text.

/// Idempotent schema creation, applied on every open.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS WorkItem (
        id TEXT PRIMARY KEY,
        item_type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL,
        priority TEXT NOT NULL,
        complexity TEXT,
        parent_id TEXT,
        sequence_order INTEGER NOT NULL DEFAULT 0,
        acceptance_criteria TEXT NOT NULL DEFAULT '[]',
        context_tags TEXT NOT NULL DEFAULT '[]',
        dependencies TEXT NOT NULL DEFAULT '[]',
        notes TEXT,
        progress_percentage INTEGER NOT NULL DEFAULT 0,
        due_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_work_item_parent ON WorkItem(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_work_item_status ON WorkItem(status)",
    "CREATE TABLE IF NOT EXISTS ExecutionLog (
        execution_id TEXT PRIMARY KEY,
        work_item_id TEXT NOT NULL,
        mode TEXT NOT NULL,
        status TEXT NOT NULL,
        started_at TEXT NOT NULL,
        ended_at TEXT,
        agent_context TEXT NOT NULL DEFAULT '{}',
        validation_issues TEXT NOT NULL DEFAULT '[]',
        artifacts TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE INDEX IF NOT EXISTS idx_execution_work_item ON ExecutionLog(work_item_id)",
    "CREATE TABLE IF NOT EXISTS ProgressEvent (
        id TEXT PRIMARY KEY,
        entity_id TEXT NOT NULL,
        percentage INTEGER NOT NULL,
        status TEXT NOT NULL,
        notes TEXT,
        blockers TEXT NOT NULL DEFAULT '[]',
        at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_progress_entity ON ProgressEvent(entity_id)",
    "CREATE TABLE IF NOT EXISTS ArchitectureMemory (
        id TEXT PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        ai_requirements TEXT NOT NULL DEFAULT '',
        ai_when_to_use TEXT NOT NULL DEFAULT '[]',
        keywords TEXT NOT NULL DEFAULT '[]',
        children_slugs TEXT NOT NULL DEFAULT '[]',
        related_slugs TEXT NOT NULL DEFAULT '[]',
        linked_epic_ids TEXT NOT NULL DEFAULT '[]',
        tags TEXT NOT NULL DEFAULT '[]',
        version INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS TroubleshootMemory (
        id TEXT PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        ai_use_case TEXT NOT NULL DEFAULT '[]',
        ai_solutions TEXT NOT NULL DEFAULT '',
        keywords TEXT NOT NULL DEFAULT '[]',
        tags TEXT NOT NULL DEFAULT '[]',
        usage_count INTEGER NOT NULL DEFAULT 0,
        success_count INTEGER NOT NULL DEFAULT 0,
        version INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS SearchIndex (
        entity_id TEXT NOT NULL,
        content_type TEXT NOT NULL,
        model_id TEXT NOT NULL,
        dimensions INTEGER NOT NULL,
        vector BLOB NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (entity_id, content_type)
    )",
    "CREATE INDEX IF NOT EXISTS idx_search_index_model ON SearchIndex(model_id, content_type)",
];
