//! Parsing helpers shared by the tool handlers.
//!
//! Tool payloads carry enum values as strings; everything funnels through
//! here so a bad value always maps to the same `ValidationError` shape.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use jive_domain::entities::execution::ExecutionMode;
use jive_domain::entities::memory::MemoryType;
use jive_domain::entities::work_item::{Complexity, ItemStatus, ItemType, Priority};
use jive_domain::error::{Error, Result};
use jive_domain::value_objects::{
    ContentType, ExecutionId, ImportMode, Page, SearchType, SortBy, SyncDirection, WorkItemFilter,
    WorkItemId,
};

use crate::args::FilterArgs;

pub(crate) fn parse_enum<T>(value: &str, field: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    T::from_str(value).map_err(|e| Error::validation_field(e, field))
}

pub(crate) fn parse_opt_enum<T>(value: Option<&str>, field: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    value.map(|v| parse_enum(v, field)).transpose()
}

pub(crate) fn parse_work_item_id(value: &str, field: &str) -> Result<WorkItemId> {
    WorkItemId::from_str(value)
        .map_err(|e| Error::validation_field(format!("invalid id '{value}': {e}"), field))
}

pub(crate) fn parse_execution_id(value: &str) -> Result<ExecutionId> {
    ExecutionId::from_str(value).map_err(|e| {
        Error::validation_field(format!("invalid execution id '{value}': {e}"), "execution_id")
    })
}

pub(crate) fn parse_time(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::validation_field(format!("invalid timestamp '{value}': {e}"), field))
}

pub(crate) fn parse_opt_time(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_time(v, field)).transpose()
}

pub(crate) fn parse_item_type(value: &str) -> Result<ItemType> {
    parse_enum(value, "type")
}

pub(crate) fn parse_status(value: &str) -> Result<ItemStatus> {
    parse_enum(value, "status")
}

pub(crate) fn parse_sort_by(value: Option<&str>) -> Result<SortBy> {
    match value {
        None => Ok(SortBy::default()),
        Some("created_at") => Ok(SortBy::CreatedAt),
        Some("updated_at") => Ok(SortBy::UpdatedAt),
        Some("priority") => Ok(SortBy::Priority),
        Some("sequence_order") => Ok(SortBy::SequenceOrder),
        Some("title") => Ok(SortBy::Title),
        Some(other) => Err(Error::validation_field(
            format!("unknown sort key: {other}"),
            "sort_by",
        )),
    }
}

pub(crate) fn parse_search_type(value: Option<&str>) -> Result<SearchType> {
    match value {
        None => Ok(SearchType::default()),
        Some(v) => parse_enum(v, "search_type"),
    }
}

pub(crate) fn parse_content_types(values: &[String]) -> Result<Vec<ContentType>> {
    values
        .iter()
        .map(|v| parse_enum::<ContentType>(v, "content_types"))
        .collect()
}

pub(crate) fn parse_sync_direction(value: Option<&str>) -> Result<SyncDirection> {
    match value {
        None => Ok(SyncDirection::default()),
        Some("file_to_db") => Ok(SyncDirection::FileToDb),
        Some("db_to_file") => Ok(SyncDirection::DbToFile),
        Some("bidirectional") => Ok(SyncDirection::Bidirectional),
        Some(other) => Err(Error::validation_field(
            format!("unknown sync direction: {other}"),
            "direction",
        )),
    }
}

pub(crate) fn parse_import_mode(value: Option<&str>) -> Result<ImportMode> {
    match value {
        None => Ok(ImportMode::default()),
        Some("create_only") => Ok(ImportMode::CreateOnly),
        Some("update_only") => Ok(ImportMode::UpdateOnly),
        Some("create_or_update") => Ok(ImportMode::CreateOrUpdate),
        Some("replace") => Ok(ImportMode::Replace),
        Some(other) => Err(Error::validation_field(
            format!("unknown import mode: {other}"),
            "import_mode",
        )),
    }
}

pub(crate) fn parse_memory_type(value: &str) -> Result<MemoryType> {
    parse_enum(value, "memory_type")
}

pub(crate) fn parse_execution_mode(value: Option<&str>) -> Result<ExecutionMode> {
    match value {
        None => Ok(ExecutionMode::default()),
        Some(v) => parse_enum(v, "mode"),
    }
}

pub(crate) fn build_filter(args: Option<&FilterArgs>) -> Result<WorkItemFilter> {
    let Some(args) = args else {
        return Ok(WorkItemFilter::default());
    };
    Ok(WorkItemFilter {
        item_type: args
            .r#type
            .as_deref()
            .map(parse_item_type)
            .transpose()?,
        status: args.status.as_deref().map(parse_status).transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(|p| parse_enum::<Priority>(p, "priority"))
            .transpose()?,
        parent_id: args
            .parent_id
            .as_deref()
            .map(|p| parse_work_item_id(p, "parent_id"))
            .transpose()?,
        tags: args.tags.clone(),
    })
}

pub(crate) fn page_from(limit: Option<usize>, offset: Option<usize>, cap: usize) -> Page {
    Page {
        limit: limit.unwrap_or(50).clamp(1, cap),
        offset: offset.unwrap_or(0),
    }
}

pub(crate) fn parse_opt_complexity(value: Option<&str>) -> Result<Option<Complexity>> {
    parse_opt_enum(value, "complexity")
}

pub(crate) fn require<'a>(value: Option<&'a str>, field: &str, tool: &str) -> Result<&'a str> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        Error::validation_field(format!("'{field}' is required for {tool}"), field)
    })
}
