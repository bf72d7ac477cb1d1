//! Row <-> entity mapping helpers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use jive_domain::entities::{
    ArchitectureItem, ExecutionRecord, MemoryItem, ProgressEvent, TroubleshootItem, WorkItem,
};
use jive_domain::entities::execution::{ExecutionMode, ExecutionStatus};
use jive_domain::entities::work_item::{Complexity, ItemStatus, ItemType, Priority};
use jive_domain::error::{Error, Result};
use jive_domain::value_objects::{
    ExecutionId, MemoryItemId, ProgressEventId, Slug, WorkItemId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub(crate) fn encode_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

pub(crate) fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub(crate) fn decode_time(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::store(format!("invalid timestamp '{text}': {e}")))
}

/// Vectors are persisted as little-endian f32 BLOBs.
pub(crate) fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for v in vector {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

pub(crate) fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn parse_enum<T: FromStr<Err = String>>(text: &str) -> Result<T> {
    T::from_str(text).map_err(Error::store)
}

fn parse_id<T: FromStr<Err = uuid::Error>>(text: &str) -> Result<T> {
    T::from_str(text).map_err(|e| Error::store(format!("invalid id '{text}': {e}")))
}

pub(crate) fn work_item_from_row(row: &SqliteRow) -> Result<WorkItem> {
    let dependencies: Vec<String> = decode_json(&row.try_get::<String, _>("dependencies").map_err(map_row_err)?)?;
    Ok(WorkItem {
        id: parse_id(&row.try_get::<String, _>("id").map_err(map_row_err)?)?,
        item_type: parse_enum::<ItemType>(&row.try_get::<String, _>("item_type").map_err(map_row_err)?)?,
        title: row.try_get("title").map_err(map_row_err)?,
        description: row.try_get("description").map_err(map_row_err)?,
        status: parse_enum::<ItemStatus>(&row.try_get::<String, _>("status").map_err(map_row_err)?)?,
        priority: parse_enum::<Priority>(&row.try_get::<String, _>("priority").map_err(map_row_err)?)?,
        complexity: row
            .try_get::<Option<String>, _>("complexity")
            .map_err(map_row_err)?
            .map(|c| parse_enum::<Complexity>(&c))
            .transpose()?,
        parent_id: row
            .try_get::<Option<String>, _>("parent_id")
            .map_err(map_row_err)?
            .map(|p| parse_id::<WorkItemId>(&p))
            .transpose()?,
        sequence_order: row.try_get("sequence_order").map_err(map_row_err)?,
        acceptance_criteria: decode_json(
            &row.try_get::<String, _>("acceptance_criteria").map_err(map_row_err)?,
        )?,
        context_tags: decode_json(&row.try_get::<String, _>("context_tags").map_err(map_row_err)?)?,
        dependencies: dependencies
            .iter()
            .map(|d| parse_id::<WorkItemId>(d))
            .collect::<Result<Vec<_>>>()?,
        notes: row.try_get("notes").map_err(map_row_err)?,
        progress_percentage: row
            .try_get::<i64, _>("progress_percentage")
            .map_err(map_row_err)?
            .clamp(0, 100) as u8,
        due_date: row
            .try_get::<Option<String>, _>("due_date")
            .map_err(map_row_err)?
            .map(|d| decode_time(&d))
            .transpose()?,
        created_at: decode_time(&row.try_get::<String, _>("created_at").map_err(map_row_err)?)?,
        updated_at: decode_time(&row.try_get::<String, _>("updated_at").map_err(map_row_err)?)?,
    })
}

pub(crate) fn execution_from_row(row: &SqliteRow) -> Result<ExecutionRecord> {
    Ok(ExecutionRecord {
        execution_id: parse_id::<ExecutionId>(
            &row.try_get::<String, _>("execution_id").map_err(map_row_err)?,
        )?,
        work_item_id: parse_id::<WorkItemId>(
            &row.try_get::<String, _>("work_item_id").map_err(map_row_err)?,
        )?,
        mode: parse_enum::<ExecutionMode>(&row.try_get::<String, _>("mode").map_err(map_row_err)?)?,
        status: parse_enum::<ExecutionStatus>(
            &row.try_get::<String, _>("status").map_err(map_row_err)?,
        )?,
        started_at: decode_time(&row.try_get::<String, _>("started_at").map_err(map_row_err)?)?,
        ended_at: row
            .try_get::<Option<String>, _>("ended_at")
            .map_err(map_row_err)?
            .map(|t| decode_time(&t))
            .transpose()?,
        agent_context: decode_json(&row.try_get::<String, _>("agent_context").map_err(map_row_err)?)?,
        validation_issues: decode_json(
            &row.try_get::<String, _>("validation_issues").map_err(map_row_err)?,
        )?,
        artifacts: decode_json(&row.try_get::<String, _>("artifacts").map_err(map_row_err)?)?,
    })
}

pub(crate) fn progress_from_row(row: &SqliteRow) -> Result<ProgressEvent> {
    Ok(ProgressEvent {
        id: parse_id::<ProgressEventId>(&row.try_get::<String, _>("id").map_err(map_row_err)?)?,
        entity_id: parse_id::<WorkItemId>(
            &row.try_get::<String, _>("entity_id").map_err(map_row_err)?,
        )?,
        percentage: row
            .try_get::<i64, _>("percentage")
            .map_err(map_row_err)?
            .clamp(0, 100) as u8,
        status: parse_enum::<ItemStatus>(&row.try_get::<String, _>("status").map_err(map_row_err)?)?,
        notes: row.try_get("notes").map_err(map_row_err)?,
        blockers: decode_json(&row.try_get::<String, _>("blockers").map_err(map_row_err)?)?,
        at: decode_time(&row.try_get::<String, _>("at").map_err(map_row_err)?)?,
    })
}

pub(crate) fn architecture_from_row(row: &SqliteRow) -> Result<MemoryItem> {
    Ok(MemoryItem::Architecture(ArchitectureItem {
        id: parse_id::<MemoryItemId>(&row.try_get::<String, _>("id").map_err(map_row_err)?)?,
        slug: Slug::parse(&row.try_get::<String, _>("slug").map_err(map_row_err)?)?,
        title: row.try_get("title").map_err(map_row_err)?,
        ai_requirements: row.try_get("ai_requirements").map_err(map_row_err)?,
        ai_when_to_use: decode_json(&row.try_get::<String, _>("ai_when_to_use").map_err(map_row_err)?)?,
        keywords: decode_json(&row.try_get::<String, _>("keywords").map_err(map_row_err)?)?,
        children_slugs: decode_json(&row.try_get::<String, _>("children_slugs").map_err(map_row_err)?)?,
        related_slugs: decode_json(&row.try_get::<String, _>("related_slugs").map_err(map_row_err)?)?,
        linked_epic_ids: decode_json(
            &row.try_get::<String, _>("linked_epic_ids").map_err(map_row_err)?,
        )?,
        tags: decode_json(&row.try_get::<String, _>("tags").map_err(map_row_err)?)?,
        version: row.try_get::<i64, _>("version").map_err(map_row_err)?.max(1) as u32,
        created_at: decode_time(&row.try_get::<String, _>("created_at").map_err(map_row_err)?)?,
        updated_at: decode_time(&row.try_get::<String, _>("updated_at").map_err(map_row_err)?)?,
    }))
}

pub(crate) fn troubleshoot_from_row(row: &SqliteRow) -> Result<MemoryItem> {
    Ok(MemoryItem::Troubleshoot(TroubleshootItem {
        id: parse_id::<MemoryItemId>(&row.try_get::<String, _>("id").map_err(map_row_err)?)?,
        slug: Slug::parse(&row.try_get::<String, _>("slug").map_err(map_row_err)?)?,
        title: row.try_get("title").map_err(map_row_err)?,
        ai_use_case: decode_json(&row.try_get::<String, _>("ai_use_case").map_err(map_row_err)?)?,
        ai_solutions: row.try_get("ai_solutions").map_err(map_row_err)?,
        keywords: decode_json(&row.try_get::<String, _>("keywords").map_err(map_row_err)?)?,
        tags: decode_json(&row.try_get::<String, _>("tags").map_err(map_row_err)?)?,
        usage_count: row.try_get::<i64, _>("usage_count").map_err(map_row_err)?.max(0) as u64,
        success_count: row.try_get::<i64, _>("success_count").map_err(map_row_err)?.max(0) as u64,
        version: row.try_get::<i64, _>("version").map_err(map_row_err)?.max(1) as u32,
        created_at: decode_time(&row.try_get::<String, _>("created_at").map_err(map_row_err)?)?,
        updated_at: decode_time(&row.try_get::<String, _>("updated_at").map_err(map_row_err)?)?,
    }))
}

pub(crate) fn map_row_err(e: sqlx::Error) -> Error {
    Error::store_with_source("row decode failed", e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_round_trips_through_blob() {
        let vector = vec![0.25f32, -1.5, 0.0, 3.75];
        assert_eq!(decode_vector(&encode_vector(&vector)), vector);
    }

    #[test]
    fn time_round_trips_through_rfc3339() {
        let now = Utc::now();
        let decoded = decode_time(&encode_time(now)).unwrap();
        assert_eq!(decoded.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn bad_timestamp_is_a_store_error() {
        assert!(matches!(
            decode_time("not-a-time"),
            Err(Error::Store { .. })
        ));
    }
}
