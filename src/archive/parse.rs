use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::record::{Record, RecordKind};

pub(super) fn parse_collection(raw: &str) -> Result<Vec<Record>> {
    let parsed: Value = serde_json::from_str(raw)?;
    let entries = parsed
        .as_array()
        .ok_or_else(|| anyhow!("record collection must be a JSON array"))?;

    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for (position, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            warn!(position, "skipping collection entry that is not an object");
            skipped += 1;
            continue;
        };
        records.push(record_from_object(object, position));
    }

    debug!(records = records.len(), skipped, "parsed record collection");
    Ok(records)
}

pub(super) fn record_from_object(object: &Map<String, Value>, position: usize) -> Record {
    let id = text_field(object, &["identifier", "id", "pid"])
        .unwrap_or_else(|| format!("record-{position}"));
    let container = text_field(object, &["container", "type", "context"]).unwrap_or_default();
    let kind = RecordKind::from_container(&container);

    let date_source = text_field(object, &["dateSource"]).unwrap_or_default();
    let tei = bool_field(object, "tei_downloaded");
    let lido = bool_field(object, "lido_downloaded");

    Record {
        id,
        kind,
        container,
        title: text_field(object, &["title"]).unwrap_or_default(),
        description: text_field(object, &["description"]).unwrap_or_default(),
        created_date: text_field(object, &["createdDate", "created_date"]),
        historical_year: year_field(object, &["historicalYear", "historical_year", "year"]),
        year_estimated: date_source.eq_ignore_ascii_case("estimated")
            || bool_field(object, "yearEstimated"),
        has_image: bool_field(object, "image_downloaded") || bool_field(object, "hasImage"),
        has_primary_source: tei || lido || bool_field(object, "hasPrimarySource"),
        has_rdf: bool_field(object, "rdf_downloaded") || bool_field(object, "hasRdf"),
        crime_hints: list_field(object, "crimeType"),
        location_hints: list_field(object, "locations"),
        object_class_hint: text_field(object, &["objectClass"]),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(scalar_text))
}

fn bool_field(object: &Map<String, Value>, key: &str) -> bool {
    match object.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
        Some(Value::String(text)) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
        }
        _ => false,
    }
}

fn year_field(object: &Map<String, Value>, keys: &[&str]) -> Option<i32> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.trim().parse::<i32>().ok(),
        _ => None,
    })
}

fn list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}
