//! Decoding of the stats API's tabular `resultSets` payloads.
//!
//! Every endpoint answers with a list of named tables, each a header row plus
//! a `rowSet` of positional values:
//!
//! ```json
//! {"resultSets": [{"name": "PlayerStats", "headers": ["GAME_ID", ...], "rowSet": [["0022400061", ...]]}]}
//! ```
//!
//! A handful of endpoints use a single `resultSet` object instead of the list.

use crate::error::{AnalyticsError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

fn result_set_at(payload: &Value, index: usize) -> Option<&Value> {
    match payload.get("resultSets").or_else(|| payload.get("resultSet"))? {
        Value::Array(sets) => sets.get(index),
        obj @ Value::Object(_) if index == 0 => Some(obj),
        _ => None,
    }
}

/// Zips the headers of result set `index` with each row and deserializes the
/// resulting objects. A missing result set decodes to an empty table.
pub fn decode_result_set<T: DeserializeOwned>(payload: &Value, index: usize) -> Result<Vec<T>> {
    let Some(set) = result_set_at(payload, index) else {
        return Ok(Vec::new());
    };

    let headers: Vec<&str> = set["headers"]
        .as_array()
        .ok_or_else(|| AnalyticsError::MissingField("headers not found".into()))?
        .iter()
        .map(|h| h.as_str().unwrap_or_default())
        .collect();
    let rows = set["rowSet"]
        .as_array()
        .ok_or_else(|| AnalyticsError::MissingField("rowSet not found".into()))?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let values = row.as_array().ok_or_else(|| AnalyticsError::Api {
            message: "rowSet entry is not an array".to_string(),
        })?;
        if values.len() != headers.len() {
            return Err(AnalyticsError::Api {
                message: format!("row has {} values for {} headers", values.len(), headers.len()),
            });
        }
        let obj: Map<String, Value> = headers
            .iter()
            .zip(values)
            .map(|(h, v)| (h.to_string(), v.clone()))
            .collect();
        out.push(serde_json::from_value(Value::Object(obj))?);
    }
    Ok(out)
}
