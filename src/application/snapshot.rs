//! Snapshot decoding for content API payloads
//!
//! Accepts either a bare JSON array of chart records or the list envelope
//! `{ "data": [...] }` returned by the content API.

use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::ChartNode;

fn invalid(message: impl Into<String>) -> ApplicationError {
    ApplicationError::InvalidSnapshot {
        message: message.into(),
    }
}

/// Decode a snapshot into chart records, preserving input order.
///
/// Records are decoded one by one so a field error names its position.
pub fn parse_snapshot(content: &str) -> ApplicationResult<Vec<ChartNode>> {
    let payload: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(records)) => records,
            _ => return Err(invalid("expected a `data` array in the snapshot envelope")),
        },
        _ => {
            return Err(invalid(
                "expected an array of records or an object with a `data` array",
            ))
        }
    };

    let nodes = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<ChartNode>(record)
                .map_err(|e| invalid(format!("record at index {index}: {e}")))
        })
        .collect::<ApplicationResult<Vec<_>>>()?;

    if let Some(blank) = nodes.iter().find(|n| n.title.trim().is_empty()) {
        return Err(ApplicationError::InvalidSnapshot {
            message: format!("record {} has an empty title", blank.id),
        });
    }

    debug!("parse_snapshot: {} records", nodes.len());
    Ok(nodes)
}
