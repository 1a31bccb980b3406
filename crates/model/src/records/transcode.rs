use crate::{
    error::TranscodeError,
    records::{
        record::{Data, StructuredData},
        row::Row,
    },
};
use serde_json::Value;

/// Converts a record payload into a sheet row.
///
/// Structured payloads produce their values in ascending key order. Raw
/// payloads are parsed as a JSON object first and, failing that, as a flat
/// JSON array that is already row-shaped.
pub fn row_from_record(payload: Option<&Data>) -> Result<Row, TranscodeError> {
    let payload = match payload {
        Some(data) if !data.is_empty() => data,
        _ => return Err(TranscodeError::EmptyPayload),
    };

    match payload {
        Data::Structured(map) => Ok(row_from_structured(map)),
        Data::Raw(bytes) => match serde_json::from_slice::<StructuredData>(bytes) {
            Ok(map) if map.is_empty() => Err(TranscodeError::EmptyPayload),
            Ok(map) => Ok(row_from_structured(&map)),
            Err(_) => {
                let cells: Vec<Value> =
                    serde_json::from_slice(bytes).map_err(TranscodeError::Malformed)?;
                Ok(Row::new(cells.into_iter().map(to_cell).collect()))
            }
        },
    }
}

/// Keys the cells of `row` by header name, or by column index when no
/// header covers the column.
pub fn record_from_row(row: &Row, headers: Option<&[String]>) -> StructuredData {
    row.cells()
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let key = headers
                .and_then(|h| h.get(idx))
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| idx.to_string());
            (key, cell.clone())
        })
        .collect()
}

fn row_from_structured(map: &StructuredData) -> Row {
    Row::new(map.values().cloned().map(to_cell).collect())
}

// cells only hold scalars
fn to_cell(value: Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar,
    }
}
