use model::{
    pagination::position::Position,
    records::record::{ChangeRecord, Data, Operation},
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct Envelope {
    operation: Operation,
    payload: Value,
}

/// Turns one stdin line into a record. Objects carrying both `operation`
/// and `payload` are envelopes; anything else is the payload of a `create`.
pub fn parse_record(line: &str) -> Result<ChangeRecord, serde_json::Error> {
    let value: Value = serde_json::from_str(line)?;

    if let Value::Object(map) = &value
        && map.contains_key("operation")
        && map.contains_key("payload")
    {
        let envelope: Envelope = serde_json::from_value(value)?;
        return Ok(
            ChangeRecord::create(Position::default(), None, Data::from_json(envelope.payload))
                .with_operation(envelope.operation),
        );
    }

    Ok(ChangeRecord::create(
        Position::default(),
        None,
        Data::from_json(value),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_is_structured_create() {
        let record = parse_record(r#"{"sku": "A-1", "qty": 2}"#).unwrap();
        assert!(record.is_create());
        assert_eq!(
            record.payload,
            Some(Data::from_json(json!({"sku": "A-1", "qty": 2})))
        );
    }

    #[test]
    fn test_array_is_raw_create() {
        let record = parse_record(r#"["A-1", 2]"#).unwrap();
        assert_eq!(record.payload, Some(Data::Raw(br#"["A-1",2]"#.to_vec())));
    }

    #[test]
    fn test_envelope() {
        let record = parse_record(r#"{"operation": "delete", "payload": {"sku": "A-1"}}"#).unwrap();
        assert_eq!(record.operation, Operation::Delete);
        assert_eq!(record.payload, Some(Data::from_json(json!({"sku": "A-1"}))));
    }

    #[test]
    fn test_unknown_operation_rejected() {
        assert!(parse_record(r#"{"operation": "upsert", "payload": {}}"#).is_err());
        assert!(parse_record("not json").is_err());
    }
}
