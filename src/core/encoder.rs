use crate::domain::model::{EncodedRecord, FeatureValue, Record};
use crate::domain::schema::{FeatureField, FeatureSchema, ModelColumn};
use crate::utils::error::EncodeError;
use serde_json::Value;

/// Maps raw form values onto the model's column layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Validates every field in declaration order and stops at the first
    /// problem; no record is produced unless all ten values pass.
    pub fn encode(&self, raw: &Record) -> Result<EncodedRecord, EncodeError> {
        for key in raw.data.keys() {
            if FeatureField::from_name(key).is_none() {
                tracing::debug!("Ignoring unknown field '{}'", key);
            }
        }

        let mut values: Vec<(FeatureField, FeatureValue)> =
            Vec::with_capacity(FeatureField::ALL.len());
        for field in FeatureField::ALL {
            let value = raw
                .data
                .get(field.name())
                .ok_or_else(|| EncodeError::MissingFieldError {
                    field: field.name().to_string(),
                })?;
            values.push((field, Self::typed_value(field, value)?));
        }

        let columns = ModelColumn::TRAINED_ORDER
            .iter()
            .map(|column| {
                let source = column.source_field();
                let value = values
                    .iter()
                    .find(|(field, _)| *field == source)
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| EncodeError::MissingFieldError {
                        field: source.name().to_string(),
                    })?;
                Ok((*column, value))
            })
            .collect::<Result<Vec<_>, EncodeError>>()?;

        let record = EncodedRecord::from_columns(columns);
        tracing::debug!("Encoded record: {}", record.to_json().unwrap_or_default());
        Ok(record)
    }

    fn typed_value(field: FeatureField, value: &Value) -> Result<FeatureValue, EncodeError> {
        let domain = field.domain();
        if !FeatureSchema::validate(field, value) {
            let reason = match (domain.is_categorical(), value) {
                (true, Value::String(_)) | (false, Value::Number(_)) => {
                    format!("expected {}", domain.describe())
                }
                (true, _) => "expected a text value".to_string(),
                (false, _) => "expected an integer value".to_string(),
            };
            return Err(EncodeError::ValidationError {
                field: field.name().to_string(),
                value: value.to_string(),
                reason,
            });
        }

        // Domain membership already guarantees the JSON type.
        match value {
            Value::String(s) => Ok(FeatureValue::Category(s.clone())),
            other => other
                .as_i64()
                .map(FeatureValue::Integer)
                .ok_or_else(|| EncodeError::ValidationError {
                    field: field.name().to_string(),
                    value: other.to_string(),
                    reason: "expected an integer value".to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Record {
        Record::new()
            .with("size", 500)
            .with("year_built", 2006)
            .with("hallway_type", "Mixed")
            .with("time_to_subway", "5min~10min")
            .with("subway_station", "Banwoldang")
            .with("num_facilities_in_apt", 3)
            .with("num_parking", 181)
            .with("num_universities", 1)
            .with("num_public_offices", 2)
            .with("num_other_facilities", 1)
    }

    #[test]
    fn test_encode_uses_trained_column_order() {
        let encoded = FeatureEncoder::new().encode(&valid_record()).unwrap();

        assert_eq!(encoded.len(), 10);
        assert_eq!(
            encoded.column_names(),
            ModelColumn::TRAINED_ORDER
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
        );
        assert_eq!(
            encoded.columns()[0].1,
            FeatureValue::Category("5min~10min".to_string())
        );
        assert_eq!(
            encoded.get(ModelColumn::PublicOfficesNearBy),
            Some(&FeatureValue::Integer(2))
        );
        assert_eq!(encoded.get(ModelColumn::SizeSqf), Some(&FeatureValue::Integer(500)));
        assert_eq!(
            encoded.get(ModelColumn::BasementParkingLots),
            Some(&FeatureValue::Integer(181))
        );
    }

    #[test]
    fn test_out_of_domain_value_names_field() {
        let cases = vec![
            ("size", json!(99)),
            ("size", json!(2400)),
            ("year_built", json!(2004)),
            ("hallway_type", json!("Open")),
            ("time_to_subway", json!("20min~")),
            ("subway_station", json!("Seoul")),
            ("num_facilities_in_apt", json!(6)),
            ("num_parking", json!(100)),
            ("num_universities", json!(6)),
            ("num_public_offices", json!(6)),
            ("num_other_facilities", json!(3)),
            ("size", json!("500")),
            ("hallway_type", json!(1)),
            ("num_parking", json!(null)),
        ];

        for (field, value) in cases {
            let raw = valid_record().with(field, value.clone());
            match FeatureEncoder::new().encode(&raw) {
                Err(EncodeError::ValidationError { field: f, value: v, .. }) => {
                    assert_eq!(f, field);
                    assert_eq!(v, value.to_string());
                }
                other => panic!("{} = {}: unexpected {:?}", field, value, other),
            }
        }
    }

    #[test]
    fn test_missing_field_is_reported() {
        for name in FeatureSchema::all_field_names() {
            let mut raw = valid_record();
            raw.remove(name);

            let err = FeatureEncoder::new().encode(&raw).unwrap_err();
            assert_eq!(
                err,
                EncodeError::MissingFieldError {
                    field: name.to_string()
                }
            );
        }
    }

    #[test]
    fn test_first_failure_in_declaration_order_wins() {
        let raw = valid_record()
            .with("size", 1)
            .with("num_other_facilities", 9);

        match FeatureEncoder::new().encode(&raw) {
            Err(EncodeError::ValidationError { field, .. }) => assert_eq!(field, "size"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validation_reason_describes_domain() {
        let raw = valid_record().with("num_other_facilities", 3);
        match FeatureEncoder::new().encode(&raw) {
            Err(EncodeError::ValidationError { reason, .. }) => {
                assert_eq!(reason, "expected one of 0, 1, 2, 5");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = valid_record().with("colour", "blue");
        assert!(FeatureEncoder::new().encode(&raw).is_ok());
    }
}
