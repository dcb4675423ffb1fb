//! Column-name normalization and the merged-dataset validator.

use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::error::{ParseError, ParseResult, SchemaViolation};

/// The exact column set every normalized dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] =
    ["naive_timestamp", "variable", "value", "last_modified_utc"];

/// Normalize one raw column name: trim, lowercase, spaces to underscores.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Normalize a header row, mapping normalized name to original position.
///
/// Two raw columns normalizing to the same name is a fatal condition: the
/// payload is ambiguous and must not be decoded by silently dropping one.
pub fn normalize_headers(raw: &[String]) -> ParseResult<HashMap<String, usize>> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(raw.len());
    for (index, name) in raw.iter().enumerate() {
        let normalized = normalize_name(name);
        if let Some(&first) = seen.get(&normalized) {
            return Err(ParseError::ColumnCollision {
                first: raw[first].clone(),
                second: name.clone(),
                normalized,
            });
        }
        seen.insert(normalized, index);
    }
    Ok(seen)
}

/// Reject any normalized column the schema does not know.
///
/// The wire contract is exactly four columns; an extra one means the remote
/// schema drifted, which must fail the run rather than persist a dataset
/// that silently ignores data.
pub fn reject_unknown_columns<'a>(
    normalized: impl IntoIterator<Item = &'a str>,
) -> ParseResult<()> {
    for name in normalized {
        if !REQUIRED_COLUMNS.contains(&name) {
            return Err(ParseError::UnexpectedColumn {
                column: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate a merged dataset against the residual dynamic invariants.
///
/// Run once per family run, after merging all days, never per record batch.
/// Column presence, field types and UTC tagging are static properties of
/// [`crate::dataset::Record`]; what remains checkable at runtime is that no
/// record carries an empty timestamp and every measurement is finite (a NaN
/// cannot round-trip the artifact format).
pub fn validate(dataset: &Dataset) -> Result<(), SchemaViolation> {
    for (index, record) in dataset.iter().enumerate() {
        if record.naive_timestamp.trim().is_empty() {
            return Err(SchemaViolation::EmptyTimestamp { index });
        }
        if !record.value.is_finite() {
            return Err(SchemaViolation::NonFiniteValue {
                index,
                value: record.value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use chrono::{TimeZone, Utc};

    #[test]
    fn normalization_trims_lowercases_and_underscores() {
        assert_eq!(normalize_name("Naive_Timestamp "), "naive_timestamp");
        assert_eq!(normalize_name(" Variable"), "variable");
        assert_eq!(normalize_name("Last Modified utc"), "last_modified_utc");
        assert_eq!(normalize_name("value"), "value");
    }

    #[test]
    fn collision_is_fatal() {
        let raw = vec!["Value".to_string(), " value ".to_string()];
        let err = normalize_headers(&raw).unwrap_err();
        match err {
            ParseError::ColumnCollision {
                first,
                second,
                normalized,
            } => {
                assert_eq!(first, "Value");
                assert_eq!(second, " value ");
                assert_eq!(normalized, "value");
            }
            other => panic!("expected ColumnCollision, got {other}"),
        }
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert!(reject_unknown_columns(["naive_timestamp", "variable"]).is_ok());
        assert!(matches!(
            reject_unknown_columns(["naive_timestamp", "forecast_horizon"]),
            Err(ParseError::UnexpectedColumn { column }) if column == "forecast_horizon"
        ));
    }

    fn record(ts: &str, value: f64) -> Record {
        Record {
            naive_timestamp: ts.to_string(),
            variable: 7,
            value,
            last_modified_utc: Utc.with_ymd_and_hms(2020, 10, 3, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn validator_accepts_well_formed_and_empty_datasets() {
        assert!(validate(&Dataset::new()).is_ok());
        let ds = Dataset::from_records(vec![record("1601683200000", 1.0)]);
        assert!(validate(&ds).is_ok());
    }

    #[test]
    fn validator_rejects_blank_timestamp() {
        let ds = Dataset::from_records(vec![record("  ", 1.0)]);
        assert!(matches!(
            validate(&ds),
            Err(SchemaViolation::EmptyTimestamp { index: 0 })
        ));
    }

    #[test]
    fn validator_rejects_non_finite_value() {
        let ds = Dataset::from_records(vec![record("t", 1.0), record("t", f64::NAN)]);
        assert!(matches!(
            validate(&ds),
            Err(SchemaViolation::NonFiniteValue { index: 1, .. })
        ));
    }
}
