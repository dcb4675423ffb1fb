//! Solar generation: JSON record-array wire format.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::dataset::{Dataset, PayloadKind, RawPayload, Record};
use crate::error::{ParseError, ParseResult};
use crate::schema;
use crate::sources::Source;

/// Extraction strategy for the solar family.
///
/// The endpoint returns a JSON array of objects. Timestamps arrive as epoch
/// milliseconds: `naive_timestamp` is kept as the literal decimal string,
/// while the modification instant is scaled to nanoseconds and tagged UTC.
pub struct SolarSource {
    base_url: String,
}

impl SolarSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn parse_row(row: &serde_json::Map<String, Value>) -> ParseResult<Record> {
        let raw_names: Vec<String> = row.keys().cloned().collect();
        let columns = schema::normalize_headers(&raw_names)?;
        schema::reject_unknown_columns(columns.keys().map(String::as_str))?;

        let field = |name: &str| -> ParseResult<&Value> {
            columns
                .get(name)
                .map(|&i| &row[&raw_names[i]])
                .ok_or_else(|| ParseError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Record {
            naive_timestamp: json_text(field("naive_timestamp")?),
            variable: field("variable")?.as_i64().ok_or_else(|| ParseError::Field {
                column: "variable".to_string(),
                expected: "integer",
                raw: field("variable").map(json_text).unwrap_or_default(),
            })?,
            value: field("value")?.as_f64().ok_or_else(|| ParseError::Field {
                column: "value".to_string(),
                expected: "float",
                raw: field("value").map(json_text).unwrap_or_default(),
            })?,
            last_modified_utc: epoch_millis_to_utc(field("last_modified_utc")?)?,
        })
    }
}

/// Render a JSON value the way the wire column is consumed downstream: a
/// string stays itself, anything else keeps its literal JSON form.
fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The wire's modification timestamp is an epoch value in milliseconds;
/// scale by 1e6 to nanoseconds and attach UTC.
fn epoch_millis_to_utc(value: &Value) -> ParseResult<DateTime<Utc>> {
    let raw = value.as_f64().ok_or_else(|| ParseError::Timestamp {
        raw: json_text(value),
    })?;
    Ok(Utc.timestamp_nanos((raw * 1e6) as i64))
}

impl Source for SolarSource {
    fn family(&self) -> &'static str {
        "solar"
    }

    fn output_name(&self) -> &'static str {
        "solar.json"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Json
    }

    fn build_url(&self, api_key: &str, day: NaiveDate) -> String {
        format!(
            "{}/{}/renewables/solargen.json?api_key={}",
            self.base_url,
            day.format("%Y-%m-%d"),
            api_key
        )
    }

    fn parse(&self, payload: &RawPayload) -> ParseResult<Dataset> {
        let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(&payload.body)?;
        rows.iter().map(Self::parse_row).collect()
    }
}
