//! Wind generation: CSV wire format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;

use crate::dataset::{Dataset, PayloadKind, RawPayload, Record};
use crate::error::{ParseError, ParseResult};
use crate::schema;
use crate::sources::Source;

/// Extraction strategy for the wind family.
///
/// The endpoint returns CSV with a header row. The modification column is a
/// date-time string that may carry a UTC offset; it is converted to UTC, and
/// a naive string is localized as UTC.
pub struct WindSource {
    base_url: String,
}

impl WindSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// Positions of the four required columns in the CSV header.
struct ColumnIndices {
    naive_timestamp: usize,
    variable: usize,
    value: usize,
    last_modified_utc: usize,
}

impl ColumnIndices {
    fn from_header(header: &StringRecord) -> ParseResult<Self> {
        let raw: Vec<String> = header.iter().map(str::to_string).collect();
        let columns = schema::normalize_headers(&raw)?;
        schema::reject_unknown_columns(columns.keys().map(String::as_str))?;

        let index = |name: &str| -> ParseResult<usize> {
            columns
                .get(name)
                .copied()
                .ok_or_else(|| ParseError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            naive_timestamp: index("naive_timestamp")?,
            variable: index("variable")?,
            value: index("value")?,
            last_modified_utc: index("last_modified_utc")?,
        })
    }
}

fn cell<'a>(row: &'a StringRecord, index: usize, column: &str) -> ParseResult<&'a str> {
    row.get(index).ok_or_else(|| ParseError::MissingColumn {
        column: column.to_string(),
    })
}

fn parse_i64(raw: &str, column: &str) -> ParseResult<i64> {
    raw.trim().parse().map_err(|_| ParseError::Field {
        column: column.to_string(),
        expected: "integer",
        raw: raw.to_string(),
    })
}

fn parse_f64(raw: &str, column: &str) -> ParseResult<f64> {
    raw.trim().parse().map_err(|_| ParseError::Field {
        column: column.to_string(),
        expected: "float",
        raw: raw.to_string(),
    })
}

/// Interpret a wire date-time string as a UTC instant.
///
/// Accepts the pandas CSV form (`2020-10-03 00:00:00+00:00`), RFC 3339, or
/// a naive date-time, which is localized as UTC.
fn parse_utc_timestamp(raw: &str) -> ParseResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(aware) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(aware.with_timezone(&Utc));
    }
    if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(aware.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    Err(ParseError::Timestamp {
        raw: raw.to_string(),
    })
}

impl Source for WindSource {
    fn family(&self) -> &'static str {
        "wind"
    }

    fn output_name(&self) -> &'static str {
        "wind.json"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Csv
    }

    fn build_url(&self, api_key: &str, day: NaiveDate) -> String {
        format!(
            "{}/{}/renewables/windgen.csv?api_key={}",
            self.base_url,
            day.format("%Y-%m-%d"),
            api_key
        )
    }

    fn parse(&self, payload: &RawPayload) -> ParseResult<Dataset> {
        let mut reader = csv::Reader::from_reader(payload.body.as_bytes());
        let columns = ColumnIndices::from_header(reader.headers()?)?;

        let mut dataset = Dataset::new();
        for row in reader.records() {
            let row = row?;
            dataset.push(Record {
                naive_timestamp: cell(&row, columns.naive_timestamp, "naive_timestamp")?
                    .to_string(),
                variable: parse_i64(cell(&row, columns.variable, "variable")?, "variable")?,
                value: parse_f64(cell(&row, columns.value, "value")?, "value")?,
                last_modified_utc: parse_utc_timestamp(cell(
                    &row,
                    columns.last_modified_utc,
                    "last_modified_utc",
                )?)?,
            });
        }
        Ok(dataset)
    }
}
