//! Per-family extraction sources.
//!
//! A [`Source`] is the polymorphic unit of the pipeline: it knows how to
//! address one day of one data family on the remote API and how to decode
//! that family's wire format into normalized records. The set of sources is
//! closed ([`SolarSource`] and [`WindSource`]), and instances are plain
//! values constructed by the driver, not a hidden registry.

mod solar;
mod wind;

pub use solar::SolarSource;
pub use wind::WindSource;

use chrono::NaiveDate;

use crate::dataset::{Dataset, PayloadKind, RawPayload};
use crate::error::ParseResult;

/// One data family's extraction strategy.
pub trait Source: Send + Sync {
    /// Family name, for logging and error context ("solar", "wind").
    fn family(&self) -> &'static str;

    /// Stable artifact filename for this family.
    fn output_name(&self) -> &'static str;

    /// Wire format this family's endpoint speaks.
    fn payload_kind(&self) -> PayloadKind;

    /// Deterministic URL for one day of this family.
    fn build_url(&self, api_key: &str, day: NaiveDate) -> String;

    /// Decode one day's raw payload into normalized records.
    fn parse(&self, payload: &RawPayload) -> ParseResult<Dataset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_embed_day_and_api_key() {
        let day = NaiveDate::from_ymd_opt(2020, 10, 3).unwrap();
        let solar = SolarSource::new("http://127.0.0.1:8000");
        let wind = WindSource::new("http://127.0.0.1:8000");

        assert_eq!(
            solar.build_url("k3y", day),
            "http://127.0.0.1:8000/2020-10-03/renewables/solargen.json?api_key=k3y"
        );
        assert_eq!(
            wind.build_url("k3y", day),
            "http://127.0.0.1:8000/2020-10-03/renewables/windgen.csv?api_key=k3y"
        );
    }

    #[test]
    fn families_are_distinct() {
        let solar = SolarSource::new("http://x");
        let wind = WindSource::new("http://x");

        assert_eq!(solar.family(), "solar");
        assert_eq!(solar.output_name(), "solar.json");
        assert_eq!(solar.payload_kind(), PayloadKind::Json);
        assert_eq!(wind.family(), "wind");
        assert_eq!(wind.output_name(), "wind.json");
        assert_eq!(wind.payload_kind(), PayloadKind::Csv);
    }
}
