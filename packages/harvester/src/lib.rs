//! Daily renewables time-series extraction pipeline.
//!
//! Extracts per-day datasets for independent data families (solar, wind)
//! from a remote HTTP API, each family behind its own wire format, and
//! persists one validated artifact per family.
//!
//! Pipeline, leaf to root:
//!
//! - [`fetch`] - retrying network fetcher behind the [`HttpGet`] seam
//! - [`sources`] - per-family strategies: URL construction + wire decoding
//! - [`schema`] - column normalization and the merged-dataset validator
//! - [`pipeline`] - concurrent per-day fan-out and merge for one family
//! - [`persist`] - atomic artifact write with read-back verification
//! - [`driver`] - one pipeline per family, run concurrently
//!
//! # Usage
//!
//! ```rust,ignore
//! use harvester::{driver, fetch::{Fetcher, HttpFetchClient}};
//!
//! let config = driver::HarvestConfig::new(api_key);
//! let sources = driver::default_sources("http://127.0.0.1:8000");
//! let fetcher = Fetcher::new(HttpFetchClient::new());
//! let summary = driver::run(&config, &sources, &fetcher).await?;
//! assert!(summary.is_success());
//! ```

pub mod dataset;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod persist;
pub mod pipeline;
pub mod schema;
pub mod sources;
pub mod testing;

// Re-export core types at crate root
pub use dataset::{Dataset, PayloadKind, RawPayload, Record};
pub use driver::{default_sources, trailing_days, HarvestConfig, RunSummary};
pub use error::{FetchError, HarvestError, ParseError, PersistError, SchemaViolation};
pub use fetch::{Fetcher, HttpFetchClient, HttpGet, HttpResponse};
pub use sources::{SolarSource, Source, WindSource};
