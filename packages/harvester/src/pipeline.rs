//! Per-family orchestration: fetch every day concurrently, merge, validate.

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info};

use crate::dataset::{Dataset, RawPayload};
use crate::error::Result;
use crate::fetch::{Fetcher, HttpGet};
use crate::schema;
use crate::sources::Source;

/// Fetch and decode one day of one family.
async fn extract_day<C: HttpGet>(
    source: &dyn Source,
    fetcher: &Fetcher<C>,
    api_key: &str,
    day: NaiveDate,
) -> Result<Dataset> {
    let url = source.build_url(api_key, day);
    let body = fetcher.fetch(&url).await?;
    let payload = RawPayload::new(body, source.payload_kind());
    let dataset = source.parse(&payload)?;
    debug!(family = source.family(), day = %day, records = dataset.len(), "day decoded");
    Ok(dataset)
}

/// Extract a day range for one family into a single validated dataset.
///
/// One task per day runs concurrently; the fan-in waits for every sibling
/// (no mid-flight cancellation) and then propagates the first failure in
/// day order, so error reporting is deterministic. On success the per-day
/// datasets are concatenated in day order and validated once as a whole.
pub async fn extract_days<C: HttpGet>(
    source: &dyn Source,
    fetcher: &Fetcher<C>,
    api_key: &str,
    days: &[NaiveDate],
) -> Result<Dataset> {
    info!(
        family = source.family(),
        days = days.len(),
        "extraction starting"
    );

    let tasks = days.iter().map(|&day| extract_day(source, fetcher, api_key, day));
    let results = join_all(tasks).await;

    let mut merged = Dataset::new();
    for per_day in results {
        merged.merge(per_day?);
    }

    schema::validate(&merged)?;
    info!(
        family = source.family(),
        records = merged.len(),
        "extraction complete"
    );
    Ok(merged)
}
