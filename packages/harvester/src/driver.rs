//! Top-level run: one extract/persist pipeline per registered source.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};
use futures::future::join_all;
use tracing::{error, info};

use crate::error::{HarvestError, PersistError, Result};
use crate::fetch::{Fetcher, HttpGet};
use crate::persist;
use crate::pipeline;
use crate::sources::{SolarSource, Source, WindSource};

/// Configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Credential passed to the remote API as a query parameter.
    pub api_key: String,

    /// Directory the per-family artifacts are written into.
    pub output_dir: PathBuf,

    /// Days to extract. Distinct; order determines merge order.
    pub days: Vec<NaiveDate>,
}

impl HarvestConfig {
    /// Config for the standard window: today and the six preceding days.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            output_dir: PathBuf::from("./output"),
            days: trailing_days(7),
        }
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the day window explicitly.
    pub fn with_days(mut self, days: Vec<NaiveDate>) -> Self {
        self.days = days;
        self
    }
}

/// Today (UTC) and the `count - 1` preceding calendar days, newest first.
pub fn trailing_days(count: usize) -> Vec<NaiveDate> {
    let today = Utc::now().date_naive();
    (0..count as i64)
        .map(|offset| today - Duration::days(offset))
        .collect()
}

/// The fixed source set, one per data family.
pub fn default_sources(base_url: &str) -> Vec<Box<dyn Source>> {
    vec![
        Box::new(SolarSource::new(base_url)),
        Box::new(WindSource::new(base_url)),
    ]
}

/// One family's successful outcome.
#[derive(Debug)]
pub struct FamilyOutcome {
    pub family: &'static str,
    pub artifact: PathBuf,
    pub records: usize,
}

/// Aggregate outcome of a run across all families.
///
/// A failed family never blocks the others from attempting, but the run as
/// a whole succeeds only if every family succeeded.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<FamilyOutcome>,
    pub failed: Vec<(&'static str, HarvestError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

async fn harvest_family<C: HttpGet>(
    source: &dyn Source,
    fetcher: &Fetcher<C>,
    config: &HarvestConfig,
) -> Result<FamilyOutcome> {
    let dataset = pipeline::extract_days(source, fetcher, &config.api_key, &config.days).await?;
    let artifact = config.output_dir.join(source.output_name());
    persist::persist(&dataset, &artifact)?;
    Ok(FamilyOutcome {
        family: source.family(),
        records: dataset.len(),
        artifact,
    })
}

/// Run every source's pipeline concurrently and summarize the outcomes.
///
/// Creates the output directory idempotently before any fetch is issued.
pub async fn run<C: HttpGet>(
    config: &HarvestConfig,
    sources: &[Box<dyn Source>],
    fetcher: &Fetcher<C>,
) -> Result<RunSummary> {
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| {
            HarvestError::Persist(PersistError::Io {
                path: config.output_dir.clone(),
                source: e,
            })
        })?;

    info!(
        families = sources.len(),
        days = config.days.len(),
        output_dir = %config.output_dir.display(),
        "harvest run starting"
    );

    let tasks = sources.iter().map(|source| async move {
        (
            source.family(),
            harvest_family(source.as_ref(), fetcher, config).await,
        )
    });

    let mut summary = RunSummary::default();
    for (family, outcome) in join_all(tasks).await {
        match outcome {
            Ok(done) => {
                info!(
                    family,
                    records = done.records,
                    artifact = %done.artifact.display(),
                    "family pipeline succeeded"
                );
                summary.succeeded.push(done);
            }
            Err(e) => {
                error!(family, error = %e, "family pipeline failed");
                summary.failed.push((family, e));
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{solar_payload, wind_payload, ScriptedHttp};
    use std::time::Duration as StdDuration;

    const BASE: &str = "http://127.0.0.1:8000";
    const KEY: &str = "k3y";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 10, d).unwrap()
    }

    fn fetcher(http: &ScriptedHttp) -> Fetcher<ScriptedHttp> {
        Fetcher::new(http.clone()).with_retry_interval(StdDuration::from_millis(1))
    }

    fn config(dir: &std::path::Path) -> HarvestConfig {
        HarvestConfig::new(KEY)
            .with_output_dir(dir)
            .with_days(vec![day(1)])
    }

    #[tokio::test]
    async fn both_families_harvest_into_the_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let sources = default_sources(BASE);
        let http = ScriptedHttp::new()
            .with_response(
                &sources[0].build_url(KEY, day(1)),
                200,
                &solar_payload(day(1), 4),
            )
            .with_response(
                &sources[1].build_url(KEY, day(1)),
                200,
                &wind_payload(day(1), 3),
            );

        let summary = run(&config(dir.path()), &sources, &fetcher(&http))
            .await
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.succeeded.len(), 2);
        assert_eq!(persist::load(&dir.path().join("solar.json")).unwrap().len(), 4);
        assert_eq!(persist::load(&dir.path().join("wind.json")).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn one_failed_family_does_not_block_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let sources = default_sources(BASE);
        // Solar always throttled; wind healthy.
        let http = ScriptedHttp::new()
            .with_response(&sources[0].build_url(KEY, day(1)), 429, "Too many requests")
            .with_response(
                &sources[1].build_url(KEY, day(1)),
                200,
                &wind_payload(day(1), 3),
            );

        let summary = run(&config(dir.path()), &sources, &fetcher(&http))
            .await
            .unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "solar");
        assert!(!dir.path().join("solar.json").exists());
        assert!(dir.path().join("wind.json").exists());
    }

    #[tokio::test]
    async fn output_dir_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sources = default_sources(BASE);
        let http = ScriptedHttp::new().with_default(200, "[]");

        let cfg = config(dir.path());
        let solar_only = vec![sources.into_iter().next().unwrap()];
        run(&cfg, &solar_only, &fetcher(&http)).await.unwrap();
        let summary = run(&cfg, &solar_only, &fetcher(&http)).await.unwrap();

        assert!(summary.is_success());
    }

    #[test]
    fn trailing_days_covers_the_window_newest_first() {
        let days = trailing_days(7);
        assert_eq!(days.len(), 7);
        for pair in days.windows(2) {
            assert_eq!(pair[0] - pair[1], Duration::days(1));
        }
    }
}
