//! Mock HTTP transport and sample wire payloads for tests.
//!
//! `ScriptedHttp` stands in for the network at the [`HttpGet`] seam:
//! responses are scripted per URL and consumed in order, and every attempt
//! is recorded so tests can assert on retry behavior.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::fetch::{HttpGet, HttpResponse, TransportResult};

/// Scripted [`HttpGet`] implementation.
///
/// Each URL has a queue of canned responses, consumed one per attempt; when
/// a queue runs dry the last response is repeated. URLs with no script
/// either return the configured default or a transport error.
#[derive(Default)]
pub struct ScriptedHttp {
    scripts: Arc<RwLock<HashMap<String, VecDeque<HttpResponse>>>>,
    default_response: Arc<RwLock<Option<HttpResponse>>>,
    attempts: Arc<RwLock<HashMap<String, u32>>>,
}

impl ScriptedHttp {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url` (builder form).
    pub fn with_response(self, url: &str, status: u16, body: &str) -> Self {
        self.push_response(url, status, body);
        self
    }

    /// Respond to any unscripted URL with this status/body (builder form).
    pub fn with_default(self, status: u16, body: &str) -> Self {
        *self.default_response.write().unwrap() = Some(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    /// Queue a response for `url`.
    pub fn push_response(&self, url: &str, status: u16, body: &str) {
        self.scripts
            .write()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
    }

    /// Number of GETs issued against `url`.
    pub fn attempts(&self, url: &str) -> u32 {
        self.attempts.read().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total GETs issued across all URLs.
    pub fn total_attempts(&self) -> u32 {
        self.attempts.read().unwrap().values().sum()
    }
}

impl Clone for ScriptedHttp {
    fn clone(&self) -> Self {
        Self {
            scripts: Arc::clone(&self.scripts),
            default_response: Arc::clone(&self.default_response),
            attempts: Arc::clone(&self.attempts),
        }
    }
}

#[async_trait]
impl HttpGet for ScriptedHttp {
    async fn get(&self, url: &str) -> TransportResult {
        *self
            .attempts
            .write()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let mut scripts = self.scripts.write().unwrap();
        if let Some(queue) = scripts.get_mut(url) {
            // Consume in order; repeat the final response once drained so a
            // single scripted 200 behaves like a healthy endpoint.
            if let Some(response) = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            } {
                return Ok(response);
            }
        }
        if let Some(default) = self.default_response.read().unwrap().clone() {
            return Ok(default);
        }
        Err(format!("no scripted response for {url}").into())
    }
}

/// Epoch milliseconds for midnight UTC of `day`.
pub fn day_epoch_ms(day: NaiveDate) -> i64 {
    day.and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
        .timestamp_millis()
}

/// Solar wire payload: a JSON record array with the remote's messy column
/// names, timestamps as epoch milliseconds and one shared modification
/// instant (midnight of `day`).
pub fn solar_payload(day: NaiveDate, records: usize) -> String {
    let base_ms = day_epoch_ms(day);
    let rows: Vec<String> = (0..records)
        .map(|i| {
            format!(
                r#"{{"Naive_Timestamp ":{}," Variable":{},"value":{},"Last Modified utc":{}}}"#,
                base_ms + (i as i64) * 300_000,
                (i as i64 * 37) % 1000,
                (i as f64) * 0.5 - 25.0,
                base_ms,
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

/// Wind wire payload: CSV with the remote's messy header names and
/// offset-carrying timestamp strings.
pub fn wind_payload(day: NaiveDate, records: usize) -> String {
    let mut out = String::from("Naive_Timestamp , Variable,value,Last Modified utc\n");
    for i in 0..records {
        let minutes = (i * 5) as u32;
        let ts = day
            .and_hms_opt(minutes / 60, minutes % 60, 0)
            .expect("five-minute grid stays within the day");
        out.push_str(&format!(
            "{}+00:00,{},{},{}+00:00\n",
            ts.format("%Y-%m-%d %H:%M:%S"),
            (i as i64 * 13) % 1000,
            (i as f64) * 0.25 - 12.5,
            day.and_hms_opt(0, 0, 0).unwrap().format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    out
}
