//! Core library for the `wundertemp` CLI.
//!
//! This crate defines:
//! - Navigation of scraped weather pages ([`navigator`])
//! - Lookup and classification of place searches ([`source`])
//! - Assembly of per-place records ([`builder`])
//! - Sorting and rendering of the collected records ([`sort`], [`format`])
//!
//! The entry point is [`report`]: it takes the requested places, an immutable
//! [`Config`] and [`ReportOptions`], and returns the text to print.

pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod navigator;
pub mod sort;
pub mod source;

pub use builder::{RecordBuilder, UNKNOWN_ERROR};
pub use config::{Config, PauseConfig, ReportOptions};
pub use error::ScrapeError;
pub use format::{OutputMode, TempDisplay};
pub use model::{Observation, PlaceRecord, parse_places, title_case};
pub use sort::{SortMode, sort_records};
pub use source::{PlaceResolver, QueryResult, WeatherSource};

use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Build one record per place, in order, pausing between lookups.
pub async fn collect(
    places: &[String],
    source: &dyn WeatherSource,
    pause: PauseConfig,
) -> Vec<PlaceRecord> {
    let builder = RecordBuilder::new(source);
    let mut records = Vec::with_capacity(places.len());

    for (i, place) in places.iter().enumerate() {
        if i > 0 {
            let delay = pick_delay(pause);
            debug!(delay_ms = delay.as_millis() as u64, "pausing before next lookup");
            tokio::time::sleep(delay).await;
        }
        records.push(builder.build(place).await);
    }

    records
}

/// Resolve, sort and render `places` in one go.
pub async fn report(
    places: &[String],
    source: &dyn WeatherSource,
    config: &Config,
    options: ReportOptions,
) -> anyhow::Result<String> {
    let records = collect(places, source, config.pause).await;
    let records = sort_records(records, options.sort);
    format::render(&records, options.output, options.display)
}

fn pick_delay(pause: PauseConfig) -> Duration {
    let range = pause.range();
    if range.start() == range.end() {
        return *range.start();
    }
    rand::thread_rng().gen_range(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::{FakeSource, station_page};

    fn places(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn delay_stays_within_bounds() {
        let pause = PauseConfig { min_secs: 1.0, max_secs: 2.0 };
        for _ in 0..100 {
            let d = pick_delay(pause);
            assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(2), "{d:?}");
        }
        assert_eq!(pick_delay(PauseConfig::none()), Duration::ZERO);
    }

    #[tokio::test]
    async fn collect_keeps_request_order_and_isolates_failures() {
        let source = FakeSource::default()
            .with("tokyo japan", QueryResult::Found(station_page("Clear", "10", "°C")))
            .with("atlantis", QueryResult::NotFound)
            .with("paris france", QueryResult::Found(station_page("Rain", "48.2", "°F")));

        let records =
            collect(&places(&["tokyo japan", "atlantis", "paris france"]), &source, PauseConfig::none())
                .await;

        let names: Vec<_> = records.iter().map(PlaceRecord::name).collect();
        assert_eq!(names, ["Tokyo Japan", "Atlantis", "Paris France"]);
        assert_eq!(records[0].temp_f(), Some(50.0));
        assert!(records[1].is_error());
        assert_eq!(records[2].condition(), Some("rain"));
    }

    #[tokio::test(start_paused = true)]
    async fn collect_pauses_only_between_lookups() {
        let source = FakeSource::default()
            .with("a", QueryResult::NotFound)
            .with("b", QueryResult::NotFound);
        let pause = PauseConfig { min_secs: 1.0, max_secs: 2.0 };

        let start = tokio::time::Instant::now();
        collect(&places(&["a", "b"]), &source, pause).await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(1) && elapsed <= Duration::from_secs(2), "{elapsed:?}");
    }

    #[tokio::test]
    async fn report_sorts_numerically_into_table() {
        let source = FakeSource::default()
            .with("tokyo", QueryResult::Found(station_page("Clear", "50.0", "F")))
            .with("errortown", QueryResult::HttpError(500));
        let config = Config { pause: PauseConfig::none(), ..Config::default() };
        let options = ReportOptions {
            display: TempDisplay::Fahrenheit,
            sort: SortMode::Numeric,
            output: OutputMode::Table,
        };

        let out = report(&places(&["errortown", "tokyo"]), &source, &config, options).await.unwrap();

        let rows: Vec<_> = out.lines().skip(2).collect();
        assert_eq!(rows, ["Tokyo     | 50.0 F | clear", "Errortown The server returned error code 500"]);
    }

    #[tokio::test]
    async fn report_defaults_to_json() {
        let source = FakeSource::default().with("nowhere", QueryResult::NotFound);
        let config = Config { pause: PauseConfig::none(), ..Config::default() };

        let out = report(&places(&["nowhere"]), &source, &config, ReportOptions::default())
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["name"], "Nowhere");
        assert_eq!(parsed[0]["error"], "<location not found>");
        assert!(parsed[0]["temp_f"].is_null());
    }
}
