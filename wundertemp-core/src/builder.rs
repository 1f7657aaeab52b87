//! Turns a place name into a [`PlaceRecord`].
//!
//! Every failure for a single place ends up inside that place's record; the
//! builder never returns an error to its caller.

use scraper::Html;
use tracing::{info, warn};

use crate::{
    error::ScrapeError,
    format::celsius_to_fahrenheit,
    model::{Observation, PlaceRecord, title_case},
    navigator::{AttrFilter, SelectorChain, navigate},
    source::{QueryResult, WeatherSource},
};

pub const UNKNOWN_ERROR: &str = "<unknown error encountered>";

/// Selector chains pointing at the current-conditions widgets of a station page.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    pub condition: SelectorChain,
    pub temp_value: SelectorChain,
    pub temp_unit: SelectorChain,
}

impl Default for ExtractionPlan {
    fn default() -> Self {
        Self {
            condition: SelectorChain::new([AttrFilter::id("curCond"), AttrFilter::class("wx-value")]),
            temp_value: SelectorChain::new([AttrFilter::id("curTemp"), AttrFilter::class("wx-value")]),
            temp_unit: SelectorChain::new([AttrFilter::id("curTemp"), AttrFilter::class("wx-unit")]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Fahrenheit,
    Celsius,
}

impl TempUnit {
    /// Detect the unit from the page's unit label (already lowercased, e.g. "°f").
    pub fn detect(label: &str) -> Result<Self, ScrapeError> {
        if label.contains('f') {
            Ok(Self::Fahrenheit)
        } else if label.contains('c') {
            Ok(Self::Celsius)
        } else {
            Err(ScrapeError::UnrecognizedUnit { unit: label.to_string() })
        }
    }

    pub fn to_fahrenheit(self, value: f64) -> f64 {
        match self {
            Self::Fahrenheit => value,
            Self::Celsius => celsius_to_fahrenheit(value),
        }
    }
}

/// Pull the current condition and temperature out of a station page.
pub fn extract_observation(html: &str, plan: &ExtractionPlan) -> Result<Observation, ScrapeError> {
    let document = Html::parse_document(html);

    let condition = navigate(&document, &plan.condition)?.to_lowercase();
    let unit = navigate(&document, &plan.temp_unit)?.to_lowercase();
    let raw = navigate(&document, &plan.temp_value)?;

    let value: f64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ScrapeError::InvalidTemperature { raw: raw.clone() })?;

    let temp_f = TempUnit::detect(&unit)?.to_fahrenheit(value);

    Ok(Observation { condition, temp_f })
}

#[derive(Debug)]
pub struct RecordBuilder<'a> {
    source: &'a dyn WeatherSource,
    plan: ExtractionPlan,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(source: &'a dyn WeatherSource) -> Self {
        Self { source, plan: ExtractionPlan::default() }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: ExtractionPlan) -> Self {
        self.plan = plan;
        self
    }

    pub async fn build(&self, place: &str) -> PlaceRecord {
        let name = title_case(place);

        match self.observe(place).await {
            Ok(observation) => {
                info!(place = %name, temp_f = observation.temp_f, "resolved place");
                PlaceRecord::observed(name, observation)
            }
            Err(err @ (ScrapeError::Http { .. } | ScrapeError::NotFound)) => {
                info!(place = %name, error = %err, "place not resolved");
                PlaceRecord::failed(name, err.to_string())
            }
            Err(err) => {
                warn!(place = %name, error = %err, "failed to extract weather");
                PlaceRecord::failed(name, UNKNOWN_ERROR)
            }
        }
    }

    async fn observe(&self, place: &str) -> Result<Observation, ScrapeError> {
        match self.source.lookup(place).await? {
            QueryResult::HttpError(status) => Err(ScrapeError::Http { status }),
            QueryResult::NotFound => Err(ScrapeError::NotFound),
            QueryResult::Found(html) => extract_observation(&html, &self.plan),
        }
    }
}
