use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::ScrapeError;

pub mod wunderground;

pub use wunderground::PlaceResolver;

/// How the weather site answered a search for one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// The place resolved to a single station page; holds the raw HTML.
    Found(String),
    /// The site answered with a list of candidates instead of a station page.
    NotFound,
    HttpError(u16),
}

/// Anything that can look a place up and hand back the site's answer.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn lookup(&self, place: &str) -> Result<QueryResult, ScrapeError>;

    /// Host shown to the user while fetching.
    fn host(&self) -> &str;
}
