use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use scraper::Html;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::Config,
    error::ScrapeError,
    navigator::{AttrFilter, find_first},
};

use super::{QueryResult, WeatherSource};

/// Queries the weather site's search endpoint and classifies its answer.
#[derive(Debug, Clone)]
pub struct PlaceResolver {
    endpoint: Url,
    http: Client,
}

impl PlaceResolver {
    pub fn new(endpoint: Url, http: Client) -> Self {
        Self { endpoint, http }
    }

    /// Build a resolver with an HTTP client configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::new(parse_endpoint(&config.endpoint)?, http))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn resolve(&self, place: &str) -> Result<QueryResult, ScrapeError> {
        debug!(place, host = self.host(), "querying weather site");

        let res = self.http.get(self.endpoint.clone()).query(&[("query", place)]).send().await?;

        let status = res.status();
        let body = res.text().await?;

        let result = classify(status, body);
        debug!(place, status = status.as_u16(), result = result_kind(&result), "classified response");

        Ok(result)
    }
}

/// Parse a search endpoint; only absolute http(s) URLs with a host are usable.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ScrapeError> {
    let invalid = |reason: String| ScrapeError::InvalidEndpoint { endpoint: endpoint.to_string(), reason };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if !["http", "https"].contains(&url.scheme()) {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// Decide what a search response means. A non-2xx status wins over the body;
/// a disambiguation list means the query had no exact match.
pub fn classify(status: StatusCode, body: String) -> QueryResult {
    if !status.is_success() {
        return QueryResult::HttpError(status.as_u16());
    }

    let city_list = AttrFilter::class("row city-list").on_tag("div");
    let document = Html::parse_document(&body);
    let ambiguous = find_first(document.root_element(), &city_list).is_some();
    drop(document);

    if ambiguous { QueryResult::NotFound } else { QueryResult::Found(body) }
}

fn result_kind(result: &QueryResult) -> &'static str {
    match result {
        QueryResult::Found(_) => "found",
        QueryResult::NotFound => "not-found",
        QueryResult::HttpError(_) => "http-error",
    }
}

#[async_trait]
impl WeatherSource for PlaceResolver {
    async fn lookup(&self, place: &str) -> Result<QueryResult, ScrapeError> {
        self.resolve(place).await
    }

    fn host(&self) -> &str {
        self.endpoint.host_str().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_is_http_error() {
        let body = "<html><body>maintenance</body></html>".to_string();
        assert_eq!(classify(StatusCode::SERVICE_UNAVAILABLE, body), QueryResult::HttpError(503));
        assert_eq!(classify(StatusCode::NOT_FOUND, String::new()), QueryResult::HttpError(404));
    }

    #[test]
    fn status_is_checked_before_body() {
        let body = r#"<div class="row city-list"></div>"#.to_string();
        assert_eq!(classify(StatusCode::BAD_GATEWAY, body), QueryResult::HttpError(502));
    }

    #[test]
    fn city_list_means_not_found() {
        let body = r#"<html><body><div class="row city-list"><a>Paris, TX</a></div></body></html>"#;
        assert_eq!(classify(StatusCode::OK, body.to_string()), QueryResult::NotFound);
    }

    #[test]
    fn other_pages_are_found() {
        let body = r#"<html><body><div id="curCond">Clear</div></body></html>"#.to_string();
        assert_eq!(classify(StatusCode::OK, body.clone()), QueryResult::Found(body));
    }

    fn resolver(endpoint: &str) -> PlaceResolver {
        PlaceResolver::new(parse_endpoint(endpoint).expect("endpoint should parse"), Client::new())
    }

    #[test]
    fn host_strips_scheme_and_path() {
        let resolver = resolver("https://www.wunderground.com/cgi-bin/findweather/getForecast");
        assert_eq!(resolver.host(), "www.wunderground.com");
    }

    #[test]
    fn host_hides_credentials_and_port() {
        let resolver = resolver("http://user:pw@example.com:8080/search?lang=en");
        assert_eq!(resolver.host(), "example.com");
    }

    #[test]
    fn malformed_endpoints_are_rejected() {
        for endpoint in ["not a url", "/relative/path", "ftp://example.com/search", "mailto:a@b.c"] {
            let err = parse_endpoint(endpoint).unwrap_err();
            assert!(matches!(err, ScrapeError::InvalidEndpoint { .. }), "{endpoint}");
        }
    }

    #[test]
    fn from_config_rejects_bad_endpoint() {
        let config = Config { endpoint: "not a url".to_string(), ..Config::default() };
        let err = PlaceResolver::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }
}
