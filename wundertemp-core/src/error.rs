use thiserror::Error;

/// Everything that can go wrong while turning one place name into an observation.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("The server returned error code {status}")]
    Http { status: u16 },

    #[error("<location not found>")]
    NotFound,

    /// The expected element chain is missing from the page.
    #[error("no element matching {selector} in page markup")]
    Markup { selector: String },

    #[error("unrecognized temperature unit '{unit}'")]
    UnrecognizedUnit { unit: String },

    #[error("could not parse temperature value '{raw}'")]
    InvalidTemperature { raw: String },

    #[error("invalid search endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request to weather site failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ScrapeError {
    pub fn markup(selector: impl Into<String>) -> Self {
        Self::Markup { selector: selector.into() }
    }
}
