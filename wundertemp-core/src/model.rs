use serde::Serialize;

/// A successfully scraped observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Lowercase condition text, e.g. "partly cloudy".
    pub condition: String,
    pub temp_f: f64,
}

/// One output row: the resolved weather of a place, or why it could not be resolved.
///
/// Either `error` is set, or both `condition` and `temp_f` are; the constructors
/// are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRecord {
    name: String,
    error: Option<String>,
    condition: Option<String>,
    temp_f: Option<f64>,
}

impl PlaceRecord {
    pub fn observed(name: impl Into<String>, observation: Observation) -> Self {
        Self {
            name: name.into(),
            error: None,
            condition: Some(observation.condition),
            temp_f: Some(observation.temp_f),
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self { name: name.into(), error: Some(error.into()), condition: None, temp_f: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn temp_f(&self) -> Option<f64> {
        self.temp_f
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Title-case a place name the way the lookup results are displayed:
/// every run of cased letters starts upper-case and continues lower-case.
/// Uncased characters (digits, punctuation, CJK) end a run.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if !cased {
            out.push(c);
        } else if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = cased;
    }

    out
}

/// Split a comma-separated place string into trimmed, non-empty place names.
pub fn parse_places(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
