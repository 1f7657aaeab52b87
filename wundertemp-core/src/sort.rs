use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::PlaceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Keep the order the places were requested in.
    #[default]
    None,
    #[serde(alias = "alpha")]
    Alphabetical,
    /// Coldest first; places without a temperature go last.
    Numeric,
}

/// Reorder records according to `mode`. Both orderings are stable.
pub fn sort_records(mut records: Vec<PlaceRecord>, mode: SortMode) -> Vec<PlaceRecord> {
    match mode {
        SortMode::None => {}
        SortMode::Alphabetical => records.sort_by(|a, b| a.name().cmp(b.name())),
        SortMode::Numeric => records.sort_by(by_temperature),
    }
    records
}

// A missing temperature acts as +infinity: it ranks after every real reading.
fn by_temperature(a: &PlaceRecord, b: &PlaceRecord) -> Ordering {
    match (a.temp_f(), b.temp_f()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
