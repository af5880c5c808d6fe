//! Composite priority score for a severity / urgency / effort triple.
//!
//! `priority = (severity * 0.5 + urgency * 0.3 + (6 - effort) * 0.2) / 5 * 100`,
//! rounded to two decimals. Effort is inverted so cheap fixes rank higher.

use crate::error::{Error, Result};
use crate::models::Ratings;

pub const SEVERITY_WEIGHT: f64 = 0.5;
pub const URGENCY_WEIGHT: f64 = 0.3;
pub const EFFORT_WEIGHT: f64 = 0.2;

pub fn score(severity: u8, urgency: u8, effort: u8) -> Result<f64> {
    let severity = validate("severity", severity)?;
    let urgency = validate("urgency", urgency)?;
    let effort = validate("effort", effort)?;

    let inverted_effort = (Ratings::MAX + 1) as f64 - effort;
    let weighted = severity * SEVERITY_WEIGHT
        + urgency * URGENCY_WEIGHT
        + inverted_effort * EFFORT_WEIGHT;

    Ok(round2(weighted / Ratings::MAX as f64 * 100.0))
}

pub fn score_ratings(ratings: Ratings) -> Result<f64> {
    score(ratings.severity, ratings.urgency, ratings.effort)
}

fn validate(field: &'static str, value: u8) -> Result<f64> {
    if (Ratings::MIN..=Ratings::MAX).contains(&value) {
        Ok(value as f64)
    } else {
        Err(Error::InvalidRating { field, value })
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
