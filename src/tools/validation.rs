//! Parameter rules shared by the tool handlers.
//!
//! Each rule checks one parameter (or one group of parameters) and returns
//! a classified [`GatewayError`] on failure, so handlers never branch on
//! raw input themselves.

use chrono::NaiveDate;

use crate::error::GatewayError;

/// Bounds for a `limit` parameter.
///
/// Values below 1 are rejected; values above `max` are clamped.
#[derive(Debug, Clone, Copy)]
pub struct LimitRule {
    /// Parameter name as exposed in the tool schema.
    pub name: &'static str,
    /// Used when the caller omits the parameter.
    pub default: u32,
    /// Ceiling; larger values are clamped to it.
    pub max: u32,
}

/// `search_tickets.limit`: default 10, at most 100.
pub const SEARCH_LIMIT: LimitRule = LimitRule {
    name: "limit",
    default: 10,
    max: 100,
};

/// `get_related_tickets.limit`: default 10, at most 30.
pub const RELATED_LIMIT: LimitRule = LimitRule {
    name: "limit",
    default: 10,
    max: 30,
};

impl LimitRule {
    /// Applies the rule to a caller-supplied value.
    pub fn apply(&self, value: Option<i64>) -> Result<u32, GatewayError> {
        match value {
            None => Ok(self.default),
            Some(v) if v < 1 => Err(GatewayError::invalid_parameter(
                self.name,
                format!("must be at least 1, got {}", v),
            )),
            Some(v) => Ok(u32::try_from(v).unwrap_or(u32::MAX).min(self.max)),
        }
    }
}

/// Requires a non-blank string; returns it trimmed.
pub fn require_text(name: &str, value: &str) -> Result<String, GatewayError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GatewayError::invalid_parameter(name, "is required and cannot be empty"));
    }
    Ok(value.to_string())
}

/// Requires a positive ticket id.
pub fn require_positive_id(name: &str, value: i64) -> Result<i64, GatewayError> {
    if value < 1 {
        return Err(GatewayError::invalid_parameter(
            name,
            format!("must be a positive integer, got {}", value),
        ));
    }
    Ok(value)
}

/// Parses an optional `YYYY-MM-DD` date.
pub fn optional_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, GatewayError> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                GatewayError::invalid_parameter(
                    name,
                    format!("must be a date in YYYY-MM-DD format, got {:?}", raw),
                )
            }),
    }
}

/// Requires an optional ordered date pair to be non-decreasing.
pub fn ordered_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), GatewayError> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(GatewayError::invalid_parameter(
            "start_date",
            format!("must not be after end_date ({} > {})", s, e),
        )),
        _ => Ok(()),
    }
}

/// Requires an optional float to lie in `[0.0, 1.0]`.
pub fn optional_unit_interval(name: &str, value: Option<f64>) -> Result<Option<f64>, GatewayError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(GatewayError::invalid_parameter(
            name,
            format!("must be between 0.0 and 1.0, got {}", v),
        )),
        other => Ok(other),
    }
}

/// Requires an optional string to be one of `choices` (case-insensitive);
/// returns it lower-cased.
pub fn optional_choice(
    name: &str,
    value: Option<&str>,
    choices: &[&str],
) -> Result<Option<String>, GatewayError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let lowered = raw.to_lowercase();
    if choices.contains(&lowered.as_str()) {
        Ok(Some(lowered))
    } else {
        Err(GatewayError::invalid_parameter(
            name,
            format!("must be one of {}, got {:?}", choices.join(", "), raw),
        ))
    }
}

/// Requires at least one of several optional lists to be present and
/// non-empty.
///
/// `sets` holds the length of each list, `None` when the caller omitted it.
/// All omitted yields `NoParameters`; some present but all empty yields
/// `EmptyParameters`.
pub fn at_least_one_of(sets: &[Option<usize>]) -> Result<(), GatewayError> {
    if sets.iter().all(Option::is_none) {
        return Err(GatewayError::NoParameters);
    }
    if sets.iter().flatten().all(|len| *len == 0) {
        return Err(GatewayError::EmptyParameters);
    }
    Ok(())
}
