//! Internal helpers for model validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! field validation so the engine enforces consistent invariants no matter
//! which operation performs the write.

use chrono::{DateTime, Utc};

use crate::{EngineError, ResultEngine};

pub(crate) const DESCRIPTION_MIN_CHARS: usize = 3;
pub(crate) const DESCRIPTION_MAX_CHARS: usize = 200;

/// Validate and trim a transaction description (3 to 200 characters).
pub(crate) fn validate_description(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let chars = trimmed.chars().count();
    if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&chars) {
        return Err(EngineError::InvalidField(format!(
            "description must be between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Amounts are strictly positive minor units.
pub(crate) fn validate_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Transactions record events that have already happened; future dates are
/// rejected.
pub(crate) fn validate_occurred_at(occurred_at: DateTime<Utc>) -> ResultEngine<()> {
    if occurred_at > Utc::now() {
        return Err(EngineError::InvalidField(
            "occurred_at must not be in the future".to_string(),
        ));
    }
    Ok(())
}

/// Validate and trim a goal title.
pub(crate) fn validate_title(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(
            "title must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Goal targets are at least one minor unit.
pub(crate) fn validate_target(target_minor: i64) -> ResultEngine<()> {
    if target_minor < 1 {
        return Err(EngineError::InvalidAmount(
            "target_amount_minor must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// A deadline, when present, must lie after the goal's start date.
pub(crate) fn validate_deadline(
    started_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
) -> ResultEngine<()> {
    if let Some(deadline) = deadline
        && deadline <= started_at
    {
        return Err(EngineError::InvalidField(
            "deadline must be after started_at".to_string(),
        ));
    }
    Ok(())
}

/// Drop empty optional text fields instead of storing blank strings.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
