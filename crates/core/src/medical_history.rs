//! Validation for the per-user medical history record.

use crate::error::CoreError;

/// Upper bound on `years_smoking`.
pub const MAX_YEARS_SMOKING: i32 = 100;

/// Upper bound on `packs_per_day`.
pub const MAX_PACKS_PER_DAY: f64 = 20.0;

/// Maximum length of free-text fields.
pub const MAX_TEXT_LENGTH: usize = 2_000;

pub fn validate_years_smoking(years: Option<i32>) -> Result<(), CoreError> {
    match years {
        Some(y) if !(0..=MAX_YEARS_SMOKING).contains(&y) => Err(CoreError::Validation(format!(
            "years_smoking must be between 0 and {MAX_YEARS_SMOKING}, got {y}"
        ))),
        _ => Ok(()),
    }
}

pub fn validate_packs_per_day(packs: Option<f64>) -> Result<(), CoreError> {
    match packs {
        Some(p) if !p.is_finite() || !(0.0..=MAX_PACKS_PER_DAY).contains(&p) => {
            Err(CoreError::Validation(format!(
                "packs_per_day must be between 0 and {MAX_PACKS_PER_DAY}, got {p}"
            )))
        }
        _ => Ok(()),
    }
}

pub fn validate_text(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if v.len() > MAX_TEXT_LENGTH => Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_TEXT_LENGTH} characters (got {})",
            v.len()
        ))),
        _ => Ok(()),
    }
}
