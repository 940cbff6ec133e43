//! Prediction submission input and validation.
//!
//! [`PredictionInput`] is the wire shape of a submission. It is validated
//! with `validator` and converted into [`RiskFactors`] before any lock or
//! transaction is touched.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::risk::{Gender, RiskFactors};

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 120;

pub const YES: &str = "yes";
pub const NO: &str = "no";

/// Raw scorer fields as submitted by the client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictionInput {
    #[validate(range(min = 0, max = 120, message = "Age must be between 0 and 120"))]
    pub age: i32,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(custom(function = "validate_yes_no"))]
    pub smoking: String,
    #[validate(custom(function = "validate_yes_no"))]
    pub cough: String,
    #[validate(custom(function = "validate_yes_no"))]
    pub chest_pain: String,
    #[validate(custom(function = "validate_yes_no"))]
    pub fatigue: String,
    #[validate(custom(function = "validate_yes_no"))]
    pub shortness_of_breath: String,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    match parse_gender(value) {
        Some(_) => Ok(()),
        None => Err(invalid("gender", "must be 'Male' or 'Female'")),
    }
}

fn validate_yes_no(value: &str) -> Result<(), ValidationError> {
    match parse_yes_no(value) {
        Some(_) => Ok(()),
        None => Err(invalid("yes_no", "must be 'yes' or 'no'")),
    }
}

fn parse_gender(value: &str) -> Option<Gender> {
    match value {
        "Male" => Some(Gender::Male),
        "Female" => Some(Gender::Female),
        _ => None,
    }
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value {
        YES => Some(true),
        NO => Some(false),
        _ => None,
    }
}

/// Flatten `validator` errors into one deterministic message.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: invalid ({})", e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

impl PredictionInput {
    /// Validate every field and convert into scorer input.
    pub fn to_factors(&self) -> Result<RiskFactors, CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(describe_validation_errors(&e)))?;

        let flag = |value: &str| parse_yes_no(value).unwrap_or(false);
        let gender = parse_gender(&self.gender).ok_or_else(|| {
            CoreError::Validation("gender: must be 'Male' or 'Female'".into())
        })?;
        let age = u8::try_from(self.age)
            .map_err(|_| CoreError::Validation("age: Age must be between 0 and 120".into()))?;

        Ok(RiskFactors {
            age,
            gender,
            smoking: flag(self.smoking.as_str()),
            cough: flag(self.cough.as_str()),
            chest_pain: flag(self.chest_pain.as_str()),
            fatigue: flag(self.fatigue.as_str()),
            shortness_of_breath: flag(self.shortness_of_breath.as_str()),
        })
    }
}
