//! Heuristic lung-cancer risk scoring.
//!
//! [`assess`] is a pure, total function over [`RiskFactors`]. Inputs are
//! validated and converted into `RiskFactors` by [`crate::prediction`]
//! before any scoring happens, so the scorer itself cannot fail.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

pub const WEIGHT_AGE_UNDER_40: u32 = 1;
pub const WEIGHT_AGE_40S: u32 = 2;
pub const WEIGHT_AGE_50S: u32 = 3;
pub const WEIGHT_AGE_60_PLUS: u32 = 4;

pub const WEIGHT_MALE: u32 = 2;
pub const WEIGHT_OTHER_GENDER: u32 = 1;

pub const WEIGHT_SMOKING: u32 = 5;
pub const WEIGHT_COUGH: u32 = 2;
pub const WEIGHT_CHEST_PAIN: u32 = 3;
pub const WEIGHT_FATIGUE: u32 = 1;
pub const WEIGHT_SHORTNESS_OF_BREATH: u32 = 3;

/// Scores below this are low risk.
pub const MODERATE_THRESHOLD: u32 = 6;
/// Scores at or above this are high risk.
pub const HIGH_THRESHOLD: u32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The label persisted in `predictions.gender`.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Validated scorer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskFactors {
    /// Age in years, `0..=120`.
    pub age: u8,
    pub gender: Gender,
    pub smoking: bool,
    pub cough: bool,
    pub chest_pain: bool,
    pub fatigue: bool,
    pub shortness_of_breath: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
}

impl RiskCategory {
    /// Classify a raw score against the category thresholds.
    pub fn from_score(score: u32) -> Self {
        if score < MODERATE_THRESHOLD {
            RiskCategory::Low
        } else if score < HIGH_THRESHOLD {
            RiskCategory::Moderate
        } else {
            RiskCategory::High
        }
    }

    /// Human-readable label stored in `predictions.prediction`.
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low risk of lung cancer",
            RiskCategory::Moderate => "Moderate risk of lung cancer",
            RiskCategory::High => "High risk of lung cancer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub score: u32,
    pub category: RiskCategory,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn age_weight(age: u8) -> u32 {
    match age {
        0..=39 => WEIGHT_AGE_UNDER_40,
        40..=49 => WEIGHT_AGE_40S,
        50..=59 => WEIGHT_AGE_50S,
        _ => WEIGHT_AGE_60_PLUS,
    }
}

fn flag(set: bool, weight: u32) -> u32 {
    if set {
        weight
    } else {
        0
    }
}

/// Score a set of risk factors and classify the result.
pub fn assess(factors: &RiskFactors) -> RiskAssessment {
    let gender = match factors.gender {
        Gender::Male => WEIGHT_MALE,
        Gender::Female => WEIGHT_OTHER_GENDER,
    };

    let score = age_weight(factors.age)
        + gender
        + flag(factors.smoking, WEIGHT_SMOKING)
        + flag(factors.cough, WEIGHT_COUGH)
        + flag(factors.chest_pain, WEIGHT_CHEST_PAIN)
        + flag(factors.fatigue, WEIGHT_FATIGUE)
        + flag(factors.shortness_of_breath, WEIGHT_SHORTNESS_OF_BREATH);

    RiskAssessment {
        score,
        category: RiskCategory::from_score(score),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
