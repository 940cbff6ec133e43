//! Feedback rating and text validation.

use crate::error::CoreError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Maximum length of `feedback_text` (characters).
pub const MAX_FEEDBACK_LENGTH: usize = 5_000;

pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

pub fn validate_feedback_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("feedback_text must not be empty".into()));
    }
    if text.len() > MAX_FEEDBACK_LENGTH {
        return Err(CoreError::Validation(format!(
            "feedback_text exceeds maximum length of {MAX_FEEDBACK_LENGTH} characters (got {})",
            text.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(validate_feedback_text("   ").is_err());
        assert!(validate_feedback_text("Helpful result").is_ok());
    }
}
