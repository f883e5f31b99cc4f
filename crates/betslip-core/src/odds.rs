//! Target-odd input validation.
//!
//! The same rules run on every keystroke (to drive an inline indicator) and
//! once more on submit (to block the request).

use thiserror::Error;

/// Lowest target odd a generation may ask for.
pub const MIN_TARGET_ODD: f64 = 1.1;
/// Highest target odd a generation may ask for.
pub const MAX_TARGET_ODD: f64 = 10.0;

/// Why a target odd was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a valid odd using digits and a decimal point")]
    InvalidFormat,

    #[error("Target odd must be at least 1.10")]
    BelowMinimum,

    #[error("Target odd must not exceed 10.00")]
    AboveMaximum,
}

/// Keep digits and the first decimal point; later points are dropped so the
/// fragments after them join the fractional part (`"1.2.3"` becomes `"1.23"`).
pub fn sanitize_odd_input(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match cleaned.split_once('.') {
        Some((whole, fraction)) => format!("{whole}.{}", fraction.replace('.', "")),
        None => cleaned,
    }
}

/// Parse and range-check a target odd typed by the user.
pub fn validate_target_odd(raw: &str) -> Result<f64, ValidationError> {
    let value = parse_sanitized(&sanitize_odd_input(raw))?;
    if value < MIN_TARGET_ODD {
        return Err(ValidationError::BelowMinimum);
    }
    if value > MAX_TARGET_ODD {
        return Err(ValidationError::AboveMaximum);
    }
    Ok(value)
}

fn parse_sanitized(text: &str) -> Result<f64, ValidationError> {
    if text.is_empty() || text == "." {
        return Err(ValidationError::InvalidFormat);
    }
    // Sanitized text is unsigned, so the only non-finite parse is an overflow.
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(ValidationError::AboveMaximum),
        Err(_) => Err(ValidationError::InvalidFormat),
    }
}

/// Target-odd text field state, edited keystroke by keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOddInput {
    text: String,
}

impl TargetOddInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field contents with the sanitized form of `raw`.
    pub fn edit(&mut self, raw: &str) {
        self.text = sanitize_odd_input(raw);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Error to show inline while typing.
    ///
    /// Values below the minimum and incomplete input are not flagged here:
    /// they may still be a prefix of a valid odd (`"1"` on the way to `"1.5"`).
    pub fn inline_error(&self) -> Option<ValidationError> {
        match validate_target_odd(&self.text) {
            Err(ValidationError::AboveMaximum) => Some(ValidationError::AboveMaximum),
            _ => None,
        }
    }

    /// Conclusive check run on submit.
    pub fn submit(&self) -> Result<f64, ValidationError> {
        validate_target_odd(&self.text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(validate_target_odd("1.05"), Err(ValidationError::BelowMinimum));
        assert_eq!(validate_target_odd("10.01"), Err(ValidationError::AboveMaximum));
        assert_eq!(validate_target_odd("abc"), Err(ValidationError::InvalidFormat));
        assert_eq!(validate_target_odd(""), Err(ValidationError::InvalidFormat));
        assert_eq!(validate_target_odd("."), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn accepts_bounds_inclusive() {
        assert_eq!(validate_target_odd("5.5").unwrap(), 5.5);
        assert_eq!(validate_target_odd("1.1").unwrap(), 1.1);
        assert_eq!(validate_target_odd("10").unwrap(), 10.0);
        assert_eq!(validate_target_odd("10.00").unwrap(), 10.0);
    }

    #[test]
    fn extra_separators_join_the_fraction() {
        assert_eq!(sanitize_odd_input("1.2.3"), "1.23");
        assert_eq!(validate_target_odd("1.2.3").unwrap(), 1.23);
        assert_eq!(sanitize_odd_input("2..5"), "2.5");
    }

    #[test]
    fn non_numeric_characters_are_stripped() {
        assert_eq!(sanitize_odd_input(" 3,5x "), "35");
        assert_eq!(validate_target_odd("@2.5"), Ok(2.5));
    }

    #[test]
    fn inline_indicator_only_flags_above_maximum() {
        let mut input = TargetOddInput::new();
        input.edit("1");
        assert_eq!(input.inline_error(), None);
        assert_eq!(input.submit(), Err(ValidationError::BelowMinimum));

        input.edit("12");
        assert_eq!(input.inline_error(), Some(ValidationError::AboveMaximum));

        input.edit("1.5");
        assert_eq!(input.inline_error(), None);
        assert_eq!(input.submit().unwrap(), 1.5);
    }

    #[test]
    fn overflowing_digits_are_above_maximum() {
        let huge = format!("1{}", "0".repeat(400));
        assert_eq!(validate_target_odd(&huge), Err(ValidationError::AboveMaximum));

        let mut input = TargetOddInput::new();
        input.edit(&huge);
        assert_eq!(input.inline_error(), Some(ValidationError::AboveMaximum));
    }

    #[test]
    fn input_keeps_sanitized_text() {
        let mut input = TargetOddInput::new();
        input.edit("3.4.5abc");
        assert_eq!(input.as_str(), "3.45");
        assert!(!input.is_empty());
    }
}
