// Bound checks for raw stats and composed breakdowns.
//
// These gates catch broken inputs. Values are never clamped here; a value
// outside its bound rejects the whole entity.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{entity}: `{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        entity: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("`{field}` cannot be empty")]
    Empty { field: &'static str },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } | ValidationError::Empty { field } => field,
        }
    }
}

/// Check that `value` lies in `[min, max]`. NaN always fails.
pub fn check_range(
    entity: &str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            entity: entity.to_string(),
            field,
            value,
            min,
            max,
        })
    }
}

/// Check that an identity field is a non-blank string.
pub fn check_identity(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_bounds_pass() {
        assert!(check_range("BOS", "adjusted_luck", 0.0, 0.0, 2.0).is_ok());
        assert!(check_range("BOS", "adjusted_luck", 2.0, 0.0, 2.0).is_ok());
    }

    #[test]
    fn out_of_bounds_reports_field_and_value() {
        let err = check_range("BOS", "tnerd", 51.0, 0.0, 50.0).unwrap_err();
        match &err {
            ValidationError::OutOfRange { field, value, .. } => {
                assert_eq!(*field, "tnerd");
                assert_eq!(*value, 51.0);
            }
            other => panic!("expected OutOfRange, got: {other}"),
        }
        assert!(err.to_string().contains("between 0 and 50"));
    }

    #[test]
    fn nan_fails() {
        assert!(check_range("X", "z_age", f64::NAN, -10.0, 10.0).is_err());
    }

    #[test]
    fn blank_identity_fails() {
        let err = check_identity("name", "  ").unwrap_err();
        assert_eq!(err.field(), "name");
        assert!(check_identity("name", "Jake Latz").is_ok());
    }
}
