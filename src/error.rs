//! Error types for the impact model.
//!
//! The scalar response functions are total over their documented domain and
//! never fail. Validation happens at the parameter boundary and surfaces as
//! [`ModelError`].

/// Errors raised when model inputs cannot produce a meaningful result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// An input lies outside its documented range.
    #[error("{parameter} = {value} is outside the valid range [{min}, {max}]")]
    Domain {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Value supplied by the caller.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// The input would produce an empty or invalid time grid.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

impl ModelError {
    /// Check that `value` is finite and lies in `[min, max]`.
    pub fn check_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if value.is_finite() && (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::Domain {
                parameter,
                value,
                min,
                max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_accepts_bounds() {
        assert!(ModelError::check_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(ModelError::check_range("x", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn range_check_rejects_nan_and_outliers() {
        assert!(ModelError::check_range("x", f64::NAN, 0.0, 1.0).is_err());
        let err = ModelError::check_range("resilience", 1.5, 0.0, 1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "resilience = 1.5 is outside the valid range [0, 1]"
        );
    }
}
