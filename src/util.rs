/// Checks that a numerical value is in the provided interval `[a,b]`, otherwise
/// returns early with [`LearningError::InvalidConfiguration`](crate::LearningError::InvalidConfiguration)
///
/// ### Example
/// ```ignore
/// let gamma = 2.0;
/// check_interval!(gamma, 0.0, 1.0);
/// ```
/// This returns the error "Invalid configuration: Invalid value for \`gamma\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::LearningError::InvalidConfiguration(format!(
                "Invalid value for `{}`. Must be in the interval [{}, {}].",
                stringify!($var),
                $a,
                $b,
            )));
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::LearningError;

    fn accept(value: f32) -> Result<f32, LearningError> {
        check_interval!(value, 0.0, 1.0);
        Ok(value)
    }

    #[test]
    fn check_interval_functional() {
        assert_eq!(accept(0.0), Ok(0.0));
        assert_eq!(accept(1.0), Ok(1.0));
        assert!(accept(1.5).is_err(), "above upper bound");
        assert!(accept(-0.1).is_err(), "below lower bound");
        assert!(accept(f32::NAN).is_err(), "NaN is never in range");
    }

    #[test]
    fn check_interval_message() {
        let Err(LearningError::InvalidConfiguration(msg)) = accept(2.0) else {
            panic!("expected a configuration error");
        };
        assert!(msg.contains("`value`"), "names the offending variable");
    }
}
