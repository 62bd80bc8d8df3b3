//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values
/// useful for signal decisions.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closes), oldest first
    ///
    /// # Returns
    /// One value per complete window; empty when there is not enough data
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }

    /// Value for the most recent complete window, if there is one.
    fn latest(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            if data.len() < self.period {
                return vec![];
            }
            // Simple sum indicator for testing
            data.windows(self.period).map(|w| w.iter().sum()).collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { period: 5 };

        assert_eq!(
            indicator.validate_data(&[1.0, 2.0, 3.0]),
            Err(IndicatorError::InsufficientData {
                required: 5,
                available: 3
            })
        );
        assert!(indicator.validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
    }

    #[test]
    fn test_indicator_latest() {
        let indicator = TestIndicator { period: 3 };

        assert_eq!(indicator.latest(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(12.0));
        assert_eq!(indicator.latest(&[1.0, 2.0]), None);
    }
}
