//! Plain min-max scaling.
//!
//! Maps the observed range `[seen_min, seen_max]` linearly onto the target
//! range `[norm_min, norm_max]`:
//!
//! ```text
//! scaled = (value - seen_min) / (seen_max - seen_min)
//!          * (norm_max - norm_min) + norm_min
//! ```
//!
//! Values outside the observed range scale to values outside the target
//! range; they are returned unclamped (see [`Scaler::scale_value`]).

use log::warn;

use crate::error::ScaleError;
use crate::scaling::{strided_values, Scaler, ScalerKind};

/// Min-max scaler onto a fixed target range.
///
/// The observed bounds adapt through the update/reset operations; the target
/// bounds are fixed at construction.
///
/// # Example
///
/// ```rust
/// use scalekit::scaling::{LinearScaler, Scaler};
///
/// let mut scaler = LinearScaler::new(-1.0, 1.0);
/// scaler.reset(&[0.0, 10.0]).unwrap();
/// assert!((scaler.scale_value(5.0) - 0.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScaler {
    seen_min: f64,
    seen_max: f64,
    norm_min: f64,
    norm_max: f64,
}

impl LinearScaler {
    /// Length of the parameter list produced by [`Scaler::parameters`]:
    /// `seen_min, seen_max, norm_min, norm_max`.
    pub const PARAMETER_COUNT: usize = 4;

    /// Create a scaler targeting `[norm_min, norm_max]`.
    ///
    /// The observed range starts at the placeholder `[0, 1]`; call an update
    /// or reset operation at least once before scaling real data.
    ///
    /// # Panics
    ///
    /// Panics unless `norm_min < norm_max`.
    pub fn new(norm_min: f64, norm_max: f64) -> Self {
        assert!(norm_min < norm_max, "norm_min must be smaller than norm_max");
        Self {
            seen_min: 0.0,
            seen_max: 1.0,
            norm_min,
            norm_max,
        }
    }

    /// Create a scaler with a known observed range.
    ///
    /// # Panics
    ///
    /// Panics unless `norm_min < norm_max` and `seen_min < seen_max`.
    pub fn with_seen_range(norm_min: f64, norm_max: f64, seen_min: f64, seen_max: f64) -> Self {
        assert!(norm_min < norm_max, "norm_min must be smaller than norm_max");
        assert!(seen_min < seen_max, "seen_min must be smaller than seen_max");
        Self {
            seen_min,
            seen_max,
            norm_min,
            norm_max,
        }
    }

    /// Smallest observed unscaled value.
    pub fn seen_min(&self) -> f64 {
        self.seen_min
    }

    /// Largest observed unscaled value.
    pub fn seen_max(&self) -> f64 {
        self.seen_max
    }

    /// Lower bound of the target range.
    pub fn norm_min(&self) -> f64 {
        self.norm_min
    }

    /// Upper bound of the target range.
    pub fn norm_max(&self) -> f64 {
        self.norm_max
    }

    /// Restore `seen_min < seen_max` after an update collapsed the range.
    fn widen_if_degenerate(&mut self) {
        if self.seen_max - self.seen_min == 0.0 {
            warn!(
                "observed maximum equals observed minimum ({}), widening the upper bound",
                self.seen_min
            );
            self.seen_max = self.seen_max + self.seen_max * self.seen_max + 1.0;
        }
    }
}

impl Scaler for LinearScaler {
    fn update_value(&mut self, value: f64) {
        if self.seen_max < value {
            self.seen_max = value;
        }
        if self.seen_min > value {
            self.seen_min = value;
        }
        self.widen_if_degenerate();
    }

    fn update_strided(
        &mut self,
        data: &[f64],
        start: usize,
        stride: usize,
    ) -> Result<(), ScaleError> {
        if start >= data.len() {
            return Err(ScaleError::EmptyBatch(
                "update requires at least one value".to_string(),
            ));
        }
        for value in strided_values(data, start, stride) {
            if self.seen_max < value {
                self.seen_max = value;
            }
            if self.seen_min > value {
                self.seen_min = value;
            }
        }
        self.widen_if_degenerate();
        Ok(())
    }

    fn reset_strided(
        &mut self,
        data: &[f64],
        start: usize,
        stride: usize,
    ) -> Result<(), ScaleError> {
        if start >= data.len() {
            return Err(ScaleError::EmptyBatch(
                "reset requires at least one value".to_string(),
            ));
        }
        self.seen_min = f64::INFINITY;
        self.seen_max = f64::NEG_INFINITY;
        self.update_strided(data, start, stride)
    }

    fn scale_value(&self, value: f64) -> f64 {
        let scaled = ((value - self.seen_min) / (self.seen_max - self.seen_min))
            * (self.norm_max - self.norm_min)
            + self.norm_min;
        if scaled < self.norm_min {
            warn!(
                "scaled value {} fell below the target minimum {}",
                scaled, self.norm_min
            );
        } else if scaled > self.norm_max {
            warn!(
                "scaled value {} exceeded the target maximum {}",
                scaled, self.norm_max
            );
        }
        scaled
    }

    fn original_value(&self, value: f64) -> f64 {
        ((value - self.norm_min) / (self.norm_max - self.norm_min))
            * (self.seen_max - self.seen_min)
            + self.seen_min
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.seen_min, self.seen_max, self.norm_min, self.norm_max]
    }

    fn set_parameters(&mut self, params: &[f64]) -> Result<(), ScaleError> {
        if params.len() != Self::PARAMETER_COUNT {
            return Err(ScaleError::ParameterCountMismatch {
                expected: Self::PARAMETER_COUNT,
                got: params.len(),
            });
        }
        self.seen_min = params[0];
        self.seen_max = params[1];
        self.norm_min = params[2];
        self.norm_max = params[3];
        Ok(())
    }

    fn kind(&self) -> ScalerKind {
        ScalerKind::Linear
    }

    fn clone_box(&self) -> Box<dyn Scaler> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_known_values() {
        let scaler = LinearScaler::with_seen_range(0.0, 1.0, 2.0, 8.0);
        assert!((scaler.scale_value(2.0) - 0.0).abs() < 1e-12);
        assert!((scaler.scale_value(5.0) - 0.5).abs() < 1e-12);
        assert!((scaler.scale_value(8.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_custom_target_range() {
        let scaler = LinearScaler::with_seen_range(-1.0, 1.0, 0.0, 10.0);
        assert!((scaler.scale_value(0.0) - (-1.0)).abs() < 1e-12);
        assert!((scaler.scale_value(5.0) - 0.0).abs() < 1e-12);
        assert!((scaler.scale_value(10.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let scaler = LinearScaler::with_seen_range(0.2, 0.9, -3.0, 17.0);
        for value in [-3.0, -1.5, 0.0, 4.2, 9.99, 17.0] {
            let recovered = scaler.original_value(scaler.scale_value(value));
            assert!(
                (recovered - value).abs() < 1e-9,
                "expected {}, got {}",
                value,
                recovered
            );
        }
    }

    #[test]
    fn test_monotonicity() {
        let scaler = LinearScaler::with_seen_range(0.0, 1.0, -5.0, 5.0);
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=100 {
            let value = -5.0 + 0.1 * i as f64;
            let scaled = scaler.scale_value(value);
            assert!(scaled >= previous);
            previous = scaled;
        }
    }

    #[test]
    fn test_update_extends_range() {
        let mut scaler = LinearScaler::with_seen_range(0.0, 1.0, 0.0, 10.0);
        scaler.update(&[-5.0, 3.0]).unwrap();
        assert_eq!(scaler.seen_min(), -5.0);
        assert_eq!(scaler.seen_max(), 10.0);
    }

    #[test]
    fn test_update_value_extends_range() {
        let mut scaler = LinearScaler::with_seen_range(0.0, 1.0, 0.0, 10.0);
        scaler.update_value(12.5);
        assert_eq!(scaler.seen_max(), 12.5);
        scaler.update_value(5.0);
        assert_eq!(scaler.seen_min(), 0.0);
        assert_eq!(scaler.seen_max(), 12.5);
    }

    #[test]
    fn test_reset_discards_history() {
        let mut scaler = LinearScaler::with_seen_range(0.0, 1.0, -100.0, 100.0);
        scaler.reset(&[2.0, 8.0]).unwrap();
        assert_eq!(scaler.seen_min(), 2.0);
        assert_eq!(scaler.seen_max(), 8.0);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let mut scaler = LinearScaler::new(0.0, 1.0);
        scaler.reset(&[5.0, 5.0, 5.0]).unwrap();

        assert!(scaler.seen_min() < scaler.seen_max());
        assert_eq!(scaler.seen_min(), 5.0);
        // seen_max + seen_max^2 + 1
        assert_eq!(scaler.seen_max(), 31.0);

        // No division by zero afterwards.
        assert!(scaler.scale_value(5.0).is_finite());
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let scaler = LinearScaler::with_seen_range(0.0, 1.0, 0.0, 10.0);
        assert!((scaler.scale_value(20.0) - 2.0).abs() < 1e-12);
        assert!((scaler.scale_value(-10.0) - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch_update() {
        let mut scaler = LinearScaler::with_seen_range(0.0, 1.0, 0.0, 10.0);
        assert!(matches!(
            scaler.update(&[]),
            Err(ScaleError::EmptyBatch(_))
        ));
        // State untouched.
        assert_eq!(scaler.seen_min(), 0.0);
        assert_eq!(scaler.seen_max(), 10.0);
    }

    #[test]
    fn test_empty_batch_reset_leaves_state() {
        let mut scaler = LinearScaler::with_seen_range(0.0, 1.0, 0.0, 10.0);
        assert!(matches!(
            scaler.reset(&[]),
            Err(ScaleError::EmptyBatch(_))
        ));
        assert_eq!(scaler.seen_max(), 10.0);
    }

    #[test]
    fn test_strided_update_matches_contiguous() {
        // Column 1 of a 3x2 row-major block.
        let block = [1.0, -7.0, 2.0, 42.0, 3.0, 0.5];

        let mut strided = LinearScaler::new(0.0, 1.0);
        strided.reset_strided(&block, 1, 2).unwrap();

        let mut contiguous = LinearScaler::new(0.0, 1.0);
        contiguous.reset(&[-7.0, 42.0, 0.5]).unwrap();

        assert_eq!(strided.seen_min(), contiguous.seen_min());
        assert_eq!(strided.seen_max(), contiguous.seen_max());
    }

    #[test]
    fn test_strided_scale_in_place() {
        let scaler = LinearScaler::with_seen_range(0.0, 1.0, 0.0, 4.0);
        let mut block = [0.0, 9.0, 2.0, 9.0, 4.0, 9.0];
        scaler.scale_strided(&mut block, 0, 2);
        assert!((block[0] - 0.0).abs() < 1e-12);
        assert!((block[2] - 0.5).abs() < 1e-12);
        assert!((block[4] - 1.0).abs() < 1e-12);
        // Untouched stride gaps.
        assert_eq!(block[1], 9.0);
        assert_eq!(block[3], 9.0);
    }

    #[test]
    fn test_parameters_round_trip() {
        let scaler = LinearScaler::with_seen_range(-0.5, 0.5, 1.0, 3.0);
        let params = scaler.parameters();
        assert_eq!(params, vec![1.0, 3.0, -0.5, 0.5]);

        let mut restored = LinearScaler::new(0.0, 1.0);
        restored.set_parameters(&params).unwrap();
        assert_eq!(restored, scaler);
    }

    #[test]
    fn test_set_parameters_wrong_length() {
        let mut scaler = LinearScaler::new(0.0, 1.0);
        assert!(matches!(
            scaler.set_parameters(&[1.0, 2.0, 3.0]),
            Err(ScaleError::ParameterCountMismatch {
                expected: 4,
                got: 3
            })
        ));
    }

    #[test]
    fn test_type_name() {
        let scaler = LinearScaler::new(0.0, 1.0);
        assert_eq!(scaler.type_name(), "Normalize");
    }

    #[test]
    #[should_panic(expected = "norm_min must be smaller than norm_max")]
    fn test_new_rejects_reversed_target_range() {
        LinearScaler::new(1.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "seen_min must be smaller than seen_max")]
    fn test_with_seen_range_rejects_reversed_seen_range() {
        LinearScaler::with_seen_range(0.0, 1.0, 5.0, 5.0);
    }
}
