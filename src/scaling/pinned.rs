//! Min-max scaling through a fixed point.
//!
//! A [`PinnedLinearScaler`] guarantees that one distinguished unscaled value
//! (the fixpoint) always maps to one distinguished scaled value, no matter
//! how the observed range shifts around it. The map is piecewise linear with
//! the pin as the joint:
//!
//! ```text
//! value <  fixpoint:  d = (fixpoint - value) / (fixpoint - seen_min)
//!                     scaled = fixpoint_norm - (fixpoint_norm - norm_min) * d
//! value >= fixpoint:  d = (value - fixpoint) / (seen_max - fixpoint)
//!                     scaled = fixpoint_norm + (norm_max - fixpoint_norm) * d
//! ```
//!
//! Typical use: an unscaled `0.0` ("no signal") that must always decode to
//! the scaled constant `0.5`, whatever the surrounding data does.

use log::warn;

use crate::error::ScaleError;
use crate::scaling::{strided_values, Scaler, ScalerKind};

/// Slack applied before reporting a result below the target minimum; keeps
/// rounding at the lower branch boundary out of the diagnostics.
const BELOW_RANGE_SLACK: f64 = 1e-11;

/// Min-max scaler that preserves a chosen value at a chosen position of the
/// target range.
///
/// The observed bounds adapt independently on either side of the pin; the
/// pin itself never moves.
///
/// # Example
///
/// ```rust
/// use scalekit::scaling::{PinnedLinearScaler, Scaler};
///
/// let mut scaler = PinnedLinearScaler::new(0.0, 0.5, 0.0, 1.0);
/// scaler.reset(&[-4.0, 4.0]).unwrap();
///
/// // The pin maps exactly, before and after any update.
/// assert_eq!(scaler.scale_value(0.0), 0.5);
/// scaler.update(&[100.0]).unwrap();
/// assert_eq!(scaler.scale_value(0.0), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PinnedLinearScaler {
    seen_min: f64,
    seen_max: f64,
    fixpoint: f64,
    fixpoint_norm: f64,
    norm_min: f64,
    norm_max: f64,
}

impl PinnedLinearScaler {
    /// Length of the parameter list produced by [`Scaler::parameters`]:
    /// `seen_min, seen_max, fixpoint, fixpoint_norm, norm_min, norm_max`.
    pub const PARAMETER_COUNT: usize = 6;

    /// Create a scaler pinning `fixpoint` to `fixpoint_norm` within the
    /// target range `[norm_min, norm_max]`.
    ///
    /// The observed range starts at the placeholder `fixpoint ± 1`; call an
    /// update or reset operation at least once before scaling real data.
    ///
    /// # Panics
    ///
    /// Panics unless `norm_min < fixpoint_norm < norm_max`.
    pub fn new(fixpoint: f64, fixpoint_norm: f64, norm_min: f64, norm_max: f64) -> Self {
        assert!(norm_min < norm_max, "norm_min must be smaller than norm_max");
        assert!(
            norm_min < fixpoint_norm,
            "fixpoint_norm must lie above norm_min"
        );
        assert!(
            fixpoint_norm < norm_max,
            "fixpoint_norm must lie below norm_max"
        );
        Self {
            seen_min: fixpoint - 1.0,
            seen_max: fixpoint + 1.0,
            fixpoint,
            fixpoint_norm,
            norm_min,
            norm_max,
        }
    }

    /// Create a scaler with a known observed range.
    ///
    /// # Panics
    ///
    /// Panics unless `norm_min < fixpoint_norm < norm_max` and
    /// `seen_min < fixpoint < seen_max`.
    pub fn with_seen_range(
        fixpoint: f64,
        fixpoint_norm: f64,
        norm_min: f64,
        norm_max: f64,
        seen_min: f64,
        seen_max: f64,
    ) -> Self {
        assert!(norm_min < norm_max, "norm_min must be smaller than norm_max");
        assert!(
            norm_min < fixpoint_norm,
            "fixpoint_norm must lie above norm_min"
        );
        assert!(
            fixpoint_norm < norm_max,
            "fixpoint_norm must lie below norm_max"
        );
        assert!(seen_min < fixpoint, "seen_min must lie below the fixpoint");
        assert!(fixpoint < seen_max, "seen_max must lie above the fixpoint");
        Self {
            seen_min,
            seen_max,
            fixpoint,
            fixpoint_norm,
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

    /// The pinned unscaled value.
    pub fn fixpoint(&self) -> f64 {
        self.fixpoint
    }

    /// The scaled value the pin always maps to.
    pub fn fixpoint_norm(&self) -> f64 {
        self.fixpoint_norm
    }

    /// Lower bound of the target range.
    pub fn norm_min(&self) -> f64 {
        self.norm_min
    }

    /// Upper bound of the target range.
    pub fn norm_max(&self) -> f64 {
        self.norm_max
    }

    /// Restore `seen_min < fixpoint < seen_max` after an update collapsed a
    /// side onto the pin. Each side is widened independently.
    fn widen_degenerate_sides(&mut self) {
        if self.seen_max - self.fixpoint == 0.0 {
            warn!(
                "observed maximum equals the fixpoint ({}), widening the upper bound",
                self.fixpoint
            );
            self.seen_max = self.seen_max + self.seen_max * self.seen_max + 1.0;
        }
        if self.fixpoint - self.seen_min == 0.0 {
            warn!(
                "observed minimum equals the fixpoint ({}), widening the lower bound",
                self.fixpoint
            );
            self.seen_min = self.seen_min - self.fixpoint * self.fixpoint - 1.0;
        }
    }
}

impl Scaler for PinnedLinearScaler {
    fn update_value(&mut self, value: f64) {
        if self.seen_max < value {
            self.seen_max = value;
        }
        if self.seen_min > value {
            self.seen_min = value;
        }
        self.widen_degenerate_sides();
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
        self.widen_degenerate_sides();
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
        // Collapse the range onto the pin so it is always re-included.
        self.seen_min = self.fixpoint;
        self.seen_max = self.fixpoint;
        self.update_strided(data, start, stride)
    }

    fn scale_value(&self, value: f64) -> f64 {
        let scaled = if value < self.fixpoint {
            let distance = (self.fixpoint - value) / (self.fixpoint - self.seen_min);
            self.fixpoint_norm - (self.fixpoint_norm - self.norm_min) * distance
        } else {
            let distance = (value - self.fixpoint) / (self.seen_max - self.fixpoint);
            self.fixpoint_norm + (self.norm_max - self.fixpoint_norm) * distance
        };
        if scaled + BELOW_RANGE_SLACK < self.norm_min {
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
        if value < self.fixpoint_norm {
            let distance = (self.fixpoint_norm - value) / (self.fixpoint_norm - self.norm_min);
            self.fixpoint - (self.fixpoint - self.seen_min) * distance
        } else {
            let distance = (value - self.fixpoint_norm) / (self.norm_max - self.fixpoint_norm);
            self.fixpoint + (self.seen_max - self.fixpoint) * distance
        }
    }

    fn parameters(&self) -> Vec<f64> {
        vec![
            self.seen_min,
            self.seen_max,
            self.fixpoint,
            self.fixpoint_norm,
            self.norm_min,
            self.norm_max,
        ]
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
        self.fixpoint = params[2];
        self.fixpoint_norm = params[3];
        self.norm_min = params[4];
        self.norm_max = params[5];
        Ok(())
    }

    fn kind(&self) -> ScalerKind {
        ScalerKind::PinnedLinear
    }

    fn clone_box(&self) -> Box<dyn Scaler> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scaler() -> PinnedLinearScaler {
        PinnedLinearScaler::with_seen_range(0.0, 0.5, 0.0, 1.0, -4.0, 4.0)
    }

    #[test]
    fn test_fixpoint_maps_exactly() {
        let scaler = sample_scaler();
        assert_eq!(scaler.scale_value(0.0), 0.5);
    }

    #[test]
    fn test_fixpoint_invariant_under_updates() {
        let mut scaler = sample_scaler();
        scaler.update(&[-123.0, 17.0]).unwrap();
        assert_eq!(scaler.scale_value(0.0), 0.5);
        scaler.reset(&[3.0, 9.0]).unwrap();
        assert_eq!(scaler.scale_value(0.0), 0.5);
    }

    #[test]
    fn test_scale_both_branches() {
        let scaler = sample_scaler();
        assert!((scaler.scale_value(-4.0) - 0.0).abs() < 1e-12);
        assert!((scaler.scale_value(-2.0) - 0.25).abs() < 1e-12);
        assert!((scaler.scale_value(2.0) - 0.75).abs() < 1e-12);
        assert!((scaler.scale_value(4.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_both_branches() {
        let scaler =
            PinnedLinearScaler::with_seen_range(1.0, 0.25, -1.0, 1.0, -10.0, 6.0);
        for value in [-10.0, -4.5, 0.99, 1.0, 1.01, 3.3, 6.0] {
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
    fn test_monotonicity_across_the_pin() {
        let scaler = sample_scaler();
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=160 {
            let value = -4.0 + 0.05 * i as f64;
            let scaled = scaler.scale_value(value);
            assert!(scaled >= previous, "not monotone at {}", value);
            previous = scaled;
        }
    }

    #[test]
    fn test_update_keeps_history() {
        let mut scaler = sample_scaler();
        scaler.update(&[10.0]).unwrap();
        assert_eq!(scaler.seen_min(), -4.0);
        assert_eq!(scaler.seen_max(), 10.0);
    }

    #[test]
    fn test_reset_one_sided_batch_widens_other_side() {
        let mut scaler = sample_scaler();
        scaler.reset(&[1.0, 2.0, 3.0]).unwrap();

        assert_eq!(scaler.seen_max(), 3.0);
        // fixpoint - fixpoint^2 - 1
        assert_eq!(scaler.seen_min(), -1.0);
        assert_eq!(scaler.scale_value(0.0), 0.5);
    }

    #[test]
    fn test_reset_degenerate_batch_widens_both_sides() {
        let mut scaler = PinnedLinearScaler::new(2.0, 0.5, 0.0, 1.0);
        scaler.reset(&[2.0, 2.0]).unwrap();

        // seen_max + seen_max^2 + 1 with seen_max collapsed onto the pin
        assert_eq!(scaler.seen_max(), 7.0);
        // seen_min - fixpoint^2 - 1
        assert_eq!(scaler.seen_min(), -3.0);
        assert!(scaler.seen_min() < scaler.fixpoint());
        assert!(scaler.fixpoint() < scaler.seen_max());
        assert!(scaler.scale_value(2.0).is_finite());
        assert_eq!(scaler.scale_value(2.0), 0.5);
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let scaler = sample_scaler();
        assert!((scaler.scale_value(8.0) - 1.5).abs() < 1e-12);
        assert!((scaler.scale_value(-8.0) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch() {
        let mut scaler = sample_scaler();
        assert!(matches!(
            scaler.update(&[]),
            Err(ScaleError::EmptyBatch(_))
        ));
        assert!(matches!(scaler.reset(&[]), Err(ScaleError::EmptyBatch(_))));
        assert_eq!(scaler.seen_min(), -4.0);
        assert_eq!(scaler.seen_max(), 4.0);
    }

    #[test]
    fn test_strided_reset_matches_contiguous() {
        let block = [9.0, -2.0, 9.0, 5.0, 9.0, 0.5];

        let mut strided = PinnedLinearScaler::new(0.0, 0.5, 0.0, 1.0);
        strided.reset_strided(&block, 1, 2).unwrap();

        let mut contiguous = PinnedLinearScaler::new(0.0, 0.5, 0.0, 1.0);
        contiguous.reset(&[-2.0, 5.0, 0.5]).unwrap();

        assert_eq!(strided.seen_min(), contiguous.seen_min());
        assert_eq!(strided.seen_max(), contiguous.seen_max());
    }

    #[test]
    fn test_parameters_round_trip() {
        let scaler =
            PinnedLinearScaler::with_seen_range(1.0, 0.25, -1.0, 1.0, -10.0, 6.0);
        let params = scaler.parameters();
        assert_eq!(params, vec![-10.0, 6.0, 1.0, 0.25, -1.0, 1.0]);

        let mut restored = PinnedLinearScaler::new(0.0, 0.0, -1.0, 1.0);
        restored.set_parameters(&params).unwrap();
        assert_eq!(restored, scaler);
    }

    #[test]
    fn test_set_parameters_wrong_length() {
        let mut scaler = PinnedLinearScaler::new(0.0, 0.5, 0.0, 1.0);
        assert!(matches!(
            scaler.set_parameters(&[1.0; 4]),
            Err(ScaleError::ParameterCountMismatch {
                expected: 6,
                got: 4
            })
        ));
    }

    #[test]
    fn test_type_name() {
        let scaler = PinnedLinearScaler::new(0.0, 0.5, 0.0, 1.0);
        assert_eq!(scaler.type_name(), "NormalizeWithFixpoint");
    }

    #[test]
    #[should_panic(expected = "fixpoint_norm must lie above norm_min")]
    fn test_new_rejects_fixpoint_norm_at_boundary() {
        PinnedLinearScaler::new(0.0, 0.0, 0.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "seen_min must lie below the fixpoint")]
    fn test_with_seen_range_rejects_pin_outside_range() {
        PinnedLinearScaler::with_seen_range(0.0, 0.5, 0.0, 1.0, 0.0, 4.0);
    }
}
