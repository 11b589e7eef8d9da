//! Pattern container for paired input/target training data.
//!
//! A [`PatternSet`] holds `pattern_count` rows of input values and the same
//! number of rows of target values, stored as two flat row-major blocks.
//! Column `d` of the input block is the strided sequence starting at index
//! `d` with stride `input_count`, which is exactly the access pattern the
//! per-dimension scaling operations in [`crate::scaling`] use.
//!
//! # Example
//!
//! ```rust
//! use scalekit::PatternSet;
//!
//! // 3 patterns, 2 input dimensions, 1 target dimension
//! let patterns = PatternSet::new(
//!     vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]],
//!     vec![vec![0.5], vec![1.5], vec![2.5]],
//! )
//! .unwrap();
//!
//! assert_eq!(patterns.pattern_count(), 3);
//! assert_eq!(patterns.input_count(), 2);
//! assert_eq!(patterns.input(1, 1), 20.0);
//! ```

use crate::error::ScaleError;

/// Paired input/target numeric rows used for training and inference.
///
/// Both blocks are rectangular: every input row has `input_count` values and
/// every target row has `target_count` values. Scaling operations mutate the
/// blocks in place through [`crate::scaling::ScalerSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct PatternSet {
    /// Input block, `pattern_count * input_count`, row-major.
    inputs: Vec<f64>,
    /// Target block, `pattern_count * target_count`, row-major.
    targets: Vec<f64>,
    pattern_count: usize,
    input_count: usize,
    target_count: usize,
}

impl PatternSet {
    /// Build a pattern set from per-pattern input and target rows.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::DimensionMismatch`] if the two row lists have
    /// different lengths or if any row deviates from the width of the first
    /// row of its block.
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Self, ScaleError> {
        if inputs.len() != targets.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: inputs.len(),
                got: targets.len(),
            });
        }

        let pattern_count = inputs.len();
        let input_count = inputs.first().map_or(0, Vec::len);
        let target_count = targets.first().map_or(0, Vec::len);

        let mut input_block = Vec::with_capacity(pattern_count * input_count);
        for row in &inputs {
            if row.len() != input_count {
                return Err(ScaleError::DimensionMismatch {
                    expected: input_count,
                    got: row.len(),
                });
            }
            input_block.extend_from_slice(row);
        }

        let mut target_block = Vec::with_capacity(pattern_count * target_count);
        for row in &targets {
            if row.len() != target_count {
                return Err(ScaleError::DimensionMismatch {
                    expected: target_count,
                    got: row.len(),
                });
            }
            target_block.extend_from_slice(row);
        }

        Ok(Self {
            inputs: input_block,
            targets: target_block,
            pattern_count,
            input_count,
            target_count,
        })
    }

    /// Create an all-zero pattern set of the given shape.
    pub fn zeros(pattern_count: usize, input_count: usize, target_count: usize) -> Self {
        Self {
            inputs: vec![0.0; pattern_count * input_count],
            targets: vec![0.0; pattern_count * target_count],
            pattern_count,
            input_count,
            target_count,
        }
    }

    /// Number of patterns (rows).
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of input dimensions (columns of the input block).
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Number of target dimensions (columns of the target block).
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Input value of pattern `pattern` at dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` or `dim` is out of range.
    pub fn input(&self, pattern: usize, dim: usize) -> f64 {
        assert!(dim < self.input_count, "input dimension out of range");
        self.inputs[pattern * self.input_count + dim]
    }

    /// Target value of pattern `pattern` at dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` or `dim` is out of range.
    pub fn target(&self, pattern: usize, dim: usize) -> f64 {
        assert!(dim < self.target_count, "target dimension out of range");
        self.targets[pattern * self.target_count + dim]
    }

    /// Overwrite one input value.
    pub fn set_input(&mut self, pattern: usize, dim: usize, value: f64) {
        assert!(dim < self.input_count, "input dimension out of range");
        self.inputs[pattern * self.input_count + dim] = value;
    }

    /// Overwrite one target value.
    pub fn set_target(&mut self, pattern: usize, dim: usize, value: f64) {
        assert!(dim < self.target_count, "target dimension out of range");
        self.targets[pattern * self.target_count + dim] = value;
    }

    /// One pattern's input row.
    pub fn input_row(&self, pattern: usize) -> &[f64] {
        let start = pattern * self.input_count;
        &self.inputs[start..start + self.input_count]
    }

    /// One pattern's target row.
    pub fn target_row(&self, pattern: usize) -> &[f64] {
        let start = pattern * self.target_count;
        &self.targets[start..start + self.target_count]
    }

    /// The flat row-major input block.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// The flat row-major target block.
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut [f64] {
        &mut self.inputs
    }

    pub(crate) fn targets_mut(&mut self) -> &mut [f64] {
        &mut self.targets
    }
}
