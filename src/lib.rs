//! # scalekit
//!
//! Range normalization for machine-learning pattern sets, with durable
//! scaler parameters.
//!
//! ## Core Design Principles
//!
//! - **Reversible by construction**: every scaler is a linear (or pinned
//!   piecewise-linear) map with an exact algebraic inverse, so scaled model
//!   outputs can always be returned to original units.
//! - **Per-dimension independence**: each input and target dimension of a
//!   pattern set gets its own scaler; [`ScalerSet`] applies them
//!   column-by-column over strided views, without copying columns out.
//! - **No silent surprises**: scale results are never clamped, degenerate
//!   observed ranges are repaired deterministically, and both conditions are
//!   reported through the [`log`] facade.
//! - **Durable identity**: a scaler set saves to a simple separated-text
//!   format (`input1..inputN`, `target1..targetM` records) and restores to a
//!   behaviorally identical set.
//!
//! ## Quick Start
//!
//! ```rust
//! use scalekit::{LinearScaler, PatternSet, PinnedLinearScaler, ScalerSet};
//!
//! // One scaler per input dimension, one per target dimension.
//! let mut scalers = ScalerSet::new();
//! scalers.add_input_scaler(&LinearScaler::new(0.0, 1.0));
//! scalers.add_input_scaler(&LinearScaler::new(0.0, 1.0));
//! scalers.add_target_scaler(&PinnedLinearScaler::new(0.0, 0.5, 0.0, 1.0));
//!
//! // 3 patterns, 2 input dimensions, 1 target dimension.
//! let mut patterns = PatternSet::new(
//!     vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]],
//!     vec![vec![-1.0], vec![0.0], vec![2.0]],
//! )
//! .unwrap();
//!
//! // Learn the observed ranges, then scale in place.
//! scalers.reset_scalers(&patterns).unwrap();
//! scalers.scale(&mut patterns).unwrap();
//! assert!((patterns.input(0, 0) - 0.0).abs() < 1e-12);
//! assert_eq!(patterns.target(1, 0), 0.5);
//!
//! // Scaled model outputs decode back to original units.
//! let mut prediction = [patterns.target(2, 0)];
//! scalers.original_target_values(&mut prediction).unwrap();
//! assert!((prediction[0] - 2.0).abs() < 1e-9);
//! ```
//!
//! ## Module Structure
//!
//! - `scaling` — the [`Scaler`] contract, the [`LinearScaler`] and
//!   [`PinnedLinearScaler`] algorithms, and the per-dimension [`ScalerSet`]
//! - `pattern` — the [`PatternSet`] container of paired input/target rows
//! - `persistence` — the scaler file text codec and the binary parameter
//!   snapshot
//! - `error` — the crate-wide [`ScaleError`] type

pub mod error;
pub mod pattern;
pub mod persistence;
pub mod scaling;

pub use error::ScaleError;
pub use pattern::PatternSet;
pub use persistence::{ScalerParams, ScalerReader, ScalerSetParams, ScalerWriter};
pub use scaling::{LinearScaler, PinnedLinearScaler, Scaler, ScalerKind, ScalerSet};
