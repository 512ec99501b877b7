//! trackarc-core — circular-trajectory fitting and momentum reconstruction.
//!
//! Estimates the curvature of a charged-particle track recorded as a noisy
//! 2D hit sequence in a detector plane. The stages are:
//!
//! 1. **Preprocess** – frame shifting and greedy arc-length thinning of the
//!    hit sequence, with optional spline interpolation over the original
//!    ordered hits.
//! 2. **Fit** – non-linear least-squares circle fit on radial residuals
//!    (Levenberg–Marquardt on the 2-parameter center).
//! 3. **Momentum** – conversion of the fitted radius to a momentum estimate
//!    via the magnetic rigidity relation p = 0.299792458 · B · R.
//!
//! Every operation is a pure function of its arguments: hit positions are
//! borrowed immutably, configuration travels in explicit structs, and no
//! process-wide state (field strength, frame offsets) exists anywhere in
//! the crate. Concurrent fits on disjoint inputs need no coordination.

pub mod fit;
pub mod momentum;
pub mod preprocess;

pub use fit::{fit_circle, CircleFit, FitConfig, FitError};
pub use momentum::{cm_to_m, momentum_gev, GEV_PER_TESLA_METER};
pub use preprocess::spline::{CubicSpline, LinearInterp, SplineError};
pub use preprocess::{resample, shift_points, ArcThin, FrameShift};
