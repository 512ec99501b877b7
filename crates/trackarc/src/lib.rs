//! trackarc — momentum reconstruction for curved particle tracks.
//!
//! Assembles the `trackarc-core` primitives into a one-shot pipeline for a
//! single trajectory recorded as 2D hits in a detector plane (centimeters):
//!
//! 1. **Shift** – optional caller-supplied translation into the working
//!    frame.
//! 2. **Thin** – greedy arc-length resampling to a minimum hit spacing.
//! 3. **Smooth** – optional spline interpolation over the original hits,
//!    evaluated at the retained abscissas.
//! 4. **Fit** – Levenberg–Marquardt circle fit on radial residuals.
//! 5. **Momentum** – rigidity conversion p = 0.299792458 · B · R.
//!
//! # Public API
//! - [`reconstruct`] with [`ReconstructConfig`] / [`Reconstruction`]
//! - [`propagate`] for synthetic uniform-field tracks of known momentum
//! - re-exports of the core fit/preprocess/momentum types
//!
//! Hit ingestion (CSV parsing, file discovery) and any rendering of the
//! results stay with the callers; this crate never performs I/O.

mod pipeline;
pub mod propagate;

pub use pipeline::{reconstruct, Reconstruction, ReconstructConfig, ReconstructError, SplineKind};

pub use trackarc_core::fit::{fit_circle, CircleFit, FitConfig, FitError};
pub use trackarc_core::momentum::{cm_to_m, momentum_gev, GEV_PER_TESLA_METER};
pub use trackarc_core::preprocess::spline::{CubicSpline, LinearInterp, SplineError};
pub use trackarc_core::preprocess::{resample, shift_points, ArcThin, FrameShift};
