//! One-shot reconstruction: shift → thin → smooth → fit → momentum.

use serde::{Deserialize, Serialize};

use trackarc_core::fit::{fit_circle, CircleFit, FitConfig, FitError};
use trackarc_core::momentum::{cm_to_m, momentum_gev};
use trackarc_core::preprocess::spline::{CubicSpline, LinearInterp, SplineError};
use trackarc_core::preprocess::{resample, shift_points, FrameShift};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors from any stage of [`reconstruct`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReconstructError {
    /// The circle fit rejected the preprocessed hits.
    Fit(FitError),
    /// Building or sampling the smoothing interpolant failed.
    Spline(SplineError),
}

impl std::fmt::Display for ReconstructError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fit(e) => write!(f, "circle fit failed: {}", e),
            Self::Spline(e) => write!(f, "spline smoothing failed: {}", e),
        }
    }
}

impl std::error::Error for ReconstructError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fit(e) => Some(e),
            Self::Spline(e) => Some(e),
        }
    }
}

impl From<FitError> for ReconstructError {
    fn from(e: FitError) -> Self {
        Self::Fit(e)
    }
}

impl From<SplineError> for ReconstructError {
    fn from(e: SplineError) -> Self {
        Self::Spline(e)
    }
}

// ── Configuration and result ───────────────────────────────────────────────

/// Smoothing interpolant evaluated at the retained abscissas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineKind {
    Linear,
    Cubic,
}

/// Configuration for [`reconstruct`].
///
/// There is deliberately no `Default`: the field strength and the initial
/// center guess are physics inputs that must come from the caller, never
/// from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructConfig {
    /// Translation into the working frame; identity by default.
    pub shift: FrameShift,
    /// Minimum arc-length spacing in cm for thinning; `None` fits the raw
    /// hit sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_spacing_cm: Option<f64>,
    /// Optional smoothing interpolant, built over the shifted hits
    /// (abscissa = first coordinate, strictly increasing) and evaluated at
    /// the retained abscissas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spline: Option<SplineKind>,
    /// Circle-fit controls, including the initial center guess in the
    /// working frame.
    pub fit: FitConfig,
    /// Effective transverse field strength in tesla.
    pub field_tesla: f64,
}

impl ReconstructConfig {
    /// Fit-only pipeline: no shift, no thinning, no smoothing.
    pub fn new(fit: FitConfig, field_tesla: f64) -> Self {
        Self {
            shift: FrameShift::default(),
            min_spacing_cm: None,
            spline: None,
            fit,
            field_tesla,
        }
    }
}

/// Result of a full reconstruction pass. Immutable once produced; the
/// momentum is derived from the fitted radius at reporting time and never
/// cached independently of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    /// Fitted circle in the working frame.
    pub circle: CircleFit,
    /// Curvature radius in centimeters, the unit of the input hits.
    pub radius_cm: f64,
    /// Momentum estimate in GeV/c at `field_tesla`.
    pub momentum_gev: f64,
    /// Field strength the estimate was computed at, in tesla.
    pub field_tesla: f64,
    /// Number of raw input hits.
    pub n_hits: usize,
    /// Number of points the circle was fitted to.
    pub n_fit_points: usize,
}

/// Run the full reconstruction pipeline over one trajectory.
///
/// `hits` are (x, y) positions in centimeters, acquisition order, one
/// track. The input is never mutated; every stage derives a new sequence.
pub fn reconstruct(
    hits: &[[f64; 2]],
    config: &ReconstructConfig,
) -> Result<Reconstruction, ReconstructError> {
    let working = shift_points(hits, config.shift);

    let mut fit_points = match config.min_spacing_cm {
        Some(d) => resample(&working, d),
        None => working.clone(),
    };
    tracing::debug!("{} hits, {} after thinning", hits.len(), fit_points.len());

    if let Some(kind) = config.spline {
        fit_points = smooth(&working, &fit_points, kind)?;
    }

    let circle = fit_circle(&fit_points, &config.fit)?;
    let momentum_gev = momentum_gev(cm_to_m(circle.radius), config.field_tesla);
    tracing::debug!(
        "fitted R = {:.2} cm at ({:.2}, {:.2}), p = {:.4} GeV/c",
        circle.radius,
        circle.center[0],
        circle.center[1],
        momentum_gev
    );

    Ok(Reconstruction {
        radius_cm: circle.radius,
        momentum_gev,
        field_tesla: config.field_tesla,
        n_hits: hits.len(),
        n_fit_points: fit_points.len(),
        circle,
    })
}

/// Replace the ordinates of the retained points with interpolant values.
///
/// The interpolant is built over the full working sequence, so it carries
/// shape information the thinned subset dropped.
fn smooth(
    working: &[[f64; 2]],
    retained: &[[f64; 2]],
    kind: SplineKind,
) -> Result<Vec<[f64; 2]>, ReconstructError> {
    let xs: Vec<f64> = working.iter().map(|p| p[0]).collect();
    let ys: Vec<f64> = working.iter().map(|p| p[1]).collect();

    let eval: Box<dyn Fn(f64) -> Option<f64>> = match kind {
        SplineKind::Linear => {
            let interp = LinearInterp::new(&xs, &ys)?;
            Box::new(move |x| interp.eval(x))
        }
        SplineKind::Cubic => {
            let spline = CubicSpline::new(&xs, &ys)?;
            Box::new(move |x| spline.eval(x))
        }
    };

    let mut out = Vec::with_capacity(retained.len());
    for p in retained {
        match eval(p[0]) {
            Some(y) => out.push([p[0], y]),
            None => return Err(SplineError::OutOfDomain { x: p[0] }.into()),
        }
    }
    Ok(out)
}
