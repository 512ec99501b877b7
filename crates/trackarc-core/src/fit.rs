//! Non-linear least-squares circle fit on radial residuals.
//!
//! For a candidate center c the residual of hit i is
//! `r_i(c) = |p_i − c| − mean_j |p_j − c|`; the fit minimizes `Σ r_i(c)²`
//! over the 2-parameter center by Levenberg–Marquardt and reports the mean
//! distance at the converged center as the radius. This is the geometric
//! fit on radial residuals, not the closed-form algebraic fit on squared
//! distances, whose bias differs.

use serde::{Deserialize, Serialize};

#[path = "fit/solver.rs"]
mod solver;

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur during a circle fit.
///
/// Running out of iterations is *not* an error: the best-effort result is
/// returned with [`CircleFit::converged`] set to `false`.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer than `needed` distinct hit positions.
    TooFewPoints { needed: usize, got: usize },
    /// The hit positions are collinear within numerical tolerance; the
    /// normal equations are singular and no circle is determined.
    CollinearPoints,
    /// An input coordinate is NaN or infinite.
    NonFiniteInput { index: usize },
    /// An intermediate value became non-finite during iteration.
    NumericalFailure(String),
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints { needed, got } => {
                write!(f, "too few distinct points: need {}, got {}", needed, got)
            }
            Self::CollinearPoints => write!(f, "points are collinear"),
            Self::NonFiniteInput { index } => {
                write!(f, "non-finite coordinate at point {}", index)
            }
            Self::NumericalFailure(msg) => write!(f, "numerical failure: {}", msg),
        }
    }
}

impl std::error::Error for FitError {}

// ── Configuration and result ───────────────────────────────────────────────

/// Convergence and iteration controls for [`fit_circle`].
///
/// Every fit takes its configuration explicitly; there is no ambient
/// default center or tolerance state anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Initial center guess, in the same frame as the hit positions.
    pub initial_center: [f64; 2],
    /// Stop once the center update norm falls below
    /// `xtol · (1 + |center|)`.
    pub xtol: f64,
    /// Stop once an accepted step improves the residual sum of squares by
    /// less than `ftol` relative to its current value.
    pub ftol: f64,
    /// Iteration budget. Exhausting it yields `converged = false` in the
    /// result, not an error.
    pub max_iters: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            initial_center: [0.0, 0.0],
            xtol: 1e-10,
            ftol: 1e-10,
            max_iters: 100,
        }
    }
}

impl FitConfig {
    /// Default tolerances with an explicit initial center guess.
    pub fn with_center(cx: f64, cy: f64) -> Self {
        Self {
            initial_center: [cx, cy],
            ..Self::default()
        }
    }
}

/// A fitted circle with fit-quality bookkeeping. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleFit {
    /// Fitted center, in the same frame as the input hits.
    pub center: [f64; 2],
    /// Mean hit-to-center distance at the final center; non-negative.
    pub radius: f64,
    /// Sum of squared radial residuals at the final center.
    pub rss: f64,
    /// Levenberg–Marquardt iterations consumed.
    pub iterations: usize,
    /// Whether a tolerance was met before the iteration budget ran out.
    /// A large `rss` with `converged = true` is a poor but converged fit;
    /// callers must not conflate the two.
    pub converged: bool,
}

/// Fit a circle to `points` by Levenberg–Marquardt on the radial residuals.
///
/// Requires at least 3 distinct, non-collinear hits. Deterministic:
/// identical inputs and configuration always produce the identical result.
pub fn fit_circle(points: &[[f64; 2]], config: &FitConfig) -> Result<CircleFit, FitError> {
    validate(points)?;
    solver::solve(points, config)
}

/// Fail fast before iterating: finite coordinates, ≥ 3 distinct positions,
/// and a position covariance of full rank.
fn validate(points: &[[f64; 2]]) -> Result<(), FitError> {
    for (i, p) in points.iter().enumerate() {
        if !p[0].is_finite() || !p[1].is_finite() {
            return Err(FitError::NonFiniteInput { index: i });
        }
    }

    // Duplicated hits are common in raw acquisition and must not count
    // toward the 3-point minimum.
    let mut distinct: Vec<[f64; 2]> = Vec::with_capacity(3);
    for p in points {
        if !distinct.contains(p) {
            distinct.push(*p);
            if distinct.len() == 3 {
                break;
            }
        }
    }
    if distinct.len() < 3 {
        return Err(FitError::TooFewPoints {
            needed: 3,
            got: distinct.len(),
        });
    }

    // Collinearity: the smaller eigenvalue of the 2x2 position covariance
    // vanishes iff all hits lie on a line.
    let n = points.len() as f64;
    let (mut mx, mut my) = (0.0, 0.0);
    for p in points {
        mx += p[0];
        my += p[1];
    }
    mx /= n;
    my /= n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p[0] - mx;
        let dy = p[1] - my;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let half_trace = 0.5 * (sxx + syy);
    let det = sxx * syy - sxy * sxy;
    let disc = (half_trace * half_trace - det).max(0.0).sqrt();
    let lambda_min = half_trace - disc;
    let lambda_max = half_trace + disc;
    if lambda_min <= lambda_max * 1e-12 {
        return Err(FitError::CollinearPoints);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn circle_points(center: [f64; 2], radius: f64, n: usize) -> Vec<[f64; 2]> {
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / n as f64;
                [center[0] + radius * t.cos(), center[1] + radius * t.sin()]
            })
            .collect()
    }

    #[test]
    fn recovers_an_exact_circle() {
        let pts = circle_points([0.0, 0.0], 10.0, 16);
        let fit = fit_circle(&pts, &FitConfig::with_center(1.0, -1.5)).unwrap();

        assert!(fit.converged);
        assert!(fit.center[0].abs() < 1e-6);
        assert!(fit.center[1].abs() < 1e-6);
        assert_relative_eq!(fit.radius, 10.0, epsilon = 1e-6);
        assert!(fit.rss < 1e-10);
    }

    #[test]
    fn tolerates_gaussian_noise() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let true_radius = 10.0;
        let sigma = 0.01 * true_radius;
        let mut rng = StdRng::seed_from_u64(17);
        let pts: Vec<[f64; 2]> = circle_points([4.0, -2.0], true_radius, 64)
            .into_iter()
            .map(|p| {
                // Box-Muller from two uniform draws.
                let u1: f64 = rng.gen_range(1e-12..1.0);
                let u2: f64 = rng.gen_range(0.0..1.0);
                let g = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
                let g2 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();
                [p[0] + sigma * g, p[1] + sigma * g2]
            })
            .collect();

        let fit = fit_circle(&pts, &FitConfig::with_center(3.0, -1.0)).unwrap();
        assert!(fit.converged);
        assert!((fit.radius - true_radius).abs() < 3.0 * sigma);
        assert!((fit.center[0] - 4.0).abs() < 3.0 * sigma);
        assert!((fit.center[1] + 2.0).abs() < 3.0 * sigma);
    }

    #[test]
    fn rejects_too_few_distinct_points() {
        let err = fit_circle(&[[0.0, 0.0], [1.0, 1.0]], &FitConfig::default()).unwrap_err();
        assert_eq!(err, FitError::TooFewPoints { needed: 3, got: 2 });

        // Duplicates do not count toward the minimum.
        let err = fit_circle(
            &[[0.0, 0.0], [0.0, 0.0], [1.0, 1.0], [1.0, 1.0]],
            &FitConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, FitError::TooFewPoints { needed: 3, got: 2 });
    }

    #[test]
    fn rejects_collinear_points() {
        let pts: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 2.0 * i as f64 + 1.0]).collect();
        let err = fit_circle(&pts, &FitConfig::default()).unwrap_err();
        assert_eq!(err, FitError::CollinearPoints);
    }

    #[test]
    fn rejects_non_finite_input() {
        let pts = [[0.0, 0.0], [1.0, f64::NAN], [2.0, 1.0]];
        let err = fit_circle(&pts, &FitConfig::default()).unwrap_err();
        assert_eq!(err, FitError::NonFiniteInput { index: 1 });
    }

    #[test]
    fn exhausting_the_budget_reports_non_convergence() {
        let pts: Vec<[f64; 2]> = circle_points([50.0, 80.0], 30.0, 24)
            .into_iter()
            .enumerate()
            .map(|(i, p)| [p[0] + if i % 2 == 0 { 0.4 } else { -0.4 }, p[1]])
            .collect();

        let config = FitConfig {
            initial_center: [300.0, -200.0],
            max_iters: 1,
            ..FitConfig::default()
        };
        let fit = fit_circle(&pts, &config).unwrap();
        assert!(!fit.converged);
        assert_eq!(fit.iterations, 1);
        assert!(fit.radius.is_finite());
        assert!(fit.rss.is_finite());
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let pts = circle_points([2.0, 3.0], 7.5, 20);
        let config = FitConfig::with_center(1.0, 1.0);
        let a = fit_circle(&pts, &config).unwrap();
        let b = fit_circle(&pts, &config).unwrap();
        assert_eq!(a, b);
    }
}
