//! Levenberg–Marquardt iteration on the circle center.

use nalgebra::{Matrix2, Vector2};

use super::{CircleFit, FitConfig, FitError};

/// Damping is multiplied by 10 on every rejected step; past this it has
/// shrunk the step to nothing and the current center is stationary.
const MAX_LAMBDA: f64 = 1e12;

/// Mean hit-to-center distance and residual sum of squares at `center`.
fn radial_stats(points: &[[f64; 2]], center: Vector2<f64>) -> Result<(f64, f64), FitError> {
    let mut dists = Vec::with_capacity(points.len());
    let mut sum = 0.0;
    for p in points {
        let dx = p[0] - center.x;
        let dy = p[1] - center.y;
        let d = (dx * dx + dy * dy).sqrt();
        if !d.is_finite() {
            return Err(FitError::NumericalFailure(
                "non-finite point-to-center distance".into(),
            ));
        }
        sum += d;
        dists.push(d);
    }
    let mean = sum / points.len() as f64;
    let rss = dists.iter().map(|d| (d - mean) * (d - mean)).sum();
    Ok((mean, rss))
}

/// Accumulate the normal equations JᵀJ and Jᵀr for the radial residual
/// r_i = |p_i − c| − R̄ at `center`.
///
/// The Jacobian row is (u_i − ū)ᵀ with u_i = (c − p_i) / |p_i − c| and
/// ū the mean unit vector. Hits coinciding with the candidate center have
/// no defined gradient and are skipped.
fn normal_equations(
    points: &[[f64; 2]],
    center: Vector2<f64>,
) -> Result<(Matrix2<f64>, Vector2<f64>), FitError> {
    let n = points.len();
    let mut dists = Vec::with_capacity(n);
    let mut units: Vec<Option<Vector2<f64>>> = Vec::with_capacity(n);
    let mut sum_d = 0.0;
    let mut u_bar = Vector2::zeros();
    let mut n_used = 0usize;

    for p in points {
        let dx = center.x - p[0];
        let dy = center.y - p[1];
        let d = (dx * dx + dy * dy).sqrt();
        if !d.is_finite() {
            return Err(FitError::NumericalFailure(
                "non-finite point-to-center distance".into(),
            ));
        }
        sum_d += d;
        dists.push(d);
        if d > 1e-12 {
            let u = Vector2::new(dx / d, dy / d);
            u_bar += u;
            n_used += 1;
            units.push(Some(u));
        } else {
            units.push(None);
        }
    }
    if n_used < 3 {
        return Err(FitError::NumericalFailure(
            "candidate center coincides with the hit cloud".into(),
        ));
    }
    u_bar /= n_used as f64;
    let mean = sum_d / n as f64;

    let mut jtj = Matrix2::zeros();
    let mut jtr = Vector2::zeros();
    for (u, d) in units.iter().zip(&dists) {
        if let Some(u) = u {
            let j = u - u_bar;
            jtj += j * j.transpose();
            jtr += j * (d - mean);
        }
    }
    Ok((jtj, jtr))
}

pub(super) fn solve(points: &[[f64; 2]], config: &FitConfig) -> Result<CircleFit, FitError> {
    let mut center = Vector2::new(config.initial_center[0], config.initial_center[1]);
    let (_, mut rss) = radial_stats(points, center)?;
    let mut lambda = 1e-3;
    let mut iterations = 0usize;
    let mut converged = false;

    'outer: while iterations < config.max_iters {
        iterations += 1;
        let (jtj, jtr) = normal_equations(points, center)?;

        // Inner damping search: escalate until a step reduces the residual
        // or the damping saturates.
        loop {
            let h = jtj + Matrix2::identity() * lambda;
            let step = match h.lu().solve(&(-jtr)) {
                Some(s) if s.x.is_finite() && s.y.is_finite() => s,
                _ => {
                    lambda *= 10.0;
                    if lambda > MAX_LAMBDA {
                        return Err(FitError::NumericalFailure(
                            "singular normal equations".into(),
                        ));
                    }
                    continue;
                }
            };

            let trial = center + step;
            let (_, trial_rss) = radial_stats(points, trial)?;

            if trial_rss <= rss {
                let improvement = rss - trial_rss;
                center = trial;
                rss = trial_rss;
                lambda = (lambda * 0.25).max(1e-12);
                if step.norm() <= config.xtol * (1.0 + center.norm())
                    || improvement <= config.ftol * rss.max(f64::MIN_POSITIVE)
                {
                    converged = true;
                    break 'outer;
                }
                break;
            }

            lambda *= 10.0;
            if lambda > MAX_LAMBDA {
                // No downhill direction left at vanishing step size.
                converged = true;
                break 'outer;
            }
        }
    }

    let (radius, final_rss) = radial_stats(points, center)?;
    if converged {
        tracing::debug!(
            "circle fit converged after {} iterations (rss = {:.3e})",
            iterations,
            final_rss
        );
    } else {
        tracing::warn!(
            "circle fit stopped at the {}-iteration cap (rss = {:.3e})",
            iterations,
            final_rss
        );
    }

    Ok(CircleFit {
        center: [center.x, center.y],
        radius,
        rss: final_rss,
        iterations,
        converged,
    })
}
