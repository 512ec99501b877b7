//! Interpolants over ordered hit sequences.
//!
//! Built once from the original (pre-thinning) hits with a strictly
//! increasing abscissa, then evaluated at arbitrary parameter values.
//! An interpolant is a pure function of the knots it was built from; if the
//! input changes, build a new one.

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur when building or sampling an interpolant.
#[derive(Debug, Clone, PartialEq)]
pub enum SplineError {
    /// Too few knots for the requested interpolant.
    TooFewKnots { needed: usize, got: usize },
    /// Abscissa values must be strictly increasing.
    NonMonotonicAbscissa { index: usize },
    /// A knot coordinate is NaN or infinite.
    NonFiniteKnot { index: usize },
    /// Evaluation was requested outside the knot span.
    OutOfDomain { x: f64 },
}

impl std::fmt::Display for SplineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewKnots { needed, got } => {
                write!(f, "too few knots: need {}, got {}", needed, got)
            }
            Self::NonMonotonicAbscissa { index } => {
                write!(f, "abscissa is not strictly increasing at knot {}", index)
            }
            Self::NonFiniteKnot { index } => write!(f, "non-finite knot at index {}", index),
            Self::OutOfDomain { x } => write!(f, "evaluation point {} outside knot span", x),
        }
    }
}

impl std::error::Error for SplineError {}

fn validate_knots(xs: &[f64], ys: &[f64], needed: usize) -> Result<(), SplineError> {
    let got = xs.len().min(ys.len());
    if got < needed {
        return Err(SplineError::TooFewKnots { needed, got });
    }
    for i in 0..got {
        if !xs[i].is_finite() || !ys[i].is_finite() {
            return Err(SplineError::NonFiniteKnot { index: i });
        }
    }
    for i in 1..got {
        if xs[i] <= xs[i - 1] {
            return Err(SplineError::NonMonotonicAbscissa { index: i });
        }
    }
    Ok(())
}

/// Index of the segment containing `x`, or `None` outside the knot span.
fn segment(xs: &[f64], x: f64) -> Option<usize> {
    if x < xs[0] || x > xs[xs.len() - 1] {
        return None;
    }
    // partition_point gives the first knot strictly above x.
    let i = xs.partition_point(|&k| k <= x);
    Some(i.saturating_sub(1).min(xs.len() - 2))
}

// ── Piecewise-linear interpolant ───────────────────────────────────────────

/// Piecewise-linear interpolant over (x, y) knots.
#[derive(Debug, Clone)]
pub struct LinearInterp {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterp {
    /// Build from knots with a strictly increasing abscissa (≥ 2 knots).
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        validate_knots(xs, ys, 2)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Evaluate at `x`; `None` outside the knot span.
    pub fn eval(&self, x: f64) -> Option<f64> {
        let i = segment(&self.xs, x)?;
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Some(self.ys[i] + t * (self.ys[i + 1] - self.ys[i]))
    }

    /// The closed abscissa interval the interpolant is defined on.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

// ── Natural cubic spline ───────────────────────────────────────────────────

/// Natural cubic spline (zero second derivative at both ends) over (x, y)
/// knots. Interpolates every knot exactly.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build from knots with a strictly increasing abscissa (≥ 3 knots).
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        validate_knots(xs, ys, 3)?;
        let n = xs.len();

        // Tridiagonal system for the interior second derivatives, natural
        // boundary conditions m[0] = m[n-1] = 0. Single Thomas sweep.
        let mut m = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        for i in 1..n - 1 {
            let h0 = xs[i] - xs[i - 1];
            let h1 = xs[i + 1] - xs[i];
            diag[i] = 2.0 * (h0 + h1);
            rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
        }
        for i in 2..n - 1 {
            let h = xs[i] - xs[i - 1];
            let w = h / diag[i - 1];
            diag[i] -= w * h;
            rhs[i] -= w * rhs[i - 1];
        }
        for i in (1..n - 1).rev() {
            let h = xs[i + 1] - xs[i];
            m[i] = (rhs[i] - h * m[i + 1]) / diag[i];
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    /// Evaluate at `x`; `None` outside the knot span.
    pub fn eval(&self, x: f64) -> Option<f64> {
        let i = segment(&self.xs, x)?;
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        Some(
            a * self.ys[i]
                + b * self.ys[i + 1]
                + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0,
        )
    }

    /// The closed abscissa interval the spline is defined on.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
