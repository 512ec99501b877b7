//! Magnetic-rigidity conversion from curvature radius to momentum.
//!
//! A unit-charge particle bending in a uniform transverse field satisfies
//! p = q·B·R; in GeV/c, tesla and meters the proportionality constant is
//! the speed of light divided by 1e9.

/// Momentum in GeV/c per tesla of transverse field and meter of curvature
/// radius, for a unit-charge particle.
pub const GEV_PER_TESLA_METER: f64 = 0.299792458;

/// Detector-frame positions are recorded in centimeters; the rigidity
/// relation wants meters. The conversion is always this explicit call,
/// never an implicit assumption about matching units.
#[inline]
pub fn cm_to_m(cm: f64) -> f64 {
    cm / 100.0
}

/// Momentum estimate `p = 0.299792458 · R · B` in GeV/c.
///
/// `radius_m` must be non-negative and `field_tesla` finite; within those
/// preconditions this is a pure function with no failure modes, linear in
/// both arguments.
#[inline]
pub fn momentum_gev(radius_m: f64, field_tesla: f64) -> f64 {
    debug_assert!(radius_m >= 0.0, "curvature radius must be non-negative");
    debug_assert!(field_tesla.is_finite(), "field strength must be finite");
    GEV_PER_TESLA_METER * radius_m * field_tesla
}
