//! Directional snapping of magnitudes to a grid step.
//!
//! Snapping direction matters: aligning an extent outward uses `Floor` on the
//! north-west corner and `Ceil` on the south-east corner so the requested
//! extent is always fully enclosed, while interior line generation snaps
//! `Nearest` to cancel accumulated floating-point drift.

/// How `round` resolves a value that falls between two multiples of the step.
///
/// All modes operate on the magnitude; the sign of the input is preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundMode {
    /// Snap toward zero.
    Floor,
    /// Snap to the closest multiple, halves away from zero.
    Nearest,
    /// Snap away from zero.
    Ceil,
}

/// Snap `value` to a multiple of `nearest` (> 0), preserving sign.
///
/// Zero maps to zero in every mode.
pub fn round(value: f64, nearest: f64, mode: RoundMode) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let sign = value.signum();
    let scaled = value.abs() / nearest;
    let snapped = match mode {
        RoundMode::Floor => scaled.floor(),
        RoundMode::Nearest => scaled.round(),
        RoundMode::Ceil => scaled.ceil(),
    };
    sign * snapped * nearest
}

/// Greatest common factor of two non-negative magnitudes, Euclid-style.
///
/// Used to pick a northing step that divides the 10 000 000 m false-northing
/// span evenly, so rows snapped on either side of the equator land on the
/// same physical lines. Iterative with a fixed cap: float remainders on
/// pathological inputs are not guaranteed to reach zero.
pub fn gcf(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }
    let (mut a, mut b) = (a, b);
    for _ in 0..64 {
        if a == 0.0 || b == 0.0 {
            return a + b;
        }
        let r = a % b;
        a = b;
        b = r;
    }
    b
}
