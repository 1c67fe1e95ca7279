//! Great-circle calculations on the mean-radius sphere.
//!
//! The grid engine only ever moves a few grid cells at a time and re-snaps
//! the projected coordinate after every step, so spherical accuracy is
//! sufficient; the snap absorbs the sphere/ellipsoid discrepancy.

use crate::geo::GeoPoint;
use crate::proj::ellipsoid::WGS84;

/// Great-circle distance between two points, metres (haversine).
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlam = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    2.0 * WGS84.mean_radius() * h.sqrt().asin()
}

/// Initial bearing from `a` to `b`, degrees clockwise from north in [0, 360).
pub fn bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dlam = (b.longitude - a.longitude).to_radians();

    let y = dlam.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlam.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Destination point starting at `origin`, travelling `meters` along the
/// great circle with the given initial bearing (degrees clockwise from
/// north). Longitude is normalized to [-180, 180].
pub fn point_at_distance(origin: &GeoPoint, bearing_deg: f64, meters: f64) -> GeoPoint {
    let delta = meters / WGS84.mean_radius();
    let theta = bearing_deg.to_radians();
    let phi1 = origin.latitude.to_radians();
    let lam1 = origin.longitude.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lam2 = lam1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    let mut lon = lam2.to_degrees();
    if lon > 180.0 {
        lon -= 360.0;
    } else if lon < -180.0 {
        lon += 360.0;
    }
    GeoPoint::new(phi2.to_degrees(), lon)
}
