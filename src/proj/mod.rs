pub mod ellipsoid;
pub mod transverse_mercator;
pub mod utm;

use crate::error::ProjError;

/// Trait for map projections supporting forward and inverse transforms.
///
/// Angles are radians; projected coordinates are metres.
pub trait Projection: Send + Sync {
    /// Forward: (lon_rad, lat_rad) -> (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;
}
