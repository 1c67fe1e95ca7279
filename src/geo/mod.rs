//! Geographic value types.

pub mod calc;

use std::fmt;

/// A geographic position in degrees, WGS84.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above the ellipsoid, when known. Never read by the grid engine.
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: Some(altitude),
        }
    }

    /// Great-circle distance to `other`, metres.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        calc::distance(self, other)
    }

    /// Initial great-circle bearing to `other`, degrees clockwise from north.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        calc::bearing(self, other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// An axis-aligned geographic bounding box.
///
/// `east < west` marks a box that crosses the antimeridian; that state only
/// arises from [`GeoBounds::from_points`] with wrapping enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Bounds of two corner points, without antimeridian handling.
    pub fn new(a: &GeoPoint, b: &GeoPoint) -> Self {
        Self {
            north: a.latitude.max(b.latitude),
            south: a.latitude.min(b.latitude),
            east: a.longitude.max(b.longitude),
            west: a.longitude.min(b.longitude),
        }
    }

    /// Bounds of a point set. With `wrap180`, a raw longitude span over 180°
    /// is interpreted as a box crossing the antimeridian and east/west are
    /// recomputed so that `east < west`.
    pub fn from_points(points: &[GeoPoint], wrap180: bool) -> Self {
        let mut north = -90.0_f64;
        let mut south = 90.0_f64;
        let mut east = -180.0_f64;
        let mut west = 180.0_f64;
        for p in points {
            north = north.max(p.latitude);
            south = south.min(p.latitude);
            east = east.max(p.longitude);
            west = west.min(p.longitude);
        }
        if wrap180 && east - west > 180.0 {
            let mut e2 = -180.0_f64;
            let mut w2 = 180.0_f64;
            for p in points {
                if p.longitude >= 0.0 {
                    w2 = w2.min(p.longitude);
                } else {
                    e2 = e2.max(p.longitude);
                }
            }
            east = e2;
            west = w2;
        }
        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn center(&self) -> GeoPoint {
        let lat = (self.north + self.south) / 2.0;
        let lon = if self.east < self.west {
            let mid = (self.west + self.east + 360.0) / 2.0;
            if mid > 180.0 {
                mid - 360.0
            } else {
                mid
            }
        } else {
            (self.east + self.west) / 2.0
        };
        GeoPoint::new(lat, lon)
    }
}
