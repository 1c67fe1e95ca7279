//! Zone-based projected coordinates: UTM with MGRS latitude bands.
//!
//! A [`UtmPoint`] is only meaningful relative to its own [`ZoneDescriptor`];
//! arithmetic across two points with different descriptors is invalid and
//! must round-trip through a geographic point. Easting/northing outside the
//! nominal zone range are allowed — the Extend junction strategy deliberately
//! extrapolates a single zone's grid past its true boundary.

use std::fmt;

use crate::error::ProjError;
use crate::geo::GeoPoint;
use crate::proj::transverse_mercator::TransverseMercator;
use crate::proj::Projection;

/// MGRS band letters for 8° rows from 80°S northward; I and O are skipped.
const BAND_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";

/// Longitudinal zone (1–60) plus MGRS latitude band (C–X minus I and O).
///
/// The band determines the hemisphere: C–M is south of the equator, N–X
/// north. Regular 6° zones throughout; the Norway/Svalbard zone widening
/// exceptions are not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneDescriptor {
    zone: u8,
    band: char,
}

impl ZoneDescriptor {
    pub fn new(zone: u8, band: char) -> Result<Self, ProjError> {
        if !(1..=60).contains(&zone) || !BAND_LETTERS.contains(&(band as u8)) {
            return Err(ProjError::BadDescriptor(format!("{zone}{band}")));
        }
        Ok(Self { zone, band })
    }

    /// Descriptor covering a geographic position, or `NoZone` outside the
    /// UTM latitude domain of [-80°, 84°].
    pub fn from_geo(lat: f64, lon: f64) -> Result<Self, ProjError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(ProjError::NonFinite { lon, lat });
        }
        if !(-80.0..=84.0).contains(&lat) {
            return Err(ProjError::NoZone { lat, lon });
        }
        let zone = ((((lon + 180.0) / 6.0).floor() as i64) + 1).clamp(1, 60) as u8;
        let band_idx = ((((lat + 80.0) / 8.0).floor() as i64).clamp(0, 19)) as usize;
        Ok(Self {
            zone,
            band: BAND_LETTERS[band_idx] as char,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    pub fn is_northern(&self) -> bool {
        self.band >= 'N'
    }

    /// Central meridian of the longitudinal zone, degrees.
    pub fn central_meridian(&self) -> f64 {
        (self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    /// Eastern edge of the longitudinal zone, degrees.
    pub fn east_bound(&self) -> f64 {
        -180.0 + self.zone as f64 * 6.0
    }
}

impl fmt::Display for ZoneDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, self.band)
    }
}

/// A projected position: zone descriptor plus easting/northing in metres.
///
/// False easting 500 000 m; false northing 10 000 000 m for southern bands.
#[derive(Clone, Copy, Debug)]
pub struct UtmPoint {
    pub descriptor: ZoneDescriptor,
    pub easting: f64,
    pub northing: f64,
}

impl UtmPoint {
    pub fn new(descriptor: ZoneDescriptor, easting: f64, northing: f64) -> Self {
        Self {
            descriptor,
            easting,
            northing,
        }
    }

    /// Project a geographic point into the zone that covers it.
    pub fn from_geo(p: &GeoPoint) -> Result<Self, ProjError> {
        let descriptor = ZoneDescriptor::from_geo(p.latitude, p.longitude)?;
        let tm = descriptor.projection();
        let (easting, northing) =
            tm.forward(p.longitude.to_radians(), p.latitude.to_radians())?;
        Ok(Self {
            descriptor,
            easting,
            northing,
        })
    }

    /// Inverse-project back to geographic coordinates, interpreting the
    /// easting/northing relative to this point's own zone. Longitude is not
    /// re-normalized, so extrapolated coordinates can land outside ±180° —
    /// the antimeridian guard relies on seeing those raw values.
    pub fn to_geo(&self) -> GeoPoint {
        let tm = self.descriptor.projection();
        let (lon, lat) = tm.unproject(self.easting, self.northing);
        GeoPoint::new(lat.to_degrees(), lon.to_degrees())
    }

    /// True when both points carry the same zone descriptor, i.e. their
    /// easting/northing values are directly comparable.
    pub fn same_zone(&self, other: &UtmPoint) -> bool {
        self.descriptor == other.descriptor
    }
}

impl ZoneDescriptor {
    fn projection(&self) -> TransverseMercator {
        TransverseMercator::utm_zone(self.zone, self.is_northern())
    }
}

impl fmt::Display for UtmPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.0} {:.0}",
            self.descriptor, self.easting, self.northing
        )
    }
}
