//! Transverse Mercator — Krüger n-series, 6th order.
//!
//! Karney's (2011) arrangement of Krüger's series, the projection under
//! every UTM zone. Sub-millimetre within a zone, and it degrades gracefully
//! when coordinates are extrapolated past the zone edge — the Extend
//! junction strategy depends on that.

use crate::error::ProjError;
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::Projection;

pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    /// Rectifying radius: A = a/(1+n) * (1 + n²/4 + n⁴/64)
    a_hat: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.n;
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let a_hat = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        // Forward series α₁..α₆
        let alpha = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4
                + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            212378941.0 / 319334400.0 * n6,
        ];
        // Inverse series β₁..β₆
        let beta = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            20648693.0 / 638668800.0 * n6,
        ];

        Self {
            ellipsoid,
            lon0,
            k0,
            false_easting,
            false_northing,
            a_hat,
            alpha,
            beta,
        }
    }

    /// The Transverse Mercator instance for a UTM zone on WGS84.
    pub fn utm_zone(zone: u8, north: bool) -> Self {
        let lon0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();
        let false_northing = if north { 0.0 } else { 10_000_000.0 };
        Self::new(WGS84, lon0, 0.9996, 500_000.0, false_northing)
    }

    /// Geodetic tangent τ → conformal tangent τ'.
    fn conformal_from_geodetic(&self, tau: f64) -> f64 {
        let e = self.ellipsoid.eccentricity();
        let sec = (1.0 + tau * tau).sqrt();
        let sigma = (e * (e * tau / sec).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * sec
    }

    /// Conformal tangent τ' → geodetic tangent τ, by Newton iteration.
    fn geodetic_from_conformal(&self, tau_prime: f64) -> f64 {
        let e = self.ellipsoid.eccentricity();
        let e2 = self.ellipsoid.e2;
        let mut tau = tau_prime;
        for _ in 0..15 {
            let sec = (1.0 + tau * tau).sqrt();
            let sigma = (e * (e * tau / sec).atanh()).sinh();
            let estimate = tau * (1.0 + sigma * sigma).sqrt() - sigma * sec;
            let dtau = (tau_prime - estimate) * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * sec * (1.0 + estimate * estimate).sqrt());
            tau += dtau;
            if dtau.abs() < 1e-12 * (1.0 + tau.abs()) {
                break;
            }
        }
        tau
    }

    /// Forward transform, (lon_rad, lat_rad) → (easting, northing).
    /// Total over the supported latitude range.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let dlam = lon - self.lon0;
        let tau_prime = self.conformal_from_geodetic(lat.tan());

        let xi_prime = tau_prime.atan2(dlam.cos());
        let eta_prime =
            (dlam.sin() / (tau_prime * tau_prime + dlam.cos() * dlam.cos()).sqrt()).asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, &a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        (
            self.k0 * self.a_hat * eta + self.false_easting,
            self.k0 * self.a_hat * xi + self.false_northing,
        )
    }

    /// Inverse transform, (easting, northing) → (lon_rad, lat_rad).
    /// Total over the plane, including extrapolated coordinates.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let eta = (x - self.false_easting) / (self.k0 * self.a_hat);
        let xi = (y - self.false_northing) / (self.k0 * self.a_hat);

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, &b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_prime.sinh();
        let cos_xi = xi_prime.cos();
        let tau_prime = xi_prime.sin() / (sinh_eta * sinh_eta + cos_xi * cos_xi).sqrt();
        let tau = self.geodetic_from_conformal(tau_prime);

        (self.lon0 + sinh_eta.atan2(cos_xi), tau.atan())
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjError::NonFinite { lon, lat });
        }
        Ok(self.project(lon, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjError::NonFinite { lon: x, lat: y });
        }
        Ok(self.unproject(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roundtrip_zone18() {
        let tm = TransverseMercator::utm_zone(18, true);
        let cases: &[(f64, f64)] = &[
            (-75.0, 40.0), // central meridian
            (-77.5, 38.9), // off-center
            (-72.1, 44.5), // near east boundary
            (-75.0, 0.0),  // equator
            (-75.0, 81.0), // high latitude
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = tm.project(lon, lat);
            let (lon2, lat2) = tm.unproject(x, y);
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_central_meridian_easting() {
        let tm = TransverseMercator::utm_zone(31, true);
        let (e, _) = tm.project(3.0_f64.to_radians(), 48.85_f64.to_radians());
        assert_relative_eq!(e, 500_000.0, epsilon = 0.01);
    }

    #[test]
    fn test_known_northing_zone33() {
        // (15°E, 52°N) lies on the zone 33 central meridian; northing ≈ 5.761M
        let tm = TransverseMercator::utm_zone(33, true);
        let (e, n) = tm.project(15.0_f64.to_radians(), 52.0_f64.to_radians());
        assert_relative_eq!(e, 500_000.0, epsilon = 1.0);
        assert!(n > 5_760_000.0 && n < 5_762_000.0, "northing = {n}");
    }

    #[test]
    fn test_southern_hemisphere_false_northing() {
        let tm = TransverseMercator::utm_zone(56, false);
        let lon = 151.2_f64.to_radians();
        let lat = (-33.9_f64).to_radians();
        let (x, y) = tm.project(lon, lat);
        assert!(y > 0.0 && y < 10_000_000.0, "southing out of range: {y}");
        let (lon2, lat2) = tm.unproject(x, y);
        assert_relative_eq!(lon2, lon, epsilon = 1e-9);
        assert_relative_eq!(lat2, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_extrapolation_past_zone_edge_roundtrips() {
        // The Extend strategy feeds coordinates well outside the nominal
        // ±3° zone width; the series must still invert cleanly.
        let tm = TransverseMercator::utm_zone(33, true);
        let (x, y) = tm.project(15.0_f64.to_radians(), 52.0_f64.to_radians());
        for &(dx, dy) in &[(400_000.0, 0.0), (-350_000.0, 120_000.0), (0.0, -5_900_000.0)] {
            let (lon, lat) = tm.unproject(x + dx, y + dy);
            let (x2, y2) = tm.project(lon, lat);
            assert_relative_eq!(x2, x + dx, epsilon = 1e-3);
            assert_relative_eq!(y2, y + dy, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_projection_trait_rejects_non_finite() {
        let tm = TransverseMercator::utm_zone(33, true);
        assert!(tm.forward(f64::NAN, 0.5).is_err());
        assert!(tm.inverse(500_000.0, f64::INFINITY).is_err());
    }
}
