/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Flattening (dimensionless)
    pub f: f64,
    /// First eccentricity squared: 2f - f^2
    pub e2: f64,
    /// Third flattening: f / (2 - f)
    pub n: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64) -> Self {
        let e2 = 2.0 * f - f * f;
        let n = f / (2.0 - f);
        Self { a, f, e2, n }
    }

    /// First eccentricity. Not storable in a const: `sqrt` is not a const fn.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Semi-minor axis: a * (1 - f).
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// IUGG mean radius, (2a + b) / 3. The spherical great-circle helpers
    /// use this as their earth radius.
    pub fn mean_radius(&self) -> f64 {
        (2.0 * self.a + self.b()) / 3.0
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);
