use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("no UTM zone covers latitude {lat:.4}°, longitude {lon:.4}°")]
    NoZone { lat: f64, lon: f64 },

    #[error("non-finite coordinate ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },

    #[error("invalid zone descriptor: {0}")]
    BadDescriptor(String),
}
