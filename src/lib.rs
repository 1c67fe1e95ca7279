//! zonegrid: a UTM/MGRS-aligned grid geometry engine for map renderers.
//!
//! The crate turns a geographic extent or a center-plus-cell-count request
//! into zone-aligned grid geometry: an ordered vertex buffer of
//! (longitude, latitude, reserved) triplets plus a parallel sequence of
//! 5-digit grid-reference labels. It is renderer-agnostic; consumers index
//! the buffer positionally and draw it however they like.
//!
//! ```
//! use zonegrid::{GeoPoint, Grid};
//!
//! let grid = Grid::new();
//! grid.set_spacing(1000.0);
//! grid.set_corners(
//!     Some(GeoPoint::new(52.52, 13.38)),
//!     Some(GeoPoint::new(52.49, 13.43)),
//! );
//! let points = grid.point_buffer().expect("valid visible grid");
//! assert_eq!(points.len() % 3, 0);
//! ```

pub mod error;
pub mod geo;
pub mod grid;
pub mod proj;
pub mod round;

pub use error::ProjError;
pub use geo::{GeoBounds, GeoPoint};
pub use grid::{ChangeListener, Grid, JunctionStrategy};
pub use proj::utm::{UtmPoint, ZoneDescriptor};
pub use round::RoundMode;
