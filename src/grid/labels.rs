//! Grid-reference labels: 5-digit easting/northing descriptors, precision
//! truncation, and the label-to-vertex index mapping.

use crate::grid::Grid;
use crate::proj::utm::UtmPoint;

/// Which projected coordinate a label describes.
#[derive(Clone, Copy, Debug)]
pub(crate) enum LabelAxis {
    Easting,
    Northing,
}

/// The 5-digit grid-reference descriptor of one projected coordinate:
/// metres within the current 100 km square, zero-padded.
pub(crate) fn grid_label(p: &UtmPoint, axis: LabelAxis) -> String {
    let v = match axis {
        LabelAxis::Easting => p.easting,
        LabelAxis::Northing => p.northing,
    };
    format!("{:05}", (v.floor() as i64).rem_euclid(100_000))
}

impl Grid {
    /// The label sequence from the last geometry build, parallel to the
    /// vertex buffer via [`Grid::label_position_index`]. With `truncate`
    /// each label is rounded to the effective precision and cut down to its
    /// significant digits; otherwise the raw 5-digit descriptors are
    /// returned.
    ///
    /// Empty until the geometry has been built at least once.
    pub fn labels(&self, truncate: bool) -> Vec<String> {
        let s = self.state();
        if s.labels.is_empty() {
            return Vec::new();
        }
        if !truncate {
            return s.labels.clone();
        }
        let precision = effective_precision(s.precision, s.spacing) as usize;
        let step = 10_i64.pow(5 - precision as u32);
        s.labels
            .iter()
            .map(|raw| match raw.parse::<i64>() {
                Ok(v) => {
                    let mut rounded = (v as f64 / step as f64).round() as i64 * step;
                    if rounded >= 100_000 {
                        rounded -= 100_000;
                    }
                    format!("{rounded:05}")[..precision].to_string()
                }
                Err(_) => raw.clone(),
            })
            .collect()
    }

    /// Number of significant label digits, 1 to 5. Derived from the spacing
    /// unless a manual override is set.
    pub fn label_precision(&self) -> u8 {
        let s = self.state();
        effective_precision(s.precision, s.spacing)
    }

    /// Override the automatic label precision; capped at 5 digits.
    /// [`Grid::set_spacing`] resets the override.
    pub fn set_label_precision(&self, precision: u8) {
        let precision = precision.min(5);
        let listeners = {
            let mut s = self.state();
            if s.precision == precision {
                return;
            }
            s.precision = precision;
            s.listeners.clone()
        };
        super::notify(&listeners, false);
    }

    /// Vertex index (into the triplet-per-vertex buffer) that label `i`
    /// annotates. Corner labels map onto ring vertices; line labels map onto
    /// the top vertex of their vertical or the left vertex of their
    /// horizontal.
    pub fn label_position_index(&self, i: usize) -> usize {
        let s = self.state();
        if s.labels.is_empty() {
            return 0;
        }
        let x = s.x_lines;
        let last = s.labels.len() - 1;
        if i == 0 || i == x + 2 {
            0
        } else if i == x + 1 {
            1
        } else if i == last {
            3
        } else if i <= x {
            3 + 2 * i
        } else {
            3 + 2 * x + (i - (x + 2)) * 2
        }
    }

    /// Whether labels are worth drawing at the given latitude and map
    /// resolution (metres per pixel). False once the rendered label width
    /// would exceed roughly a twentieth of a cell.
    pub fn is_drawing_labels(&self, latitude: f64, map_resolution: f64) -> bool {
        let s = self.state();
        if !s.show_labels || !s.is_valid() {
            return false;
        }
        let precision = effective_precision(s.precision, s.spacing) as f64;
        let scale = latitude.to_radians().cos().max(1e-4);
        (map_resolution * scale * precision) / s.spacing <= 0.05
    }
}

fn effective_precision(manual: u8, spacing: f64) -> u8 {
    if manual > 0 {
        return manual;
    }
    (5 - spacing.log10().floor() as i32).clamp(1, 5) as u8
}
