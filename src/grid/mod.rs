//! The customizable zone-aligned grid: alignment, lazy geometry, labels,
//! and change notification.
//!
//! One [`Grid`] instance owns all of its state behind a single mutex; every
//! operation is short and CPU-bound, so the lock is never held across I/O.
//! Geometry is built lazily on the first [`Grid::point_buffer`] call after an
//! invalidation and cached as an immutable snapshot.

mod align;
mod build;
mod labels;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::geo::{GeoBounds, GeoPoint};
use crate::proj::utm::UtmPoint;

/// Default cell spacing in metres.
pub const DEFAULT_SPACING_M: f64 = 100.0;

/// Opaque white, 0xAARRGGBB.
pub const DEFAULT_COLOR: u32 = 0xFFFF_FFFF;

/// Policy for a grid that spans more than one projection zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JunctionStrategy {
    /// Treat the whole grid as belonging to one reference zone and
    /// extrapolate its projected grid past real zone boundaries. Simple
    /// geometry, slight real-world distortion at the edges.
    #[default]
    Extend,
    /// Re-derive true zone-local coordinates at each crossing. Geometrically
    /// correct but piecewise, with visible junction seams.
    MultiGrid,
}

/// Observer of grid mutations.
///
/// Delivery is synchronous on the mutating thread, after the state lock has
/// been released; a listener may call back into the grid.
pub trait ChangeListener: Send + Sync {
    /// `geometry_invalidated` is true when the cached point buffer was
    /// discarded by the mutation.
    fn on_changed(&self, geometry_invalidated: bool);
}

/// The four zone-aligned corners plus their geographic equivalents.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridCorners {
    pub tl: UtmPoint,
    pub tr: UtmPoint,
    pub br: UtmPoint,
    pub bl: UtmPoint,
    pub tl_geo: GeoPoint,
    pub tr_geo: GeoPoint,
    pub br_geo: GeoPoint,
    pub bl_geo: GeoPoint,
}

pub(crate) struct GridState {
    pub corners: Option<GridCorners>,
    pub spacing: f64,
    pub color: u32,
    pub stroke_weight: f32,
    pub show_labels: bool,
    /// Manual label precision override; 0 means derive from spacing.
    pub precision: u8,
    pub visible: bool,
    pub strategy: JunctionStrategy,
    /// Whether the map surface scrolls continuously across the antimeridian.
    pub continuous_scroll: bool,
    pub place_cols: u32,
    pub place_rows: u32,
    pub x_lines: usize,
    pub y_lines: usize,
    /// Cached vertex buffer: (lon, lat, reserved) triplets.
    pub points: Option<Arc<[f64]>>,
    /// Raw 5-digit labels from the last geometry build.
    pub labels: Vec<String>,
    pub listeners: Vec<Arc<dyn ChangeListener>>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            corners: None,
            spacing: DEFAULT_SPACING_M,
            color: DEFAULT_COLOR,
            stroke_weight: 2.0,
            show_labels: true,
            precision: 0,
            visible: true,
            strategy: JunctionStrategy::default(),
            continuous_scroll: false,
            place_cols: 0,
            place_rows: 0,
            x_lines: 0,
            y_lines: 0,
            points: None,
            labels: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

impl GridState {
    /// Replace (or clear) the corners and drop the cached geometry.
    pub(crate) fn update_corners(
        &mut self,
        corners: Option<(UtmPoint, UtmPoint, UtmPoint, UtmPoint)>,
    ) {
        self.corners = corners.map(|(tl, tr, bl, br)| GridCorners {
            tl,
            tr,
            br,
            bl,
            tl_geo: tl.to_geo(),
            tr_geo: tr.to_geo(),
            br_geo: br.to_geo(),
            bl_geo: bl.to_geo(),
        });
        if self.corners.is_none() {
            self.labels.clear();
        }
        self.points = None;
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.corners.is_some()
    }
}

/// A customizable UTM/MGRS-aligned grid overlay.
///
/// Renderer-agnostic: geometry is exposed as an ordered vertex buffer of
/// (longitude, latitude, reserved) triplets plus a parallel label sequence,
/// both indexed positionally by the consumer.
pub struct Grid {
    state: Mutex<GridState>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

fn notify(listeners: &[Arc<dyn ChangeListener>], geometry_invalidated: bool) {
    for l in listeners {
        l.on_changed(geometry_invalidated);
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GridState::default()),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, GridState> {
        // A panic while holding the lock leaves plain data; recover it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the grid extent from two opposite corners, aligning the result to
    /// the spacing step. Passing `None` for either corner clears the grid.
    /// Returns false when no grid could be derived; the grid is left cleared.
    pub fn set_corners(&self, corner1: Option<GeoPoint>, corner2: Option<GeoPoint>) -> bool {
        let (ok, listeners) = {
            let mut s = self.state();
            let ok = align::align_corners(&mut s, corner1, corner2);
            (ok, s.listeners.clone())
        };
        notify(&listeners, true);
        ok
    }

    /// Unset the grid.
    pub fn clear(&self) {
        self.set_corners(None, None);
    }

    /// True when all four corners are present.
    pub fn is_valid(&self) -> bool {
        self.state().is_valid()
    }

    /// Place the grid around a center point with the given cell counts.
    /// On failure the previous corners are left intact.
    pub fn place(&self, center: GeoPoint, cols: u32, rows: u32) -> bool {
        let (ok, listeners) = {
            let mut s = self.state();
            let ok = align::place(&mut s, center, cols, rows);
            (ok, ok.then(|| s.listeners.clone()))
        };
        if let Some(listeners) = listeners {
            notify(&listeners, true);
        }
        ok
    }

    /// Re-place the grid around a new center, reusing the cell counts from
    /// the previous placement (or the current line counts as a fallback).
    pub fn place_at(&self, center: GeoPoint) -> bool {
        let (cols, rows) = {
            let s = self.state();
            let cols = if s.place_cols > 0 {
                s.place_cols
            } else {
                s.x_lines as u32 + 1
            };
            let rows = if s.place_rows > 0 {
                s.place_rows
            } else {
                s.y_lines as u32 + 1
            };
            (cols, rows)
        };
        self.place(center, cols, rows)
    }

    pub fn visible(&self) -> bool {
        self.state().visible
    }

    pub fn set_visible(&self, visible: bool) {
        let listeners = {
            let mut s = self.state();
            if s.visible == visible {
                return;
            }
            s.visible = visible;
            s.listeners.clone()
        };
        notify(&listeners, false);
    }

    /// Grid line color, 0xAARRGGBB with alpha always opaque.
    pub fn color(&self) -> u32 {
        self.state().color
    }

    pub fn set_color(&self, color: u32) {
        let mut color = color;
        if color & 0xFF00_0000 == 0 {
            color |= 0xFF00_0000;
        }
        let listeners = {
            let mut s = self.state();
            if s.color == color {
                return;
            }
            s.color = color;
            s.listeners.clone()
        };
        notify(&listeners, false);
    }

    pub fn stroke_weight(&self) -> f32 {
        self.state().stroke_weight
    }

    pub fn set_stroke_weight(&self, weight: f32) {
        self.state().stroke_weight = weight;
    }

    pub fn show_labels(&self) -> bool {
        self.state().show_labels
    }

    pub fn set_show_labels(&self, show: bool) {
        let listeners = {
            let mut s = self.state();
            if s.show_labels == show {
                return;
            }
            s.show_labels = show;
            s.listeners.clone()
        };
        notify(&listeners, false);
    }

    /// Spacing between cells in metres.
    pub fn spacing(&self) -> f64 {
        self.state().spacing
    }

    /// Change the cell spacing. Values that are not strictly positive
    /// (including NaN) or unchanged are a no-op. Resets any manual label
    /// precision to automatic.
    pub fn set_spacing(&self, meters: f64) {
        let listeners = {
            let mut s = self.state();
            if !(meters > 0.0) || meters == s.spacing {
                return;
            }
            s.spacing = meters;
            s.precision = 0;
            s.points = None;
            s.listeners.clone()
        };
        notify(&listeners, true);
    }

    pub fn junction_strategy(&self) -> JunctionStrategy {
        self.state().strategy
    }

    pub fn set_junction_strategy(&self, strategy: JunctionStrategy) {
        let listeners = {
            let mut s = self.state();
            if s.strategy == strategy {
                return;
            }
            s.strategy = strategy;
            s.points = None;
            s.listeners.clone()
        };
        notify(&listeners, true);
    }

    /// Whether the map surface scrolls continuously across the antimeridian.
    /// Display-context input; disables the world-wrap placement guard.
    pub fn set_continuous_scroll(&self, enabled: bool) {
        self.state().continuous_scroll = enabled;
    }

    /// Interior vertical line count from the last geometry build.
    pub fn vertical_line_count(&self) -> usize {
        self.state().x_lines
    }

    /// Interior horizontal line count from the last geometry build.
    pub fn horizontal_line_count(&self) -> usize {
        self.state().y_lines
    }

    pub fn num_columns(&self) -> usize {
        self.state().x_lines + 1
    }

    pub fn num_rows(&self) -> usize {
        self.state().y_lines + 1
    }

    /// Geographic bounds of the grid, antimeridian-aware when the display
    /// scrolls continuously.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let s = self.state();
        let c = s.corners.as_ref()?;
        Some(GeoBounds::from_points(
            &[c.tl_geo, c.tr_geo, c.br_geo, c.bl_geo],
            s.continuous_scroll,
        ))
    }

    /// The four corners in top-left, top-right, bottom-right, bottom-left
    /// order.
    pub fn corners(&self) -> Option<[GeoPoint; 4]> {
        let s = self.state();
        let c = s.corners.as_ref()?;
        Some([c.tl_geo, c.tr_geo, c.br_geo, c.bl_geo])
    }

    pub fn center(&self) -> Option<GeoPoint> {
        self.bounds().map(|b| b.center())
    }

    /// The ordered vertex buffer, or `None` when the grid is invalid or
    /// invisible.
    ///
    /// Layout, indexed positionally by consumers:
    /// 1. five vertices closing the bounding ring (TL, TR, BR, BL, TL);
    /// 2. one (top, bottom) vertex pair per interior vertical line,
    ///    west to east;
    /// 3. one (left, right) vertex pair per interior horizontal line,
    ///    north to south.
    ///
    /// Each vertex is (longitude, latitude, reserved); the third component
    /// is zero-initialized for the renderer to fill. The buffer is a cached
    /// snapshot — a later call after a mutation may return a different
    /// allocation.
    pub fn point_buffer(&self) -> Option<Arc<[f64]>> {
        let mut s = self.state();
        if !s.is_valid() || !s.visible {
            return None;
        }
        if s.points.is_none() {
            match s.strategy {
                JunctionStrategy::Extend => build::build_extend(&mut s),
                JunctionStrategy::MultiGrid => build::build_multi_grid(&mut s),
            }
            debug!(
                strategy = ?s.strategy,
                x_lines = s.x_lines,
                y_lines = s.y_lines,
                "rebuilt grid geometry"
            );
        }
        s.points.clone()
    }

    /// Register a listener; re-registering the same `Arc` is a no-op.
    pub fn add_change_listener(&self, listener: Arc<dyn ChangeListener>) {
        let mut s = self.state();
        if !s.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            s.listeners.push(listener);
        }
    }

    pub fn remove_change_listener(&self, listener: &Arc<dyn ChangeListener>) {
        let mut s = self.state();
        s.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }
}
