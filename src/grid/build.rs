//! Geometry construction: the ordered vertex buffer and raw label sequence.
//!
//! Both builders emit the same positional layout (closed bounding ring, then
//! vertical top/bottom pairs west to east, then horizontal left/right pairs
//! north to south) so renderers never branch on the junction strategy.

use crate::geo::calc::point_at_distance;
use crate::geo::GeoPoint;
use crate::grid::labels::{grid_label, LabelAxis};
use crate::grid::{GridCorners, GridState};
use crate::proj::utm::UtmPoint;
use crate::round::{gcf, round, RoundMode};

/// Vertex accumulator emitting (longitude, latitude, reserved) triplets.
struct PointBuf(Vec<f64>);

impl PointBuf {
    fn with_capacity(vertices: usize) -> Self {
        Self(Vec::with_capacity(vertices * 3))
    }

    fn push(&mut self, p: &GeoPoint) {
        self.0.extend_from_slice(&[p.longitude, p.latitude, 0.0]);
    }
}

/// Interior line count along one axis: snapped span, degenerate spans forced
/// to one cell, minus the two boundary lines.
fn line_count(dist: f64, spacing: f64) -> usize {
    let mut dist = round(dist, spacing, RoundMode::Nearest);
    if dist == 0.0 {
        dist = spacing;
    }
    (((dist / spacing) as i64).unsigned_abs() as usize).saturating_sub(1)
}

/// Build geometry in the reference zone of the corners, extrapolating its
/// projected grid across any real zone boundary the extent spans.
pub(crate) fn build_extend(s: &mut GridState) {
    let Some(c) = s.corners else { return };
    let sp = s.spacing;

    let x_lines = line_count(c.tr.easting - c.tl.easting, sp);
    let y_lines = line_count(c.tr.northing - c.br.northing, sp);

    let mut buf = PointBuf::with_capacity(5 + 2 * x_lines + 2 * y_lines);
    buf.push(&c.tl_geo);
    buf.push(&c.tr_geo);
    buf.push(&c.br_geo);
    buf.push(&c.bl_geo);
    buf.push(&c.tl_geo);

    let mut labels = vec![String::new(); x_lines + y_lines + 4];
    labels[0] = grid_label(&c.tl, LabelAxis::Easting);
    labels[x_lines + 1] = grid_label(&c.tr, LabelAxis::Easting);
    labels[x_lines + 2] = grid_label(&c.tl, LabelAxis::Northing);
    labels[x_lines + y_lines + 3] = grid_label(&c.bl, LabelAxis::Northing);

    let mut top = c.tl;
    let mut bottom = c.bl;
    for i in 0..x_lines {
        top = UtmPoint::new(top.descriptor, top.easting + sp, top.northing);
        bottom = UtmPoint::new(bottom.descriptor, bottom.easting + sp, bottom.northing);
        labels[i + 1] = grid_label(&top, LabelAxis::Easting);
        buf.push(&top.to_geo());
        buf.push(&bottom.to_geo());
    }

    let mut left = c.tl;
    let mut right = c.tr;
    for i in 0..y_lines {
        left = UtmPoint::new(left.descriptor, left.easting, left.northing - sp);
        right = UtmPoint::new(right.descriptor, right.easting, right.northing - sp);
        labels[x_lines + 3 + i] = grid_label(&left, LabelAxis::Northing);
        buf.push(&left.to_geo());
        buf.push(&right.to_geo());
    }

    s.x_lines = x_lines;
    s.y_lines = y_lines;
    s.labels = labels;
    s.points = Some(buf.0.into());
}

/// Width of the extent in metres, measured zone by zone so each segment uses
/// its own zone's true projection. Returns `None` when a zone hand-off point
/// cannot be projected.
fn multi_grid_width(c: &GridCorners, tl: UtmPoint, tr: UtmPoint, sp: f64) -> Option<f64> {
    if tl.descriptor.zone() == tr.descriptor.zone() {
        return Some(c.tl_geo.distance_to(&c.tr_geo));
    }
    let zones = tr.descriptor.zone() as i64 - tl.descriptor.zone() as i64 + 1;
    // A top edge wrapping zone 60 back to 1 has no measurable west-east
    // span; zero width degrades to a single-cell span downstream.
    if zones <= 0 {
        return Some(0.0);
    }
    let mut acc = 0.0;
    let mut left = tl;
    for i in 0..zones {
        let left_geo = left.to_geo();
        let last = i == zones - 1;
        let edge_lng = if last {
            c.tr_geo.longitude
        } else {
            left.descriptor.east_bound()
        };
        // Measure fractionally short of the edge so the endpoint still
        // projects inside the current zone.
        let d = left_geo.distance_to(&GeoPoint::new(left_geo.latitude, edge_lng - 1e-7));
        if last {
            acc += d;
        } else {
            acc += round(d, sp, RoundMode::Floor);
            let crossed =
                UtmPoint::new(left.descriptor, left.easting + d, left.northing).to_geo();
            left = UtmPoint::from_geo(&GeoPoint::new(crossed.latitude, edge_lng)).ok()?;
        }
    }
    Some(acc)
}

/// Column easting when the two snapped endpoints of a vertical disagree:
/// the endpoint whose step error is strictly smaller wins, ties go to the
/// bottom endpoint.
fn shared_easting(top_err: f64, bottom_err: f64, top: f64, bottom: f64) -> f64 {
    if top_err < bottom_err {
        top
    } else {
        bottom
    }
}

/// Build geometry by walking the top and bottom edges one cell at a time,
/// re-projecting and re-snapping in whichever zone each step lands in.
pub(crate) fn build_multi_grid(s: &mut GridState) {
    let Some(c) = s.corners else { return };
    let sp = s.spacing;
    let n_step = gcf(10_000_000.0, sp);

    // Zone-local corner coordinates; the stored corners may carry
    // extrapolated values from an earlier Extend alignment.
    let (Ok(tl), Ok(tr), Ok(br), Ok(bl)) = (
        UtmPoint::from_geo(&c.tl_geo),
        UtmPoint::from_geo(&c.tr_geo),
        UtmPoint::from_geo(&c.br_geo),
        UtmPoint::from_geo(&c.bl_geo),
    ) else {
        return;
    };

    let Some(x_dist) = multi_grid_width(&c, tl, tr, sp) else {
        return;
    };
    let x_lines = line_count(x_dist, sp);
    let y_lines = line_count(c.tl_geo.distance_to(&c.bl_geo), sp);

    let mut buf = PointBuf::with_capacity(5 + 2 * x_lines + 2 * y_lines);
    buf.push(&c.tl_geo);
    buf.push(&c.tr_geo);
    buf.push(&c.br_geo);
    buf.push(&c.bl_geo);
    buf.push(&c.tl_geo);

    let mut labels = vec![String::new(); x_lines + y_lines + 4];
    labels[0] = grid_label(&tl, LabelAxis::Easting);
    labels[x_lines + 1] = grid_label(&tr, LabelAxis::Easting);
    labels[x_lines + 2] = grid_label(&tl, LabelAxis::Northing);
    labels[x_lines + y_lines + 3] = grid_label(&bl, LabelAxis::Northing);

    let step = |from: &UtmPoint, bearing: f64| -> Option<UtmPoint> {
        UtmPoint::from_geo(&point_at_distance(&from.to_geo(), bearing, sp)).ok()
    };

    let mut top = tl;
    let mut bottom = bl;
    for i in 0..x_lines {
        let Some(t) = step(&top, 90.0) else { return };
        let Some(b) = step(&bottom, 90.0) else { return };
        let mut tp = UtmPoint::new(
            t.descriptor,
            round(t.easting, sp, RoundMode::Nearest),
            tl.northing,
        );
        let mut bp = UtmPoint::new(
            b.descriptor,
            round(b.easting, sp, RoundMode::Nearest),
            br.northing,
        );
        // Rounding near a zone seam can pull the two endpoints onto
        // different columns; keep whichever stayed closest to a true
        // spacing step from its predecessor.
        if tp.easting != bp.easting && tp.same_zone(&bp) {
            let dt = (top.to_geo().distance_to(&tp.to_geo()) - sp).abs();
            let db = (bottom.to_geo().distance_to(&bp.to_geo()) - sp).abs();
            let e = shared_easting(dt, db, tp.easting, bp.easting);
            tp = UtmPoint::new(tp.descriptor, e, tp.northing);
            bp = UtmPoint::new(bp.descriptor, e, bp.northing);
        }
        labels[i + 1] = grid_label(&tp, LabelAxis::Easting);
        buf.push(&tp.to_geo());
        buf.push(&bp.to_geo());
        top = tp;
        bottom = bp;
    }

    let mut left = tl;
    let mut right = tr;
    for i in 0..y_lines {
        let Some(l) = step(&left, 180.0) else { return };
        let Some(r) = step(&right, 180.0) else { return };
        let lp = UtmPoint::new(
            l.descriptor,
            tl.easting,
            round(l.northing, n_step, RoundMode::Nearest),
        );
        let rp = UtmPoint::new(
            r.descriptor,
            br.easting,
            round(r.northing, n_step, RoundMode::Nearest),
        );
        labels[x_lines + 3 + i] = grid_label(&lp, LabelAxis::Northing);
        buf.push(&lp.to_geo());
        buf.push(&rp.to_geo());
        left = lp;
        right = rp;
    }

    s.x_lines = x_lines;
    s.y_lines = y_lines;
    s.labels = labels;
    s.points = Some(buf.0.into());
}
