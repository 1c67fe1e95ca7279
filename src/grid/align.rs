//! Corner alignment: extent snapping and center placement.
//!
//! Both entry points end with four zone-aligned corners (or a cleared grid)
//! and an invalidated geometry cache. All snapping goes through
//! [`round`](crate::round::round) so the direction of every snap is explicit:
//! extents snap outward (floor/ceil) to enclose the request, placements snap
//! nearest to stay centred.

use tracing::{debug, trace};

use crate::geo::calc::point_at_distance;
use crate::geo::{GeoBounds, GeoPoint};
use crate::grid::{GridState, JunctionStrategy};
use crate::proj::utm::UtmPoint;
use crate::round::{gcf, round, RoundMode};

/// Northing values straddle the equator's 10 000 000 m false-northing
/// discontinuity; snapping them to this reduced step keeps rows from
/// drifting across it.
fn northing_step(spacing: f64) -> f64 {
    gcf(10_000_000.0, spacing)
}

/// Align the grid to two opposite extent corners. `None` for either corner
/// clears the grid. Returns false when no grid could be derived; the grid is
/// left cleared in that case.
pub(crate) fn align_corners(
    s: &mut GridState,
    corner1: Option<GeoPoint>,
    corner2: Option<GeoPoint>,
) -> bool {
    let (Some(c1), Some(c2)) = (corner1, corner2) else {
        s.update_corners(None);
        return false;
    };

    let bounds = GeoBounds::new(&c1, &c2);
    let sp = s.spacing;

    // Normalize the inputs into north-west and south-east corners.
    let nw = GeoPoint::new(bounds.north, bounds.west);
    let se = GeoPoint::new(bounds.south, bounds.east);

    let (mut tl, mut br) = match (UtmPoint::from_geo(&nw), UtmPoint::from_geo(&se)) {
        (Ok(tl), Ok(br)) => (tl, br),
        _ => {
            debug!("extent corner outside the projection domain, grid cleared");
            s.update_corners(None);
            return false;
        }
    };

    if tl.descriptor.zone() != br.descriptor.zone() && s.strategy == JunctionStrategy::Extend {
        // The extent straddles a zone boundary: re-derive a symmetric
        // half-extent about the geographic center, expressed in whichever
        // corner zone the center falls into.
        let c = match UtmPoint::from_geo(&bounds.center()) {
            Ok(c) => c,
            Err(_) => {
                s.update_corners(None);
                return false;
            }
        };
        let (half_width, half_height) = if c.descriptor.zone() == tl.descriptor.zone() {
            (c.easting - tl.easting, tl.northing - c.northing)
        } else if c.descriptor.zone() == br.descriptor.zone() {
            (br.easting - c.easting, c.northing - br.northing)
        } else {
            // Degenerate: the center belongs to neither corner zone.
            // Estimate from geographic distances along the extent edges.
            let ne = GeoPoint::new(bounds.north, bounds.east);
            let sw = GeoPoint::new(bounds.south, bounds.west);
            (nw.distance_to(&ne) / 2.0, nw.distance_to(&sw) / 2.0)
        };
        tl = UtmPoint::new(c.descriptor, c.easting - half_width, c.northing + half_height);
        br = UtmPoint::new(c.descriptor, c.easting + half_width, c.northing - half_height);
    }

    // Snap outward so the requested extent is fully enclosed.
    tl = UtmPoint::new(
        tl.descriptor,
        round(tl.easting, sp, RoundMode::Floor),
        round(tl.northing, sp, RoundMode::Ceil),
    );
    br = UtmPoint::new(
        br.descriptor,
        round(br.easting, sp, RoundMode::Ceil),
        round(br.northing, sp, RoundMode::Floor),
    );

    // A zero-size extent collapses both corners onto the same aligned point;
    // force a minimum one-cell grid.
    if tl.same_zone(&br) && tl.easting == br.easting && tl.northing == br.northing {
        br = UtmPoint::new(tl.descriptor, tl.easting + sp, tl.northing + sp);
    }

    let tr = UtmPoint::new(br.descriptor, br.easting, tl.northing);
    let bl = UtmPoint::new(tl.descriptor, tl.easting, br.northing);

    s.place_cols = 0;
    s.place_rows = 0;
    s.update_corners(Some((tl, tr, bl, br)));
    trace!(tl = %tl, br = %br, "extent aligned");
    true
}

/// Place the grid around `center` with `cols` x `rows` cells. On failure the
/// previous corners are left intact (though the remembered cell counts are
/// updated).
pub(crate) fn place(s: &mut GridState, center: GeoPoint, cols: u32, rows: u32) -> bool {
    s.place_cols = cols;
    s.place_rows = rows;

    let sp = s.spacing;
    let h_width = cols as f64 * sp / 2.0;
    let h_height = rows as f64 * sp / 2.0;
    let n_step = northing_step(sp);

    let corners = match s.strategy {
        JunctionStrategy::MultiGrid => place_multi_grid(center, cols, rows, sp, n_step, h_width, h_height),
        JunctionStrategy::Extend => place_extend(center, sp, n_step, h_width, h_height),
    };
    let Some((tl, tr, br, bl)) = corners else {
        debug!(%center, "grid placement failed: point outside the projection domain");
        return false;
    };

    if !s.continuous_scroll && wraps_world(&tl.to_geo(), &tr.to_geo(), &br.to_geo(), &bl.to_geo())
    {
        debug!(%center, "grid placement rejected: extent would wrap the antimeridian");
        return false;
    }

    s.update_corners(Some((tl, tr, bl, br)));
    trace!(%center, cols, rows, "grid placed");
    true
}

/// Extend: snap the center once and derive every corner by pure projected
/// offset within the center's reference zone.
fn place_extend(
    center: GeoPoint,
    sp: f64,
    n_step: f64,
    h_width: f64,
    h_height: f64,
) -> Option<(UtmPoint, UtmPoint, UtmPoint, UtmPoint)> {
    let c = UtmPoint::from_geo(&center).ok()?;
    let c = UtmPoint::new(
        c.descriptor,
        round(c.easting, sp, RoundMode::Nearest),
        round(c.northing, n_step, RoundMode::Nearest),
    );
    let tl = UtmPoint::new(c.descriptor, c.easting - h_width, c.northing + h_height);
    let tr = UtmPoint::new(c.descriptor, c.easting + h_width, c.northing + h_height);
    let br = UtmPoint::new(c.descriptor, c.easting + h_width, c.northing - h_height);
    let bl = UtmPoint::new(c.descriptor, c.easting - h_width, c.northing - h_height);
    Some((tl, tr, br, bl))
}

/// MultiGrid: walk corner to corner one cell at a time, re-snapping the
/// zone-local coordinate after every step. Slower than a single offset, but
/// each segment stays faithful to the true projection instead of
/// accumulating zone-extrapolation error.
fn place_multi_grid(
    center: GeoPoint,
    cols: u32,
    rows: u32,
    sp: f64,
    n_step: f64,
    h_width: f64,
    h_height: f64,
) -> Option<(UtmPoint, UtmPoint, UtmPoint, UtmPoint)> {
    let snap = |p: UtmPoint| {
        UtmPoint::new(
            p.descriptor,
            round(p.easting, sp, RoundMode::Nearest),
            round(p.northing, n_step, RoundMode::Nearest),
        )
    };
    let step = |from: &UtmPoint, bearing: f64| -> Option<UtmPoint> {
        let moved = point_at_distance(&from.to_geo(), bearing, sp);
        UtmPoint::from_geo(&moved).ok().map(&snap)
    };

    let left = point_at_distance(&center, 270.0, h_width);
    let tl = snap(UtmPoint::from_geo(&point_at_distance(&left, 0.0, h_height)).ok()?);

    let mut tr = tl;
    for _ in 0..cols {
        tr = step(&tr, 90.0)?;
    }
    let mut br = tr;
    for _ in 0..rows {
        br = step(&br, 180.0)?;
    }
    let mut bl = tl;
    for _ in 0..rows {
        bl = step(&bl, 180.0)?;
    }
    Some((tl, tr, br, bl))
}

/// World-wrap guard: reject an extent whose top edge spans more than 180° of
/// longitude while any corner has been extrapolated past ±180°. Longitudes
/// come from [`UtmPoint::to_geo`], which deliberately leaves extrapolated
/// values un-normalized. Grids on a continuously-scrolling surface skip this
/// check.
pub(crate) fn wraps_world(tl: &GeoPoint, tr: &GeoPoint, br: &GeoPoint, bl: &GeoPoint) -> bool {
    if (tl.longitude - tr.longitude).abs() <= 180.0 {
        return false;
    }
    let out = |p: &GeoPoint| p.longitude > 180.0 || p.longitude < -180.0;
    out(tl) || out(tr) || out(bl) || out(br)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::utm::ZoneDescriptor;
    use approx::assert_relative_eq;

    fn state_with_spacing(spacing: f64) -> GridState {
        GridState {
            spacing,
            ..GridState::default()
        }
    }

    fn utm(zone: u8, band: char, e: f64, n: f64) -> UtmPoint {
        UtmPoint::new(ZoneDescriptor::new(zone, band).unwrap(), e, n)
    }

    #[test]
    fn test_align_snaps_outward() {
        let mut s = state_with_spacing(1000.0);
        let tl_geo = utm(33, 'U', 497_123.0, 5_761_456.0).to_geo();
        let br_geo = utm(33, 'U', 499_789.0, 5_760_321.0).to_geo();
        assert!(align_corners(&mut s, Some(tl_geo), Some(br_geo)));

        let c = s.corners.unwrap();
        assert_relative_eq!(c.tl.easting, 497_000.0, epsilon = 1e-6);
        assert_relative_eq!(c.tl.northing, 5_762_000.0, epsilon = 1e-6);
        assert_relative_eq!(c.br.easting, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(c.br.northing, 5_760_000.0, epsilon = 1e-6);
        // Synthesized corners combine the snapped pair
        assert_relative_eq!(c.tr.easting, c.br.easting);
        assert_relative_eq!(c.tr.northing, c.tl.northing);
        assert_relative_eq!(c.bl.easting, c.tl.easting);
        assert_relative_eq!(c.bl.northing, c.br.northing);
    }

    #[test]
    fn test_align_degenerate_extent_forced_one_cell() {
        let mut s = state_with_spacing(1000.0);
        let p = utm(33, 'U', 497_400.0, 5_761_400.0).to_geo();
        // Identical corners snap to the same point; the grid must still be
        // one full cell.
        assert!(align_corners(&mut s, Some(p), Some(p)));
        let c = s.corners.unwrap();
        assert_relative_eq!(c.br.easting - c.tl.easting, 1000.0, epsilon = 1e-6);
        assert_relative_eq!(c.br.northing - c.tl.northing, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_align_clears_on_missing_corner() {
        let mut s = state_with_spacing(1000.0);
        let p = utm(33, 'U', 497_000.0, 5_761_000.0).to_geo();
        assert!(align_corners(&mut s, Some(p), Some(p)));
        assert!(s.is_valid());
        assert!(!align_corners(&mut s, Some(p), None));
        assert!(!s.is_valid());
    }

    #[test]
    fn test_align_clears_on_polar_corner() {
        let mut s = state_with_spacing(1000.0);
        assert!(!align_corners(
            &mut s,
            Some(GeoPoint::new(86.0, 10.0)),
            Some(GeoPoint::new(85.0, 11.0)),
        ));
        assert!(!s.is_valid());
    }

    #[test]
    fn test_align_cross_zone_uses_center_zone() {
        // Extent straddling the 18°E boundary between zones 33 and 34, with
        // the geographic center inside zone 34: the half-extent branch for
        // the bottom-right corner zone must be taken and all four corners
        // re-expressed in the center's zone.
        let mut s = state_with_spacing(1000.0);
        let c1 = GeoPoint::new(52.0, 17.5);
        let c2 = GeoPoint::new(51.0, 18.6);
        assert!(align_corners(&mut s, Some(c1), Some(c2)));

        let center = UtmPoint::from_geo(&GeoBounds::new(&c1, &c2).center()).unwrap();
        assert_eq!(center.descriptor.zone(), 34);
        let c = s.corners.unwrap();
        assert_eq!(c.tl.descriptor.zone(), 34);
        assert_eq!(c.br.descriptor.zone(), 34);

        // Expected half-width comes from the single-zone branch, not the
        // degenerate distance estimate.
        let se = UtmPoint::from_geo(&GeoPoint::new(51.0, 18.6)).unwrap();
        let half_width = se.easting - center.easting;
        let expected_tl_easting = round(center.easting - half_width, 1000.0, RoundMode::Floor);
        assert_relative_eq!(c.tl.easting, expected_tl_easting, epsilon = 1e-6);
    }

    #[test]
    fn test_place_extend_centers_grid() {
        let mut s = state_with_spacing(1000.0);
        let center = utm(33, 'U', 497_000.0, 5_761_000.0).to_geo();
        assert!(place(&mut s, center, 4, 2));
        let c = s.corners.unwrap();
        assert_relative_eq!(c.tr.easting - c.tl.easting, 4000.0, epsilon = 1e-6);
        assert_relative_eq!(c.tl.northing - c.bl.northing, 2000.0, epsilon = 1e-6);
        // All four corners share the reference zone under Extend
        assert!(c.tl.same_zone(&c.br));
    }

    #[test]
    fn test_place_multi_grid_single_zone_matches_extend() {
        let center = utm(33, 'U', 497_000.0, 5_761_000.0).to_geo();

        let mut ext = state_with_spacing(1000.0);
        assert!(place(&mut ext, center, 3, 3));

        let mut multi = state_with_spacing(1000.0);
        multi.strategy = JunctionStrategy::MultiGrid;
        assert!(place(&mut multi, center, 3, 3));

        let a = ext.corners.unwrap();
        let b = multi.corners.unwrap();
        // Well inside one zone the walked corners land on the same aligned
        // coordinates as the extrapolated ones.
        assert_relative_eq!(a.tl.easting, b.tl.easting, epsilon = 1e-6);
        assert_relative_eq!(a.br.easting, b.br.easting, epsilon = 1e-6);
        assert_relative_eq!(a.tl.northing, b.tl.northing, epsilon = 1e-6);
        assert_relative_eq!(a.br.northing, b.br.northing, epsilon = 1e-6);
    }

    #[test]
    fn test_place_failure_keeps_previous_corners() {
        let mut s = state_with_spacing(1000.0);
        let center = utm(33, 'U', 497_000.0, 5_761_000.0).to_geo();
        assert!(place(&mut s, center, 2, 2));
        let before = s.corners.unwrap().tl.easting;

        assert!(!place(&mut s, GeoPoint::new(87.0, 10.0), 2, 2));
        assert!(s.is_valid());
        assert_relative_eq!(s.corners.unwrap().tl.easting, before);
    }

    #[test]
    fn test_wraps_world_guard() {
        let p = GeoPoint::new;
        // Span over 180° with a corner pushed past +180°: reject.
        assert!(wraps_world(
            &p(50.0, 10.0),
            &p(50.0, 195.0),
            &p(49.0, 195.0),
            &p(49.0, 10.0),
        ));
        // Span over 180° but every corner inside ±180°: a legitimate
        // hemisphere-scale extent, keep it.
        assert!(!wraps_world(
            &p(50.0, -95.0),
            &p(50.0, 95.0),
            &p(49.0, 95.0),
            &p(49.0, -95.0),
        ));
        // Narrow span: pass regardless.
        assert!(!wraps_world(
            &p(50.0, 12.0),
            &p(50.0, 14.0),
            &p(49.0, 14.0),
            &p(49.0, 12.0),
        ));
    }

    #[test]
    fn test_place_records_cell_counts_even_on_failure() {
        let mut s = state_with_spacing(1000.0);
        assert!(!place(&mut s, GeoPoint::new(87.0, 10.0), 7, 5));
        assert_eq!(s.place_cols, 7);
        assert_eq!(s.place_rows, 5);
    }
}
