//! Subdivision primitives: recursive OBB bisection and frontage strip cutting.
//!
//! Both are built from complementary half-space clips, so the pieces of one
//! call partition the input area (slivers below `eps` are dropped). Clips of
//! concave input are split into simple connected pieces before they are
//! emitted or cut again.

use nalgebra::Vector2;

use super::rect::minimum_bounding_rect;
use super::types::{Hs2, Polygon};
use super::util::{clip_halfspace, left_normal, signed_area_open, simple_pieces, solid_rings};

/// Bisect `rounds` times through the OBB center, perpendicular to the OBB long side.
pub(crate) fn bisect_recursive(verts: &[Vector2<f64>], rounds: usize, eps: f64) -> Vec<Polygon> {
    let mut out = Vec::new();
    bisect_into(verts.to_vec(), rounds, eps, &mut out);
    out
}

fn bisect_into(verts: Vec<Vector2<f64>>, rounds: usize, eps: f64, out: &mut Vec<Polygon>) {
    if rounds == 0 {
        out.extend(solid_rings(&verts, eps));
        return;
    }
    match bisect_once(&verts, eps) {
        Some((a, b)) => {
            for piece in simple_pieces(&a, eps).into_iter().chain(simple_pieces(&b, eps)) {
                bisect_into(piece, rounds - 1, eps, out);
            }
        }
        None => out.extend(solid_rings(&verts, eps)),
    }
}

fn bisect_once(
    verts: &[Vector2<f64>],
    eps: f64,
) -> Option<(Vec<Vector2<f64>>, Vec<Vector2<f64>>)> {
    let obb = minimum_bounding_rect(verts, eps)?;
    let c = obb.vertices();
    let (e0, e1) = (c[1] - c[0], c[2] - c[1]);
    let axis = if e0.norm() >= e1.norm() { e0 } else { e1 };
    let axis = axis / axis.norm();
    let center = (c[0] + c[2]) * 0.5;
    let cut = Hs2::through(center, axis);
    let lhs = clip_halfspace(verts, &cut);
    let rhs = clip_halfspace(verts, &cut.flipped());
    if signed_area_open(&lhs).abs() <= eps || signed_area_open(&rhs).abs() <= eps {
        return None;
    }
    Some((lhs, rhs))
}

/// Cut a strip of `depth` along each edge `i → i+1` listed in `cut_indices`,
/// split each strip into cells of roughly `cell_width` along its edge, and
/// emit the remaining core last, split into its connected parts.
///
/// Strips are taken in list order from what the previous strips left over.
/// An empty index list yields no parcels.
pub(crate) fn strip_cut(
    verts: &[Vector2<f64>],
    cut_indices: &[usize],
    depth: f64,
    cell_width: f64,
    eps: f64,
) -> Vec<Polygon> {
    let n = verts.len();
    let orient = signed_area_open(verts).signum();
    if cut_indices.is_empty() || depth <= 0.0 || n < 3 || orient == 0.0 {
        return Vec::new();
    }
    let mut rest = verts.to_vec();
    let mut out = Vec::new();
    for &i in cut_indices {
        if i >= n || rest.len() < 3 {
            continue;
        }
        let (a, b) = (verts[i], verts[(i + 1) % n]);
        let len = (b - a).norm();
        if len <= eps {
            continue;
        }
        let dir = (b - a) / len;
        let inward = left_normal(dir) * orient;
        let band = Hs2::new(inward, inward.dot(&a) + depth);
        let strip = clip_halfspace(&rest, &band);
        rest = clip_halfspace(&rest, &band.flipped());

        let cells = if cell_width > 0.0 {
            ((len / cell_width).round() as usize).max(1)
        } else {
            1
        };
        let mut piece = strip;
        for k in 1..cells {
            let at = a + dir * (len * k as f64 / cells as f64);
            let cut = Hs2::through(at, dir);
            let head = clip_halfspace(&piece, &cut);
            piece = clip_halfspace(&piece, &cut.flipped());
            out.extend(solid_rings(&head, eps));
        }
        out.extend(solid_rings(&piece, eps));
    }
    out.extend(solid_rings(&rest, eps));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn rect(w: f64, h: f64) -> Vec<Vector2<f64>> {
        vec![
            vector![0.0, 0.0],
            vector![w, 0.0],
            vector![w, h],
            vector![0.0, h],
        ]
    }

    fn total_area(ps: &[Polygon]) -> f64 {
        ps.iter().map(|p| signed_area_open(p.vertices()).abs()).sum()
    }

    #[test]
    fn one_round_halves_long_side() {
        let parts = bisect_recursive(&rect(40.0, 20.0), 1, 1e-9);
        assert_eq!(parts.len(), 2);
        for p in &parts {
            assert!((signed_area_open(p.vertices()).abs() - 400.0).abs() < 1e-9);
        }
    }

    #[test]
    fn two_rounds_make_four_cells() {
        let parts = bisect_recursive(&rect(40.0, 20.0), 2, 1e-9);
        assert_eq!(parts.len(), 4);
        assert!((total_area(&parts) - 800.0).abs() < 1e-9);
    }

    #[test]
    fn strip_along_bottom_edge() {
        // 60 x 30 block, strip 12 deep along edge 0, cells of ~15.
        let parts = strip_cut(&rect(60.0, 30.0), &[0], 12.0, 15.0, 1e-9);
        assert_eq!(parts.len(), 5);
        for cell in &parts[..4] {
            assert!((signed_area_open(cell.vertices()) - 180.0).abs() < 1e-9);
        }
        assert!((signed_area_open(parts[4].vertices()) - 60.0 * 18.0).abs() < 1e-9);
    }

    #[test]
    fn strips_on_clockwise_ring_still_cut_inward() {
        let mut cw = rect(60.0, 30.0);
        cw.reverse();
        let parts = strip_cut(&cw, &[0], 12.0, 60.0, 1e-9);
        assert_eq!(parts.len(), 2);
        assert!((total_area(&parts) - 1800.0).abs() < 1e-9);
    }

    /// U-shaped ring: 60 x 50 with a 30 x 42 notch open at the top, area 1740.
    fn u_shape() -> Vec<Vector2<f64>> {
        vec![
            vector![0.0, 0.0],
            vector![60.0, 0.0],
            vector![60.0, 50.0],
            vector![45.0, 50.0],
            vector![45.0, 8.0],
            vector![15.0, 8.0],
            vector![15.0, 50.0],
            vector![0.0, 50.0],
        ]
    }

    fn assert_simple_rect(p: &Polygon) {
        let v = p.vertices();
        assert_eq!(v.len(), 4, "{v:?}");
        for i in 0..4 {
            for j in i + 1..4 {
                assert!((v[i] - v[j]).norm() > 1e-9, "repeated vertex in {v:?}");
            }
        }
    }

    #[test]
    fn strip_on_concave_ring_gives_simple_cells_and_split_core() {
        let parts = strip_cut(&u_shape(), &[0], 12.0, 15.0, 1e-9);
        // four cells along the bottom, then one core piece per arm
        assert_eq!(parts.len(), 6);
        for p in &parts {
            assert_simple_rect(p);
        }
        let areas: Vec<f64> = parts.iter().map(|p| signed_area_open(p.vertices())).collect();
        for (a, want) in areas.iter().zip([180.0, 120.0, 120.0, 180.0, 570.0, 570.0]) {
            assert!((a - want).abs() < 1e-9, "{areas:?}");
        }
        // the notch floor cell stays below the notch
        assert!(parts[1].vertices().iter().all(|p| p.y <= 8.0 + 1e-9));
        let arm_x: Vec<f64> = parts[4..]
            .iter()
            .map(|p| p.vertices().iter().map(|v| v.x).sum::<f64>() / 4.0)
            .collect();
        assert!(arm_x.iter().any(|&x| x < 15.0) && arm_x.iter().any(|&x| x > 45.0));
        assert!((total_area(&parts) - 1740.0).abs() < 1e-9);
    }

    #[test]
    fn bisecting_concave_ring_keeps_pieces_connected() {
        let parts = bisect_recursive(&u_shape(), 1, 1e-9);
        assert!((total_area(&parts) - 1740.0).abs() < 1e-9);
        for p in &parts {
            let v = p.vertices();
            for i in 0..v.len() {
                for j in i + 1..v.len() {
                    assert!((v[i] - v[j]).norm() > 1e-9, "repeated vertex in {v:?}");
                }
            }
        }
    }

    #[test]
    fn empty_cut_list_yields_nothing() {
        assert!(strip_cut(&rect(10.0, 10.0), &[], 3.0, 5.0, 1e-9).is_empty());
    }
}
