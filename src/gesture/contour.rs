//! Contour extraction and convexity analysis
//!
//! Works on binary masks. Border following yields clockwise outer contours
//! (image coordinates, y down); hulls and convexity defects are computed on
//! the contour's point list, with defect depths in 8.8 fixed point to match
//! the threshold the classifier was tuned against.

use glam::IVec2;

use super::frame::Mask;

/// Clockwise Moore neighborhood, starting west
const CW: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

fn next_boundary(mask: &Mask, current: IVec2, entry_dir: usize) -> Option<(usize, IVec2)> {
    let scan_from = (entry_dir + 6) % 8;
    for step in 1..=8 {
        let idx = (scan_from + step) % 8;
        let (dx, dy) = CW[idx];
        let p = IVec2::new(current.x + dx, current.y + dy);
        if mask.get(p.x, p.y) != 0 {
            return Some((idx, p));
        }
    }
    None
}

fn trace_boundary(mask: &Mask, start: IVec2) -> Vec<IVec2> {
    let mut contour = vec![start];
    // The start pixel is the topmost-leftmost of its blob, so north and west
    // are background; pretend we entered heading north
    let mut entry_dir = 2;
    let mut current = start;
    let cap = (mask.width * mask.height * 4) as usize;

    while contour.len() < cap {
        let Some((idx, p)) = next_boundary(mask, current, entry_dir) else {
            break; // isolated pixel
        };
        if p == start && contour.len() > 1 {
            // Closed the loop once the walk would repeat its first move
            match next_boundary(mask, p, idx) {
                Some((_, after)) if after == contour[1] => break,
                None => break,
                _ => {}
            }
        }
        contour.push(p);
        current = p;
        entry_dir = idx;
    }
    contour
}

/// Outer contours of every blob in the mask, clockwise in image coordinates
pub fn find_contours(mask: &Mask) -> Vec<Vec<IVec2>> {
    let mut visited = vec![false; mask.data.len()];
    let mut contours = Vec::new();

    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            let i = (y as u32 * mask.width + x as u32) as usize;
            if mask.get(x, y) == 0 || visited[i] || mask.get(x - 1, y) != 0 {
                continue;
            }
            let contour = trace_boundary(mask, IVec2::new(x, y));
            for p in &contour {
                visited[(p.y as u32 * mask.width + p.x as u32) as usize] = true;
            }
            contours.push(contour);
        }
    }
    contours
}

/// Unsigned polygon area by the shoelace formula
pub fn contour_area(contour: &[IVec2]) -> f32 {
    if contour.len() < 3 {
        return 0.0;
    }
    let mut acc: i64 = 0;
    for (i, a) in contour.iter().enumerate() {
        let b = contour[(i + 1) % contour.len()];
        acc += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (acc.abs() as f32) / 2.0
}

/// Contour centroid from polygon moments; falls back to the vertex mean for
/// degenerate (zero-area) contours
pub fn centroid(contour: &[IVec2]) -> Option<IVec2> {
    if contour.is_empty() {
        return None;
    }
    let mut m00: i64 = 0;
    let mut mx: i64 = 0;
    let mut my: i64 = 0;
    for (i, a) in contour.iter().enumerate() {
        let b = contour[(i + 1) % contour.len()];
        let cross = a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        m00 += cross;
        mx += (a.x as i64 + b.x as i64) * cross;
        my += (a.y as i64 + b.y as i64) * cross;
    }
    if m00 == 0 {
        let n = contour.len() as i64;
        let sx: i64 = contour.iter().map(|p| p.x as i64).sum();
        let sy: i64 = contour.iter().map(|p| p.y as i64).sum();
        return Some(IVec2::new((sx / n) as i32, (sy / n) as i32));
    }
    Some(IVec2::new(
        (mx / (3 * m00)) as i32,
        (my / (3 * m00)) as i32,
    ))
}

#[inline]
fn cross(o: IVec2, a: IVec2, b: IVec2) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// Convex hull as indices into `points`, via the monotone chain
pub fn convex_hull(points: &[IVec2]) -> Vec<usize> {
    if points.len() < 3 {
        return (0..points.len()).collect();
    }
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by_key(|&i| (points[i].x, points[i].y));
    order.dedup_by_key(|&mut i| points[i]);

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() * 2);
    // Lower chain
    for &i in &order {
        while hull.len() >= 2
            && cross(
                points[hull[hull.len() - 2]],
                points[hull[hull.len() - 1]],
                points[i],
            ) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }
    // Upper chain; never pops into the lower one
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(
                points[hull[hull.len() - 2]],
                points[hull[hull.len() - 1]],
                points[i],
            ) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }
    hull.pop();
    hull
}

/// A concavity between two adjacent hull vertices
#[derive(Debug, Clone, Copy)]
pub struct Defect {
    /// Contour indices of the bounding hull points and the deepest point
    pub start: usize,
    pub end: usize,
    pub farthest: usize,
    /// Distance from the hull edge in 8.8 fixed-point pixels
    pub depth: u32,
}

fn point_line_distance(p: IVec2, a: IVec2, b: IVec2) -> f32 {
    let ab = (b - a).as_vec2();
    let ap = (p - a).as_vec2();
    let len = ab.length();
    if len == 0.0 {
        return ap.length();
    }
    (ab.x * ap.y - ab.y * ap.x).abs() / len
}

/// How close to the hull edge a contour point must be to count as lying on it
const HULL_TOUCH_EPS: f32 = 1.0;

/// Convexity defects walking the contour between consecutive hull vertices.
/// The minimal hull drops collinear vertices, so one hull edge can span
/// several recessions (level fingertips share an edge); the arc is split
/// wherever the contour touches the edge and each recession between touches
/// yields its own defect.
pub fn convexity_defects(contour: &[IVec2], hull: &[usize]) -> Vec<Defect> {
    if hull.len() < 3 {
        return Vec::new();
    }
    let mut hull_sorted: Vec<usize> = hull.to_vec();
    hull_sorted.sort_unstable();

    let mut defects = Vec::new();
    for (k, &edge_start) in hull_sorted.iter().enumerate() {
        let edge_end = hull_sorted[(k + 1) % hull_sorted.len()];
        let a = contour[edge_start];
        let b = contour[edge_end];

        let mut seg_start = edge_start;
        let mut best = 0.0f32;
        let mut farthest = None;
        let mut i = (edge_start + 1) % contour.len();
        loop {
            let at_end = i == edge_end;
            let d = if at_end {
                0.0
            } else {
                point_line_distance(contour[i], a, b)
            };
            if d <= HULL_TOUCH_EPS {
                if let Some(far) = farthest.take() {
                    defects.push(Defect {
                        start: seg_start,
                        end: i,
                        farthest: far,
                        depth: (best * 256.0) as u32,
                    });
                }
                best = 0.0;
                seg_start = i;
            } else if d > best {
                best = d;
                farthest = Some(i);
            }
            if at_end {
                break;
            }
            i = (i + 1) % contour.len();
        }
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Mask {
        let mut mask = Mask::new(w, h);
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.set(x, y, 255);
            }
        }
        mask
    }

    #[test]
    fn test_traced_square_has_expected_area_and_centroid() {
        let mask = filled_rect(40, 40, 10, 10, 29, 29);
        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];

        // Boundary polygon of a 20x20 blob is a 19x19 square
        let area = contour_area(contour);
        assert!((area - 361.0).abs() < 1.0, "area {area}");

        let c = centroid(contour).unwrap();
        assert!((c.x - 19).abs() <= 1 && (c.y - 19).abs() <= 1, "centroid {c}");
    }

    #[test]
    fn test_two_blobs_yield_two_contours() {
        let mut mask = filled_rect(60, 30, 2, 2, 12, 12);
        for y in 5..15 {
            for x in 30..45 {
                mask.set(x, y, 255);
            }
        }
        assert_eq!(find_contours(&mask).len(), 2);
    }

    #[test]
    fn test_single_pixel_contour() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, 255);
        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0], vec![IVec2::new(2, 2)]);
        assert_eq!(contour_area(&contours[0]), 0.0);
    }

    #[test]
    fn test_hull_of_square_is_its_corners() {
        let mask = filled_rect(30, 30, 5, 5, 24, 24);
        let contour = &find_contours(&mask)[0];
        let hull = convex_hull(contour);
        assert_eq!(hull.len(), 4);
        let mut corners: Vec<IVec2> = hull.iter().map(|&i| contour[i]).collect();
        corners.sort_by_key(|p| (p.x, p.y));
        assert_eq!(
            corners,
            vec![
                IVec2::new(5, 5),
                IVec2::new(5, 24),
                IVec2::new(24, 5),
                IVec2::new(24, 24),
            ]
        );
    }

    #[test]
    fn test_u_shape_has_one_deep_defect() {
        // Two 8-wide prongs joined at the bottom, with a 14-wide notch
        let mut mask = Mask::new(60, 60);
        for y in 5..50 {
            for x in 5..13 {
                mask.set(x, y, 255);
            }
            for x in 27..35 {
                mask.set(x, y, 255);
            }
        }
        for y in 40..50 {
            for x in 5..35 {
                mask.set(x, y, 255);
            }
        }
        let contour = &find_contours(&mask)[0];
        let hull = convex_hull(contour);
        let deep: Vec<Defect> = convexity_defects(contour, &hull)
            .into_iter()
            .filter(|d| d.depth > 5 * 256)
            .collect();
        assert_eq!(deep.len(), 1);
        // The notch floor sits between the prongs
        let far = contour[deep[0].farthest];
        assert!(far.x > 12 && far.x < 27, "farthest {far}");
        assert!(far.y >= 39, "farthest {far}");
    }

    #[test]
    fn test_level_tips_yield_one_defect_per_gap() {
        // Three teeth with level tops share one hull edge; each gap must
        // still produce its own defect rather than one merged recession
        let mut mask = Mask::new(80, 60);
        for y in 40..55 {
            for x in 8..56 {
                mask.set(x, y, 255);
            }
        }
        for i in 0..3 {
            let x0 = 8 + i * 20;
            for y in 10..45 {
                for x in x0..x0 + 8 {
                    mask.set(x, y, 255);
                }
            }
        }
        let contour = &find_contours(&mask)[0];
        let hull = convex_hull(contour);
        let deep: Vec<Defect> = convexity_defects(contour, &hull)
            .into_iter()
            .filter(|d| d.depth > 10 * 256)
            .collect();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_convex_blob_has_no_deep_defects() {
        let mask = filled_rect(40, 40, 8, 8, 31, 31);
        let contour = &find_contours(&mask)[0];
        let hull = convex_hull(contour);
        let deepest = convexity_defects(contour, &hull)
            .iter()
            .map(|d| d.depth)
            .max()
            .unwrap_or(0);
        assert!(deepest < 2 * 256, "deepest {deepest}");
    }
}
