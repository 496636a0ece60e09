use super::path::PathShape;
use bevy::math::Vec2;

/// Midpoint of every edge of a closed polygon, including the closing edge
pub fn midpoints(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    (0..n).map(|i| (points[i] + points[(i + 1) % n]) * 0.5).collect()
}

/// Closed Catmull-Rom spline through `points`, expressed as cubic Béziers.
///
/// Span `i` runs from `p[i]` to `p[i+1]` with control points
/// `p[i] + (p[i+1] - p[i-1]) / 6` and `p[i+1] - (p[i+2] - p[i]) / 6`,
/// indices wrapping. Fewer than three points give a closed polyline.
pub fn catmull_rom_closed(points: &[Vec2]) -> PathShape {
    let n = points.len();
    if n < 3 {
        return PathShape::polygon(points);
    }

    let at = |i: usize| points[i % n];
    let mut path = PathShape::new();
    path.move_to(points[0]);
    for i in 0..n {
        let p0 = at(i + n - 1);
        let p1 = at(i);
        let p2 = at(i + 1);
        let p3 = at(i + 2);
        path.cubic_to(p1 + (p2 - p0) / 6.0, p2 - (p3 - p1) / 6.0, p2);
    }
    path.close();
    path
}

/// Rounded outline for a simplified polygon: edge midpoints first, then a
/// closed spline through them
pub fn smooth_closed_path(points: &[Vec2]) -> PathShape {
    if points.len() < 3 {
        return PathShape::polygon(points);
    }
    catmull_rom_closed(&midpoints(points))
}
