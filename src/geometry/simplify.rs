use bevy::math::Vec2;

/// Ramer–Douglas–Peucker simplification of an open polyline.
///
/// Both endpoints are always kept. An interior point survives when it lies
/// strictly farther than `epsilon` from the chord of the span being
/// considered. Fewer than three points are returned unchanged.
pub fn simplify(points: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let start = points[0];
    let end = points[points.len() - 1];
    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, &point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(point, start, end);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        let mut left = simplify(&points[..=max_idx], epsilon);
        let right = simplify(&points[max_idx..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![start, end]
    }
}

/// Distance from `point` to the segment `start..end`, or to `start` when
/// the segment has no length.
pub fn perpendicular_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let len_sq = segment.length_squared();

    if len_sq < 1e-12 {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
