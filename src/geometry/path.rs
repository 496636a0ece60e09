//! Backend-independent curve descriptions.
//!
//! Geometry code builds `PathShape` values; a `Canvas` consumes them.
//! Nothing in here draws.

use bevy::math::Vec2;

/// Control-point constant for approximating a quarter circle with one cubic
const KAPPA: f32 = 0.552_284_8;

/// Maximum distance between a flattened curve and the true curve, in pixels
pub const DEFAULT_FLATTEN_TOLERANCE: f32 = 0.25;

/// How overlapping subpaths decide what is inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

impl PathSegment {
    pub fn end(&self) -> Vec2 {
        match *self {
            PathSegment::LineTo(to) => to,
            PathSegment::QuadTo { to, .. } => to,
            PathSegment::CubicTo { to, .. } => to,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub start: Vec2,
    pub segments: Vec<PathSegment>,
    pub closed: bool,
}

/// A sequence of subpaths made of line and Bézier segments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathShape {
    pub subpaths: Vec<Subpath>,
}

impl PathShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Vec2) -> &mut Self {
        self.subpaths.push(Subpath {
            start: point,
            segments: Vec::new(),
            closed: false,
        });
        self
    }

    pub fn line_to(&mut self, point: Vec2) -> &mut Self {
        self.push_segment(PathSegment::LineTo(point))
    }

    pub fn quad_to(&mut self, ctrl: Vec2, to: Vec2) -> &mut Self {
        self.push_segment(PathSegment::QuadTo { ctrl, to })
    }

    pub fn cubic_to(&mut self, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) -> &mut Self {
        self.push_segment(PathSegment::CubicTo { ctrl1, ctrl2, to })
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.closed = true;
        }
        self
    }

    fn push_segment(&mut self, segment: PathSegment) -> &mut Self {
        if self.subpaths.is_empty() {
            self.move_to(Vec2::ZERO);
        }
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.segments.push(segment);
        }
        self
    }

    /// Append every subpath of `other`
    pub fn extend(&mut self, other: PathShape) {
        self.subpaths.extend(other.subpaths);
    }

    /// Closed polygon through `points`
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
            path.close();
        }
        path
    }

    /// Open polyline through `points`
    pub fn polyline(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
        }
        path
    }

    /// Circle built from four cubic arcs
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::ellipse(center, Vec2::splat(radius))
    }

    pub fn ellipse(center: Vec2, radii: Vec2) -> Self {
        let k = radii * KAPPA;
        let (rx, ry) = (radii.x, radii.y);
        let mut path = Self::new();
        path.move_to(center + Vec2::new(rx, 0.0))
            .cubic_to(
                center + Vec2::new(rx, k.y),
                center + Vec2::new(k.x, ry),
                center + Vec2::new(0.0, ry),
            )
            .cubic_to(
                center + Vec2::new(-k.x, ry),
                center + Vec2::new(-rx, k.y),
                center + Vec2::new(-rx, 0.0),
            )
            .cubic_to(
                center + Vec2::new(-rx, -k.y),
                center + Vec2::new(-k.x, -ry),
                center + Vec2::new(0.0, -ry),
            )
            .cubic_to(
                center + Vec2::new(k.x, -ry),
                center + Vec2::new(rx, -k.y),
                center + Vec2::new(rx, 0.0),
            )
            .close();
        path
    }

    pub fn rect(min: Vec2, size: Vec2) -> Self {
        Self::polygon(&[
            min,
            min + Vec2::new(size.x, 0.0),
            min + size,
            min + Vec2::new(0.0, size.y),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Copy of the path moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        let subpaths = self
            .subpaths
            .iter()
            .map(|subpath| Subpath {
                start: subpath.start + offset,
                segments: subpath
                    .segments
                    .iter()
                    .map(|segment| match *segment {
                        PathSegment::LineTo(to) => PathSegment::LineTo(to + offset),
                        PathSegment::QuadTo { ctrl, to } => PathSegment::QuadTo {
                            ctrl: ctrl + offset,
                            to: to + offset,
                        },
                        PathSegment::CubicTo { ctrl1, ctrl2, to } => PathSegment::CubicTo {
                            ctrl1: ctrl1 + offset,
                            ctrl2: ctrl2 + offset,
                            to: to + offset,
                        },
                    })
                    .collect(),
                closed: subpath.closed,
            })
            .collect();
        Self { subpaths }
    }

    /// Every point the path is defined by, control points included
    pub fn control_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.subpaths.iter().flat_map(|subpath| {
            std::iter::once(subpath.start).chain(subpath.segments.iter().flat_map(|segment| {
                match *segment {
                    PathSegment::LineTo(to) => vec![to],
                    PathSegment::QuadTo { ctrl, to } => vec![ctrl, to],
                    PathSegment::CubicTo { ctrl1, ctrl2, to } => vec![ctrl1, ctrl2, to],
                }
            }))
        })
    }

    /// Axis-aligned box containing the whole path (curves lie in the hull of
    /// their control points)
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut points = self.control_points();
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Approximate each subpath by straight segments within `tolerance` pixels
    pub fn flatten(&self, tolerance: f32) -> Vec<Polyline> {
        self.subpaths
            .iter()
            .map(|subpath| {
                let mut points = vec![subpath.start];
                let mut current = subpath.start;
                for segment in &subpath.segments {
                    match *segment {
                        PathSegment::LineTo(to) => points.push(to),
                        PathSegment::QuadTo { ctrl, to } => {
                            let steps = curve_steps(current.distance(ctrl) + ctrl.distance(to), tolerance);
                            for i in 1..=steps {
                                let t = i as f32 / steps as f32;
                                let mt = 1.0 - t;
                                points.push(current * mt * mt + ctrl * 2.0 * mt * t + to * t * t);
                            }
                        }
                        PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                            let hull = current.distance(ctrl1) + ctrl1.distance(ctrl2) + ctrl2.distance(to);
                            let steps = curve_steps(hull, tolerance);
                            for i in 1..=steps {
                                points.push(cubic_point(current, ctrl1, ctrl2, to, i as f32 / steps as f32));
                            }
                        }
                    }
                    current = segment.end();
                }
                Polyline {
                    points,
                    closed: subpath.closed,
                }
            })
            .collect()
    }
}

fn curve_steps(hull_length: f32, tolerance: f32) -> usize {
    let tolerance = tolerance.max(0.01);
    ((hull_length / (tolerance * 8.0)).sqrt().ceil() as usize).clamp(2, 64)
}

/// Point at parameter `t` on a cubic Bézier
pub fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

/// Straight-segment approximation of a subpath
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Polyline {
    /// Consecutive point pairs, including the closing edge when closed
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = if self.closed && self.points.len() > 1 {
            Some((self.points[self.points.len() - 1], self.points[0]))
        } else {
            None
        };
        self.points.windows(2).map(|w| (w[0], w[1])).chain(closing)
    }

    pub fn length(&self) -> f32 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// The stretch of the outline that starts `start` pixels along it and runs
    /// for `len` pixels, wrapping past the end of a closed polyline.
    pub fn slice(&self, start: f32, len: f32) -> Vec<Vec2> {
        let total = self.length();
        if total <= f32::EPSILON || len <= 0.0 {
            return Vec::new();
        }

        let edges: Vec<(Vec2, Vec2)> = self.edges().collect();
        let mut start = if self.closed { start.rem_euclid(total) } else { start.clamp(0.0, total) };
        let mut remaining = if self.closed { len.min(total) } else { len.min(total - start) };
        let mut out = Vec::new();

        // At most two passes over the edges: the slice may wrap once.
        for (a, b) in edges.iter().chain(edges.iter()) {
            if remaining <= 0.0 {
                break;
            }
            let edge_len = a.distance(*b);
            if edge_len <= f32::EPSILON {
                continue;
            }
            if start >= edge_len {
                start -= edge_len;
                continue;
            }

            let dir = (*b - *a) / edge_len;
            if out.is_empty() {
                out.push(*a + dir * start);
            }
            let take = (edge_len - start).min(remaining);
            out.push(*a + dir * (start + take));
            remaining -= take;
            start = 0.0;
        }

        out
    }
}
