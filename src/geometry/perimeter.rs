use super::segmentation::Region;
use bevy::log::debug;
use bevy::math::{IVec2, Vec2};
use std::collections::{HashSet, VecDeque};

/// Unit step for each heading: north, east, south, west
const HEADINGS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::X, IVec2::Y, IVec2::NEG_X];

/// Closed outline in grid-corner space. Consecutive points (including last
/// to first) are one unit apart along one axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<IVec2>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three points cannot enclose anything
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 3
    }

    /// Only the points where the outline changes direction
    pub fn corners(&self) -> Vec<IVec2> {
        let n = self.points.len();
        if n < 3 {
            return self.points.clone();
        }
        (0..n)
            .filter(|&i| {
                let prev = self.points[(i + n - 1) % n];
                let here = self.points[i];
                let next = self.points[(i + 1) % n];
                (here - prev).perp_dot(next - here) != 0
            })
            .map(|i| self.points[i])
            .collect()
    }

    /// Project corner points to screen pixels for a camera at `origin` (in tiles)
    pub fn to_screen(&self, origin: Vec2, tile_size: f32) -> Vec<Vec2> {
        project(&self.points, origin, tile_size)
    }
}

/// Project grid-corner points to screen pixels
pub fn project(points: &[IVec2], origin: Vec2, tile_size: f32) -> Vec<Vec2> {
    points
        .iter()
        .map(|p| (p.as_vec2() - origin) * tile_size)
        .collect()
}

/// Outer boundary of `region`, walked clockwise from the north-west corner
/// of its topmost-then-leftmost cell.
///
/// Interior holes are not part of the result; see [`trace_holes`].
pub fn trace_perimeter(region: &Region) -> Contour {
    let Some(start) = region.anchor() else {
        return Contour::default();
    };
    let cells = region.cell_set();
    Contour {
        points: walk_boundary(&cells, start, false),
    }
}

/// Outlines of the holes enclosed by `region`.
///
/// A hole is a group of non-region cells, joined orthogonally or
/// diagonally, that cannot reach the outside of the region's bounding box.
/// Holes are returned in row-major order of their topmost-leftmost cell.
pub fn trace_holes(region: &Region) -> Vec<Contour> {
    let Some((min, max)) = region.bounds() else {
        return Vec::new();
    };
    let cells = region.cell_set();
    let min = min - IVec2::ONE;
    let max = max + IVec2::ONE;
    let inside = |c: IVec2| c.x >= min.x && c.y >= min.y && c.x <= max.x && c.y <= max.y;

    let mut visited: HashSet<IVec2> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut holes = Vec::new();

    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let seed = IVec2::new(x, y);
            if cells.contains(&seed) || !visited.insert(seed) {
                continue;
            }

            let mut component = HashSet::new();
            let mut touches_border = false;
            queue.push_back(seed);
            while let Some(current) = queue.pop_front() {
                component.insert(current);
                touches_border |= current.x == min.x || current.y == min.y || current.x == max.x || current.y == max.y;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let next = current + IVec2::new(dx, dy);
                        if inside(next) && !cells.contains(&next) && visited.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }

            if !touches_border {
                holes.push(Contour {
                    points: walk_boundary(&component, seed, true),
                });
            }
        }
    }

    holes
}

/// Corner emitted for a cell while heading `dir`
fn corner(cell: IVec2, dir: usize) -> IVec2 {
    match dir {
        0 => cell,
        1 => cell + IVec2::X,
        2 => cell + IVec2::ONE,
        _ => cell + IVec2::Y,
    }
}

/// Follow the boundary of `cells` keeping the set on the right.
///
/// At each corner prefer a left turn, then straight, then a right turn.
/// `diagonal` lets a left turn cross to a cell that only touches
/// diagonally, which traces 8-connected sets.
fn walk_boundary(cells: &HashSet<IVec2>, start: IVec2, diagonal: bool) -> Vec<IVec2> {
    // Every boundary edge is visited once per lap.
    let max_steps = cells.len() * 4 + 4;
    let mut points = Vec::new();
    let (mut cell, mut dir) = (start, 0usize);

    loop {
        points.push(corner(cell, dir));

        let left = (dir + 3) % 4;
        let ahead = cell + HEADINGS[dir];
        let ahead_left = ahead + HEADINGS[left];

        if cells.contains(&ahead_left) && (diagonal || cells.contains(&ahead)) {
            cell = ahead_left;
            dir = left;
        } else if cells.contains(&ahead) {
            cell = ahead;
        } else {
            dir = (dir + 1) % 4;
        }

        if cell == start && dir == 0 {
            break;
        }
        if points.len() > max_steps {
            debug!("Boundary walk from {start} did not close after {max_steps} steps");
            break;
        }
    }

    points
}
