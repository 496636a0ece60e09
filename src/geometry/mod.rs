//! Pure grid geometry: grouping cells, outlining groups and turning the
//! outlines into smooth curves. Nothing in here draws.

pub mod path;
pub mod perimeter;
pub mod segmentation;
pub mod simplify;
pub mod smooth;

pub use path::{FillRule, PathShape};
pub use perimeter::{Contour, trace_holes, trace_perimeter};
pub use segmentation::{GridWindow, Region, RegionTag, find_sanctuary_regions, find_tile_regions};
pub use simplify::simplify;
pub use smooth::{midpoints, smooth_closed_path};

use bevy::math::Vec2;

/// Smooth screen-space outline of one contour: project, simplify with
/// `epsilon` pixels, then round off. `None` when the contour cannot
/// enclose an area.
pub fn smooth_contour(contour: &Contour, origin: Vec2, tile_size: f32, epsilon: f32) -> Option<PathShape> {
    if !contour.is_drawable() {
        return None;
    }
    let screen = contour.to_screen(origin, tile_size);
    let simplified = simplify(&screen, epsilon);
    Some(smooth_closed_path(&simplified))
}

/// Smooth outline of a region, with one extra subpath per enclosed hole
/// when `with_holes` is set
pub fn region_outline(
    region: &Region,
    origin: Vec2,
    tile_size: f32,
    epsilon: f32,
    with_holes: bool,
) -> Option<PathShape> {
    let mut outline = smooth_contour(&trace_perimeter(region), origin, tile_size, epsilon)?;
    if with_holes {
        for hole in trace_holes(region) {
            if let Some(path) = smooth_contour(&hole, origin, tile_size, epsilon) {
                outline.extend(path);
            }
        }
    }
    Some(outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileWorld;
    use bevy::math::{IVec2, UVec2};

    #[test]
    fn test_square_pipeline() {
        let world = TileWorld::from_ascii("square", "~~~\n~~~\n~~~").unwrap();
        let regions = find_tile_regions(&world, GridWindow::new(IVec2::ZERO, UVec2::splat(3)), None);
        assert_eq!(regions.len(), 1);

        let outline = region_outline(&regions[0], Vec2::ZERO, 32.0, 0.0, true).unwrap();
        assert_eq!(outline.subpaths.len(), 1);
        let (min, max) = outline.bounds().unwrap();
        assert!(min.cmpge(Vec2::splat(-1e-3)).all());
        assert!(max.cmple(Vec2::splat(96.0 + 1e-3)).all());
    }

    #[test]
    fn test_donut_outline_has_hole_subpath() {
        let world = TileWorld::from_ascii("donut", "~~~~\n~..~\n~..~\n~~~~").unwrap();
        let regions = find_tile_regions(&world, GridWindow::new(IVec2::ZERO, UVec2::splat(4)), None);
        let region = &regions[0];

        let with = region_outline(region, Vec2::ZERO, 32.0, 1.0, true).unwrap();
        let without = region_outline(region, Vec2::ZERO, 32.0, 1.0, false).unwrap();
        assert_eq!(with.subpaths.len(), 2);
        assert_eq!(without.subpaths.len(), 1);
    }

    #[test]
    fn test_heavily_simplified_outline_still_closes() {
        let world = TileWorld::from_ascii("blob", "~~\n~~").unwrap();
        let regions = find_tile_regions(&world, GridWindow::new(IVec2::ZERO, UVec2::splat(2)), None);
        let outline = region_outline(&regions[0], Vec2::ZERO, 32.0, 500.0, false).unwrap();
        assert!(outline.subpaths[0].closed);
    }
}
