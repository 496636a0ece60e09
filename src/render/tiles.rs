use super::Viewport;
use super::cache::LruCache;
use super::canvas::Canvas;
use crate::geometry::{GridWindow, Region};
use crate::procgen::{TileDetail, compute_tile_detail};
use crate::world::{CellSource, TileKind};
use bevy::math::{IVec2, Vec2};

/// Identity of a generated decoration: same tile, kind and health give the
/// same shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetailKey {
    pub tile: IVec2,
    pub kind: TileKind,
    pub health: u32,
}

pub type DetailCache = LruCache<DetailKey, TileDetail>;

/// Paint `detail` with its tile's top-left corner at screen position `at`
pub fn draw_tile<C: Canvas + ?Sized>(canvas: &mut C, detail: &TileDetail, at: Vec2, clock_ms: f64) {
    let shapes = detail.shapes_at(clock_ms);
    if shapes.is_empty() {
        return;
    }
    canvas.save();
    canvas.translate(at);
    for shape in &shapes {
        canvas.draw_detail(shape);
    }
    canvas.restore();
}

/// Draw every on-screen cell of `region` with its procedural detail.
/// Returns the number of tiles drawn.
pub fn draw_region_tiles<C, S>(
    canvas: &mut C,
    source: &S,
    region: &Region,
    viewport: &Viewport,
    clock_ms: f64,
    details: &mut DetailCache,
) -> usize
where
    C: Canvas + ?Sized,
    S: CellSource + ?Sized,
{
    let window: GridWindow = viewport.grid_window();
    let mut drawn = 0;
    for &tile in region.cells.iter().filter(|c| window.contains(**c)) {
        let cell = source.cell(tile);
        let key = DetailKey {
            tile,
            kind: cell.kind,
            health: cell.health,
        };
        let detail = details.get_or_insert_with(key, || {
            compute_tile_detail(cell.kind, tile, cell.health, cell.kind.max_health(), viewport.tile_size)
        });
        if detail.visible_count() > 0 {
            draw_tile(canvas, detail, viewport.to_screen(tile.as_vec2()), clock_ms);
            drawn += 1;
        }
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::find_tile_regions;
    use crate::render::raster::PixelCanvas;
    use crate::world::{Cell, TileWorld};
    use bevy::color::Color;
    use bevy::math::UVec2;

    #[test]
    fn test_wall_tile_fills_its_square() {
        let world = TileWorld::from_ascii("walls", "..\n.#").unwrap();
        let viewport = Viewport::new(Vec2::ZERO, UVec2::splat(2), 32.0);
        let regions = find_tile_regions(&world, viewport.grid_window(), None);
        let mut canvas = PixelCanvas::new(64, 64);
        canvas.clear(Color::srgb_u8(0, 0, 0));
        let mut details = DetailCache::new(16);

        let drawn = draw_region_tiles(&mut canvas, &world, &regions[0], &viewport, 0.0, &mut details);
        assert_eq!(drawn, 1);
        assert_eq!(canvas.image().get_pixel(48, 48).0, [160, 82, 45, 255]);
        assert_eq!(canvas.image().get_pixel(16, 16).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_details_are_cached_per_health() {
        let mut world = TileWorld::from_ascii("rocks", "^^").unwrap();
        let viewport = Viewport::new(Vec2::ZERO, UVec2::new(2, 1), 32.0);
        let mut canvas = PixelCanvas::new(64, 32);
        let mut details = DetailCache::new(16);

        let regions = find_tile_regions(&world, viewport.grid_window(), None);
        draw_region_tiles(&mut canvas, &world, &regions[0], &viewport, 0.0, &mut details);
        assert_eq!(details.len(), 2);

        world.set_cell(IVec2::new(1, 0), Cell::new(TileKind::Rock).with_health(1));
        let regions = find_tile_regions(&world, viewport.grid_window(), None);
        draw_region_tiles(&mut canvas, &world, &regions[0], &viewport, 0.0, &mut details);
        assert_eq!(details.len(), 3);
    }

    #[test]
    fn test_offscreen_cells_are_skipped() {
        let world = TileWorld::from_ascii("row", "####").unwrap();
        let regions = find_tile_regions(&world, GridWindow::new(IVec2::ZERO, UVec2::new(4, 1)), None);
        let viewport = Viewport::new(Vec2::ZERO, UVec2::new(2, 1), 32.0);
        let mut canvas = PixelCanvas::new(64, 32);
        let mut details = DetailCache::new(16);
        assert_eq!(draw_region_tiles(&mut canvas, &world, &regions[0], &viewport, 0.0, &mut details), 2);
    }
}
