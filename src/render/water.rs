use super::Viewport;
use super::cache::LruCache;
use super::canvas::Canvas;
use super::constants::water_shore;
use super::noise_texture::{NoiseTexture, Ripples};
use crate::geometry::{FillRule, Region, region_outline};
use crate::procgen::NoiseField;
use crate::resources::RenderSettings;
use bevy::color::Color;
use bevy::log::debug;
use bevy::math::{IVec2, UVec2};

/// Ripple textures keyed by pixel size
pub type TextureCache = LruCache<UVec2, NoiseTexture>;

#[derive(Debug, Clone, PartialEq)]
pub struct WaterStyle {
    pub base: Color,
    pub shore: Color,
    pub shore_glow: f32,
    pub brightness: f32,
    pub ripples: Ripples,
    /// Outline simplification tolerance in pixels
    pub epsilon: f32,
    pub carve_holes: bool,
}

impl WaterStyle {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            base: settings.water_base(),
            shore: water_shore(),
            shore_glow: settings.shore_glow.get(),
            brightness: settings.ripple_brightness,
            ripples: settings.ripples(),
            epsilon: settings.water_simplify_tiles.pixels(settings.tile_size),
            carve_holes: settings.carve_holes,
        }
    }

    pub fn fill_rule(&self) -> FillRule {
        if self.carve_holes {
            FillRule::EvenOdd
        } else {
            FillRule::NonZero
        }
    }
}

impl Default for WaterStyle {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}

/// Noise seed for the ripples of the region anchored at `anchor`
pub fn region_seed(anchor: IVec2) -> i64 {
    anchor.x as i64 + anchor.y as i64
}

/// Draw one water region: shore glow, base fill, then ripples clipped to
/// the smooth outline. Returns `false` when the region has no drawable
/// outline.
pub fn draw_water_region<C: Canvas + ?Sized>(
    canvas: &mut C,
    region: &Region,
    viewport: &Viewport,
    clock_ms: f64,
    style: &WaterStyle,
    textures: &mut TextureCache,
) -> bool {
    let (Some(anchor), Some((min, max))) = (region.anchor(), region.bounds()) else {
        return false;
    };
    let Some(outline) = region_outline(region, viewport.origin, viewport.tile_size, style.epsilon, style.carve_holes)
    else {
        debug!("Skipping water region at {anchor}: outline encloses no area");
        return false;
    };
    let rule = style.fill_rule();

    canvas.save();
    canvas.glow_path(&outline, style.shore_glow, style.shore);
    canvas.fill_path(&outline, rule, style.base);
    canvas.clip(&outline, rule);

    // Ripples only cover the on-screen part of the bounding box
    let window = viewport.grid_window();
    let lo = min.max(window.origin);
    let hi = max.min(window.end() - IVec2::ONE);
    if lo.cmple(hi).all() {
        let tiles = (hi - lo + IVec2::ONE).as_vec2();
        let size = (tiles * viewport.tile_size).ceil().as_uvec2();
        let world_px = (lo.as_vec2() * viewport.tile_size).round().as_ivec2();
        let field = NoiseField::new(region_seed(anchor));

        let texture = textures.get_or_insert_with(size, || NoiseTexture::new(size.x, size.y));
        let image = texture.update(&field, world_px, clock_ms, &style.ripples, style.base, style.brightness);
        canvas.draw_image(image, viewport.to_screen(lo.as_vec2()));
    }
    canvas.restore();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GridWindow, RegionTag, find_tile_regions};
    use crate::render::raster::PixelCanvas;
    use crate::world::{TileKind, TileWorld};
    use bevy::math::Vec2;

    const GROUND: [u8; 4] = [107, 142, 35, 255];

    fn render(map: &str, style: &WaterStyle, textures: &mut TextureCache) -> PixelCanvas {
        let world = TileWorld::from_ascii("water", map).unwrap();
        let (_, max) = world.extent().unwrap();
        let size = (max + IVec2::ONE).as_uvec2();
        let viewport = Viewport::new(Vec2::ZERO, size, 32.0);
        let mut canvas = PixelCanvas::new(size.x * 32, size.y * 32);
        canvas.clear(TileKind::Ground.color());

        let regions = find_tile_regions(&world, GridWindow::new(IVec2::ZERO, size), None);
        for region in regions.iter().filter(|r| r.tag == RegionTag::Tile(TileKind::Water)) {
            assert!(draw_water_region(&mut canvas, region, &viewport, 0.0, style, textures));
        }
        canvas
    }

    fn is_water(pixel: [u8; 4]) -> bool {
        pixel[2] > 150 && pixel[0] < 110
    }

    #[test]
    fn test_lake_interior_is_rippled_water() {
        let mut textures = TextureCache::new(4);
        let canvas = render("~~~~~..\n~~~~~..\n~~~~~..\n~~~~~..\n~~~~~..", &WaterStyle::default(), &mut textures);
        assert!(is_water(canvas.image().get_pixel(80, 80).0));
        assert_eq!(canvas.image().get_pixel(220, 80).0, GROUND);
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn test_holes_follow_carve_setting() {
        let map = "~~~~~\n~~~~~\n~~.~~\n~~~~~\n~~~~~";
        let carved = WaterStyle {
            epsilon: 0.0,
            shore_glow: 0.0,
            ..Default::default()
        };
        let filled = WaterStyle {
            carve_holes: false,
            ..carved.clone()
        };

        let mut textures = TextureCache::new(4);
        let canvas = render(map, &carved, &mut textures);
        assert_eq!(canvas.image().get_pixel(80, 80).0, GROUND);

        let canvas = render(map, &filled, &mut textures);
        assert!(is_water(canvas.image().get_pixel(80, 80).0));
    }

    #[test]
    fn test_oversimplified_pond_still_draws() {
        let world = TileWorld::from_ascii("pond", "...\n.~.\n...").unwrap();
        let regions = find_tile_regions(&world, GridWindow::new(IVec2::ZERO, UVec2::splat(3)), None);
        let viewport = Viewport::new(Vec2::ZERO, UVec2::splat(3), 32.0);
        let mut canvas = PixelCanvas::new(96, 96);
        let style = WaterStyle {
            epsilon: 64.0,
            ..Default::default()
        };
        let mut textures = TextureCache::new(4);
        let drawn = draw_water_region(&mut canvas, &regions[0], &viewport, 0.0, &style, &mut textures);
        assert!(drawn);
    }

    #[test]
    fn test_region_seed_uses_anchor() {
        assert_eq!(region_seed(IVec2::new(3, 4)), 7);
        assert_eq!(region_seed(IVec2::new(-3, 4)), 1);
    }
}
