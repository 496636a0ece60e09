//! Drawing regions and tiles onto a [`Canvas`](canvas::Canvas).

pub mod cache;
pub mod canvas;
pub mod constants;
pub mod layers;
pub mod noise_texture;
pub mod raster;
pub mod sanctuary;
pub mod tiles;
pub mod water;

pub use cache::LruCache;
pub use canvas::Canvas;
pub use layers::{FrameStats, LayerKind, RegionRenderer};
pub use raster::PixelCanvas;

use crate::geometry::GridWindow;
use bevy::math::{IVec2, UVec2, Vec2};

/// The part of the world being drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left corner in tiles, may be fractional
    pub origin: Vec2,
    /// Visible size in whole tiles
    pub size: UVec2,
    /// Pixels per tile edge
    pub tile_size: f32,
}

impl Viewport {
    pub fn new(origin: Vec2, size: UVec2, tile_size: f32) -> Self {
        Self {
            origin,
            size,
            tile_size,
        }
    }

    /// Viewport that covers a canvas of `pixels`
    pub fn covering(origin: Vec2, pixels: UVec2, tile_size: f32) -> Self {
        let size = (pixels.as_vec2() / tile_size).ceil().as_uvec2();
        Self::new(origin, size, tile_size)
    }

    /// Every tile at least partly on screen
    pub fn grid_window(&self) -> GridWindow {
        let start = self.origin.floor().as_ivec2();
        let end = (self.origin + self.size.as_vec2()).ceil().as_ivec2();
        GridWindow::new(start, (end - start).max(IVec2::ZERO).as_uvec2())
    }

    /// Screen pixel of a point given in tile units
    pub fn to_screen(&self, tiles: Vec2) -> Vec2 {
        (tiles - self.origin) * self.tile_size
    }

    pub fn pixel_size(&self) -> Vec2 {
        self.size.as_vec2() * self.tile_size
    }
}
