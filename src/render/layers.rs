use super::Viewport;
use super::canvas::Canvas;
use super::sanctuary::{CrackCache, DustCache, draw_sanctuary_dust, draw_sanctuary_region};
use super::tiles::{DetailCache, draw_region_tiles};
use super::water::{TextureCache, WaterStyle, draw_water_region};
use crate::errors::{ShorelineError, ShorelineResult};
use crate::geometry::{RegionTag, find_sanctuary_regions, find_tile_regions};
use crate::resources::RenderSettings;
use crate::world::{CellSource, TileKind};
use bevy::log::debug;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Render passes, drawn in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Background,
    World,
    Sanctuary,
    SanctuaryDust,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Background,
        LayerKind::World,
        LayerKind::Sanctuary,
        LayerKind::SanctuaryDust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::World => "world",
            LayerKind::Sanctuary => "sanctuary",
            LayerKind::SanctuaryDust => "sanctuary_dust",
        }
    }
}

impl FromStr for LayerKind {
    type Err = ShorelineError;

    fn from_str(s: &str) -> ShorelineResult<Self> {
        LayerKind::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| ShorelineError::InvalidRenderSettings {
                reason: format!("Unknown layer '{s}'"),
            })
    }
}

/// What one call to [`RegionRenderer::render_regions`] drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub regions: usize,
    pub skipped: usize,
    pub tiles: usize,
}

/// Draws the visible part of a world, layer by layer, keeping the caches
/// that make consecutive frames cheap
pub struct RegionRenderer {
    settings: RenderSettings,
    water: WaterStyle,
    textures: TextureCache,
    details: DetailCache,
    cracks: CrackCache,
    dust: DustCache,
}

impl RegionRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        let textures = settings.texture_cache_capacity.get();
        let decorations = settings.decoration_cache_capacity.get();
        Self {
            water: WaterStyle::from_settings(&settings),
            textures: TextureCache::new(textures),
            details: DetailCache::new(decorations),
            cracks: CrackCache::new(decorations),
            dust: DustCache::new(decorations),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Swap in new settings, dropping cached shapes that depend on them
    pub fn set_settings(&mut self, settings: RenderSettings) {
        if settings.tile_size != self.settings.tile_size {
            self.details.clear();
        }
        if settings.sanctuary_simplify_tiles != self.settings.sanctuary_simplify_tiles
            || settings.tile_size != self.settings.tile_size
        {
            self.cracks.clear();
        }
        self.textures.set_capacity(settings.texture_cache_capacity.get());
        let decorations = settings.decoration_cache_capacity.get();
        self.details.set_capacity(decorations);
        self.cracks.set_capacity(decorations);
        self.dust.set_capacity(decorations);
        self.water = WaterStyle::from_settings(&settings);
        self.settings = settings;
    }

    /// Viewport for a canvas whose top-left corner shows tile `origin`
    pub fn viewport_for<C: Canvas + ?Sized>(&self, canvas: &C, origin: Vec2) -> Viewport {
        Viewport::covering(origin, canvas.size(), self.settings.tile_size.get())
    }

    /// Draw every enabled layer for `viewport` at render time `clock_ms`.
    /// Regions that cannot be outlined are skipped, never fatal.
    pub fn render_regions<C, S>(&mut self, canvas: &mut C, source: &S, viewport: &Viewport, clock_ms: f64) -> FrameStats
    where
        C: Canvas + ?Sized,
        S: CellSource + ?Sized,
    {
        let mut stats = FrameStats::default();
        for layer in LayerKind::ALL {
            if !self.settings.layer_enabled(layer) {
                continue;
            }
            match layer {
                LayerKind::Background => self.draw_background(canvas),
                LayerKind::World => self.draw_world(canvas, source, viewport, clock_ms, &mut stats),
                LayerKind::Sanctuary => self.draw_sanctuaries(canvas, source, viewport, clock_ms, &mut stats),
                LayerKind::SanctuaryDust => self.draw_dust(canvas, source, viewport, clock_ms),
            }
        }
        debug!(
            "Rendered {} regions ({} skipped, {} tiles) at {:?}",
            stats.regions, stats.skipped, stats.tiles, viewport.origin
        );
        stats
    }

    fn draw_background<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let size = canvas.size().as_vec2();
        canvas.fill_rect(Vec2::ZERO, size, TileKind::Ground.color());
    }

    fn draw_world<C, S>(&mut self, canvas: &mut C, source: &S, viewport: &Viewport, clock_ms: f64, stats: &mut FrameStats)
    where
        C: Canvas + ?Sized,
        S: CellSource + ?Sized,
    {
        let regions = find_tile_regions(source, viewport.grid_window(), self.settings.flood_margin);
        for region in &regions {
            let drawn = match region.tag {
                RegionTag::Tile(TileKind::Water) => {
                    draw_water_region(canvas, region, viewport, clock_ms, &self.water, &mut self.textures)
                }
                _ => {
                    stats.tiles += draw_region_tiles(canvas, source, region, viewport, clock_ms, &mut self.details);
                    true
                }
            };
            if drawn {
                stats.regions += 1;
            } else {
                stats.skipped += 1;
            }
        }
    }

    fn draw_sanctuaries<C, S>(
        &mut self,
        canvas: &mut C,
        source: &S,
        viewport: &Viewport,
        clock_ms: f64,
        stats: &mut FrameStats,
    ) where
        C: Canvas + ?Sized,
        S: CellSource + ?Sized,
    {
        let epsilon = self.settings.sanctuary_simplify_tiles.pixels(self.settings.tile_size);
        let regions = find_sanctuary_regions(source, viewport.grid_window(), self.settings.flood_margin);
        for region in &regions {
            if draw_sanctuary_region(canvas, region, viewport, clock_ms, epsilon, &mut self.cracks) {
                stats.regions += 1;
            } else {
                stats.skipped += 1;
            }
        }
    }

    fn draw_dust<C, S>(&mut self, canvas: &mut C, source: &S, viewport: &Viewport, clock_ms: f64)
    where
        C: Canvas + ?Sized,
        S: CellSource + ?Sized,
    {
        let regions = find_sanctuary_regions(source, viewport.grid_window(), self.settings.flood_margin);
        for region in &regions {
            draw_sanctuary_dust(canvas, region, viewport, clock_ms, &mut self.dust);
        }
    }
}

impl Default for RegionRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}
