use crate::config::range_types::*;
use crate::errors::{ShorelineError, ShorelineResult};
use crate::render::constants::*;
use crate::render::layers::LayerKind;
use crate::render::noise_texture::{RippleOctave, Ripples};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Resource, Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(default)]
// NOTE: When adding new fields, keep `Default` and the validation ranges in sync
pub struct RenderSettings {
    // Geometry settings
    pub tile_size: TileSize,
    pub water_simplify_tiles: SimplifyTolerance,
    pub sanctuary_simplify_tiles: SimplifyTolerance,
    pub flood_margin: Option<u32>, // Tiles a region may grow past the window; unset = unbounded
    pub carve_holes: bool,

    // Water settings
    pub water_base_color: [u8; 3],
    pub shore_glow: GlowRadius,
    #[validate(range(min = 0.0, max = 128.0))]
    pub ripple_brightness: f32,
    #[validate(range(min = 1.0, max = 1000.0))]
    pub ripple_slow_scale: f64,
    #[validate(range(min = 0.0, max = 0.01))]
    pub ripple_slow_speed: f64,
    #[validate(range(min = 1.0, max = 1000.0))]
    pub ripple_fast_scale: f64,
    #[validate(range(min = 0.0, max = 0.01))]
    pub ripple_fast_speed: f64,

    // Cache settings
    pub texture_cache_capacity: CacheCapacity,
    pub decoration_cache_capacity: CacheCapacity,

    // Layer settings
    #[validate(length(max = 4))]
    pub layers: Vec<LayerKind>,

    // Viewer settings
    #[validate(range(min = 320.0, max = 7680.0))]
    pub window_width: f32,
    #[validate(range(min = 240.0, max = 4320.0))]
    pub window_height: f32,
    #[validate(length(min = 1, max = 32))]
    pub world_preset: String,
    pub world_seed: u32,
    pub drift_speed: DriftSpeed,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            // Geometry settings
            tile_size: TileSize::new(TILE_SIZE),
            water_simplify_tiles: SimplifyTolerance::new(WATER_SIMPLIFY_TILES),
            sanctuary_simplify_tiles: SimplifyTolerance::new(SANCTUARY_SIMPLIFY_TILES),
            flood_margin: Some(8),
            carve_holes: true,

            // Water settings
            water_base_color: WATER_BASE_RGB,
            shore_glow: GlowRadius::new(WATER_SHORE_GLOW),
            ripple_brightness: WATER_RIPPLE_BRIGHTNESS,
            ripple_slow_scale: 30.0,
            ripple_slow_speed: 0.00005,
            ripple_fast_scale: 15.0,
            ripple_fast_speed: 0.0001,

            // Cache settings
            texture_cache_capacity: CacheCapacity::new(64),
            decoration_cache_capacity: CacheCapacity::new(256),

            // Layer settings
            layers: LayerKind::ALL.to_vec(),

            // Viewer settings
            window_width: 1280.0,
            window_height: 720.0,
            world_preset: "sanctuary".to_string(),
            world_seed: 7,
            drift_speed: DriftSpeed::new(0.5),
        }
    }
}

impl RenderSettings {
    /// Check value ranges and re-clamp range types that bypassed their
    /// constructors during deserialisation
    pub fn validated(mut self) -> ShorelineResult<Self> {
        self.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            ShorelineError::InvalidRenderSettings {
                reason: format!("Settings validation failed: {error_details}"),
            }
        })?;

        self.tile_size = TileSize::new(self.tile_size.get());
        self.water_simplify_tiles = SimplifyTolerance::new(self.water_simplify_tiles.get());
        self.sanctuary_simplify_tiles = SimplifyTolerance::new(self.sanctuary_simplify_tiles.get());
        self.shore_glow = GlowRadius::new(self.shore_glow.get());
        self.texture_cache_capacity = CacheCapacity::new(self.texture_cache_capacity.get() as u32);
        self.decoration_cache_capacity = CacheCapacity::new(self.decoration_cache_capacity.get() as u32);
        self.drift_speed = DriftSpeed::new(self.drift_speed.get());
        Ok(self)
    }

    pub fn ripples(&self) -> Ripples {
        Ripples {
            slow: RippleOctave {
                scale: self.ripple_slow_scale,
                speed: self.ripple_slow_speed,
            },
            fast: RippleOctave {
                scale: self.ripple_fast_scale,
                speed: self.ripple_fast_speed,
            },
        }
    }

    pub fn water_base(&self) -> Color {
        let [r, g, b] = self.water_base_color;
        Color::srgb_u8(r, g, b)
    }

    pub fn layer_enabled(&self, layer: LayerKind) -> bool {
        self.layers.contains(&layer)
    }
}

/// Render clock in milliseconds, advanced by the viewer
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RenderClock {
    pub elapsed_ms: f64,
}

/// Top-left corner of the view, in tiles
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ViewOrigin(pub Vec2);
