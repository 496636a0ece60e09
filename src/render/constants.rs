//! Render constants and fixed palette

use bevy::color::Color;

/// Default tile edge length in pixels
pub const TILE_SIZE: f32 = 32.0;

// Water
pub const WATER_BASE_RGB: [u8; 3] = [52, 152, 219];
pub const WATER_RIPPLE_BRIGHTNESS: f32 = 30.0;
pub const WATER_SHORE_GLOW: f32 = 20.0;
/// Simplification tolerance for shorelines, in tiles
pub const WATER_SIMPLIFY_TILES: f32 = 1.2;

// Sanctuary
pub const SANCTUARY_SIMPLIFY_TILES: f32 = 1.5;
/// Outline pixels per crack
pub const SANCTUARY_CRACK_SPACING: f32 = 70.0;
pub const SANCTUARY_CRACK_PERIOD_MS: f64 = 600.0;
pub const SANCTUARY_CRACK_STEPS: usize = 5;
pub const SANCTUARY_OUTLINE_GLOW: f32 = 8.0;

// Sanctuary dust
pub const DUST_MIN_PARTICLES: usize = 8;
pub const DUST_PULSE_PERIOD_MS: f64 = 2000.0;
pub const DUST_DRIFT_PERIOD_MS: f64 = 1500.0;
pub const DUST_RISE: f32 = 20.0;
pub const DUST_SWAY: f32 = 5.0;
pub const DUST_GLOW: f32 = 3.0;

pub fn water_shore() -> Color {
    Color::srgba_u8(88, 178, 233, 178)
}

pub fn sanctuary_gold(alpha: f32) -> Color {
    Color::srgba(1.0, 215.0 / 255.0, 0.0, alpha)
}

pub fn sanctuary_core(alpha: f32) -> Color {
    Color::srgba(1.0, 1.0, 224.0 / 255.0, alpha)
}
