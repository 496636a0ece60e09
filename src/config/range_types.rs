use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// A tile edge length in pixels constrained to [8.0, 128.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct TileSize(f32);

impl TileSize {
    const MIN: f32 = 8.0;
    const MAX: f32 = 128.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::new(32.0)
    }
}

/// An outline simplification tolerance in tiles constrained to [0.0, 8.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct SimplifyTolerance(f32);

impl SimplifyTolerance {
    const MIN: f32 = 0.0;
    const MAX: f32 = 8.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Tolerance in pixels for a given tile size
    pub fn pixels(self, tile_size: TileSize) -> f32 {
        self.0 * tile_size.get()
    }
}

impl Default for SimplifyTolerance {
    fn default() -> Self {
        Self::new(1.2)
    }
}

/// A glow radius in pixels constrained to [0.0, 64.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct GlowRadius(f32);

impl GlowRadius {
    const MIN: f32 = 0.0;
    const MAX: f32 = 64.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for GlowRadius {
    fn default() -> Self {
        Self::new(20.0)
    }
}

/// A cache entry count constrained to [1, 4096]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct CacheCapacity(u32);

impl CacheCapacity {
    const MIN: u32 = 1;
    const MAX: u32 = 4096;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for CacheCapacity {
    fn default() -> Self {
        Self::new(64)
    }
}

/// A camera drift speed in tiles per second constrained to [0.0, 20.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct DriftSpeed(f32);

impl DriftSpeed {
    const MIN: f32 = 0.0;
    const MAX: f32 = 20.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for DriftSpeed {
    fn default() -> Self {
        Self::new(0.5)
    }
}
