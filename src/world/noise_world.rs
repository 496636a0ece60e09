use super::{Cell, CellSource, TileKind};
use crate::errors::{ShorelineError, ShorelineResult};
use crate::procgen::noise_field::NoiseField;
use crate::procgen::rng::{TileRng, tile_seed};
use bevy::math::IVec2;
use std::str::FromStr;

/// Predefined procedural landscapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldPreset {
    /// Rolling ground with scattered lakes, groves and rock outcrops
    Lake,
    /// Mostly water with small islands
    Archipelago,
    /// Dense woodland with a few ponds
    Grove,
    /// Lake landscape with a sanctuary ring around the origin
    Sanctuary,
}

impl WorldPreset {
    pub const NAMES: [&'static str; 4] = ["lake", "archipelago", "grove", "sanctuary"];

    pub fn as_str(self) -> &'static str {
        match self {
            WorldPreset::Lake => "lake",
            WorldPreset::Archipelago => "archipelago",
            WorldPreset::Grove => "grove",
            WorldPreset::Sanctuary => "sanctuary",
        }
    }
}

impl FromStr for WorldPreset {
    type Err = ShorelineError;

    fn from_str(s: &str) -> ShorelineResult<Self> {
        match s {
            "lake" => Ok(WorldPreset::Lake),
            "archipelago" => Ok(WorldPreset::Archipelago),
            "grove" => Ok(WorldPreset::Grove),
            "sanctuary" => Ok(WorldPreset::Sanctuary),
            other => Err(ShorelineError::InvalidWorldData {
                reason: format!(
                    "Unknown world preset '{other}'. Expected one of: {}",
                    Self::NAMES.join(", ")
                ),
            }),
        }
    }
}

/// Thresholds on the elevation field, lowest first
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    water: f64,
    tree: f64,
    rock: f64,
    frequency: f64,
}

/// Unbounded world whose cells are derived from a seeded noise field.
///
/// Every coordinate answers deterministically, so the same seed and
/// preset always describe the same landscape.
#[derive(Debug, Clone)]
pub struct NoiseWorld {
    preset: WorldPreset,
    elevation: NoiseField,
    moisture: NoiseField,
    thresholds: Thresholds,
    sanctuary_radius: i32,
}

impl NoiseWorld {
    pub fn new(preset: WorldPreset, seed: u32) -> Self {
        let thresholds = match preset {
            WorldPreset::Lake | WorldPreset::Sanctuary => Thresholds {
                water: -0.18,
                tree: 0.22,
                rock: 0.42,
                frequency: 0.07,
            },
            WorldPreset::Archipelago => Thresholds {
                water: 0.12,
                tree: 0.35,
                rock: 0.5,
                frequency: 0.09,
            },
            WorldPreset::Grove => Thresholds {
                water: -0.35,
                tree: -0.05,
                rock: 0.55,
                frequency: 0.06,
            },
        };

        Self {
            preset,
            elevation: NoiseField::new(seed as i64),
            moisture: NoiseField::new(seed as i64 + 1),
            thresholds,
            sanctuary_radius: 6,
        }
    }

    pub fn preset(&self) -> WorldPreset {
        self.preset
    }

    fn kind_at(&self, coord: IVec2) -> TileKind {
        if self.preset == WorldPreset::Sanctuary && coord == IVec2::ZERO {
            return TileKind::SanctuaryStone;
        }
        if self.in_sanctuary_ring(coord) {
            return TileKind::Ground;
        }

        let t = self.thresholds;
        let x = coord.x as f64 * t.frequency + 0.5;
        let y = coord.y as f64 * t.frequency + 0.5;
        let height = self.elevation.fractal(x, y, 3);

        if height < t.water {
            TileKind::Water
        } else if height > t.rock {
            let ore = self.moisture.get(x * 3.0, y * 3.0);
            if ore > 0.35 { TileKind::IronRock } else { TileKind::Rock }
        } else if height > t.tree {
            let wet = self.moisture.get(x * 2.0, y * 2.0);
            if wet > -0.1 { TileKind::Tree } else { TileKind::Ground }
        } else {
            TileKind::Ground
        }
    }

    fn in_sanctuary_ring(&self, coord: IVec2) -> bool {
        self.preset == WorldPreset::Sanctuary
            && coord.length_squared() <= self.sanctuary_radius * self.sanctuary_radius
    }
}

impl CellSource for NoiseWorld {
    fn cell(&self, coord: IVec2) -> Cell {
        let kind = self.kind_at(coord);
        let max = kind.max_health();

        // Some resource tiles start worn down so health scaling is visible.
        let health = if max > 0 {
            let mut rng = TileRng::new(tile_seed(coord) ^ 0x9e37_79b9);
            if rng.next() < 0.3 { rng.next_int(0, max as i32) as u32 } else { max }
        } else {
            0
        };

        Cell {
            kind,
            health,
            sanctuary: self.in_sanctuary_ring(coord),
        }
    }
}
