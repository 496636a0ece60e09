pub mod noise_world;
pub mod tile_world;

pub use noise_world::{NoiseWorld, WorldPreset};
pub use tile_world::TileWorld;

use crate::errors::{ShorelineError, ShorelineResult};
use bevy::color::Color;
use bevy::math::IVec2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Terrain type of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileKind {
    #[default]
    Void,
    Ground,
    Water,
    Tree,
    Rock,
    IronRock,
    WoodenWall,
    Fire,
    SanctuaryStone,
}

impl TileKind {
    pub const ALL: [TileKind; 9] = [
        TileKind::Void,
        TileKind::Ground,
        TileKind::Water,
        TileKind::Tree,
        TileKind::Rock,
        TileKind::IronRock,
        TileKind::WoodenWall,
        TileKind::Fire,
        TileKind::SanctuaryStone,
    ];

    /// Health of an undamaged tile; zero for kinds that cannot be worn down
    pub fn max_health(self) -> u32 {
        match self {
            TileKind::Tree => 2,
            TileKind::Rock => 4,
            TileKind::IronRock => 8,
            TileKind::WoodenWall => 10,
            TileKind::Void
            | TileKind::Ground
            | TileKind::Water
            | TileKind::Fire
            | TileKind::SanctuaryStone => 0,
        }
    }

    /// Flat colour used when a kind has no richer drawing
    pub fn color(self) -> Color {
        match self {
            TileKind::Void => Color::srgb_u8(0, 0, 0),
            TileKind::Ground => Color::srgb_u8(107, 142, 35),
            TileKind::Water => Color::srgb_u8(70, 130, 180),
            TileKind::Tree => Color::srgb_u8(34, 139, 34),
            TileKind::Rock => Color::srgb_u8(169, 169, 169),
            TileKind::IronRock => Color::srgb_u8(112, 128, 144),
            TileKind::WoodenWall => Color::srgb_u8(160, 82, 45),
            TileKind::Fire => Color::srgb_u8(255, 69, 0),
            TileKind::SanctuaryStone => Color::srgb_u8(112, 128, 144),
        }
    }

    /// Kinds that are never grouped into regions
    pub fn is_background(self) -> bool {
        matches!(self, TileKind::Void | TileKind::Ground)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Void => "void",
            TileKind::Ground => "ground",
            TileKind::Water => "water",
            TileKind::Tree => "tree",
            TileKind::Rock => "rock",
            TileKind::IronRock => "iron_rock",
            TileKind::WoodenWall => "wooden_wall",
            TileKind::Fire => "fire",
            TileKind::SanctuaryStone => "sanctuary_stone",
        }
    }

    /// Glyph used by the ASCII world format
    pub fn glyph(self) -> char {
        match self {
            TileKind::Void => ' ',
            TileKind::Ground => '.',
            TileKind::Water => '~',
            TileKind::Tree => 'T',
            TileKind::Rock => '^',
            TileKind::IronRock => 'i',
            TileKind::WoodenWall => '#',
            TileKind::Fire => 'f',
            TileKind::SanctuaryStone => 'S',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.glyph() == glyph)
    }
}

impl FromStr for TileKind {
    type Err = ShorelineError;

    fn from_str(s: &str) -> ShorelineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ShorelineError::InvalidWorldData {
                reason: format!("Unknown tile kind '{s}'"),
            })
    }
}

/// One grid cell as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cell {
    pub kind: TileKind,
    pub health: u32,
    pub sanctuary: bool,
}

impl Cell {
    /// An undamaged cell of the given kind
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            health: kind.max_health(),
            sanctuary: false,
        }
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    pub fn in_sanctuary(mut self) -> Self {
        self.sanctuary = true;
        self
    }
}

/// Read access to world state.
///
/// Implementations must answer for every coordinate: cells that are not
/// stored resolve to `Cell::default()` (void).
pub trait CellSource {
    fn cell(&self, coord: IVec2) -> Cell;

    fn is_sanctuary(&self, coord: IVec2) -> bool {
        self.cell(coord).sanctuary
    }
}

impl<T: CellSource + ?Sized> CellSource for &T {
    fn cell(&self, coord: IVec2) -> Cell {
        (**self).cell(coord)
    }

    fn is_sanctuary(&self, coord: IVec2) -> bool {
        (**self).is_sanctuary(coord)
    }
}

impl<T: CellSource + ?Sized> CellSource for Box<T> {
    fn cell(&self, coord: IVec2) -> Cell {
        (**self).cell(coord)
    }

    fn is_sanctuary(&self, coord: IVec2) -> bool {
        (**self).is_sanctuary(coord)
    }
}
