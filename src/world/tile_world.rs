use super::{Cell, CellSource, TileKind};
use crate::errors::{ShorelineError, ShorelineResult};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use validator::Validate;

/// ASCII glyph for a ground cell that carries the sanctuary flag
pub const SANCTUARY_GLYPH: char = '*';

/// Sparse, finite world store. Coordinates not present are void.
#[derive(Debug, Clone, Default, Resource)]
pub struct TileWorld {
    pub name: String,
    cells: HashMap<IVec2, Cell>,
}

/// On-disk representation of a `TileWorld`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct TileWorldFile {
    #[validate(length(min = 1, max = 128))]
    name: String,
    #[validate(length(max = 4_194_304))]
    cells: Vec<PlacedCell>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PlacedCell {
    x: i32,
    y: i32,
    cell: Cell,
}

impl TileWorld {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Parse an ASCII map. Row `y` is line `y`, column `x` is character `x`.
    pub fn from_ascii(name: impl Into<String>, text: &str) -> ShorelineResult<Self> {
        let mut world = Self::new(name);

        for (y, line) in text.lines().enumerate() {
            for (x, glyph) in line.trim_end_matches('\r').chars().enumerate() {
                let coord = IVec2::new(x as i32, y as i32);
                if glyph == SANCTUARY_GLYPH {
                    world.set_cell(coord, Cell::new(TileKind::Ground).in_sanctuary());
                    continue;
                }

                let kind = TileKind::from_glyph(glyph).ok_or_else(|| {
                    ShorelineError::InvalidWorldData {
                        reason: format!("Unknown glyph '{glyph}' at ({x}, {y})"),
                    }
                })?;
                if kind != TileKind::Void {
                    world.set_cell(coord, Cell::new(kind));
                }
            }
        }

        Ok(world)
    }

    pub fn set_cell(&mut self, coord: IVec2, cell: Cell) {
        if cell == Cell::default() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, cell);
        }
    }

    pub fn set_kind(&mut self, coord: IVec2, kind: TileKind) {
        let sanctuary = self.is_sanctuary(coord);
        let mut cell = Cell::new(kind);
        cell.sanctuary = sanctuary;
        self.set_cell(coord, cell);
    }

    pub fn set_health(&mut self, coord: IVec2, health: u32) {
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.health = health.min(cell.kind.max_health());
        }
    }

    pub fn set_sanctuary(&mut self, coord: IVec2, sanctuary: bool) {
        let mut cell = self.cell(coord);
        cell.sanctuary = sanctuary;
        self.set_cell(coord, cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Inclusive min and max corner of every stored cell
    pub fn extent(&self) -> Option<(IVec2, IVec2)> {
        let mut coords = self.cells.keys();
        let first = *coords.next()?;
        Some(coords.fold((first, first), |(min, max), &c| (min.min(c), max.max(c))))
    }

    /// Get the worlds directory path
    pub fn get_worlds_dir() -> ShorelineResult<PathBuf> {
        std::env::current_dir()
            .map_err(ShorelineError::ConfigDirCreationFailed)
            .map(|dir| dir.join("worlds"))
    }

    /// Load a world file written by `save_to_path`
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> ShorelineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ShorelineError::WorldFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path).map_err(ShorelineError::ConfigDirCreationFailed)?;

        let (file, _): (TileWorldFile, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                ShorelineError::CorruptedWorldFile {
                    reason: format!("Failed to deserialize world data: {e}"),
                }
            })?;

        file.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            ShorelineError::InvalidWorldData {
                reason: format!("World validation failed: {error_details}"),
            }
        })?;

        let mut world = Self::new(file.name);
        for placed in file.cells {
            world.set_cell(IVec2::new(placed.x, placed.y), placed.cell);
        }

        info!("Loaded world '{}' with {} cells", world.name, world.len());
        Ok(world)
    }

    /// Load a world from the worlds directory
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> ShorelineResult<Self> {
        Self::load_from_path(Self::get_worlds_dir()?.join(filename))
    }

    /// Write the world to `path`, creating parent directories as needed
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> ShorelineResult<()> {
        let path = path.as_ref();

        let mut cells: Vec<PlacedCell> = self
            .cells
            .iter()
            .map(|(coord, cell)| PlacedCell {
                x: coord.x,
                y: coord.y,
                cell: *cell,
            })
            .collect();
        cells.sort_by_key(|placed| (placed.y, placed.x));

        let file = TileWorldFile {
            name: self.name.clone(),
            cells,
        };

        file.validate().map_err(|_| ShorelineError::InvalidWorldData {
            reason: "World validation failed before save".to_string(),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ShorelineError::ConfigDirCreationFailed)?;
        }

        let data = bincode::serde::encode_to_vec(&file, bincode::config::standard()).map_err(|e| {
            ShorelineError::InvalidWorldData {
                reason: format!("Failed to serialize world: {e}"),
            }
        })?;

        std::fs::write(path, data).map_err(ShorelineError::ConfigDirCreationFailed)?;

        Ok(())
    }

    /// Save the world to the worlds directory
    pub fn save_to_file<P: AsRef<Path>>(&self, filename: P) -> ShorelineResult<()> {
        self.save_to_path(Self::get_worlds_dir()?.join(filename))
    }
}

impl CellSource for TileWorld {
    fn cell(&self, coord: IVec2) -> Cell {
        self.cells.get(&coord).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_layout() {
        let world = TileWorld::from_ascii("test", "..~\n^T*\n").unwrap();
        assert_eq!(world.cell(IVec2::new(0, 0)).kind, TileKind::Ground);
        assert_eq!(world.cell(IVec2::new(2, 0)).kind, TileKind::Water);
        assert_eq!(world.cell(IVec2::new(0, 1)).kind, TileKind::Rock);
        assert_eq!(world.cell(IVec2::new(1, 1)).kind, TileKind::Tree);
        assert_eq!(world.cell(IVec2::new(1, 1)).health, 2);

        let sanctuary = world.cell(IVec2::new(2, 1));
        assert_eq!(sanctuary.kind, TileKind::Ground);
        assert!(sanctuary.sanctuary);
        assert!(world.is_sanctuary(IVec2::new(2, 1)));
    }

    #[test]
    fn test_unknown_glyph_is_rejected() {
        let result = TileWorld::from_ascii("bad", "..x");
        assert!(matches!(result, Err(ShorelineError::InvalidWorldData { .. })));
    }

    #[test]
    fn test_missing_cells_are_void() {
        let world = TileWorld::from_ascii("test", "~").unwrap();
        assert_eq!(world.cell(IVec2::new(-50, 1000)), Cell::default());
        assert_eq!(world.cell(IVec2::new(1, 0)).kind, TileKind::Void);
    }

    #[test]
    fn test_set_health_is_capped() {
        let mut world = TileWorld::from_ascii("test", "^").unwrap();
        world.set_health(IVec2::ZERO, 99);
        assert_eq!(world.cell(IVec2::ZERO).health, 4);
        world.set_health(IVec2::ZERO, 1);
        assert_eq!(world.cell(IVec2::ZERO).health, 1);
    }

    #[test]
    fn test_set_kind_keeps_sanctuary_flag() {
        let mut world = TileWorld::from_ascii("test", "*").unwrap();
        world.set_kind(IVec2::ZERO, TileKind::SanctuaryStone);
        let cell = world.cell(IVec2::ZERO);
        assert_eq!(cell.kind, TileKind::SanctuaryStone);
        assert!(cell.sanctuary);
    }

    #[test]
    fn test_extent() {
        let world = TileWorld::from_ascii("test", "  ~\n\n~  ~").unwrap();
        assert_eq!(world.extent(), Some((IVec2::new(0, 0), IVec2::new(3, 2))));
        assert_eq!(TileWorld::new("empty").extent(), None);
    }

    #[test]
    fn test_save_and_load_world_file() {
        let world = TileWorld::from_ascii("round-trip", "~~.\n^*T\n").unwrap();
        let path = std::env::temp_dir()
            .join(format!("shoreline-test-{}", std::process::id()))
            .join("world.bin");

        world.save_to_path(&path).unwrap();
        let loaded = TileWorld::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.name, "round-trip");
        assert_eq!(loaded.len(), world.len());
        for y in 0..2 {
            for x in 0..3 {
                let coord = IVec2::new(x, y);
                assert_eq!(loaded.cell(coord), world.cell(coord));
            }
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = TileWorld::load_from_path("/definitely/not/here/world.bin");
        assert!(matches!(result, Err(ShorelineError::WorldFileNotFound { .. })));
    }
}
