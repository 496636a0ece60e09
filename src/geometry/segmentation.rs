use crate::world::{CellSource, TileKind};
use bevy::log::debug;
use bevy::math::{IVec2, UVec2};
use std::collections::{HashSet, VecDeque};

/// Neighbour offsets in expansion order: north, south, east, west
const NEIGHBOURS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::Y, IVec2::X, IVec2::NEG_X];

/// What a region was grouped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionTag {
    Tile(TileKind),
    Sanctuary,
}

/// Rectangular block of tiles, `origin` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWindow {
    pub origin: IVec2,
    pub size: UVec2,
}

impl GridWindow {
    pub fn new(origin: IVec2, size: UVec2) -> Self {
        Self { origin, size }
    }

    /// Exclusive far corner
    pub fn end(&self) -> IVec2 {
        self.origin + self.size.as_ivec2()
    }

    pub fn contains(&self, coord: IVec2) -> bool {
        self.contains_with_margin(coord, 0)
    }

    pub fn contains_with_margin(&self, coord: IVec2, margin: u32) -> bool {
        let m = margin as i32;
        let min = self.origin - IVec2::splat(m);
        let max = self.end() + IVec2::splat(m);
        coord.x >= min.x && coord.y >= min.y && coord.x < max.x && coord.y < max.y
    }

    /// Coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = IVec2> + '_ {
        let end = self.end();
        (self.origin.y..end.y).flat_map(move |y| (self.origin.x..end.x).map(move |x| IVec2::new(x, y)))
    }
}

/// Maximal 4-connected group of cells sharing a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub tag: RegionTag,
    /// Cells in discovery order
    pub cells: Vec<IVec2>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_set(&self) -> HashSet<IVec2> {
        self.cells.iter().copied().collect()
    }

    /// Inclusive min and max cell
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        let mut cells = self.cells.iter();
        let first = *cells.next()?;
        Some(cells.fold((first, first), |(min, max), &c| (min.min(c), max.max(c))))
    }

    /// Topmost, then leftmost cell. Stable across frames while the region
    /// keeps its shape, so it doubles as a cache key.
    pub fn anchor(&self) -> Option<IVec2> {
        self.cells.iter().copied().min_by_key(|c| (c.y, c.x))
    }
}

/// Group every non-background cell that touches `window` by tile kind.
///
/// Regions are grown past the window edges so that shapes are not cut
/// off at the screen border; `flood_margin` bounds how far (`None` for
/// unlimited, which only terminates on finite worlds).
pub fn find_tile_regions<S: CellSource + ?Sized>(
    source: &S,
    window: GridWindow,
    flood_margin: Option<u32>,
) -> Vec<Region> {
    segment_by(window, flood_margin, |coord| {
        let kind = source.cell(coord).kind;
        (!kind.is_background()).then_some(RegionTag::Tile(kind))
    })
}

/// Group cells carrying the sanctuary flag, whatever their terrain
pub fn find_sanctuary_regions<S: CellSource + ?Sized>(
    source: &S,
    window: GridWindow,
    flood_margin: Option<u32>,
) -> Vec<Region> {
    segment_by(window, flood_margin, |coord| {
        source.is_sanctuary(coord).then_some(RegionTag::Sanctuary)
    })
}

/// Breadth-first connected components over `window`.
///
/// `tag_of` returns `None` for cells that are never grouped. Seeds are
/// taken in row-major order, so the output is reproducible.
pub fn segment_by<F>(window: GridWindow, flood_margin: Option<u32>, tag_of: F) -> Vec<Region>
where
    F: Fn(IVec2) -> Option<RegionTag>,
{
    let mut regions = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    for seed in window.coords() {
        if !visited.insert(seed) {
            continue;
        }
        let Some(tag) = tag_of(seed) else {
            continue;
        };

        let mut cells = Vec::new();
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            cells.push(current);
            for offset in NEIGHBOURS {
                let next = current + offset;
                if let Some(margin) = flood_margin {
                    if !window.contains_with_margin(next, margin) {
                        continue;
                    }
                }
                if !visited.contains(&next) && tag_of(next) == Some(tag) {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        regions.push(Region { tag, cells });
    }

    debug!(
        "Segmented {} regions in {}x{} window at {}",
        regions.len(),
        window.size.x,
        window.size.y,
        window.origin
    );
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileWorld;

    fn full_window(world: &TileWorld) -> GridWindow {
        let (min, max) = world.extent().unwrap();
        GridWindow::new(min, (max - min + IVec2::ONE).as_uvec2())
    }

    #[test]
    fn test_square_is_one_region() {
        let world = TileWorld::from_ascii("square", "~~~.\n~~~.\n~~~.\n....").unwrap();
        let regions = find_tile_regions(&world, full_window(&world), None);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].tag, RegionTag::Tile(TileKind::Water));
        assert_eq!(regions[0].len(), 9);
        assert_eq!(regions[0].bounds(), Some((IVec2::ZERO, IVec2::new(2, 2))));
        assert_eq!(regions[0].anchor(), Some(IVec2::ZERO));
    }

    #[test]
    fn test_l_shape_connects_around_bend() {
        let world = TileWorld::from_ascii("l", "~..\n~..\n~~~").unwrap();
        let regions = find_tile_regions(&world, full_window(&world), None);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 5);
    }

    #[test]
    fn test_disjoint_blobs_stay_apart() {
        let world = TileWorld::from_ascii("two", "~~.~~\n~~.~~").unwrap();
        let regions = find_tile_regions(&world, full_window(&world), None);
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.len() == 4));
        let a = regions[0].cell_set();
        assert!(regions[1].cells.iter().all(|c| !a.contains(c)));
    }

    #[test]
    fn test_diagonal_cells_are_separate() {
        let world = TileWorld::from_ascii("diag", "~.\n.~").unwrap();
        let regions = find_tile_regions(&world, full_window(&world), None);
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_kinds_do_not_merge() {
        let world = TileWorld::from_ascii("mixed", "~~^^\n~~^^").unwrap();
        let regions = find_tile_regions(&world, full_window(&world), None);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].tag, RegionTag::Tile(TileKind::Water));
        assert_eq!(regions[1].tag, RegionTag::Tile(TileKind::Rock));
    }

    #[test]
    fn test_regions_cover_every_foreground_cell_once() {
        let maps = [
            "~~.^^\n~.T.^\n.TT~~\n^^.~i",
            "~~~~~\n~...~\n~.^.~\n~...~\n~~~~~",
            "T.T.T\n.T.T.\nT.T.T",
        ];
        for map in maps {
            let world = TileWorld::from_ascii("cover", map).unwrap();
            let window = full_window(&world);
            let regions = find_tile_regions(&world, window, None);

            let mut seen = HashSet::new();
            for region in &regions {
                let RegionTag::Tile(kind) = region.tag else {
                    panic!("unexpected tag");
                };
                for cell in &region.cells {
                    assert_eq!(world.cell(*cell).kind, kind);
                    assert!(seen.insert(*cell), "cell {cell} in two regions");
                }
            }

            let expected: HashSet<IVec2> = window
                .coords()
                .filter(|c| !world.cell(*c).kind.is_background())
                .collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_region_cells_are_connected() {
        let world = TileWorld::from_ascii("conn", "~~.~\n.~~~\n~..~").unwrap();
        for region in find_tile_regions(&world, full_window(&world), None) {
            let set = region.cell_set();
            // Every cell except the seed has a neighbour discovered before it.
            for (i, cell) in region.cells.iter().enumerate().skip(1) {
                let earlier: HashSet<IVec2> = region.cells[..i].iter().copied().collect();
                assert!(NEIGHBOURS.iter().any(|o| earlier.contains(&(*cell + *o))));
                assert!(set.contains(cell));
            }
        }
    }

    #[test]
    fn test_regions_extend_past_window() {
        let world = TileWorld::from_ascii("wide", "~~~~~~").unwrap();
        let window = GridWindow::new(IVec2::ZERO, UVec2::new(2, 1));

        let unbounded = find_tile_regions(&world, window, None);
        assert_eq!(unbounded[0].len(), 6);

        let bounded = find_tile_regions(&world, window, Some(1));
        assert_eq!(bounded[0].len(), 3);
    }

    #[test]
    fn test_sanctuary_regions_ignore_terrain() {
        let mut world = TileWorld::from_ascii("sanct", "**~\n*..\n..*").unwrap();
        world.set_sanctuary(IVec2::new(2, 0), true);
        let regions = find_sanctuary_regions(&world, full_window(&world), None);
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.tag == RegionTag::Sanctuary));
        assert_eq!(regions[0].len(), 4);
        assert_eq!(regions[1].cells, vec![IVec2::new(2, 2)]);
    }

    #[test]
    fn test_empty_window() {
        let world = TileWorld::from_ascii("empty", "").unwrap();
        let window = GridWindow::new(IVec2::new(-5, -5), UVec2::new(10, 10));
        assert!(find_tile_regions(&world, window, None).is_empty());
        assert!(find_sanctuary_regions(&world, window, None).is_empty());
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let world = TileWorld::from_ascii("det", "~^~^\n^~^~\n~~^^").unwrap();
        let window = full_window(&world);
        assert_eq!(
            find_tile_regions(&world, window, None),
            find_tile_regions(&world, window, None)
        );
    }
}
