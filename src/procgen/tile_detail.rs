//! Deterministic per-tile decoration.
//!
//! Every random attribute of a tile's decoration is drawn up front from a
//! generator keyed on the tile coordinate, regardless of health. Health only
//! decides how many of those candidates end up in the returned shapes, so a
//! tile wearing down loses detail without the remaining pieces moving.

use crate::geometry::path::PathShape;
use crate::procgen::rng::TileRng;
use crate::world::TileKind;
use bevy::color::Color;
use bevy::math::{IVec2, Vec2};
use std::f32::consts::TAU;

/// How a detail shape is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, width: f32 },
    /// Stroke with a soft halo of `glow` pixels in the same colour
    GlowStroke { color: Color, width: f32, glow: f32 },
}

/// One drawable element in tile-local pixel coordinates (origin at the
/// tile's top-left corner)
#[derive(Debug, Clone, PartialEq)]
pub struct DetailShape {
    pub path: PathShape,
    pub paint: Paint,
}

impl DetailShape {
    fn fill(path: PathShape, color: Color) -> Self {
        Self {
            path,
            paint: Paint::Fill(color),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speckle {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Irregular polygon making up part of a rock pile
#[derive(Debug, Clone, PartialEq)]
pub struct RockFragment {
    pub outline: Vec<Vec2>,
    pub highlight: Vec<Vec2>,
    pub gray: i32,
    pub speckles: Vec<Speckle>,
    /// Vertex index pairs joined by a crack line, in reveal order
    pub cracks: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RockPile {
    pub fragments: Vec<RockFragment>,
    pub metallic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafPatch {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub center: Vec2,
    pub trunk_radius: f32,
    pub canopy_radius: f32,
    /// Per-vertex radial jitter in `[-0.5, 0.5)`
    pub canopy_jitter: Vec<f32>,
    pub canopy_color: Color,
    pub leaf_patches: Vec<LeafPatch>,
    pub fruit_roll: f32,
    pub fruit: Vec<LeafPatch>,
}

/// Floating sanctuary obelisk. Runes are stored at rest height and moved
/// with the body when animated.
#[derive(Debug, Clone, PartialEq)]
pub struct Obelisk {
    pub gray: i32,
    pub runes: Vec<PathShape>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailBody {
    Rocks(RockPile),
    Tree(Tree),
    Obelisk(Obelisk),
    /// Plain coloured square
    Flat(Color),
    /// Drawn by another layer or not at all
    Empty,
}

/// Decoration of one tile at one health level
#[derive(Debug, Clone, PartialEq)]
pub struct TileDetail {
    pub tile: IVec2,
    pub kind: TileKind,
    pub tile_size: f32,
    pub health_fraction: f32,
    pub body: DetailBody,
}

/// `health / max_health` clamped to `[0, 1]`; kinds without health count as intact
pub fn health_fraction(health: u32, max_health: u32) -> f32 {
    if max_health == 0 {
        1.0
    } else {
        (health as f32 / max_health as f32).clamp(0.0, 1.0)
    }
}

/// Build the decoration for `tile`. Pure: identical arguments always give an
/// identical result.
pub fn compute_tile_detail(
    kind: TileKind,
    tile: IVec2,
    health: u32,
    max_health: u32,
    tile_size: f32,
) -> TileDetail {
    let mut rng = TileRng::for_tile(tile);
    let body = match kind {
        TileKind::Rock => DetailBody::Rocks(generate_rocks(&mut rng, tile_size, false)),
        TileKind::IronRock => DetailBody::Rocks(generate_rocks(&mut rng, tile_size, true)),
        TileKind::Tree => DetailBody::Tree(generate_tree(&mut rng, tile_size)),
        TileKind::SanctuaryStone => DetailBody::Obelisk(generate_obelisk(&mut rng, tile_size)),
        TileKind::WoodenWall | TileKind::Fire => DetailBody::Flat(kind.color()),
        TileKind::Void | TileKind::Ground | TileKind::Water => DetailBody::Empty,
    };

    TileDetail {
        tile,
        kind,
        tile_size,
        health_fraction: health_fraction(health, max_health),
        body,
    }
}

impl TileDetail {
    /// Number of health-scaled candidates generated for this tile
    pub fn candidate_count(&self) -> usize {
        match &self.body {
            DetailBody::Rocks(pile) => pile.fragments.len(),
            DetailBody::Tree(tree) => tree.leaf_patches.len(),
            DetailBody::Obelisk(_) | DetailBody::Flat(_) => 1,
            DetailBody::Empty => 0,
        }
    }

    /// Number of those candidates drawn at the current health
    pub fn visible_count(&self) -> usize {
        let h = self.health_fraction;
        let n = self.candidate_count();
        match &self.body {
            DetailBody::Rocks(_) => ((n as f32 * h).ceil() as usize).min(n),
            DetailBody::Tree(_) => ((n as f32 * h).round() as usize).min(n),
            DetailBody::Obelisk(_) | DetailBody::Flat(_) | DetailBody::Empty => n,
        }
    }

    /// Shapes at rest, for callers without a clock
    pub fn shapes(&self) -> Vec<DetailShape> {
        self.shapes_at(0.0)
    }

    /// Shapes in draw order at render time `clock_ms`
    pub fn shapes_at(&self, clock_ms: f64) -> Vec<DetailShape> {
        match &self.body {
            DetailBody::Rocks(pile) => self.rock_shapes(pile),
            DetailBody::Tree(tree) => self.tree_shapes(tree),
            DetailBody::Obelisk(obelisk) => self.obelisk_shapes(obelisk, clock_ms),
            DetailBody::Flat(color) => vec![DetailShape::fill(
                PathShape::rect(Vec2::ZERO, Vec2::splat(self.tile_size)),
                *color,
            )],
            DetailBody::Empty => Vec::new(),
        }
    }

    fn rock_shapes(&self, pile: &RockPile) -> Vec<DetailShape> {
        let damage = 1.0 - self.health_fraction;
        let max_cracks = if pile.metallic { 8.0 } else { 4.0 };
        let crack_count = (max_cracks * damage).floor() as usize;
        let tint = if pile.metallic { (5, 15) } else { (0, 0) };

        let mut shapes = Vec::new();
        for fragment in pile.fragments.iter().take(self.visible_count()) {
            let shadow: Vec<Vec2> = fragment.outline.iter().map(|p| *p + Vec2::new(2.0, 2.0)).collect();
            shapes.push(DetailShape::fill(PathShape::polygon(&shadow), rgba(0, 0, 0, 0.3)));

            let g = fragment.gray;
            shapes.push(DetailShape::fill(
                PathShape::polygon(&fragment.outline),
                rgba(g, g + tint.0, g + tint.1, 1.0),
            ));

            let h = g + 40;
            shapes.push(DetailShape::fill(
                PathShape::polygon(&fragment.highlight),
                rgba(h, h + tint.0, h + tint.1, 0.7),
            ));

            for speckle in &fragment.speckles {
                shapes.push(DetailShape::fill(
                    PathShape::circle(speckle.center, speckle.radius),
                    rgba(220, 220, 235, speckle.alpha),
                ));
            }

            for &(start, end) in fragment.cracks.iter().take(crack_count) {
                shapes.push(DetailShape {
                    path: PathShape::polyline(&[fragment.outline[start], fragment.outline[end]]),
                    paint: Paint::Stroke {
                        color: rgba(0, 0, 0, 0.4),
                        width: 1.0,
                    },
                });
            }
        }
        shapes
    }

    fn tree_shapes(&self, tree: &Tree) -> Vec<DetailShape> {
        let h = self.health_fraction;
        let mut shapes = vec![DetailShape::fill(
            PathShape::circle(tree.center, tree.trunk_radius),
            rgba(80, 60, 40, 1.0),
        )];
        if h <= 0.0 {
            // Stump
            return shapes;
        }

        // Damaged canopies look more ragged
        let jaggedness = 1.0 + (1.0 - h) * 0.8;
        let count = tree.canopy_jitter.len();
        let canopy: Vec<Vec2> = tree
            .canopy_jitter
            .iter()
            .enumerate()
            .map(|(j, jitter)| {
                let angle = j as f32 / count as f32 * TAU;
                let radius = tree.canopy_radius * (1.0 + jitter * 0.3 * jaggedness);
                tree.center + Vec2::from_angle(angle) * radius
            })
            .collect();

        let shadow: Vec<Vec2> = canopy.iter().map(|p| *p + Vec2::new(2.0, 3.0)).collect();
        shapes.push(DetailShape::fill(PathShape::polygon(&shadow), rgba(0, 0, 0, 0.3)));
        shapes.push(DetailShape::fill(PathShape::polygon(&canopy), tree.canopy_color));

        for patch in tree.leaf_patches.iter().take(self.visible_count()) {
            shapes.push(DetailShape::fill(PathShape::circle(patch.center, patch.radius), patch.color));
        }

        if h > 0.6 && tree.fruit_roll > 0.7 {
            let shown = (tree.fruit.len() as f32 * h).round() as usize;
            for fruit in tree.fruit.iter().take(shown) {
                shapes.push(DetailShape::fill(PathShape::circle(fruit.center, fruit.radius), fruit.color));
            }
        }
        shapes
    }

    fn obelisk_shapes(&self, obelisk: &Obelisk, clock_ms: f64) -> Vec<DetailShape> {
        let ts = self.tile_size;
        let phase = (clock_ms + self.tile.x as f64 * 500.0) / 1000.0;
        let float = ((phase.sin() + 1.0) / 2.0) as f32;
        let lift = Vec2::new(0.0, -float * ts * 0.5);

        let frame = ObeliskFrame::new(ts);
        let center = Vec2::splat(ts / 2.0);
        let mut shapes = Vec::new();

        // Ground shadow shrinks and fades as the stone rises
        let shadow_radii = Vec2::new(frame.width * 0.6, frame.width * 0.2) * (1.0 + float * 0.5);
        shapes.push(DetailShape::fill(
            PathShape::ellipse(Vec2::new(center.x, center.y + frame.height / 2.0), shadow_radii),
            rgba(0, 0, 0, 0.2 - float * 0.15),
        ));

        let g = obelisk.gray;
        let body = rgba(g, g, g, 1.0);
        let side = rgba(g - 30, g - 30, g - 30, 1.0);
        let (left, top, right) = (frame.left, frame.top, frame.left + frame.width);
        let bottom = top + frame.body_height;
        let p = frame.perspective;
        let apex = Vec2::new(center.x, top - frame.pyramid_height);

        let faces = [
            (PathShape::rect(Vec2::new(left, top), Vec2::new(frame.width, frame.body_height)), body),
            (
                PathShape::polygon(&[
                    Vec2::new(right, top),
                    Vec2::new(right + p, top - p),
                    Vec2::new(right + p, bottom - p),
                    Vec2::new(right, bottom),
                ]),
                side,
            ),
            (PathShape::polygon(&[Vec2::new(left, top), Vec2::new(right, top), apex]), body),
            (PathShape::polygon(&[Vec2::new(right, top), Vec2::new(right + p, top - p), apex]), side),
            (
                PathShape::polygon(&[Vec2::new(left, top), apex, apex + Vec2::new(-p * 0.5, p)]),
                rgba(g + 40, g + 40, g + 40, 0.8),
            ),
        ];
        for (path, color) in faces {
            shapes.push(DetailShape::fill(path.translated(lift), color));
        }

        for rune in &obelisk.runes {
            shapes.push(DetailShape {
                path: rune.translated(lift),
                paint: Paint::GlowStroke {
                    color: rgba(0, 255, 255, 1.0),
                    width: 1.0,
                    glow: 4.0,
                },
            });
        }
        shapes
    }
}

/// Obelisk proportions at rest for a given tile size
struct ObeliskFrame {
    width: f32,
    height: f32,
    body_height: f32,
    pyramid_height: f32,
    perspective: f32,
    left: f32,
    top: f32,
}

impl ObeliskFrame {
    fn new(tile_size: f32) -> Self {
        let width = tile_size * 0.4;
        let height = tile_size * 0.8;
        Self {
            width,
            height,
            body_height: height * 0.7,
            pyramid_height: height * 0.3,
            perspective: width * 0.2,
            left: (tile_size - width) / 2.0,
            top: (tile_size - height) / 2.0,
        }
    }
}

fn generate_rocks(rng: &mut TileRng, tile_size: f32, metallic: bool) -> RockPile {
    let ts = tile_size.round().max(2.0) as i32;
    let count = rng.next_int(2, 5);

    let mut outlines = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let radius = rng.next_int(4, 10).min(ts / 2);
        let center = Vec2::new(
            rng.next_int(radius, ts - radius) as f32,
            rng.next_int(radius, ts - radius) as f32,
        );
        let vertices = rng.next_int(5, 9) as usize;
        let outline: Vec<Vec2> = (0..vertices)
            .map(|j| {
                let angle = j as f32 / vertices as f32 * TAU;
                let r = radius as f32 * (1.0 + rng.jitter() * 0.4);
                center + Vec2::from_angle(angle) * r
            })
            .collect();
        outlines.push(outline);
    }

    let (gray_min, gray_max, max_cracks) = if metallic { (70, 100, 8) } else { (80, 120, 4) };
    let fragments = outlines
        .into_iter()
        .map(|outline| {
            let last = outline.len() as i32 - 1;
            let gray = rng.next_int(gray_min, gray_max);
            let highlight = outline
                .iter()
                .map(|p| *p + Vec2::new(rng.jitter() - 1.0, rng.jitter() - 1.0))
                .collect();

            let speckles = if metallic {
                (0..rng.next_int(15, 25))
                    .map(|_| {
                        let size = rng.next() * 3.0 + 1.5;
                        let anchor = outline[rng.next_int(0, last) as usize];
                        let offset = Vec2::new(rng.jitter(), rng.jitter()) * 10.0;
                        Speckle {
                            center: anchor + offset,
                            radius: size / 2.0,
                            alpha: rng.next() * 0.5 + 0.5,
                        }
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let cracks = (0..max_cracks)
                .map(|_| {
                    let start = rng.next_int(0, last) as usize;
                    let end = (start + rng.next_int(1, 3) as usize) % outline.len();
                    (start, end)
                })
                .collect();

            RockFragment {
                outline,
                highlight,
                gray,
                speckles,
                cracks,
            }
        })
        .collect();

    RockPile { fragments, metallic }
}

fn generate_tree(rng: &mut TileRng, tile_size: f32) -> Tree {
    let center = Vec2::splat(tile_size / 2.0);
    let trunk_radius = rng.next_int(2, 4) as f32;
    let canopy_radius = tile_size * 0.4 + rng.next() * tile_size * 0.1;
    let canopy_jitter = (0..12 + rng.next_int(0, 8)).map(|_| rng.jitter()).collect();

    let base_green = 50 + rng.next_int(0, 25);
    let canopy_color = rgba(base_green - 20, 100 + rng.next_int(0, 50), base_green - 20, 1.0);

    let leaf_patches = (0..50 + rng.next_int(0, 30))
        .map(|_| {
            let radius = canopy_radius * (0.1 + rng.next() * 0.2);
            let angle = rng.next() * TAU;
            let dist = rng.next() * canopy_radius * 0.8;
            let variation = rng.next_int(-20, 20);
            let alpha = 0.2 + rng.next() * 0.3;
            LeafPatch {
                center: center + Vec2::from_angle(angle) * dist,
                radius,
                color: rgba(base_green + variation, 140 + variation, base_green + variation, alpha),
            }
        })
        .collect();

    let fruit_roll = rng.next();
    let fruit = (0..5 + rng.next_int(0, 10))
        .map(|_| {
            let angle = rng.next() * TAU;
            let dist = rng.next() * canopy_radius * 0.7;
            let r = 80 + rng.next_int(0, 20);
            let g = 70 + rng.next_int(0, 20);
            let b = 40 + rng.next_int(0, 10);
            LeafPatch {
                center: center + Vec2::from_angle(angle) * dist,
                radius: 1.5,
                color: rgba(r, g, b, 0.6 + rng.next() * 0.2),
            }
        })
        .collect();

    Tree {
        center,
        trunk_radius,
        canopy_radius,
        canopy_jitter,
        canopy_color,
        leaf_patches,
        fruit_roll,
        fruit,
    }
}

#[derive(Debug, Clone, Copy)]
enum RuneComponent {
    Spiral,
    HorizontalLines,
    VerticalLines,
}

/// Rectangle a rune component is fitted into
#[derive(Debug, Clone, Copy)]
struct RuneArea {
    min: Vec2,
    size: Vec2,
}

fn generate_obelisk(rng: &mut TileRng, tile_size: f32) -> Obelisk {
    let gray = 100 + rng.next_int(-10, 10);
    let frame = ObeliskFrame::new(tile_size);

    let mut components = [
        RuneComponent::Spiral,
        RuneComponent::HorizontalLines,
        RuneComponent::VerticalLines,
    ];
    for i in (1..components.len()).rev() {
        let j = rng.next_int(0, i as i32) as usize;
        components.swap(i, j);
    }

    let area = RuneArea {
        min: Vec2::new(frame.left, frame.top),
        size: Vec2::new(frame.width, frame.body_height),
    };

    let mut runes = Vec::new();
    if rng.next_int(1, 2) == 1 {
        runes.extend(build_rune(components[0], area, rng));
    } else {
        // Uneven split so one component dominates
        let split = 0.3 + rng.next() * 0.2;
        let (mut first, mut second) = (area.size.y * split, area.size.y * (1.0 - split));
        if rng.next() > 0.5 {
            std::mem::swap(&mut first, &mut second);
        }
        let top = RuneArea {
            min: area.min,
            size: Vec2::new(area.size.x, first),
        };
        let bottom = RuneArea {
            min: area.min + Vec2::new(0.0, first),
            size: Vec2::new(area.size.x, second),
        };
        runes.extend(build_rune(components[0], top, rng));
        runes.extend(build_rune(components[1], bottom, rng));
    }

    Obelisk { gray, runes }
}

fn build_rune(component: RuneComponent, area: RuneArea, rng: &mut TileRng) -> Vec<PathShape> {
    let RuneArea { min, size } = area;
    match component {
        RuneComponent::Spiral => {
            let center = min + size / 2.0;
            let max_radius = size.x.min(size.y) * (0.4 + rng.next() * 0.1);
            let turns = 1.5 + rng.next();
            let mut angle = rng.next() * TAU;
            let direction = if rng.next() > 0.5 { 1.0 } else { -1.0 };

            let steps = turns * 20.0;
            let mut spiral = vec![center + Vec2::from_angle(angle) * max_radius * 0.1];
            for i in 5..steps.ceil() as i32 {
                angle += direction * TAU / 20.0;
                spiral.push(center + Vec2::from_angle(angle) * (i as f32 / steps) * max_radius);
            }
            vec![PathShape::polyline(&spiral)]
        }
        RuneComponent::HorizontalLines => {
            let count = rng.next_int(1, 2);
            let wavy = rng.next() > 0.6;
            (0..count)
                .map(|i| {
                    let y = min.y + size.y * (0.25 + i as f32 / count as f32 * 0.5);
                    let start = Vec2::new(min.x + size.x * 0.1, y);
                    let end = Vec2::new(min.x + size.x * 0.9, y);
                    let mut path = PathShape::new();
                    path.move_to(start);
                    if wavy {
                        let ctrl = Vec2::new((start.x + end.x) / 2.0, y + rng.jitter() * size.y * 0.6);
                        path.quad_to(ctrl, end);
                    } else {
                        path.line_to(end);
                    }
                    path
                })
                .collect()
        }
        RuneComponent::VerticalLines => {
            let count = rng.next_int(1, 3);
            (0..count)
                .map(|i| {
                    let x = min.x + size.x * (0.2 + i as f32 / count as f32 * 0.6);
                    PathShape::polyline(&[
                        Vec2::new(x, min.y + size.y * 0.1),
                        Vec2::new(x, min.y + size.y * 0.9),
                    ])
                })
                .collect()
        }
    }
}

fn rgba(r: i32, g: i32, b: i32, alpha: f32) -> Color {
    let channel = |v: i32| v.clamp(0, 255) as f32 / 255.0;
    Color::srgba(channel(r), channel(g), channel(b), alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 32.0;

    #[test]
    fn test_detail_is_deterministic() {
        for kind in [TileKind::Rock, TileKind::IronRock, TileKind::Tree, TileKind::SanctuaryStone] {
            let max = kind.max_health();
            let a = compute_tile_detail(kind, IVec2::new(5, 7), max / 2, max, TILE);
            let b = compute_tile_detail(kind, IVec2::new(5, 7), max / 2, max, TILE);
            assert_eq!(a, b);
            assert_eq!(a.shapes_at(1234.0), b.shapes_at(1234.0));
        }
    }

    #[test]
    fn test_rock_visible_count_monotonic_in_health() {
        for tile in [IVec2::new(5, 7), IVec2::new(-3, 12), IVec2::new(40, 0)] {
            let mut previous = 0;
            for health in 0..=4 {
                let detail = compute_tile_detail(TileKind::Rock, tile, health, 4, TILE);
                let visible = detail.visible_count();
                assert!(visible >= previous, "tile {tile} health {health}");
                assert!(visible <= detail.candidate_count());
                previous = visible;
            }
            let full = compute_tile_detail(TileKind::Rock, tile, 4, 4, TILE);
            assert_eq!(full.visible_count(), full.candidate_count());
        }
    }

    #[test]
    fn test_candidates_independent_of_health() {
        for kind in [TileKind::Rock, TileKind::IronRock, TileKind::Tree] {
            let max = kind.max_health();
            let full = compute_tile_detail(kind, IVec2::new(5, 7), max, max, TILE);
            for health in 0..max {
                let worn = compute_tile_detail(kind, IVec2::new(5, 7), health, max, TILE);
                assert_eq!(worn.body, full.body, "{kind:?} at health {health}");
            }
        }
    }

    #[test]
    fn test_rock_candidate_ranges() {
        let detail = compute_tile_detail(TileKind::Rock, IVec2::new(2, 9), 4, 4, TILE);
        let DetailBody::Rocks(pile) = &detail.body else {
            panic!("expected rocks");
        };
        assert!((2..=5).contains(&pile.fragments.len()));
        for fragment in &pile.fragments {
            assert!((5..=9).contains(&fragment.outline.len()));
            assert!((80..=120).contains(&fragment.gray));
            assert_eq!(fragment.cracks.len(), 4);
            assert!(fragment.speckles.is_empty());
            for &(a, b) in &fragment.cracks {
                assert!(a < fragment.outline.len() && b < fragment.outline.len());
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_iron_rock_has_speckles() {
        let detail = compute_tile_detail(TileKind::IronRock, IVec2::new(1, 1), 8, 8, TILE);
        let DetailBody::Rocks(pile) = &detail.body else {
            panic!("expected rocks");
        };
        assert!(pile.metallic);
        for fragment in &pile.fragments {
            assert!((15..=25).contains(&fragment.speckles.len()));
            assert_eq!(fragment.cracks.len(), 8);
        }
    }

    #[test]
    fn test_cracks_appear_with_damage() {
        let count_strokes = |health| {
            compute_tile_detail(TileKind::Rock, IVec2::new(5, 7), health, 4, TILE)
                .shapes()
                .iter()
                .filter(|s| matches!(s.paint, Paint::Stroke { .. }))
                .count()
        };
        assert_eq!(count_strokes(4), 0);
        assert!(count_strokes(2) > 0);
    }

    #[test]
    fn test_felled_tree_is_a_stump() {
        let stump = compute_tile_detail(TileKind::Tree, IVec2::new(3, 3), 0, 2, TILE);
        assert_eq!(stump.shapes().len(), 1);
        assert_eq!(stump.visible_count(), 0);

        let healthy = compute_tile_detail(TileKind::Tree, IVec2::new(3, 3), 2, 2, TILE);
        assert!(healthy.shapes().len() > 50);
    }

    #[test]
    fn test_tree_leaves_monotonic() {
        let counts: Vec<usize> = (0..=2)
            .map(|h| compute_tile_detail(TileKind::Tree, IVec2::new(8, 1), h, 2, TILE).visible_count())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_rocks_fit_small_tiles() {
        let detail = compute_tile_detail(TileKind::Rock, IVec2::new(4, 4), 4, 4, 12.0);
        let DetailBody::Rocks(pile) = &detail.body else {
            panic!("expected rocks");
        };
        assert!(!pile.fragments.is_empty());
    }

    #[test]
    fn test_obelisk_floats_over_time() {
        let detail = compute_tile_detail(TileKind::SanctuaryStone, IVec2::ZERO, 0, 0, TILE);
        let DetailBody::Obelisk(obelisk) = &detail.body else {
            panic!("expected obelisk");
        };
        assert!(!obelisk.runes.is_empty());

        let body_top = |clock| {
            let shapes = detail.shapes_at(clock);
            shapes[1].path.bounds().map(|(min, _)| min.y)
        };
        // sin peaks at pi/2 (highest) and troughs at 3pi/2 (resting)
        let high = body_top(1000.0 * std::f64::consts::FRAC_PI_2).unwrap();
        let low = body_top(1000.0 * 3.0 * std::f64::consts::FRAC_PI_2).unwrap();
        assert!((low - high - TILE * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_flat_and_empty_kinds() {
        let wall = compute_tile_detail(TileKind::WoodenWall, IVec2::ZERO, 3, 10, TILE);
        assert_eq!(wall.shapes().len(), 1);
        let water = compute_tile_detail(TileKind::Water, IVec2::ZERO, 0, 0, TILE);
        assert!(water.shapes().is_empty());
    }

    #[test]
    fn test_health_fraction() {
        assert_eq!(health_fraction(0, 0), 1.0);
        assert_eq!(health_fraction(2, 4), 0.5);
        assert_eq!(health_fraction(9, 4), 1.0);
    }
}
