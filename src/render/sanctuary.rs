use super::Viewport;
use super::cache::LruCache;
use super::canvas::Canvas;
use super::constants::*;
use crate::geometry::path::{DEFAULT_FLATTEN_TOLERANCE, Polyline};
use crate::geometry::{FillRule, PathShape, Region, region_outline};
use crate::procgen::{TileRng, tile_seed};
use bevy::log::debug;
use bevy::math::{IVec2, Vec2};

/// A glowing arc along a sanctuary outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crack {
    /// Where the crack starts, as a fraction of the outline length
    pub start: f32,
    /// Crack length as a fraction of the outline length
    pub len: f32,
    /// Pulse phase offset in milliseconds
    pub phase: f64,
}

impl Crack {
    /// Pulse in `[0, 1]` at `clock_ms`
    pub fn pulse(&self, clock_ms: f64) -> f32 {
        pulse(clock_ms + self.phase, SANCTUARY_CRACK_PERIOD_MS)
    }
}

/// A floating speck above a sanctuary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustMote {
    /// Resting position in tiles
    pub position: Vec2,
    pub phase: f64,
    pub radius: f32,
}

impl DustMote {
    /// Screen-space centre and radius at `clock_ms`
    pub fn placement(&self, viewport: &Viewport, clock_ms: f64) -> (Vec2, f32) {
        let pulse = pulse(clock_ms + self.phase, DUST_PULSE_PERIOD_MS);
        let sway = ((clock_ms + self.phase * 1.2) / DUST_DRIFT_PERIOD_MS).sin() as f32 * DUST_SWAY;
        let drift = Vec2::new(sway, -pulse * DUST_RISE);
        (viewport.to_screen(self.position) + drift, self.radius * pulse)
    }
}

pub type CrackCache = LruCache<IVec2, Vec<Crack>>;
pub type DustCache = LruCache<IVec2, Vec<DustMote>>;

fn pulse(t: f64, period: f64) -> f32 {
    (((t / period).sin() + 1.0) / 2.0) as f32
}

/// Cracks for the region anchored at `anchor` whose outline is
/// `outline_length` pixels long
pub fn generate_cracks(anchor: IVec2, outline_length: f32) -> Vec<Crack> {
    let mut rng = TileRng::new(tile_seed(anchor));
    let count = (outline_length / SANCTUARY_CRACK_SPACING).floor().max(0.0) as usize;
    (0..count)
        .map(|_| Crack {
            start: rng.next(),
            len: rng.next() * 0.04 + 0.02,
            phase: rng.next() as f64 * 1000.0,
        })
        .collect()
}

/// Dust motes scattered over the cells of `region`
pub fn generate_dust(region: &Region) -> Vec<DustMote> {
    let Some(anchor) = region.anchor() else {
        return Vec::new();
    };
    // Row-major order keeps the scatter independent of flood order
    let mut cells = region.cells.clone();
    cells.sort_by_key(|c| (c.y, c.x));

    let mut rng = TileRng::new(tile_seed(anchor));
    let count = DUST_MIN_PARTICLES.max(cells.len() / 4);
    (0..count)
        .map(|_| {
            let tile = cells[rng.next_int(0, cells.len() as i32 - 1) as usize];
            DustMote {
                position: tile.as_vec2() + Vec2::new(rng.next(), rng.next()),
                phase: rng.next() as f64 * 5000.0,
                radius: rng.next() * 1.2 + 0.5,
            }
        })
        .collect()
}

/// Draw the golden aura and pulsing cracks of one sanctuary region.
/// Returns `false` when the region has no drawable outline.
pub fn draw_sanctuary_region<C: Canvas + ?Sized>(
    canvas: &mut C,
    region: &Region,
    viewport: &Viewport,
    clock_ms: f64,
    epsilon: f32,
    cracks: &mut CrackCache,
) -> bool {
    let Some(anchor) = region.anchor() else {
        return false;
    };
    let Some(outline) = region_outline(region, viewport.origin, viewport.tile_size, epsilon, true) else {
        debug!("Skipping sanctuary region at {anchor}: outline encloses no area");
        return false;
    };
    let Some(rim) = outline.flatten(DEFAULT_FLATTEN_TOLERANCE).into_iter().next() else {
        return false;
    };
    let total = rim.length();

    canvas.fill_path(&outline, FillRule::EvenOdd, sanctuary_gold(0.1));
    canvas.glow_path(&outline, SANCTUARY_OUTLINE_GLOW, sanctuary_gold(0.1));
    canvas.stroke_path(&outline, 1.0, sanctuary_gold(0.2));

    let cracks = cracks.get_or_insert_with(anchor, || generate_cracks(anchor, total));
    for crack in cracks.iter() {
        draw_crack(canvas, &rim, total, crack, clock_ms);
    }
    true
}

fn draw_crack<C: Canvas + ?Sized>(canvas: &mut C, rim: &Polyline, total: f32, crack: &Crack, clock_ms: f64) {
    let pulse = crack.pulse(clock_ms);
    if pulse <= 0.1 {
        return;
    }
    let crack_len = total * crack.len;
    let start = total * crack.start;
    let intensity = (pulse - 0.1) / 0.9;

    // Nested strokes, each shorter and brighter than the last
    let last = (SANCTUARY_CRACK_STEPS - 1) as f32;
    for step in 0..SANCTUARY_CRACK_STEPS {
        let progress = step as f32 / last;
        let segment_len = crack_len * (1.0 - progress * 0.7);
        let segment_start = start + (crack_len - segment_len) / 2.0;
        let strength = intensity * (0.4 + progress * 0.6);

        let points = rim.slice(segment_start, segment_len);
        if points.len() < 2 {
            continue;
        }
        let arc = PathShape::polyline(&points);

        canvas.glow_path(&arc, 5.0 + strength * 12.0, sanctuary_gold(strength * 0.3));
        canvas.stroke_path(&arc, 3.5, sanctuary_gold(strength * 0.3));
        canvas.glow_path(&arc, 3.0 + strength * 6.0, sanctuary_core(strength * 0.8));
        canvas.stroke_path(&arc, 1.5, sanctuary_core(strength * 0.8));
    }
}

/// Draw the floating dust of one sanctuary region
pub fn draw_sanctuary_dust<C: Canvas + ?Sized>(
    canvas: &mut C,
    region: &Region,
    viewport: &Viewport,
    clock_ms: f64,
    dust: &mut DustCache,
) -> bool {
    let Some(anchor) = region.anchor() else {
        return false;
    };
    let motes = dust.get_or_insert_with(anchor, || generate_dust(region));
    for mote in motes.iter() {
        let (center, radius) = mote.placement(viewport, clock_ms);
        if radius <= 0.0 {
            continue;
        }
        let alpha = radius / mote.radius * 0.5;
        let speck = PathShape::circle(center, radius);
        canvas.glow_path(&speck, DUST_GLOW + radius, sanctuary_gold(0.8 * alpha));
        canvas.fill_path(&speck, FillRule::NonZero, sanctuary_gold(alpha));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GridWindow, RegionTag, find_sanctuary_regions};
    use crate::render::raster::PixelCanvas;
    use crate::world::TileWorld;
    use bevy::math::UVec2;

    fn sanctuary_region(map: &str) -> (Region, Viewport) {
        let world = TileWorld::from_ascii("sanctuary", map).unwrap();
        let (_, max) = world.extent().unwrap();
        let size = (max + IVec2::ONE).as_uvec2();
        let mut regions = find_sanctuary_regions(&world, GridWindow::new(IVec2::ZERO, size), None);
        assert_eq!(regions.len(), 1);
        (regions.remove(0), Viewport::new(Vec2::ZERO, size, 32.0))
    }

    #[test]
    fn test_cracks_are_deterministic_and_bounded() {
        let a = generate_cracks(IVec2::new(4, 9), 700.0);
        let b = generate_cracks(IVec2::new(4, 9), 700.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        for crack in &a {
            assert!((0.0..1.0).contains(&crack.start));
            assert!((0.02..=0.06).contains(&crack.len));
            assert!((0.0..1000.0).contains(&crack.phase));
        }
        assert!(generate_cracks(IVec2::new(4, 9), 69.0).is_empty());
    }

    #[test]
    fn test_crack_pulse_range() {
        let crack = Crack {
            start: 0.0,
            len: 0.05,
            phase: 0.0,
        };
        assert!((crack.pulse(0.0) - 0.5).abs() < 1e-6);
        let peak = SANCTUARY_CRACK_PERIOD_MS * std::f64::consts::FRAC_PI_2;
        assert!((crack.pulse(peak) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dust_count_and_placement() {
        let small = Region {
            tag: RegionTag::Sanctuary,
            cells: vec![IVec2::new(2, 3), IVec2::new(3, 3)],
        };
        let motes = generate_dust(&small);
        assert_eq!(motes.len(), 8);
        for mote in &motes {
            assert!(mote.position.x >= 2.0 && mote.position.x < 4.0);
            assert!(mote.position.y >= 3.0 && mote.position.y < 4.0);
            assert!(mote.radius >= 0.5 && mote.radius < 1.7);
        }

        let large = Region {
            tag: RegionTag::Sanctuary,
            cells: (0..10).flat_map(|y| (0..10).map(move |x| IVec2::new(x, y))).collect(),
        };
        assert_eq!(generate_dust(&large).len(), 25);
    }

    #[test]
    fn test_dust_ignores_cell_order() {
        let forward = Region {
            tag: RegionTag::Sanctuary,
            cells: vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(0, 1)],
        };
        let mut reversed = forward.clone();
        reversed.cells.reverse();
        assert_eq!(generate_dust(&forward), generate_dust(&reversed));
    }

    #[test]
    fn test_dust_rises_with_pulse() {
        let mote = DustMote {
            position: Vec2::new(1.0, 1.0),
            phase: 0.0,
            radius: 1.0,
        };
        let viewport = Viewport::new(Vec2::ZERO, UVec2::splat(4), 32.0);
        let peak = DUST_PULSE_PERIOD_MS * std::f64::consts::FRAC_PI_2;
        let (center, radius) = mote.placement(&viewport, peak);
        assert!((radius - 1.0).abs() < 1e-5);
        assert!((center.y - (32.0 - DUST_RISE)).abs() < 1e-3);
    }

    #[test]
    fn test_sanctuary_region_is_tinted_gold() {
        let (region, viewport) = sanctuary_region("******\n******\n******\n******\n******\n******");
        let mut canvas = PixelCanvas::new(192, 192);
        canvas.clear(bevy::color::Color::srgb_u8(0, 0, 0));
        let mut cracks = CrackCache::new(8);

        assert!(draw_sanctuary_region(&mut canvas, &region, &viewport, 0.0, 48.0, &mut cracks));
        let center = canvas.image().get_pixel(96, 96).0;
        assert!(center[0] > 0 && center[1] > 0 && center[2] == 0);
        assert_eq!(cracks.len(), 1);

        // Cached cracks survive later frames untouched
        let before = cracks.get(&IVec2::ZERO).cloned();
        draw_sanctuary_region(&mut canvas, &region, &viewport, 5000.0, 48.0, &mut cracks);
        assert_eq!(cracks.get(&IVec2::ZERO).cloned(), before);
    }

    #[test]
    fn test_dust_is_cached_per_anchor() {
        let (region, viewport) = sanctuary_region("***\n***\n***");
        let mut canvas = PixelCanvas::new(96, 96);
        let mut dust = DustCache::new(8);
        assert!(draw_sanctuary_dust(&mut canvas, &region, &viewport, 100.0, &mut dust));
        assert!(dust.contains(&IVec2::ZERO));
        assert_eq!(dust.get(&IVec2::ZERO).map(Vec::len), Some(8));
    }
}
