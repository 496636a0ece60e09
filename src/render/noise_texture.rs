use crate::procgen::noise_field::NoiseField;
use bevy::color::Color;
use bevy::math::{DVec2, IVec2};
use image::{Rgba, RgbaImage};

/// Raw noise samples, row-major, independent of any display format
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoiseBuffer {
    pub width: u32,
    pub height: u32,
    pub samples: Vec<f32>,
}

impl NoiseBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.samples[(y * self.width + x) as usize]
    }
}

/// One animated noise layer: world pixels per noise unit, and noise units
/// drifted per millisecond
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleOctave {
    pub scale: f64,
    pub speed: f64,
}

/// Two octaves averaged into one rippling surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripples {
    pub slow: RippleOctave,
    pub fast: RippleOctave,
}

impl Default for Ripples {
    fn default() -> Self {
        Self {
            slow: RippleOctave {
                scale: 30.0,
                speed: 0.00005,
            },
            fast: RippleOctave {
                scale: 15.0,
                speed: 0.0001,
            },
        }
    }
}

impl Ripples {
    /// Surface value at world pixel `p` and time `clock_ms`, in `[-1, 1]`
    pub fn sample(&self, field: &NoiseField, p: DVec2, clock_ms: f64) -> f64 {
        let octave = |o: RippleOctave| {
            let drift = clock_ms * o.speed;
            field.get(p.x / o.scale + drift, p.y / o.scale + drift)
        };
        (octave(self.slow) + octave(self.fast)) * 0.5
    }
}

/// Fill `buffer` with ripple samples for the block of world pixels whose
/// top-left corner is `origin`
pub fn bake_ripples(
    mut buffer: NoiseBuffer,
    field: &NoiseField,
    origin: DVec2,
    clock_ms: f64,
    ripples: &Ripples,
) -> NoiseBuffer {
    let width = buffer.width as usize;
    for (i, sample) in buffer.samples.iter_mut().enumerate() {
        let p = origin + DVec2::new((i % width) as f64, (i / width) as f64);
        *sample = ripples.sample(field, p, clock_ms) as f32;
    }
    buffer
}

/// Colour every sample as `base + sample * brightness` (in 0..255 units)
pub fn shade(buffer: &NoiseBuffer, base: Color, brightness: f32, target: &mut RgbaImage) {
    if target.dimensions() != (buffer.width, buffer.height) {
        *target = RgbaImage::new(buffer.width, buffer.height);
    }
    let base = base.to_srgba();
    let channels = [base.red, base.green, base.blue].map(|c| c * 255.0);

    for (pixel, sample) in target.pixels_mut().zip(&buffer.samples) {
        let shift = sample * brightness;
        let [r, g, b] = channels.map(|c| (c + shift).round().clamp(0.0, 255.0) as u8);
        *pixel = Rgba([r, g, b, 255]);
    }
}

/// What a texture was last baked for
#[derive(Debug, Clone, Copy, PartialEq)]
struct BakeKey {
    seed: i64,
    origin: IVec2,
    clock_ms: f64,
}

/// Reusable off-screen ripple texture of one size
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    buffer: NoiseBuffer,
    image: RgbaImage,
    baked_for: Option<BakeKey>,
}

impl NoiseTexture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: NoiseBuffer::new(width, height),
            image: RgbaImage::new(width, height),
            baked_for: None,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Re-bake for a region whose texture starts at world pixel `origin`,
    /// skipping the work when nothing changed since the last call
    pub fn update(
        &mut self,
        field: &NoiseField,
        origin: IVec2,
        clock_ms: f64,
        ripples: &Ripples,
        base: Color,
        brightness: f32,
    ) -> &RgbaImage {
        let key = BakeKey {
            seed: field.seed(),
            origin,
            clock_ms,
        };
        if self.baked_for != Some(key) {
            let buffer = std::mem::take(&mut self.buffer);
            self.buffer = bake_ripples(buffer, field, origin.as_dvec2(), clock_ms, ripples);
            shade(&self.buffer, base, brightness, &mut self.image);
            self.baked_for = Some(key);
        }
        &self.image
    }

    /// Whether the last `update` call reused the previous bake
    pub fn is_baked_for(&self, seed: i64, origin: IVec2, clock_ms: f64) -> bool {
        self.baked_for
            == Some(BakeKey {
                seed,
                origin,
                clock_ms,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bake_is_pure() {
        let field = NoiseField::new(12);
        let ripples = Ripples::default();
        let a = bake_ripples(NoiseBuffer::new(24, 16), &field, DVec2::new(64.0, 32.0), 500.0, &ripples);
        let b = bake_ripples(NoiseBuffer::new(24, 16), &field, DVec2::new(64.0, 32.0), 500.0, &ripples);
        assert_eq!(a, b);
        assert!(a.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_adjacent_blocks_are_seamless() {
        // The right edge of one block continues into the left edge of the next.
        let field = NoiseField::new(4);
        let ripples = Ripples::default();
        let left = bake_ripples(NoiseBuffer::new(32, 8), &field, DVec2::new(0.0, 0.0), 0.0, &ripples);
        let whole = bake_ripples(NoiseBuffer::new(64, 8), &field, DVec2::new(0.0, 0.0), 0.0, &ripples);
        for y in 0..8 {
            for x in 0..32 {
                assert_eq!(left.get(x, y), whole.get(x, y));
            }
        }
    }

    #[test]
    fn test_ripples_move_with_time() {
        let field = NoiseField::new(8);
        let ripples = Ripples::default();
        let p = DVec2::new(100.0, 40.0);
        let before = ripples.sample(&field, p, 0.0);
        let after = ripples.sample(&field, p, 20_000.0);
        assert_ne!(before, after);
        let nearby = ripples.sample(&field, p, 1.0);
        assert!((before - nearby).abs() < 0.01);
    }

    #[test]
    fn test_shade_offsets_base_colour() {
        let buffer = NoiseBuffer {
            width: 2,
            height: 1,
            samples: vec![1.0, -1.0],
        };
        let mut image = RgbaImage::new(1, 1);
        shade(&buffer, Color::srgb_u8(52, 152, 219), 30.0, &mut image);
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0).0, [82, 182, 249, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [22, 122, 189, 255]);
    }

    #[test]
    fn test_texture_reuses_identical_bake() {
        let field = NoiseField::new(3);
        let ripples = Ripples::default();
        let mut texture = NoiseTexture::new(8, 8);
        let base = Color::srgb_u8(52, 152, 219);

        let first = texture.update(&field, IVec2::new(32, 0), 100.0, &ripples, base, 30.0).clone();
        assert!(texture.is_baked_for(3, IVec2::new(32, 0), 100.0));
        let again = texture.update(&field, IVec2::new(32, 0), 100.0, &ripples, base, 30.0).clone();
        assert_eq!(first, again);

        texture.update(&field, IVec2::new(32, 0), 5000.0, &ripples, base, 30.0);
        assert!(!texture.is_baked_for(3, IVec2::new(32, 0), 100.0));
    }
}
