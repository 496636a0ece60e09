use noise::{NoiseFn, Perlin};

/// Seeded 2D gradient noise.
///
/// The permutation table is built once in `new`; sampling is O(1) and
/// continuous across integer lattice lines. Values lie roughly in
/// `[-1, 1]` and the pattern repeats every 256 units.
#[derive(Clone)]
pub struct NoiseField {
    seed: i64,
    perlin: Perlin,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl NoiseField {
    pub fn new(seed: i64) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed as u32),
        }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Sample the field at `(x, y)`
    pub fn get(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Sum of `octaves` samples, halving amplitude and doubling frequency each step,
    /// normalised back into `[-1, 1]`.
    pub fn fractal(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.get(x * frequency, y * frequency) * amplitude;
            norm += amplitude;
            amplitude *= 0.5; // Persistence
            frequency *= 2.0; // Lacunarity
        }

        total / norm
    }
}
