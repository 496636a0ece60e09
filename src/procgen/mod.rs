pub mod noise_field;
pub mod rng;
pub mod tile_detail;

pub use noise_field::NoiseField;
pub use rng::{TileRng, tile_seed};
pub use tile_detail::{DetailShape, Paint, TileDetail, compute_tile_detail};
