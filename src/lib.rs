pub mod components;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod plugins;
pub mod procgen;
pub mod render;
pub mod resources;
pub mod world;

// Selective re-exports for external consumers

// Plugins - main.rs needs the viewer
pub use plugins::*;

// Errors - binaries report these
pub use errors::{ShorelineError, ShorelineResult};

// Rendering - the headless CLI drives the renderer directly
pub use render::{FrameStats, LayerKind, PixelCanvas, RegionRenderer, Viewport};

// World - sources the renderer can draw
pub use world::{Cell, CellSource, NoiseWorld, TileKind, TileWorld, WorldPreset};
