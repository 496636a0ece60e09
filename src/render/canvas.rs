use crate::geometry::path::{FillRule, PathShape};
use crate::procgen::tile_detail::{DetailShape, Paint};
use bevy::color::Color;
use bevy::math::{UVec2, Vec2};
use image::RgbaImage;

/// Immediate-mode drawing surface.
///
/// Coordinates are pixels relative to the current translation. `save`
/// and `restore` bracket translation and clip changes.
pub trait Canvas {
    fn size(&self) -> UVec2;

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);

    /// Intersect the clip region with the interior of `path`
    fn clip(&mut self, path: &PathShape, rule: FillRule);

    fn fill_path(&mut self, path: &PathShape, rule: FillRule, color: Color);

    fn stroke_path(&mut self, path: &PathShape, width: f32, color: Color);

    /// Soft halo of `radius` pixels centred on the outline of `path`
    fn glow_path(&mut self, path: &PathShape, radius: f32, color: Color);

    /// Composite `image` with its top-left corner at `at`
    fn draw_image(&mut self, image: &RgbaImage, at: Vec2);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.fill_path(&PathShape::rect(min, size), FillRule::NonZero, color);
    }

    /// Paint one procedural detail shape
    fn draw_detail(&mut self, shape: &DetailShape) {
        match shape.paint {
            Paint::Fill(color) => self.fill_path(&shape.path, FillRule::NonZero, color),
            Paint::Stroke { color, width } => self.stroke_path(&shape.path, width, color),
            Paint::GlowStroke { color, width, glow } => {
                self.glow_path(&shape.path, glow, color);
                self.stroke_path(&shape.path, width, color);
            }
        }
    }
}
