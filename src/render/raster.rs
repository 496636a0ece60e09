//! Software implementation of [`Canvas`] over an RGBA image.

use super::canvas::Canvas;
use crate::geometry::path::{DEFAULT_FLATTEN_TOLERANCE, FillRule, PathShape, Polyline};
use crate::geometry::simplify::perpendicular_distance;
use bevy::color::Color;
use bevy::math::{UVec2, Vec2};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Vertical samples per pixel row when filling
const SUBSAMPLES: usize = 4;

#[derive(Debug, Clone, Default)]
struct DrawState {
    offset: Vec2,
    /// Per-pixel clip coverage over the whole canvas; `None` means unclipped
    clip: Option<Arc<Vec<f32>>>,
}

/// Coverage for a rectangle of pixels
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let width = x1 - x0;
        let height = y1 - y0;
        Self {
            x0,
            y0,
            width,
            height,
            data: vec![0.0; (width * height) as usize],
        }
    }

    fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let start = ((y - self.y0) * self.width) as usize;
        &mut self.data[start..start + self.width as usize]
    }

    fn pixels(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        self.data.iter().enumerate().filter(|(_, c)| **c > 0.0).map(|(i, c)| {
            let i = i as u32;
            (self.x0 + i % self.width, self.y0 + i / self.width, c.min(1.0))
        })
    }
}

/// Anti-aliased software rasteriser.
///
/// Fills use scanline coverage with several samples per pixel row and
/// exact horizontal coverage; strokes and glows use distance to the
/// flattened outline. Blending is source-over in sRGB space.
pub struct PixelCanvas {
    image: RgbaImage,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl PixelCanvas {
    /// Transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Overwrite every pixel, ignoring clip and translation
    pub fn clear(&mut self, color: Color) {
        let fill = Rgba(color_components(color).map(to_byte));
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn flatten(&self, path: &PathShape) -> Vec<Polyline> {
        let offset = self.state.offset;
        path.flatten(DEFAULT_FLATTEN_TOLERANCE)
            .into_iter()
            .map(|line| Polyline {
                points: line.points.into_iter().map(|p| p + offset).collect(),
                closed: line.closed,
            })
            .collect()
    }

    /// Pixel rectangle covering `min..max`, clamped to the canvas
    fn pixel_bounds(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = self.image.dimensions();
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(w);
        let y1 = (max.y.ceil().max(0.0) as u32).min(h);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn fill_coverage(&self, path: &PathShape, rule: FillRule) -> Option<CoverageMask> {
        // Filling closes every subpath implicitly.
        let edges: Vec<(Vec2, Vec2)> = self
            .flatten(path)
            .into_iter()
            .flat_map(|line| {
                let n = line.points.len();
                (0..n).map(move |i| (line.points[i], line.points[(i + 1) % n])).collect::<Vec<_>>()
            })
            .filter(|(a, b)| a.y != b.y)
            .collect();

        let (min, max) = points_bounds(edges.iter().flat_map(|(a, b)| [*a, *b]))?;
        let (x0, y0, x1, y1) = self.pixel_bounds(min, max)?;
        let mut mask = CoverageMask::new(x0, y0, x1, y1);
        let weight = 1.0 / SUBSAMPLES as f32;
        let mut crossings: Vec<(f32, i32)> = Vec::new();

        for py in y0..y1 {
            for s in 0..SUBSAMPLES {
                let sy = py as f32 + (s as f32 + 0.5) * weight;
                crossings.clear();
                for (a, b) in &edges {
                    let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                    if sy < top.y || sy >= bottom.y {
                        continue;
                    }
                    let x = top.x + (sy - top.y) * (bottom.x - top.x) / (bottom.y - top.y);
                    crossings.push((x, winding));
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let row = mask.row_mut(py);
                let mut winding = 0;
                for i in 0..crossings.len().saturating_sub(1) {
                    winding += crossings[i].1;
                    let inside = match rule {
                        FillRule::NonZero => winding != 0,
                        FillRule::EvenOdd => winding & 1 != 0,
                    };
                    if inside {
                        add_span(row, crossings[i].0 - x0 as f32, crossings[i + 1].0 - x0 as f32, weight);
                    }
                }
            }
        }

        Some(mask)
    }

    /// Coverage from distance to the outline, shaped by `profile`
    fn outline_coverage<F: Fn(f32) -> f32>(&self, path: &PathShape, reach: f32, profile: F) -> Option<CoverageMask> {
        let segments: Vec<(Vec2, Vec2)> = self
            .flatten(path)
            .iter()
            .flat_map(|line| match line.points.len() {
                0 => Vec::new(),
                1 => vec![(line.points[0], line.points[0])],
                _ => line.edges().collect(),
            })
            .collect();

        let (min, max) = points_bounds(segments.iter().flat_map(|(a, b)| [*a, *b]))?;
        let pad = Vec2::splat(reach + 1.0);
        let (x0, y0, x1, y1) = self.pixel_bounds(min - pad, max + pad)?;
        let mut mask = CoverageMask::new(x0, y0, x1, y1);

        for (a, b) in segments {
            let Some((sx0, sy0, sx1, sy1)) = self.pixel_bounds(a.min(b) - pad, a.max(b) + pad) else {
                continue;
            };
            for py in sy0.max(y0)..sy1.min(y1) {
                let row = mask.row_mut(py);
                for px in sx0.max(x0)..sx1.min(x1) {
                    let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    let coverage = profile(perpendicular_distance(center, a, b));
                    let slot = &mut row[(px - x0) as usize];
                    *slot = slot.max(coverage);
                }
            }
        }

        Some(mask)
    }

    fn paint_mask(&mut self, mask: &CoverageMask, color: Color) {
        let src = color_components(color);
        for (x, y, coverage) in mask.pixels() {
            self.blend(x, y, src, coverage);
        }
    }

    fn blend(&mut self, x: u32, y: u32, src: [f32; 4], coverage: f32) {
        let clip = match &self.state.clip {
            Some(clip) => clip[(y * self.image.width() + x) as usize],
            None => 1.0,
        };
        let a = src[3] * coverage * clip;
        if a <= 0.0 {
            return;
        }

        let pixel = self.image.get_pixel_mut(x, y);
        let dst_a = pixel[3] as f32 / 255.0;
        let out_a = a + dst_a * (1.0 - a);
        for c in 0..3 {
            let dst = pixel[c] as f32 / 255.0;
            let out = (src[c] * a + dst * dst_a * (1.0 - a)) / out_a;
            pixel[c] = to_byte(out);
        }
        pixel[3] = to_byte(out_a);
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.offset += offset;
    }

    fn clip(&mut self, path: &PathShape, rule: FillRule) {
        let (w, h) = self.image.dimensions();
        let mut clip = vec![0.0; (w * h) as usize];
        if let Some(mask) = self.fill_coverage(path, rule) {
            for (x, y, coverage) in mask.pixels() {
                clip[(y * w + x) as usize] = coverage;
            }
        }
        if let Some(current) = &self.state.clip {
            for (new, old) in clip.iter_mut().zip(current.iter()) {
                *new *= old;
            }
        }
        self.state.clip = Some(Arc::new(clip));
    }

    fn fill_path(&mut self, path: &PathShape, rule: FillRule, color: Color) {
        if let Some(mask) = self.fill_coverage(path, rule) {
            self.paint_mask(&mask, color);
        }
    }

    fn stroke_path(&mut self, path: &PathShape, width: f32, color: Color) {
        let half = width / 2.0;
        let thin = width.min(1.0);
        let mask = self.outline_coverage(path, half + 0.5, |d| (half + 0.5 - d).clamp(0.0, 1.0) * thin);
        if let Some(mask) = mask {
            self.paint_mask(&mask, color);
        }
    }

    fn glow_path(&mut self, path: &PathShape, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let mask = self.outline_coverage(path, radius, |d| {
            let falloff = (1.0 - d / radius).max(0.0);
            falloff * falloff
        });
        if let Some(mask) = mask {
            self.paint_mask(&mask, color);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, at: Vec2) {
        let origin = (at + self.state.offset).round();
        let (ox, oy) = (origin.x as i64, origin.y as i64);
        let (w, h) = self.image.dimensions();

        for (sx, sy, pixel) in image.enumerate_pixels() {
            let x = ox + sx as i64;
            let y = oy + sy as i64;
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                continue;
            }
            let src = pixel.0.map(|c| c as f32 / 255.0);
            self.blend(x as u32, y as u32, src, 1.0);
        }
    }
}

fn color_components(color: Color) -> [f32; 4] {
    let srgba = color.to_srgba();
    [srgba.red, srgba.green, srgba.blue, srgba.alpha]
}

fn to_byte(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn points_bounds(points: impl Iterator<Item = Vec2>) -> Option<(Vec2, Vec2)> {
    points.fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}

/// Add `weight` times the horizontal coverage of `[xa, xb)` to `row`
fn add_span(row: &mut [f32], xa: f32, xb: f32, weight: f32) {
    let width = row.len() as f32;
    let xa = xa.clamp(0.0, width);
    let xb = xb.clamp(0.0, width);
    if xb <= xa {
        return;
    }

    let ia = xa.floor() as usize;
    let ib = xb.floor() as usize;
    if ia == ib {
        row[ia] += (xb - xa) * weight;
        return;
    }

    row[ia] += (ia as f32 + 1.0 - xa) * weight;
    for slot in &mut row[ia + 1..ib] {
        *slot += weight;
    }
    if ib < row.len() {
        row[ib] += (xb - ib as f32) * weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::srgb(1.0, 0.0, 0.0)
    }

    fn square(min: f32, max: f32) -> PathShape {
        PathShape::rect(Vec2::splat(min), Vec2::splat(max - min))
    }

    #[test]
    fn test_fill_rect_covers_interior_only() {
        let mut canvas = PixelCanvas::new(16, 16);
        canvas.fill_path(&square(2.0, 12.0), FillRule::NonZero, red());
        let image = canvas.image();
        assert_eq!(image.get_pixel(5, 5).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(11, 11).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(12, 12).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_partial_coverage_is_blended() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill_path(&PathShape::rect(Vec2::ZERO, Vec2::new(1.5, 4.0)), FillRule::NonZero, red());
        let alpha = canvas.image().get_pixel(1, 1)[3];
        assert!((120..=135).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn test_even_odd_leaves_hole() {
        let mut path = square(0.0, 20.0);
        path.extend(square(6.0, 14.0));

        let mut nonzero = PixelCanvas::new(20, 20);
        nonzero.fill_path(&path, FillRule::NonZero, red());
        assert_eq!(nonzero.image().get_pixel(10, 10)[3], 255);

        let mut evenodd = PixelCanvas::new(20, 20);
        evenodd.fill_path(&path, FillRule::EvenOdd, red());
        assert_eq!(evenodd.image().get_pixel(10, 10)[3], 0);
        assert_eq!(evenodd.image().get_pixel(2, 2)[3], 255);
    }

    #[test]
    fn test_clip_restricts_and_restore_releases() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.save();
        canvas.clip(&square(0.0, 10.0), FillRule::NonZero);
        canvas.fill_rect(Vec2::ZERO, Vec2::splat(20.0), red());
        canvas.restore();
        assert_eq!(canvas.image().get_pixel(5, 5)[3], 255);
        assert_eq!(canvas.image().get_pixel(15, 15)[3], 0);

        canvas.fill_rect(Vec2::splat(10.0), Vec2::splat(10.0), red());
        assert_eq!(canvas.image().get_pixel(15, 15)[3], 255);
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.clip(&PathShape::rect(Vec2::ZERO, Vec2::new(12.0, 20.0)), FillRule::NonZero);
        canvas.clip(&PathShape::rect(Vec2::new(8.0, 0.0), Vec2::new(12.0, 20.0)), FillRule::NonZero);
        canvas.fill_rect(Vec2::ZERO, Vec2::splat(20.0), red());
        assert_eq!(canvas.image().get_pixel(10, 5)[3], 255);
        assert_eq!(canvas.image().get_pixel(4, 5)[3], 0);
        assert_eq!(canvas.image().get_pixel(15, 5)[3], 0);
    }

    #[test]
    fn test_translate_moves_drawing() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.save();
        canvas.translate(Vec2::new(10.0, 10.0));
        canvas.fill_rect(Vec2::ZERO, Vec2::splat(5.0), red());
        canvas.restore();
        assert_eq!(canvas.image().get_pixel(12, 12)[3], 255);
        assert_eq!(canvas.image().get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn test_stroke_stays_near_line() {
        let mut canvas = PixelCanvas::new(20, 20);
        let line = PathShape::polyline(&[Vec2::new(2.0, 10.0), Vec2::new(18.0, 10.0)]);
        canvas.stroke_path(&line, 2.0, red());
        assert_eq!(canvas.image().get_pixel(10, 9)[3], 255);
        assert_eq!(canvas.image().get_pixel(10, 10)[3], 255);
        assert_eq!(canvas.image().get_pixel(10, 5)[3], 0);
    }

    #[test]
    fn test_glow_fades_with_distance() {
        let mut canvas = PixelCanvas::new(40, 40);
        canvas.glow_path(&square(15.0, 25.0), 8.0, red());
        let near = canvas.image().get_pixel(12, 20)[3];
        let far = canvas.image().get_pixel(8, 20)[3];
        let outside = canvas.image().get_pixel(2, 20)[3];
        assert!(near > far, "near {near} far {far}");
        assert_eq!(outside, 0);
    }

    #[test]
    fn test_draw_image_is_clipped_to_canvas() {
        let mut canvas = PixelCanvas::new(8, 8);
        let stamp = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        canvas.draw_image(&stamp, Vec2::new(6.0, -2.0));
        assert_eq!(canvas.image().get_pixel(7, 0).0, [0, 0, 255, 255]);
        assert_eq!(canvas.image().get_pixel(7, 2)[3], 0);
        assert_eq!(canvas.image().get_pixel(5, 0)[3], 0);
    }

    #[test]
    fn test_translucent_fill_blends_over_background() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.clear(Color::srgb(0.0, 0.0, 1.0));
        canvas.fill_rect(Vec2::ZERO, Vec2::splat(4.0), Color::srgba(1.0, 0.0, 0.0, 0.5));
        let pixel = canvas.image().get_pixel(1, 1).0;
        assert_eq!(pixel[3], 255);
        assert!((126..=129).contains(&pixel[0]));
        assert!((126..=129).contains(&pixel[2]));
    }
}
