use egui::{ColorImage, Pos2, Rect, pos2};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};

use crate::color::Fill;
use crate::stroke::Stroke;

/// Rasterize strokes onto a transparent layer of `size`.
///
/// Draw strokes paint over what is below them; erase strokes clear the
/// layer back to transparent. Only this layer is affected, never the
/// background it is later composited onto.
pub fn render_strokes<'a>(
    size: [u32; 2],
    strokes: impl IntoIterator<Item = &'a Stroke>,
) -> RgbaImage {
    let mut layer = RgbaImage::new(size[0], size[1]);
    for stroke in strokes {
        apply_stroke(&mut layer, stroke);
    }
    layer
}

/// Paint one stroke. Coverage is collected first so overlapping segments
/// of a translucent stroke are blended once.
///
/// A pixel is covered when the path passes through it or its center lies
/// within half the width of the path, so width 0 is a one-pixel line.
pub fn apply_stroke(layer: &mut RgbaImage, stroke: &Stroke) {
    let radius = stroke.width().max(0.0) / 2.0;
    let Some(area) = pixel_span(layer, calculate_bounds(stroke.points(), radius.max(1.0))) else {
        return;
    };

    let mut coverage = GrayImage::new(area.width, area.height);
    match stroke.points() {
        [point] => stamp_segment(&mut coverage, &area, *point, *point, radius),
        points => {
            for segment in points.windows(2) {
                stamp_segment(&mut coverage, &area, segment[0], segment[1], radius);
            }
        }
    }

    let paint = stroke.color();
    for (x, y, covered) in coverage.enumerate_pixels() {
        if covered[0] == 0 {
            continue;
        }
        let pixel = layer.get_pixel_mut(area.x + x, area.y + y);
        match paint {
            Some(src) => pixel.blend(&src),
            None => *pixel = Rgba([0, 0, 0, 0]),
        }
    }
}

/// Cover the whole image with `fill`, blending over existing content
pub fn paint_fill(image: &mut RgbaImage, fill: Fill) {
    let src = match fill {
        Fill::Solid(color) => color,
        Fill::Transparent => return,
    };
    for pixel in image.pixels_mut() {
        pixel.blend(&src);
    }
}

/// Scale `image` to fill `width`x`height` while keeping its aspect ratio,
/// cropping the overflow around the center.
pub fn fit_cover(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (source_width, source_height) = image.dimensions();
    if (source_width, source_height) == (width, height) {
        return image.clone();
    }
    if source_width == 0 || source_height == 0 {
        return RgbaImage::new(width, height);
    }

    let scale = (width as f32 / source_width as f32).max(height as f32 / source_height as f32);
    let scaled_width = ((source_width as f32 * scale).ceil() as u32).max(width);
    let scaled_height = ((source_height as f32 * scale).ceil() as u32).max(height);
    let scaled = imageops::resize(image, scaled_width, scaled_height, FilterType::Triangle);

    let x = (scaled_width - width) / 2;
    let y = (scaled_height - height) / 2;
    imageops::crop_imm(&scaled, x, y, width, height).to_image()
}

/// Source-over composite of `top` onto `bottom` at the origin
pub fn overlay(bottom: &mut RgbaImage, top: &RgbaImage) {
    imageops::overlay(bottom, top, 0, 0);
}

pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// Pixel rectangle of a stroke, clipped to the layer
struct PixelArea {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    layer_width: u32,
    layer_height: u32,
}

impl PixelArea {
    /// Area-relative pixel containing `point`. A point on the far edge of
    /// the layer belongs to the last pixel.
    fn pixel_at(&self, point: Pos2) -> Option<(u32, u32)> {
        let index = |value: f32, start: u32, len: u32, layer_len: u32| {
            if !(0.0..=layer_len as f32).contains(&value) {
                return None;
            }
            let pixel = (value.floor() as u32).min(layer_len.saturating_sub(1));
            (start..start + len).contains(&pixel).then(|| pixel - start)
        };
        Some((
            index(point.x, self.x, self.width, self.layer_width)?,
            index(point.y, self.y, self.height, self.layer_height)?,
        ))
    }
}

fn pixel_span(layer: &RgbaImage, bounds: Rect) -> Option<PixelArea> {
    if !bounds.is_positive() {
        return None;
    }
    let (layer_width, layer_height) = layer.dimensions();
    let x0 = bounds.min.x.floor().max(0.0) as u32;
    let y0 = bounds.min.y.floor().max(0.0) as u32;
    let x1 = (bounds.max.x.ceil().max(0.0) as u32).min(layer_width);
    let y1 = (bounds.max.y.ceil().max(0.0) as u32).min(layer_height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(PixelArea {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
        layer_width,
        layer_height,
    })
}

// Mark the pixels the segment passes through, then every pixel whose
// center lies within `radius` of it
fn stamp_segment(coverage: &mut GrayImage, area: &PixelArea, start: Pos2, end: Pos2, radius: f32) {
    let steps = ((end - start).abs().max_elem() * 2.0).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let point = start.lerp(end, step as f32 / steps as f32);
        if let Some((x, y)) = area.pixel_at(point) {
            coverage.put_pixel(x, y, Luma([255]));
        }
    }
    if radius <= 0.0 {
        return;
    }

    let bounds = calculate_bounds(&[start, end], radius);
    let x0 = (bounds.min.x.floor() as i64).max(area.x as i64);
    let y0 = (bounds.min.y.floor() as i64).max(area.y as i64);
    let x1 = (bounds.max.x.ceil() as i64).min((area.x + area.width) as i64);
    let y1 = (bounds.max.y.ceil() as i64).min((area.y + area.height) as i64);

    for y in y0..y1 {
        for x in x0..x1 {
            let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_line_segment(center, start, end) <= radius {
                coverage.put_pixel(x as u32 - area.x, y as u32 - area.y, Luma([255]));
            }
        }
    }
}

/// Distance from a point to a line segment
fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Bounding box of a set of points, padded on every side
fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, Rgba8, WHITE};
    use crate::stroke::StrokeMode;

    const RED: Rgba8 = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba8 = Rgba([0, 0, 255, 255]);

    fn draw(points: Vec<Pos2>, width: f32, color: Rgba8) -> Stroke {
        Stroke::new(points, width, StrokeMode::Draw, color)
    }

    fn erase(points: Vec<Pos2>, width: f32) -> Stroke {
        Stroke::new(points, width, StrokeMode::Erase, BLACK)
    }

    fn painted(layer: &RgbaImage) -> usize {
        layer.pixels().filter(|p| p[3] > 0).count()
    }

    #[test]
    fn test_draw_stroke_paints_along_segment() {
        let stroke = draw(vec![pos2(2.0, 10.0), pos2(18.0, 10.0)], 4.0, RED);
        let layer = render_strokes([20, 20], [&stroke]);

        assert_eq!(layer.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(layer.get_pixel(10, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(layer.get_pixel(10, 19), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_erase_clears_earlier_strokes() {
        let red = draw(vec![pos2(0.0, 10.0), pos2(20.0, 10.0)], 6.0, RED);
        let eraser = erase(vec![pos2(10.0, 0.0), pos2(10.0, 20.0)], 4.0);
        let layer = render_strokes([20, 20], [&red, &eraser]);

        assert_eq!(layer.get_pixel(10, 10)[3], 0);
        assert_eq!(layer.get_pixel(3, 10), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_zero_width_stroke_is_a_dot() {
        let dot = draw(vec![pos2(5.2, 5.7)], 0.0, BLUE);
        let layer = render_strokes([10, 10], [&dot]);
        assert_eq!(painted(&layer), 1);
        assert_eq!(layer.get_pixel(5, 5), &BLUE);

        let on_corner = draw(vec![pos2(5.0, 5.0)], 0.0, BLUE);
        assert_eq!(painted(&render_strokes([10, 10], [&on_corner])), 1);
    }

    #[test]
    fn test_zero_width_line_is_one_pixel_thick() {
        let line = draw(vec![pos2(1.5, 4.5), pos2(8.5, 4.5)], 0.0, BLUE);
        let layer = render_strokes([10, 10], [&line]);
        assert_eq!(painted(&layer), 8);
        assert!((1..=8).all(|x| layer.get_pixel(x, 4) == &BLUE));
    }

    #[test]
    fn test_coverage_grows_with_width() {
        let counts: Vec<usize> = [0.0, 1.0, 2.0, 4.0]
            .into_iter()
            .map(|width| painted(&render_strokes([10, 10], [&draw(vec![pos2(5.0, 5.0)], width, BLUE)])))
            .collect();
        assert_eq!(counts[0], 1);
        assert!(counts[1] < counts[2], "{counts:?}");
        assert!(counts[2] < counts[3], "{counts:?}");
    }

    #[test]
    fn test_dot_on_far_edge_stays_on_layer() {
        let dot = draw(vec![pos2(10.0, 10.0)], 0.0, BLUE);
        let layer = render_strokes([10, 10], [&dot]);
        assert_eq!(painted(&layer), 1);
        assert_eq!(layer.get_pixel(9, 9), &BLUE);
    }

    #[test]
    fn test_transparent_color_paints_nothing() {
        let clear = draw(vec![pos2(0.0, 5.0), pos2(10.0, 5.0)], 6.0, Rgba([0, 0, 0, 0]));
        let layer = render_strokes([10, 10], [&clear]);
        assert_eq!(painted(&layer), 0);
    }

    #[test]
    fn test_translucent_stroke_blends_once() {
        let color = Rgba([0, 0, 255, 128]);
        // Doubles back over itself
        let stroke = draw(vec![pos2(2.0, 5.0), pos2(8.0, 5.0), pos2(2.0, 5.0)], 4.0, color);
        let layer = render_strokes([10, 10], [&stroke]);
        // Blending twice would push alpha to ~192
        let alpha = layer.get_pixel(5, 5)[3];
        assert!((120..=135).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn test_stroke_outside_layer_is_ignored() {
        let stroke = draw(vec![pos2(50.0, 50.0), pos2(60.0, 60.0)], 2.0, RED);
        let layer = render_strokes([10, 10], [&stroke]);
        assert!(layer.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_fit_cover_fills_target() {
        let wide = RgbaImage::from_pixel(40, 10, Rgba([1, 2, 3, 255]));
        let fitted = fit_cover(&wide, 20, 20);
        assert_eq!(fitted.dimensions(), (20, 20));
        assert!(fitted.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_paint_fill_transparent_is_noop() {
        let mut image = RgbaImage::new(4, 4);
        paint_fill(&mut image, Fill::Transparent);
        assert!(image.pixels().all(|p| p[3] == 0));
        paint_fill(&mut image, Fill::Solid(WHITE));
        assert!(image.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }
}
