use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::geo::{project, GeoFix};

pub const STROKE: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Fully transparent white, so a naive grayscale conversion still reads as paper.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Draw the walked route as a black polyline on a transparent canvas.
///
/// Fewer than two fixes leave the canvas blank.
pub fn rasterize(
    fixes: &[GeoFix],
    center: GeoFix,
    zoom: u8,
    width: u32,
    height: u32,
    thickness: u32,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    if fixes.len() < 2 {
        return canvas;
    }

    let points: Vec<(f64, f64)> = fixes
        .iter()
        .map(|fix| project(*fix, center, zoom, width, height))
        .collect();

    draw_polyline(&mut canvas, &points, STROKE, thickness);
    canvas
}

/// Thick strokes are built from parallel one-pixel lines offset over a
/// `thickness` x `thickness` brush.
///
/// Segments are clipped to the canvas (plus a brush-sized margin) first, so a
/// far-off fix costs no more than one that lands on screen.
fn draw_polyline(canvas: &mut RgbaImage, points: &[(f64, f64)], color: Rgba<u8>, thickness: u32) {
    let thickness = thickness.max(1) as i32;
    let low = -(thickness - 1) / 2;
    let high = thickness / 2;

    let pad = f64::from(thickness + 1);
    let bounds = (-pad, -pad, f64::from(canvas.width()) + pad, f64::from(canvas.height()) + pad);

    for segment in points.windows(2) {
        let Some(((x0, y0), (x1, y1))) = clip_segment(segment[0], segment[1], bounds) else {
            continue;
        };
        let (x0, y0, x1, y1) = (x0 as f32, y0 as f32, x1 as f32, y1 as f32);
        for dx in low..=high {
            for dy in low..=high {
                let (dx, dy) = (dx as f32, dy as f32);
                draw_line_segment_mut(canvas, (x0 + dx, y0 + dy), (x1 + dx, y1 + dy), color);
            }
        }
    }
}

/// Liang-Barsky clip against `(min_x, min_y, max_x, max_y)`. `None` when the
/// segment misses the box or has a non-finite endpoint.
fn clip_segment(
    start: (f64, f64),
    end: (f64, f64),
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (x0, y0) = start;
    let (x1, y1) = end;
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (x1 - x0, y1 - y0);
    let edges = [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let clipped_start = if t0 > 0.0 { (x0 + t0 * dx, y0 + t0 * dy) } else { start };
    let clipped_end = if t1 < 1.0 { (x0 + t1 * dx, y0 + t1 * dy) } else { end };
    Some((clipped_start, clipped_end))
}
