//! Procedural preset thumbnails.
//!
//! Each preset key maps to a few thick strokes on a dark square. Shapes are
//! rasterised with a distance test per pixel, which gives round caps and a
//! one-pixel antialiased edge for free.

use gymplan_core::{Color, ImageData};
use image::{Rgba, RgbaImage};

pub const ICON_SIZE: u32 = 96;
const STROKE: f32 = 6.0;

#[derive(Clone, Copy, Debug)]
enum Shape {
    Line { a: (f32, f32), b: (f32, f32) },
    /// Angles in radians, clockwise from +x (canvas convention).
    Arc { c: (f32, f32), r: f32, start: f32, end: f32 },
    Disc { c: (f32, f32), r: f32 },
}

fn shapes(key: &str) -> Vec<Shape> {
    use std::f32::consts::PI;
    let line = |a, b| Shape::Line { a, b };
    let rect = |x: f32, y: f32, w: f32, h: f32| {
        [
            line((x, y), (x + w, y)),
            line((x + w, y), (x + w, y + h)),
            line((x + w, y + h), (x, y + h)),
            line((x, y + h), (x, y)),
        ]
    };
    match key {
        "biceps" => vec![
            Shape::Arc {
                c: (48.0, 54.0),
                r: 24.0,
                start: 0.2 * PI,
                end: 1.2 * PI,
            },
            line((48.0, 30.0), (70.0, 18.0)),
        ],
        "pullups" => vec![
            line((20.0, 20.0), (76.0, 20.0)),
            line((48.0, 20.0), (48.0, 70.0)),
            Shape::Arc {
                c: (48.0, 40.0),
                r: 12.0,
                start: 0.0,
                end: 2.0 * PI,
            },
        ],
        "dumbbells" => {
            let mut v = Vec::with_capacity(9);
            v.extend(rect(20.0, 38.0, 16.0, 20.0));
            v.extend(rect(60.0, 38.0, 16.0, 20.0));
            v.push(line((36.0, 48.0), (60.0, 48.0)));
            v
        }
        "legs" => vec![
            line((30.0, 30.0), (40.0, 70.0)),
            line((66.0, 30.0), (56.0, 70.0)),
        ],
        _ => vec![Shape::Disc {
            c: (48.0, 48.0),
            r: 20.0,
        }],
    }
}

fn dist_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        ((apx * abx + apy * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - t * abx, apy - t * aby);
    (dx * dx + dy * dy).sqrt()
}

fn dist_arc(p: (f32, f32), c: (f32, f32), r: f32, start: f32, end: f32) -> f32 {
    use std::f32::consts::TAU;
    let (dx, dy) = (p.0 - c.0, p.1 - c.1);
    let mut ang = dy.atan2(dx);
    if ang < start {
        ang += TAU;
    }
    if ang >= start && ang <= end {
        return ((dx * dx + dy * dy).sqrt() - r).abs();
    }
    // Outside the sweep: distance to the nearer end point (round cap).
    let ends = [start, end].map(|a| (c.0 + r * a.cos(), c.1 + r * a.sin()));
    ends.iter()
        .map(|e| ((p.0 - e.0).powi(2) + (p.1 - e.1).powi(2)).sqrt())
        .fold(f32::INFINITY, f32::min)
}

/// Coverage in `[0, 1]` of the pixel centred at `p`.
fn coverage(shape: &Shape, p: (f32, f32)) -> f32 {
    let d = match *shape {
        Shape::Line { a, b } => dist_segment(p, a, b) - STROKE / 2.0,
        Shape::Arc { c, r, start, end } => dist_arc(p, c, r, start, end) - STROKE / 2.0,
        Shape::Disc { c, r } => ((p.0 - c.0).powi(2) + (p.1 - c.1).powi(2)).sqrt() - r,
    };
    (0.5 - d).clamp(0.0, 1.0)
}

/// Renders the thumbnail for `key`; unknown keys get a filled disc.
pub fn render_icon(key: &str, background: Color, accent: Color) -> RgbaImage {
    let shapes = shapes(key);
    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let p = (x as f32 + 0.5, y as f32 + 0.5);
        let a = shapes.iter().map(|s| coverage(s, p)).fold(0.0f32, f32::max);
        let mix = |bg: u8, fg: u8| (bg as f32 + (fg as f32 - bg as f32) * a).round() as u8;
        Rgba([
            mix(background.0, accent.0),
            mix(background.1, accent.1),
            mix(background.2, accent.2),
            255,
        ])
    })
}

pub fn icon_data(key: &str, background: Color, accent: Color) -> ImageData {
    let img = render_icon(key, background, accent);
    let (w, h) = img.dimensions();
    ImageData {
        width: w,
        height: h,
        pixels: img.into_raw(),
    }
}
