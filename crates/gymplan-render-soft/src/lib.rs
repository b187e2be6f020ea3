//! Software [`RenderBackend`]: rasterises a [`Scene`] into an RGBA image.
//!
//! Shapes are antialiased with a signed-distance test per pixel. Text uses
//! the system sans-serif face found through `fontdb`; without one, text runs
//! are skipped and a warning is logged once.

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use fontdb::Database;
use gymplan_core::{
    Color, FontWeight, ImageData, Rect, RenderBackend, Scene, SceneNode, TextAlign, Vec2,
};
use image::RgbaImage;

struct Fonts {
    regular: FontArc,
    bold: Option<FontArc>,
}

impl Fonts {
    fn pick(&self, weight: FontWeight) -> &FontArc {
        match weight {
            FontWeight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            _ => &self.regular,
        }
    }
}

pub struct SoftBackend {
    target: RgbaImage,
    fonts: Option<Fonts>,
    clip_stack: Vec<Rect>,
    warned_no_font: bool,
}

fn load_face(db: &Database, weight: fontdb::Weight) -> anyhow::Result<FontArc> {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        ..Default::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| anyhow::anyhow!("No system sans-serif font found"))?;
    let (source, _face_index) = db
        .face_source(id)
        .ok_or_else(|| anyhow::anyhow!("Font face not found"))?;

    let font = match source {
        fontdb::Source::Binary(data) => {
            let bytes: &[u8] = data.as_ref().as_ref();
            FontArc::try_from_vec(bytes.to_vec())
                .map_err(|_| anyhow::anyhow!("Failed to load font from binary data"))?
        }
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = std::fs::read(path)?;
            FontArc::try_from_vec(bytes).map_err(|_| anyhow::anyhow!("Failed to load font from file"))?
        }
    };
    Ok(font)
}

/// Regular and bold sans-serif faces from the system font database.
fn system_fonts() -> anyhow::Result<Fonts> {
    let mut db = Database::new();
    db.load_system_fonts();
    let regular = load_face(&db, fontdb::Weight::NORMAL)?;
    let bold = load_face(&db, fontdb::Weight::BOLD).ok();
    Ok(Fonts { regular, bold })
}

impl SoftBackend {
    /// A backend drawing text with the system sans-serif font.
    pub fn new(width: u32, height: u32) -> Self {
        let fonts = match system_fonts() {
            Ok(f) => Some(f),
            Err(e) => {
                log::warn!("text disabled: {e}");
                None
            }
        };
        Self {
            target: RgbaImage::new(width, height),
            warned_no_font: fonts.is_none(),
            fonts,
            clip_stack: Vec::new(),
        }
    }

    /// A backend that draws shapes and images only.
    pub fn without_text(width: u32, height: u32) -> Self {
        Self {
            target: RgbaImage::new(width, height),
            fonts: None,
            clip_stack: Vec::new(),
            warned_no_font: true,
        }
    }

    /// Uses the font file at `path` for all text.
    pub fn with_font_file(mut self, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("reading font {}: {e}", path.display()))?;
        let regular = FontArc::try_from_vec(bytes)
            .map_err(|_| anyhow::anyhow!("Failed to load font from {}", path.display()))?;
        self.fonts = Some(Fonts {
            regular,
            bold: None,
        });
        Ok(self)
    }

    pub fn has_text(&self) -> bool {
        self.fonts.is_some()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_image(self) -> RgbaImage {
        self.target
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.target
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))?;
        log::info!(
            "wrote {}x{} frame to {}",
            self.target.width(),
            self.target.height(),
            path.display()
        );
        Ok(())
    }

    fn clip(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or(Rect::new(
            0.0,
            0.0,
            self.target.width() as f32,
            self.target.height() as f32,
        ))
    }

    /// Pixel range covered by `r` inside the current clip, as
    /// `(x0, y0, x1, y1)` with exclusive ends.
    fn span(&self, r: Rect) -> Option<(u32, u32, u32, u32)> {
        let c = r.intersect(&self.clip())?;
        let x0 = c.x.floor().max(0.0) as u32;
        let y0 = c.y.floor().max(0.0) as u32;
        let x1 = (c.right().ceil() as u32).min(self.target.width());
        let y1 = (c.bottom().ceil() as u32).min(self.target.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn in_clip(&self, x: u32, y: u32) -> bool {
        let c = self.clip();
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        px >= c.x && px < c.right() && py >= c.y && py < c.bottom()
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let a = (color.3 as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let px = self.target.get_pixel_mut(x, y);
        let mix = |dst: u8, src: u8| (dst as f32 + (src as f32 - dst as f32) * a).round() as u8;
        px.0 = [
            mix(px.0[0], color.0),
            mix(px.0[1], color.1),
            mix(px.0[2], color.2),
            (px.0[3] as f32 + (255.0 - px.0[3] as f32) * a).round() as u8,
        ];
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, radius: f32) {
        let Some((x0, y0, x1, y1)) = self.span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if !self.in_clip(x, y) {
                    continue;
                }
                let cov = rounded_coverage(rect, radius, x, y);
                self.blend(x, y, color, cov);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32, radius: f32) {
        let Some((x0, y0, x1, y1)) = self.span(rect) else {
            return;
        };
        let inner = Rect::new(
            rect.x + width,
            rect.y + width,
            rect.w - 2.0 * width,
            rect.h - 2.0 * width,
        );
        let inner_r = (radius - width).max(0.0);
        for y in y0..y1 {
            for x in x0..x1 {
                if !self.in_clip(x, y) {
                    continue;
                }
                let outer = rounded_coverage(rect, radius, x, y);
                let hole = if inner.is_empty() {
                    0.0
                } else {
                    rounded_coverage(inner, inner_r, x, y)
                };
                self.blend(x, y, color, outer - hole);
            }
        }
    }

    fn draw_image(&mut self, rect: Rect, img: &ImageData, radius: f32) {
        if img.width == 0 || img.height == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if !self.in_clip(x, y) {
                    continue;
                }
                let cov = rounded_coverage(rect, radius, x, y);
                if cov <= 0.0 {
                    continue;
                }
                let u = ((x as f32 + 0.5 - rect.x) / rect.w * img.width as f32) as u32;
                let v = ((y as f32 + 0.5 - rect.y) / rect.h * img.height as f32) as u32;
                let [r, g, b, a] = img.pixel(u.min(img.width - 1), v.min(img.height - 1));
                self.blend(x, y, Color(r, g, b, a), cov);
            }
        }
    }

    fn draw_text(&mut self, text: &str, origin: Vec2, color: Color, size: f32, weight: FontWeight, align: TextAlign) {
        let Some(fonts) = self.fonts.as_ref() else {
            if !self.warned_no_font {
                log::warn!("no font loaded; skipping text");
                self.warned_no_font = true;
            }
            return;
        };
        let font = fonts.pick(weight).clone();
        let scaled = font.as_scaled(PxScale::from(size));

        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        let mut x = match align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - width / 2.0,
        };

        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                x += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(PxScale::from(size), point(x, origin.y));
            x += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let mut covered: Vec<(i64, i64, f32)> = Vec::new();
            outlined.draw(|gx, gy, cov| {
                covered.push((bounds.min.x as i64 + gx as i64, bounds.min.y as i64 + gy as i64, cov));
            });
            for (px, py, cov) in covered {
                if px < 0 || py < 0 || px >= self.target.width() as i64 || py >= self.target.height() as i64 {
                    continue;
                }
                let (px, py) = (px as u32, py as u32);
                if self.in_clip(px, py) {
                    self.blend(px, py, color, cov);
                }
            }
        }
    }
}

/// Coverage of pixel `(x, y)` by a rounded rectangle, via the signed
/// distance from the pixel centre.
fn rounded_coverage(rect: Rect, radius: f32, x: u32, y: u32) -> f32 {
    let r = radius.clamp(0.0, rect.w.min(rect.h) / 2.0);
    let c = rect.center();
    let (hx, hy) = (rect.w / 2.0 - r, rect.h / 2.0 - r);
    let qx = (x as f32 + 0.5 - c.x).abs() - hx;
    let qy = (y as f32 + 0.5 - c.y).abs() - hy;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    let dist = outside + inside - r;
    (0.5 - dist).clamp(0.0, 1.0)
}

impl RenderBackend for SoftBackend {
    fn configure_surface(&mut self, width: u32, height: u32) {
        if (width, height) != self.target.dimensions() {
            log::debug!("soft surface resized to {width}x{height}");
            self.target = RgbaImage::new(width, height);
        }
    }

    fn frame(&mut self, scene: &Scene) {
        let c = scene.clear_color;
        for px in self.target.pixels_mut() {
            px.0 = [c.0, c.1, c.2, c.3];
        }
        self.clip_stack.clear();

        for node in &scene.nodes {
            match node {
                SceneNode::Rect {
                    rect,
                    color,
                    radius,
                } => self.fill_rect(*rect, *color, *radius),
                SceneNode::Border {
                    rect,
                    color,
                    width,
                    radius,
                } => self.stroke_rect(*rect, *color, *width, *radius),
                SceneNode::Text {
                    origin,
                    text,
                    color,
                    size,
                    weight,
                    align,
                } => self.draw_text(text, *origin, *color, *size, *weight, *align),
                SceneNode::Image {
                    rect,
                    image,
                    radius,
                } => self.draw_image(*rect, image, *radius),
                SceneNode::PushClip { rect } => {
                    let next = rect
                        .intersect(&self.clip())
                        .unwrap_or(Rect::new(rect.x, rect.y, 0.0, 0.0));
                    self.clip_stack.push(next);
                }
                SceneNode::PopClip => {
                    if self.clip_stack.pop().is_none() {
                        log::warn!("PopClip with empty stack");
                    }
                }
            }
        }
        if !self.clip_stack.is_empty() {
            log::warn!("{} clip(s) left open at end of frame", self.clip_stack.len());
        }
    }
}
