use crate::config::{ColorDepth, PlanConfig, TextAlign, FONT_SIZE, LINE_SPACING};
use crate::error::{PlanError, Result};
use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{imageops, GrayImage};
use std::path::Path;

/// Greyscale bitmap: 0 is background, 255 is full ink.
pub type Bitmap = GrayImage;

const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

/// A loaded font face used for rasterizing text.
#[derive(Clone)]
pub struct GlyphFont {
    font: FontArc,
    name: String,
}

impl GlyphFont {
    /// DejaVu Sans Bold, compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| PlanError::font_load("<bundled>", e))?;
        Ok(Self {
            font,
            name: "DejaVu Sans Bold (bundled)".to_string(),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| PlanError::font_load(path, e))?;
        let font = FontArc::try_from_vec(data).map_err(|e| PlanError::font_load(path, e))?;
        Ok(Self {
            font,
            name: path.display().to_string(),
        })
    }

    /// Loads `path` when given, the bundled face otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ab_glyph scales by ascent-to-descent height, not by em.
    fn scale(&self) -> PxScale {
        match self.font.units_per_em() {
            Some(units) if units > 0.0 => {
                PxScale::from(FONT_SIZE * self.font.height_unscaled() / units)
            }
            _ => PxScale::from(FONT_SIZE),
        }
    }
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont").field("name", &self.name).finish()
    }
}

struct LineLayout {
    glyphs: Vec<(GlyphId, f32)>,
    width: f32,
}

fn layout_line<F: Font, S: ScaleFont<F>>(font: &S, line: &str) -> LineLayout {
    let mut glyphs = Vec::with_capacity(line.len());
    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for c in line.chars() {
        let id = font.glyph_id(c);
        if let Some(previous) = previous {
            caret += font.kern(previous, id);
        }
        glyphs.push((id, caret));
        caret += font.h_advance(id);
        previous = Some(id);
    }

    LineLayout {
        glyphs,
        width: caret,
    }
}

fn ink(coverage: f32, depth: ColorDepth) -> u8 {
    match depth {
        ColorDepth::Grey => (coverage.clamp(0.0, 1.0) * 255.0).round() as u8,
        ColorDepth::Binary if coverage >= 0.5 => 255,
        ColorDepth::Binary => 0,
    }
}

/// Renders `text` with `font` and trims the result to its inked area.
///
/// Lines are split on `\n` and stacked with [`LINE_SPACING`] extra pixels
/// between them. The canvas is as wide as the widest line; shorter lines sit
/// at its left edge unless the config asks for [`TextAlign::Center`].
/// Text that leaves no ink (whitespace only) comes back as the untrimmed
/// blank canvas.
pub fn rasterize(text: &str, font: &GlyphFont, config: &PlanConfig) -> Result<Bitmap> {
    if text.is_empty() {
        return Err(PlanError::InvalidArgument("text must not be empty".to_string()));
    }

    let scale = font.scale();
    let scaled = font.font.as_scaled(scale);
    let lines: Vec<LineLayout> = text.split('\n').map(|line| layout_line(&scaled, line)).collect();

    let ascent = scaled.ascent();
    let line_height = ascent - scaled.descent();
    let pitch = line_height + LINE_SPACING;
    let widest = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);

    let width = (widest.ceil() as u32).max(1);
    let height = (((lines.len() - 1) as f32 * pitch + line_height).ceil() as u32).max(1);
    let mut canvas = GrayImage::new(width, height);
    tracing::trace!(width, height, lines = lines.len(), "text canvas allocated");

    for (index, line) in lines.iter().enumerate() {
        let left = match config.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => (widest - line.width) / 2.0,
        };
        let baseline = index as f32 * pitch + ascent;

        for &(id, x) in &line.glyphs {
            let glyph = id.with_scale_and_position(scale, point(left + x, baseline));
            let Some(outlined) = font.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                let value = ink(coverage, config.color_depth);
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                pixel.0[0] = pixel.0[0].max(value);
            });
        }
    }

    Ok(trim(canvas))
}

/// Bounding box `(x, y, width, height)` of all non-background pixels.
pub fn ink_bounds(bitmap: &Bitmap) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in bitmap.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

pub fn trim(bitmap: Bitmap) -> Bitmap {
    match ink_bounds(&bitmap) {
        Some((x, y, w, h)) => imageops::crop_imm(&bitmap, x, y, w, h).to_image(),
        None => bitmap,
    }
}
