use crate::config::PlanConfig;
use crate::error::Result;
use crate::model::{ContributionMatrix, GRID_DAYS, GRID_WEEKS};
use crate::raster::Bitmap;
use image::imageops::{self, FilterType};
use image::GrayImage;

/// Width and height the bitmap is scaled to before centering.
///
/// Height always fills the grid; width follows the aspect ratio and is capped
/// at the grid width, so wide text gets squeezed and narrow text leaves
/// empty weeks on both sides.
pub fn fitted_size(width: u32, height: u32) -> (u32, u32) {
    let rows = GRID_DAYS as u32;
    if width == 0 || height == 0 {
        return (1, rows);
    }
    let aspect = width as f64 / height as f64;
    let fitted = (rows as f64 * aspect).round() as u32;
    (fitted.clamp(1, GRID_WEEKS as u32), rows)
}

/// Scales `bitmap` into a blank 52×7 canvas, centered.
pub fn fit_to_grid(bitmap: &Bitmap) -> GrayImage {
    let (width, height) = fitted_size(bitmap.width(), bitmap.height());
    let resized = imageops::resize(bitmap, width, height, FilterType::Lanczos3);

    let mut canvas = GrayImage::new(GRID_WEEKS as u32, GRID_DAYS as u32);
    let x = (GRID_WEEKS as u32 - width) / 2;
    let y = (GRID_DAYS as u32 - height) / 2;
    imageops::replace(&mut canvas, &resized, x as i64, y as i64);
    canvas
}

/// Linearly rescales pixel intensities of a 52×7 canvas to contribution levels.
///
/// A canvas with a single intensity (blank text) yields an all-zero matrix.
pub fn quantize(canvas: &GrayImage, config: &PlanConfig) -> Result<ContributionMatrix> {
    let max_level = config.max_level;
    let (min_val, max_val) = canvas
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if min_val >= max_val {
        return Ok(ContributionMatrix::zeros(max_level));
    }

    let range = (max_val - min_val) as f64;
    let mut cells = [[0u8; GRID_WEEKS]; GRID_DAYS];
    for (row, cells_row) in cells.iter_mut().enumerate() {
        for (col, cell) in cells_row.iter_mut().enumerate() {
            let pixel = canvas.get_pixel(col as u32, row as u32).0[0];
            // integer numerator keeps exact multiples exact under Ceil
            let scaled = ((pixel - min_val) as u32 * max_level as u32) as f64 / range;
            *cell = config.rounding.apply(scaled).clamp(0.0, max_level as f64) as u8;
        }
    }

    ContributionMatrix::new(cells, max_level)
}

/// Resizes, centers and quantizes a rasterized bitmap into the contribution grid.
pub fn map_to_grid(bitmap: &Bitmap, config: &PlanConfig) -> Result<ContributionMatrix> {
    let canvas = fit_to_grid(bitmap);
    quantize(&canvas, config)
}
