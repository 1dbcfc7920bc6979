use crate::calendar::Calendar;
use crate::config::PlanConfig;
use crate::error::Result;
use crate::grid::map_to_grid;
use crate::raster::{rasterize, GlyphFont};
use chrono::{Datelike, Local};

/// Turns text into a [`Calendar`] using one font and one resolved configuration.
#[derive(Debug, Clone)]
pub struct Planner {
    font: GlyphFont,
    config: PlanConfig,
}

impl Planner {
    pub fn new(font: GlyphFont, config: PlanConfig) -> Self {
        Self { font, config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Runs rasterize → fit → quantize for `text`. `year` defaults to the
    /// current local year.
    pub fn plan(&self, text: &str, year: Option<i32>) -> Result<Calendar> {
        let year = year.unwrap_or_else(|| Local::now().year());

        let bitmap = rasterize(text, &self.font, &self.config)?;
        tracing::debug!(
            font = self.font.name(),
            width = bitmap.width(),
            height = bitmap.height(),
            "text rasterized"
        );

        let matrix = map_to_grid(&bitmap, &self.config)?;
        tracing::debug!(
            total = matrix.total(),
            max_level = matrix.max_level(),
            rounding = ?self.config.rounding,
            "grid quantized"
        );

        Calendar::new(year, matrix)
    }
}
