use crate::error::{PlanError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Highest contribution level the platform heatmap distinguishes.
pub const CONTRIBUTION_LEVELS: u8 = 4;

/// Fixed em size, in pixels, used to rasterize text.
pub const FONT_SIZE: f32 = 30.0;

/// Extra vertical space between rasterized lines.
pub const LINE_SPACING: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Depth,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorDepth {
    Grey,
    Binary,
}

/// How a normalized intensity is turned into an integer level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Nearest,
    Ceil,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Nearest => value.round(),
            Rounding::Ceil => value.ceil(),
        }
    }
}

/// Placement of lines narrower than the widest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Whether level-0 cells take part in day iteration and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroCells {
    Include,
    Skip,
}

/// Pipeline settings, resolved once from a [`Mode`] and passed to every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConfig {
    pub mode: Mode,
    pub color_depth: ColorDepth,
    pub max_level: u8,
    pub rounding: Rounding,
    pub align: TextAlign,
}

impl PlanConfig {
    pub fn new(mode: Mode) -> Self {
        let (color_depth, max_level) = match mode {
            Mode::Depth => (ColorDepth::Grey, CONTRIBUTION_LEVELS),
            Mode::Plain => (ColorDepth::Binary, 1),
        };
        Self {
            mode,
            color_depth,
            max_level,
            rounding: Rounding::default(),
            align: TextAlign::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Cell geometry for the rendered calendar image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub cell_size: u32,
    pub padding: u32,
}

impl RenderOptions {
    pub const MAX_CELL_SIZE: u32 = 256;
    pub const MAX_PADDING: u32 = 64;

    /// Pixel size of a grid with `cols` × `rows` cells.
    pub fn canvas_size(&self, cols: u32, rows: u32) -> Result<(u32, u32)> {
        if self.cell_size == 0 || self.cell_size > Self::MAX_CELL_SIZE {
            return Err(PlanError::InvalidArgument(format!(
                "cell size must be within 1..={}, got {}",
                Self::MAX_CELL_SIZE,
                self.cell_size
            )));
        }
        if self.padding > Self::MAX_PADDING {
            return Err(PlanError::InvalidArgument(format!(
                "padding must be within 0..={}, got {}",
                Self::MAX_PADDING,
                self.padding
            )));
        }
        let span = |cells: u32| {
            let gaps = cells.saturating_sub(1);
            self.cell_size
                .checked_mul(cells)
                .zip(self.padding.checked_mul(gaps))
                .and_then(|(cells, gaps)| cells.checked_add(gaps))
                .ok_or_else(|| PlanError::InvalidArgument("calendar image is too large".to_string()))
        };
        Ok((span(cols)?, span(rows)?))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: 20,
            padding: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_resolves_depth_and_ceiling() {
        let depth = PlanConfig::new(Mode::Depth);
        assert_eq!(depth.color_depth, ColorDepth::Grey);
        assert_eq!(depth.max_level, 4);

        let plain = PlanConfig::new(Mode::Plain);
        assert_eq!(plain.color_depth, ColorDepth::Binary);
        assert_eq!(plain.max_level, 1);
        assert_eq!(plain.rounding, Rounding::Nearest);
        assert_eq!(plain.align, TextAlign::Left);
    }

    #[test]
    fn rounding_policies_differ_on_fractions() {
        assert_eq!(Rounding::Nearest.apply(1.2), 1.0);
        assert_eq!(Rounding::Ceil.apply(1.2), 2.0);
        assert_eq!(Rounding::Ceil.apply(3.0), 3.0);
    }
}
