pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod ics;
pub mod logging;
pub mod model;
pub mod planner;
pub mod raster;

pub use calendar::{first_sunday, Calendar};
pub use config::{Mode, PlanConfig, RenderOptions, Rounding, ZeroCells};
pub use error::{PlanError, Result};
pub use model::{ContributionDay, ContributionMatrix};
pub use planner::Planner;
pub use raster::GlyphFont;
