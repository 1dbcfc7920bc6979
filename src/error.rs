use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Font error ({path}): {reason}")]
    FontLoad { path: PathBuf, reason: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid year: {0}")]
    InvalidYear(i32),
    #[error("Contribution level {level} is outside 0..={max}")]
    LevelOutOfRange { level: u8, max: u8 },
    #[error("Image error: {0}")]
    ImageEncoding(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl PlanError {
    pub(crate) fn font_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PlanError::FontLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
