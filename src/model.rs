use crate::config::Mode;
use crate::error::{PlanError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};

pub const SCHEMA_VERSION: u32 = 1;

/// Weeks shown in a yearly contribution calendar.
pub const GRID_WEEKS: usize = 52;
/// Days per week, one grid row each.
pub const GRID_DAYS: usize = 7;

/// A 7×52 grid of contribution levels.
///
/// Rows are weekdays and columns are weeks. Every cell is guaranteed to lie in
/// `0..=max_level`; the constructor rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionMatrix {
    max_level: u8,
    cells: [[u8; GRID_WEEKS]; GRID_DAYS],
}

impl ContributionMatrix {
    pub fn new(cells: [[u8; GRID_WEEKS]; GRID_DAYS], max_level: u8) -> Result<Self> {
        if let Some(&level) = cells.iter().flatten().find(|&&level| level > max_level) {
            return Err(PlanError::LevelOutOfRange { level, max: max_level });
        }
        Ok(Self { max_level, cells })
    }

    pub fn zeros(max_level: u8) -> Self {
        Self {
            max_level,
            cells: [[0; GRID_WEEKS]; GRID_DAYS],
        }
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> &[[u8; GRID_WEEKS]; GRID_DAYS] {
        &self.cells
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().map(|&level| level as u64).sum()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(|&level| level == 0)
    }
}

// Serialized as 7 arrays of 52 levels; serde has no derive for arrays this long.
impl Serialize for ContributionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.iter().map(|row| row.as_slice()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub text: String,
    pub year: i32,
    pub mode: Mode,
    pub max_level: u8,
    pub first_sunday: NaiveDate,
    pub matrix: ContributionMatrix,
    pub days: Vec<ContributionDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_cells_above_ceiling() {
        let mut cells = [[0u8; GRID_WEEKS]; GRID_DAYS];
        cells[3][10] = 2;
        match ContributionMatrix::new(cells, 1) {
            Err(PlanError::LevelOutOfRange { level, max }) => {
                assert_eq!(level, 2);
                assert_eq!(max, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn totals_and_lookup() {
        let mut cells = [[0u8; GRID_WEEKS]; GRID_DAYS];
        cells[0][0] = 4;
        cells[6][51] = 3;
        let matrix = ContributionMatrix::new(cells, 4).unwrap();
        assert_eq!(matrix.total(), 7);
        assert_eq!(matrix.get(6, 51), Some(3));
        assert_eq!(matrix.get(7, 0), None);
        assert!(!matrix.is_blank());
        assert!(ContributionMatrix::zeros(4).is_blank());
    }

    #[test]
    fn serializes_as_row_arrays() {
        let mut cells = [[0u8; GRID_WEEKS]; GRID_DAYS];
        cells[2][5] = 1;
        let matrix = ContributionMatrix::new(cells, 1).unwrap();

        let value = serde_json::to_value(&matrix).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), GRID_DAYS);
        assert!(rows.iter().all(|r| r.as_array().map(|r| r.len()) == Some(GRID_WEEKS)));
        assert_eq!(rows[2][5], 1);
        assert_eq!(rows[0][0], 0);
    }
}
