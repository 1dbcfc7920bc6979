use crate::config::{RenderOptions, ZeroCells};
use crate::error::{PlanError, Result};
use crate::ics;
use crate::model::{ContributionDay, ContributionMatrix, GRID_DAYS, GRID_WEEKS};
use chrono::{Datelike, Days, NaiveDate, Utc};
use image::{imageops, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Heatmap colors, from no activity to the busiest level.
pub const PALETTE: [Rgb<u8>; 5] = [
    Rgb([0xeb, 0xed, 0xf0]),
    Rgb([0x9b, 0xe9, 0xa8]),
    Rgb([0x40, 0xc4, 0x63]),
    Rgb([0x30, 0xa1, 0x4e]),
    Rgb([0x21, 0x6e, 0x39]),
];

pub fn palette_color(level: u8) -> Result<Rgb<u8>> {
    PALETTE
        .get(level as usize)
        .copied()
        .ok_or(PlanError::LevelOutOfRange {
            level,
            max: (PALETTE.len() - 1) as u8,
        })
}

/// First Sunday on or after January 1 of `year`.
pub fn first_sunday(year: i32) -> Result<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(PlanError::InvalidYear(year))?;
    let offset = (6 - jan1.weekday().num_days_from_monday()) % 7;
    jan1.checked_add_days(Days::new(offset as u64))
        .ok_or(PlanError::InvalidYear(year))
}

/// A contribution grid pinned to a year.
#[derive(Debug, Clone)]
pub struct Calendar {
    year: i32,
    start: NaiveDate,
    matrix: ContributionMatrix,
}

impl Calendar {
    pub fn new(year: i32, matrix: ContributionMatrix) -> Result<Self> {
        let start = first_sunday(year)?;
        // the last cell must still be a representable date
        start
            .checked_add_days(Days::new((GRID_WEEKS * GRID_DAYS - 1) as u64))
            .ok_or(PlanError::InvalidYear(year))?;
        Ok(Self { year, start, matrix })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_sunday(&self) -> NaiveDate {
        self.start
    }

    pub fn matrix(&self) -> &ContributionMatrix {
        &self.matrix
    }

    /// Days of the grid in week-then-weekday order.
    pub fn contribution_days(&self, zeros: ZeroCells) -> impl Iterator<Item = ContributionDay> + '_ {
        (0..GRID_WEEKS)
            .flat_map(|week| (0..GRID_DAYS).map(move |day| (week, day)))
            .filter_map(move |(week, day)| {
                let level = self.matrix.rows()[day][week];
                if level == 0 && zeros == ZeroCells::Skip {
                    return None;
                }
                let offset = (week * GRID_DAYS + day) as u64;
                let date = self.start + Days::new(offset);
                Some(ContributionDay { date, level })
            })
    }

    pub fn render_image(&self, options: RenderOptions) -> Result<RgbImage> {
        let (width, height) = options.canvas_size(GRID_WEEKS as u32, GRID_DAYS as u32)?;
        let RenderOptions { cell_size, padding } = options;
        let pitch = cell_size + padding;
        let tiles = PALETTE.map(|color| RgbImage::from_pixel(cell_size, cell_size, color));

        let mut image = RgbImage::from_pixel(width, height, PALETTE[0]);
        for (row, levels) in self.matrix.rows().iter().enumerate() {
            for (col, &level) in levels.iter().enumerate() {
                palette_color(level)?;
                let left = col as u32 * pitch;
                let top = row as u32 * pitch;
                imageops::replace(&mut image, &tiles[level as usize], left as i64, top as i64);
            }
        }
        Ok(image)
    }

    /// Writes one all-day event per contribution day to `path`.
    pub fn export_calendar_events<P: AsRef<Path>>(&self, path: P, zeros: ZeroCells) -> Result<PathBuf> {
        let path = path.as_ref();
        let days: Vec<ContributionDay> = self.contribution_days(zeros).collect();
        let payload = ics::write_calendar(&days, Utc::now());
        std::fs::write(path, payload)?;
        tracing::debug!(events = days.len(), path = %path.display(), "calendar events written");
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn first_sunday_of_2024() {
        assert_eq!(first_sunday(2024).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
    }

    #[test]
    fn first_sunday_when_new_year_is_sunday() {
        // Jan 1 2023 was a Sunday
        assert_eq!(first_sunday(2023).unwrap(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn first_sunday_is_always_in_first_week() {
        for year in 1900..2200 {
            let date = first_sunday(year).unwrap();
            assert_eq!(date.weekday(), Weekday::Sun);
            assert_eq!(date.year(), year);
            assert_eq!(date.month(), 1);
            assert!(date.day() <= 7);
        }
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        assert!(matches!(first_sunday(i32::MAX), Err(PlanError::InvalidYear(_))));
    }

    #[test]
    fn palette_lookup_is_checked() {
        assert_eq!(palette_color(0).unwrap(), PALETTE[0]);
        assert_eq!(palette_color(4).unwrap(), PALETTE[4]);
        assert!(matches!(palette_color(5), Err(PlanError::LevelOutOfRange { level: 5, max: 4 })));
    }

    #[test]
    fn oversized_geometry_is_rejected() {
        let calendar = Calendar::new(2024, ContributionMatrix::zeros(1)).unwrap();
        for options in [
            RenderOptions { cell_size: 100_000_000, padding: 2 },
            RenderOptions { cell_size: 20, padding: u32::MAX / 10 },
            RenderOptions { cell_size: 0, padding: 2 },
        ] {
            let err = calendar.render_image(options).unwrap_err();
            assert!(matches!(err, PlanError::InvalidArgument(_)), "{options:?}");
        }
    }

    #[test]
    fn largest_allowed_geometry_renders() {
        let calendar = Calendar::new(2024, ContributionMatrix::zeros(1)).unwrap();
        let options = RenderOptions {
            cell_size: RenderOptions::MAX_CELL_SIZE,
            padding: RenderOptions::MAX_PADDING,
        };
        let image = calendar.render_image(options).unwrap();
        assert_eq!(image.dimensions(), (52 * 256 + 51 * 64, 7 * 256 + 6 * 64));
    }

    #[test]
    fn days_walk_weeks_then_weekdays() {
        let mut cells = [[0u8; GRID_WEEKS]; GRID_DAYS];
        cells[1][0] = 2;
        cells[0][1] = 3;
        let calendar = Calendar::new(2024, ContributionMatrix::new(cells, 4).unwrap()).unwrap();

        let days: Vec<_> = calendar.contribution_days(ZeroCells::Skip).collect();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(days[0].level, 2);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert_eq!(days[1].level, 3);
    }
}
