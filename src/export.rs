use crate::calendar::Calendar;
use crate::cli::Cli;
use crate::config::{Mode, ZeroCells};
use crate::model::{ContributionDay, PlanOutput, SCHEMA_VERSION};
use crate::planner::Planner;
use crate::raster::GlyphFont;
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::path::PathBuf;

pub const IMAGE_FILE: &str = "calendar.png";
pub const ICALENDAR_FILE: &str = "contributions.ics";

pub fn exec(cli: Cli) -> anyhow::Result<()> {
    let font = GlyphFont::load(cli.font.as_deref()).context("Failed to load font")?;
    let config = cli.plan_config();
    let planner = Planner::new(font, config);

    let calendar = planner
        .plan(&cli.text, cli.year)
        .context("Failed to plan contribution calendar")?;
    tracing::info!(
        year = calendar.year(),
        first_sunday = %calendar.first_sunday(),
        "calendar planned"
    );

    std::fs::create_dir_all(&cli.output.out_dir).with_context(|| {
        format!("Failed to create output directory {}", cli.output.out_dir.display())
    })?;

    let mut written = Vec::new();
    if cli.save_image {
        let path = cli.output.out_dir.join(IMAGE_FILE);
        calendar
            .render_image(cli.render_options())
            .context("Failed to render calendar image")?
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "image written");
        written.push(path);
    }
    if cli.save_icalendar {
        let path = calendar
            .export_calendar_events(cli.output.out_dir.join(ICALENDAR_FILE), cli.zero_cells())
            .context("Failed to write iCalendar file")?;
        tracing::info!(path = %path.display(), "iCalendar written");
        written.push(path);
    }

    if cli.output.json {
        output_json(&calendar, &cli.text, config.mode)?;
    } else if cli.output.ndjson {
        output_ndjson(&calendar, cli.zero_cells())?;
    } else {
        output_summary(&calendar, &written)?;
    }

    Ok(())
}

pub fn output_json(calendar: &Calendar, text: &str, mode: Mode) -> anyhow::Result<()> {
    let output = PlanOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        text: text.to_string(),
        year: calendar.year(),
        mode,
        max_level: calendar.matrix().max_level(),
        first_sunday: calendar.first_sunday(),
        matrix: calendar.matrix().clone(),
        days: calendar.contribution_days(ZeroCells::Include).collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(calendar: &Calendar, zeros: ZeroCells) -> anyhow::Result<()> {
    for day in calendar.contribution_days(zeros) {
        println!("{}", serde_json::to_string(&day)?);
    }
    Ok(())
}

fn level_char(level: u8, max_level: u8) -> &'static str {
    if level == 0 {
        return "·";
    }
    // plain mode only ever has the top shade
    match (level as u32 * 4).div_ceil(max_level.max(1) as u32) {
        1 => "░",
        2 => "▒",
        3 => "▓",
        _ => "█",
    }
}

pub fn output_summary(calendar: &Calendar, written: &[PathBuf]) -> anyhow::Result<()> {
    let matrix = calendar.matrix();
    let max_level = matrix.max_level();

    println!(
        "{}",
        style(format!("Contribution Calendar {}", calendar.year())).bold()
    );
    println!("{}", "─".repeat(52));

    for levels in matrix.rows() {
        let line: String = levels.iter().map(|&level| level_char(level, max_level)).collect();
        println!("{}", style(line).green());
    }

    let days: Vec<ContributionDay> = calendar.contribution_days(ZeroCells::Skip).collect();
    println!();
    println!("First Sunday: {}", style(calendar.first_sunday()).dim());
    println!("Active days: {}", style(days.len()).cyan());
    println!("Total contributions: {}", style(matrix.total()).green());
    if let (Some(first), Some(last)) = (days.first(), days.last()) {
        println!(
            "Date range: {} to {}",
            style(first.date.format("%Y-%m-%d")).dim(),
            style(last.date.format("%Y-%m-%d")).dim()
        );
    }

    for path in written {
        println!("Wrote {}", style(path.display()).yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_chars_scale_with_ceiling() {
        assert_eq!(level_char(0, 4), "·");
        assert_eq!(level_char(1, 4), "░");
        assert_eq!(level_char(2, 4), "▒");
        assert_eq!(level_char(4, 4), "█");
        assert_eq!(level_char(1, 1), "█");
    }
}
