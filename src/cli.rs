use crate::config::{Mode, PlanConfig, RenderOptions, Rounding, TextAlign, ZeroCells};
use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gplan")]
#[command(about = "Draw text into a contribution calendar and export it as an image or iCalendar file")]
#[command(version)]
#[command(group(
    ArgGroup::new("outputs")
        .required(true)
        .multiple(true)
        .args(["save_icalendar", "save_image"])
))]
pub struct Cli {
    #[arg(help = "Text to draw into the calendar")]
    pub text: String,

    #[arg(short, long, help = "Calendar year (defaults to the current year)")]
    pub year: Option<i32>,

    #[arg(long, help = "Path to a TrueType/OpenType font (defaults to bundled DejaVu Sans Bold)")]
    pub font: Option<PathBuf>,

    #[arg(short = 'c', long, help = "Use all contribution levels instead of on/off cells")]
    pub commit_level: bool,

    #[arg(short = 'o', long, help = "Write contributions.ics")]
    pub save_icalendar: bool,

    #[arg(short = 's', long, help = "Write calendar.png")]
    pub save_image: bool,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,
}

#[derive(clap::Args, Clone)]
pub struct OutputArgs {
    #[arg(long, default_value = ".", help = "Directory for the written files")]
    pub out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Rounding::Nearest, help = "How intensities round to levels")]
    pub rounding: Rounding,

    #[arg(long, value_enum, default_value_t = TextAlign::Left, help = "Horizontal placement of shorter lines in multi-line text")]
    pub align: TextAlign,

    #[arg(long, help = "Also export days with no contributions as events")]
    pub include_empty: bool,

    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=RenderOptions::MAX_CELL_SIZE as i64), help = "Cell size in pixels")]
    pub cell_size: u32,

    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=RenderOptions::MAX_PADDING as i64), help = "Gap between cells in pixels")]
    pub padding: u32,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, conflicts_with = "json", help = "Output as NDJSON")]
    pub ndjson: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn mode(&self) -> Mode {
        if self.commit_level {
            Mode::Depth
        } else {
            Mode::Plain
        }
    }

    pub fn plan_config(&self) -> PlanConfig {
        PlanConfig::new(self.mode())
            .with_rounding(self.output.rounding)
            .with_align(self.output.align)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            cell_size: self.output.cell_size,
            padding: self.output.padding,
        }
    }

    pub fn zero_cells(&self) -> ZeroCells {
        if self.output.include_empty {
            ZeroCells::Include
        } else {
            ZeroCells::Skip
        }
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.verbose);
        crate::export::exec(self)
    }
}
