//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "flowdesk", version)]
#[command(about = "Validate, inspect and render Flowdesk flow diagrams")]
#[command(
    after_help = "Environment:\n  FLOWDESK_LOG          Log filter (falls back to RUST_LOG)\n  FLOWDESK_LOG_FORMAT   pretty | compact | json\n  FLOWDESK_<SECTION>__<KEY>  Configuration override, e.g. FLOWDESK_CANVAS__WIDTH"
)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true, env = "FLOWDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Machine-readable output.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// More log output (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a snapshot for structural problems; exits with 1 when any are found.
    Validate {
        /// Snapshot JSON file.
        file: PathBuf,
    },
    /// Render a snapshot to PNG or JPEG.
    Render(RenderArgs),
    /// Print counts and ordering of a snapshot.
    Inspect {
        /// Snapshot JSON file.
        file: PathBuf,
    },
    /// List the node and edge palette.
    Shapes,
    /// Write a start → task → end sample snapshot.
    New {
        /// Output file.
        file: PathBuf,
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Snapshot JSON file.
    pub file: PathBuf,

    /// Output image.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format; taken from the output extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// JPEG quality.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Canvas width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Grow the canvas until every node fits.
    #[arg(long, default_value_t = false)]
    pub fit: bool,

    /// Solid background color.
    #[arg(long, conflicts_with = "gradient")]
    pub background: Option<String>,

    /// Linear gradient background.
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    pub gradient: Option<Vec<String>>,

    /// Gradient direction in degrees, 0 is left to right.
    #[arg(long, default_value_t = 0.0, requires = "gradient")]
    pub angle: f64,

    /// Background image (PNG or JPEG).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Background image opacity.
    #[arg(long, default_value_t = 1.0, requires = "image")]
    pub image_opacity: f64,

    /// Background image scale.
    #[arg(long, default_value_t = 1.0, requires = "image")]
    pub image_scale: f64,
}
