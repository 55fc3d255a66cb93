use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "logits-viewer",
    version,
    about = "Side-by-side viewer for CT volumes, segmentations and per-class network outputs",
    args_conflicts_with_subcommands = true
)]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Option<Commands>,

    #[command(flatten)]
    pub(super) view: ViewArgs,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Opens the viewer window (the default when no subcommand is given).
    View(ViewArgs),
    /// Prints kind, shape and value range of each file as JSON.
    Info {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Prints the effective configuration as YAML.
    Config {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write to this file (YAML or JSON by extension) instead of stdout.
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub(super) struct ViewArgs {
    /// YAML or JSON viewer configuration.
    #[arg(long)]
    pub(super) config: Option<PathBuf>,

    /// Classes listed in the readout before any logits are loaded.
    #[arg(short = 'n', long)]
    pub(super) num_classes: Option<usize>,

    /// Start with an all-zero volume of this shape.
    #[arg(short = 'd', long, num_args = 3, value_names = ["D", "H", "W"])]
    pub(super) dummy_data_size: Option<Vec<usize>>,

    #[arg(long)]
    pub(super) volume: Option<PathBuf>,

    #[arg(long)]
    pub(super) segmentation: Option<PathBuf>,

    /// Logits shown on the left canvas.
    #[arg(long)]
    pub(super) left: Option<PathBuf>,

    /// Logits shown on the right canvas.
    #[arg(long)]
    pub(super) right: Option<PathBuf>,
}
