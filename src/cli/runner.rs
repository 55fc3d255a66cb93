use clap::Parser;

use crate::config::{ViewerConfig, load_config, save_config};
use crate::formats::summarize;
use crate::session::{AssignTarget, Assignment};
use crate::ui::{self, LaunchOptions};

use super::types::{Cli, Commands, ViewArgs};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        None => ui::run(launch_options(cli.view)?),
        Some(Commands::View(args)) => ui::run(launch_options(args)?),
        Some(Commands::Info { inputs }) => {
            let summaries = inputs
                .iter()
                .map(|input| {
                    summarize(input).map_err(|error| format!("{}: {error}", input.display()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&summaries).map_err(|error| error.to_string())?
            );
            Ok(())
        }
        Some(Commands::Config { config, write }) => {
            if let Some(yaml) = export_config(config.as_deref(), write.as_deref())? {
                print!("{yaml}");
            }
            Ok(())
        }
    }
}

/// Writes the effective config to `write`, or returns it as YAML.
pub(super) fn export_config(
    path: Option<&std::path::Path>,
    write: Option<&std::path::Path>,
) -> Result<Option<String>, String> {
    let config = resolve_config(path, None)?;
    match write {
        Some(target) => {
            save_config(target, &config).map_err(|error| error.to_string())?;
            log::info!("wrote configuration to {}", target.display());
            Ok(None)
        }
        None => serde_yaml::to_string(&config)
            .map(Some)
            .map_err(|error| error.to_string()),
    }
}

fn resolve_config(
    path: Option<&std::path::Path>,
    num_classes: Option<usize>,
) -> Result<ViewerConfig, String> {
    let mut config = match path {
        Some(path) => load_config(path).map_err(|error| error.to_string())?,
        None => ViewerConfig::default(),
    };
    if let Some(num_classes) = num_classes {
        config.num_classes = num_classes;
    }
    config.validate().map_err(|error| error.to_string())?;
    Ok(config)
}

pub(super) fn launch_options(args: ViewArgs) -> Result<LaunchOptions, String> {
    let config = resolve_config(args.config.as_deref(), args.num_classes)?;
    let dummy_shape = match args.dummy_data_size.as_deref() {
        None => None,
        Some(&[depth, height, width]) => Some([depth, height, width]),
        Some(other) => {
            return Err(format!(
                "--dummy-data-size takes depth, height and width, found {other:?}"
            ));
        }
    };
    let assignments = [
        (args.volume, AssignTarget::Volume),
        (args.segmentation, AssignTarget::Segmentation),
        (args.left, AssignTarget::LogitsLeft),
        (args.right, AssignTarget::LogitsRight),
    ]
    .into_iter()
    .filter_map(|(path, target)| path.map(|path| Assignment::new(path, target)))
    .collect();

    Ok(LaunchOptions {
        config,
        dummy_shape,
        assignments,
    })
}
