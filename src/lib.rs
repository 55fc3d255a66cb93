pub mod cli;
pub mod compose;
pub mod config;
pub mod formats;
pub mod model;
pub mod session;
pub mod ui;
pub mod viewport;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
