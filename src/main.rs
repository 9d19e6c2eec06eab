use std::path::PathBuf;
use std::process::ExitCode;

use slice_volume::{
    ImageFileIo,
    pipeline::{Pipeline, load_config},
};

fn main() -> ExitCode {
    env_logger::init();

    let Some(config_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: slice-volume <pipeline.json>");
        return ExitCode::FAILURE;
    };

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match Pipeline::run(&config, &ImageFileIo) {
        Ok(report) => {
            log::info!(
                "Done: {} operations completed, {} skipped",
                report.completed,
                report.skipped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to load volume from {}: {e}", config.input.display());
            ExitCode::FAILURE
        }
    }
}
