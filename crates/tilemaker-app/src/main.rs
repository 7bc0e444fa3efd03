//! The `tilemaker` binary: load settings, build the atlases, print a summary.

mod options;
mod platform;

use clap::Parser;
use tilemaker_atlas::ImageCrateCodec;
use tilemaker_config::{CliArgs, Config};

use crate::options::{EXIT_FATAL, exit_status, pipeline_options};
use crate::platform::PlatformDirs;

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                std::process::exit(EXIT_FATAL);
            }
        },
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(EXIT_FATAL);
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs.create_dirs().is_ok().then_some(dirs.log_dir.as_path());
    tilemaker_log::init_logging(log_dir, cfg!(debug_assertions), Some(&config));
    tracing::debug!("config directory {}", dirs.config_dir.display());

    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        std::process::exit(EXIT_FATAL);
    }

    let options = pipeline_options(&config);
    let report = match tilemaker_atlas::run(&options, &ImageCrateCodec) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(EXIT_FATAL);
        }
    };

    println!("{}", report.diagnostics.summary());
    for (category, path) in &report.written {
        println!("{category:>9}: {}", path.display());
    }
    if report.processed_files == 0 {
        println!("No usable texture files were found.");
    } else {
        println!(
            "{} file(s) placed at {}x{} pixels per tile.",
            report.processed_files, report.tile_size, report.tile_size
        );
    }
    std::process::exit(exit_status(&report));
}
