//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Builds per-channel terrain atlases from a folder of block textures.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tilemaker", version)]
pub struct CliArgs {
    /// Texture directory to search; repeat for several, earlier ones win.
    #[arg(short, long = "input", value_name = "DIR")]
    pub inputs: Vec<PathBuf>,

    /// Directory the atlases are written to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Atlas file stem.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Forced output tile size (a power of two).
    #[arg(short, long)]
    pub tile_size: Option<u32>,

    /// Existing color atlas to start from.
    #[arg(long, value_name = "FILE")]
    pub base_image: Option<PathBuf>,

    /// Frame to take from animation strips (0-based).
    #[arg(long)]
    pub frame: Option<u32>,

    /// Height field slope scale.
    #[arg(long)]
    pub slope: Option<f32>,

    /// Leave normal maps exactly as supplied.
    #[arg(long)]
    pub no_clean_normals: bool,

    /// Only accept current texture names.
    #[arg(long)]
    pub no_alternate_names: bool,

    /// Report every placed file.
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Input directories given on the command line replace the configured list.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if !args.inputs.is_empty() {
            self.input.directories = args.inputs.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(ref name) = args.name {
            self.output.name = name.clone();
        }
        if let Some(size) = args.tile_size {
            self.output.tile_size = Some(size);
        }
        if let Some(ref base) = args.base_image {
            self.output.base_image = Some(base.clone());
        }
        if let Some(frame) = args.frame {
            self.processing.chosen_frame = Some(frame);
        }
        if let Some(slope) = args.slope {
            self.processing.height_slope_scale = slope;
        }
        if args.no_clean_normals {
            self.processing.clean_normals = false;
        }
        if args.no_alternate_names {
            self.input.alternate_names = false;
        }
        if args.verbose {
            self.debug.verbose = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        config.input.directories = vec![PathBuf::from("old")];
        let args = CliArgs::parse_from([
            "tilemaker",
            "-i",
            "blocks",
            "--input",
            "extra",
            "--tile-size",
            "32",
            "--slope",
            "1.5",
            "--no-clean-normals",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(
            config.input.directories,
            vec![PathBuf::from("blocks"), PathBuf::from("extra")]
        );
        assert_eq!(config.output.tile_size, Some(32));
        assert_eq!(config.processing.height_slope_scale, 1.5);
        assert!(!config.processing.clean_normals);
        // Non-overridden fields retain defaults
        assert_eq!(config.output.name, "terrainExt");
        assert!(config.input.alternate_names);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.output.tile_size = Some(16);
        let original = config.clone();
        config.apply_cli_overrides(&CliArgs::parse_from(["tilemaker"]));
        assert_eq!(config, original);
    }

    #[test]
    fn test_flags() {
        let args = CliArgs::parse_from([
            "tilemaker",
            "--no-alternate-names",
            "-v",
            "--log-level",
            "trace",
            "--frame",
            "4",
            "--name",
            "atlas",
        ]);
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert!(!config.input.alternate_names);
        assert!(config.debug.verbose);
        assert_eq!(config.debug.log_level, "trace");
        assert_eq!(config.processing.chosen_frame, Some(4));
        assert_eq!(config.output.name, "atlas");
    }
}
