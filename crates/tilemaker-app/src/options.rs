//! Translation of the persisted configuration into pipeline parameters.

use tilemaker_atlas::{PipelineOptions, RunReport};
use tilemaker_config::Config;

/// Exit status when the run produced nothing or counted errors.
pub const EXIT_WITH_ERRORS: i32 = 2;
/// Exit status for fatal errors.
pub const EXIT_FATAL: i32 = 1;

/// Plain pipeline parameters from a loaded, overridden config.
pub fn pipeline_options(config: &Config) -> PipelineOptions {
    PipelineOptions {
        input_dirs: config.input.directories.clone(),
        output_dir: config.output.directory.clone(),
        output_name: config.output.name.clone(),
        forced_tile_size: config.output.tile_size,
        base_image: config.output.base_image.clone(),
        chosen_frame: config.processing.chosen_frame,
        slope_scale: config.processing.height_slope_scale,
        verbose: config.debug.verbose,
        clean_normals: config.processing.clean_normals,
        use_alternates: config.input.alternate_names,
        skip_directories: config.input.skip_directories.clone(),
    }
}

/// Process exit status for a finished run.
pub fn exit_status(report: &RunReport) -> i32 {
    if report.succeeded() { 0 } else { EXIT_WITH_ERRORS }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tilemaker_atlas::Diagnostics;
    use tilemaker_atlas::diagnostics::DiagnosticClass;

    use super::*;

    #[test]
    fn test_options_follow_config() {
        let mut config = Config::default();
        config.input.directories = vec![PathBuf::from("a"), PathBuf::from("b")];
        config.input.alternate_names = false;
        config.output.tile_size = Some(32);
        config.processing.height_slope_scale = 2.0;
        config.debug.verbose = true;

        let options = pipeline_options(&config);
        assert_eq!(options.input_dirs.len(), 2);
        assert_eq!(options.output_name, "terrainExt");
        assert_eq!(options.forced_tile_size, Some(32));
        assert_eq!(options.slope_scale, 2.0);
        assert!(!options.use_alternates);
        assert!(options.verbose);
        assert!(options.clean_normals);
    }

    #[test]
    fn test_exit_status() {
        let mut report = RunReport {
            tile_size: 16,
            written: Vec::new(),
            processed_files: 3,
            diagnostics: Diagnostics::new(),
        };
        assert_eq!(exit_status(&report), 0);

        report.diagnostics.warn(DiagnosticClass::UnusedFile, "x.png");
        assert_eq!(exit_status(&report), 0);

        report.diagnostics.error(DiagnosticClass::ReadError, "y.png");
        assert_eq!(exit_status(&report), EXIT_WITH_ERRORS);

        let empty = RunReport {
            tile_size: 0,
            written: Vec::new(),
            processed_files: 0,
            diagnostics: Diagnostics::new(),
        };
        assert_eq!(exit_status(&empty), EXIT_WITH_ERRORS);
    }
}
