// args.rs - Command line and environment options
//
// Every option is a long flag that falls back to a SCAN2STL_* variable,
// then to the default.

use std::path::PathBuf;

use clap::Parser;
use scan2stl::compiler::OpenScad;
use scan2stl::config::{parse_threshold, Config};

#[derive(Parser, Debug, Clone)]
#[command(name = "scan2stl", version, about = "Turn scanned images into printable relief models")]
pub struct Args {
    /// Directory of scanned images
    #[arg(long, env = "SCAN2STL_INPUT_DIR", default_value = "img")]
    pub input_dir: PathBuf,

    /// Where surface grids (.dat) are written
    #[arg(long, env = "SCAN2STL_SURFACE_DIR", default_value = "surface")]
    pub surface_dir: PathBuf,

    /// Where OpenSCAD scripts (.scad) are written
    #[arg(long, env = "SCAN2STL_SCAD_DIR", default_value = "scad")]
    pub scad_dir: PathBuf,

    /// Where meshes (.stl) are written
    #[arg(long, env = "SCAN2STL_OUTPUT_DIR", default_value = "model")]
    pub output_dir: PathBuf,

    /// Scan resolution in dots per inch
    #[arg(long, env = "SCAN2STL_IMAGE_DPI", default_value_t = 600.0)]
    pub dpi: f64,

    /// Pixels with mean RGB below this are ink (0-255)
    #[arg(
        long,
        env = "SCAN2STL_BG_THRESHOLD",
        default_value_t = 240,
        allow_negative_numbers = true
    )]
    pub threshold: i64,

    /// Model height in millimetres
    #[arg(long, env = "SCAN2STL_MODEL_HEIGHT", default_value_t = 10.0)]
    pub height: f64,

    /// OpenSCAD executable
    #[arg(long, env = "SCAN2STL_OPENSCAD", default_value = OpenScad::DEFAULT_PROGRAM)]
    pub openscad: String,

    /// Rebuild models that already exist
    #[arg(long, env = "SCAN2STL_FORCE")]
    pub force: bool,

    /// Stop at the first file that fails
    #[arg(long, env = "SCAN2STL_FAIL_FAST")]
    pub fail_fast: bool,

    /// Files processed in parallel
    #[arg(long, env = "SCAN2STL_JOBS", default_value_t = 1)]
    pub jobs: usize,
}

impl Args {
    pub fn to_config(&self) -> scan2stl::Result<Config> {
        Config {
            input_dir: self.input_dir.clone(),
            surface_dir: self.surface_dir.clone(),
            scad_dir: self.scad_dir.clone(),
            output_dir: self.output_dir.clone(),
            dpi: self.dpi,
            threshold: parse_threshold(self.threshold)?,
            height: self.height,
            force: self.force,
            fail_fast: self.fail_fast,
            jobs: self.jobs,
        }
        .validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override() {
        let args = Args::try_parse_from([
            "scan2stl",
            "--input-dir", "scans",
            "--dpi", "1200",
            "--threshold", "128",
            "--height", "3.5",
            "--force",
            "--jobs", "4",
        ])
        .unwrap();
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.input_dir, PathBuf::from("scans"));
        assert_eq!(cfg.dpi, 1200.0);
        assert_eq!(cfg.threshold, 128);
        assert_eq!(cfg.height, 3.5);
        assert!(cfg.force);
        assert_eq!(cfg.jobs, 4);
    }

    #[test]
    fn test_out_of_range_rejected() {
        for bad in ["--threshold=300", "--threshold=-1", "--dpi=0", "--height=-2", "--jobs=0"] {
            let args = Args::try_parse_from(["scan2stl", bad]).unwrap();
            assert!(args.to_config().is_err(), "{bad}");
        }
    }
}
