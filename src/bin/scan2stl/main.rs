// scan2stl - Convert a directory of scanned images into STL relief models
//
// Pipeline (per image):
//   1. Load image into a pixel array
//   2. Threshold luminance into an elevation surface
//   3. Write the surface grid
//   4. Write an OpenSCAD script with DPI scale and base slab
//   5. Run OpenSCAD to produce the mesh
//
// Usage: scan2stl [--input-dir DIR] [--dpi N] [--threshold N] [--height MM] ...
// Every option can also be set through its SCAN2STL_* environment variable.

mod args;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use scan2stl::{run_batch, OpenScad};

use args::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = args.to_config().context("invalid configuration")?;
    let compiler = OpenScad::new(&args.openscad);

    info!(
        "scan2stl: {} -> {} (dpi {}, threshold {}, height {} mm)",
        cfg.input_dir.display(),
        cfg.output_dir.display(),
        cfg.dpi,
        cfg.threshold,
        cfg.height
    );

    let report = run_batch(&cfg, &compiler)
        .with_context(|| format!("batch over {} failed", cfg.input_dir.display()))?;
    report.log_summary();

    if !report.is_success() {
        bail!("{} of {} file(s) failed", report.failed(), report.outcomes.len() + report.not_run);
    }
    Ok(())
}
