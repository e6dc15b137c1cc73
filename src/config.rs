// config.rs - Run configuration
//
// Built once at startup and handed to the batch driver. All range checks
// happen here so the pipeline can assume sane values.

use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Directory of scanned images
    pub input_dir: PathBuf,
    /// Destination of `.dat` surface grids
    pub surface_dir: PathBuf,
    /// Destination of `.scad` wrapper scripts
    pub scad_dir: PathBuf,
    /// Destination of `.stl` meshes
    pub output_dir: PathBuf,
    /// Scan resolution
    pub dpi: f64,
    /// Luminance below which a pixel counts as ink
    pub threshold: u8,
    /// Slab and relief height in millimetres
    pub height: f64,
    /// Rebuild even when the mesh already exists
    pub force: bool,
    /// Stop the batch at the first failing file
    pub fail_fast: bool,
    /// Worker threads, 1 = sequential
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("img"),
            surface_dir: PathBuf::from("surface"),
            scad_dir: PathBuf::from("scad"),
            output_dir: PathBuf::from("model"),
            dpi: 600.0,
            threshold: 240,
            height: 10.0,
            force: false,
            fail_fast: false,
            jobs: 1,
        }
    }
}

impl Config {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::config(format!("dpi must be a positive number, got {}", self.dpi)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            let msg = format!("model height must be a positive number, got {}", self.height);
            return Err(Error::config(msg));
        }
        if self.jobs == 0 {
            return Err(Error::config("jobs must be at least 1"));
        }
        Ok(())
    }

    /// Return self if valid
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

/// Narrow a raw threshold to the 0..=255 luminance range
pub fn parse_threshold(raw: i64) -> Result<u8> {
    u8::try_from(raw)
        .map_err(|_| Error::config(format!("threshold must be within 0..=255, got {raw}")))
}
