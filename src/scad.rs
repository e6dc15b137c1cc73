// scad.rs - OpenSCAD wrapper script
//
// Scales the surface from pixels to millimetres (25.4 / dpi per pixel),
// stretches Z to the model height, then cuts a slab of that height out
// from below so the relief sits on a flat printable base.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Millimetres per pixel at the given scan resolution
#[inline]
pub fn scale_for_dpi(dpi: f64) -> f64 {
    MM_PER_INCH / dpi
}

/// Inputs for a wrapper script
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScadParams {
    /// Scan resolution, dots per inch
    pub dpi: f64,
    /// Slab and relief height in millimetres
    pub height: f64,
    /// Surface width in pixels
    pub cols: usize,
    /// Surface height in pixels
    pub rows: usize,
}

impl ScadParams {
    pub fn new(dpi: f64, height: f64, (rows, cols): (usize, usize)) -> Self {
        Self { dpi, height, cols, rows }
    }

    fn check(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::invalid_parameter(format!("dpi must be positive, got {}", self.dpi)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            let msg = format!("height must be positive, got {}", self.height);
            return Err(Error::invalid_parameter(msg));
        }
        Ok(())
    }
}

/// Render the OpenSCAD source that wraps `surface_path`
pub fn render_scad(surface_path: &Path, p: &ScadParams) -> Result<String> {
    p.check()?;
    let scale = scale_for_dpi(p.dpi);
    let file = quote(&surface_path.to_string_lossy());

    Ok(format!(
        "scale([{scale:.5}, {scale:.5}, {h:.3}]) {{
    difference() {{
        surface(file = {file}, center=true);
        translate([0, 0, -{half:.3}]) {{
            cube([{cols}, {rows}, {h:.3}], center=true);
        }}
    }}
}}
",
        h = p.height,
        half = p.height * 0.5,
        cols = p.cols,
        rows = p.rows,
    ))
}

/// Write the wrapper script to `path`, replacing any existing file
pub fn save_scad(path: &Path, surface_path: &Path, p: &ScadParams) -> Result<()> {
    let src = render_scad(surface_path, p)?;
    fs::write(path, src).map_err(|e| Error::io(path, e))
}

/// OpenSCAD string literal
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' { out.push('\\'); }
        out.push(c);
    }
    out.push('"');
    out
}
