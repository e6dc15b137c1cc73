// file.rs - Surface grid text format
//
// One line per row, values space-separated with exactly 3 decimals,
// newline after every row. This is the format OpenSCAD's surface()
// reads as a height map.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::error::{Error, Result};

/// Write a surface grid to any writer
pub fn write_surface<W: Write>(f: &mut W, surface: &Array2<f32>) -> std::io::Result<()> {
    for row in surface.rows() {
        for (i, v) in row.iter().enumerate() {
            if i > 0 { write!(f, " ")?; }
            write!(f, "{:.3}", v)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Write a surface grid to `path`, replacing any existing file
pub fn save_surface(path: &Path, surface: &Array2<f32>) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut f = BufWriter::new(file);
    write_surface(&mut f, surface)
        .and_then(|_| f.flush())
        .map_err(|e| Error::io(path, e))
}

/// Parse surface text back into a grid. Blank lines are ignored.
pub fn parse_surface(text: &str) -> Result<Array2<f32>> {
    let mut values = Vec::new();
    let (mut rows, mut cols) = (0usize, None);

    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() { continue; }

        let before = values.len();
        for tok in line.split_whitespace() {
            let v: f32 = tok.parse().map_err(|_| Error::Parse {
                line: n + 1,
                reason: format!("`{tok}` is not a number"),
            })?;
            values.push(v);
        }

        let width = values.len() - before;
        match cols {
            None => cols = Some(width),
            Some(c) if c != width => {
                return Err(Error::Parse {
                    line: n + 1,
                    reason: format!("expected {c} values, found {width}"),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    Ok(Array2::from_shape_vec((rows, cols.unwrap_or(0)), values)?)
}

/// Read a surface file from disk
pub fn read_surface(path: &Path) -> Result<Array2<f32>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_surface(&text)
}
