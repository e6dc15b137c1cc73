// scan2stl - Scanned drawings to printable relief models
//
// image -> pixel array -> elevation surface (.dat) -> OpenSCAD wrapper (.scad)
//       -> external compiler -> mesh (.stl)

pub mod error;
pub mod config;
pub mod pixels;
pub mod surface;
pub mod scad;
pub mod compiler;
pub mod batch;

pub use batch::{run_batch, BatchReport, FileOutcome, JobPaths, Stage};
pub use compiler::{MeshCompiler, OpenScad};
pub use config::Config;
pub use error::{CompileError, Error, Result};
