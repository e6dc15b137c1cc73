// surface/ - Elevation surface
//
// Pixel array -> ink density grid in [0, 1], and its on-disk text form.
// Row order is the decoded top-to-bottom order; it fixes the orientation
// of the generated mesh.

mod generate;
mod file;

pub use generate::*;
pub use file::*;
