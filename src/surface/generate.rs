// generate.rs - Threshold pixels into an elevation surface
//
// A pixel is "ink" when its luminance is strictly below the threshold.
// Ink pixels get 1.0, scaled by alpha/255 when an alpha channel exists.

use ndarray::{Array2, Array3, ArrayView1, Axis};

use crate::error::{Error, Result};

/// How luminance and alpha are read from a pixel of a given channel count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Layout {
    color: usize,
    alpha: Option<usize>,
}

impl Layout {
    fn for_channels(channels: usize) -> Result<Self> {
        match channels {
            0 => Err(Error::Channels(0)),
            1 => Ok(Self { color: 1, alpha: None }),
            2 => Ok(Self { color: 1, alpha: Some(1) }),
            3 => Ok(Self { color: 3, alpha: None }),
            _ => Ok(Self { color: 3, alpha: Some(3) }),
        }
    }

    #[inline]
    fn density(self, px: ArrayView1<u8>, threshold: u8) -> f32 {
        // mean < T  <=>  sum < n * T, exact in integers
        let sum: u32 = px.iter().take(self.color).map(|&v| v as u32).sum();
        if sum >= self.color as u32 * threshold as u32 { return 0.0; }

        match self.alpha {
            Some(a) => px[a] as f32 / 255.0,
            None => 1.0,
        }
    }
}

/// Convert a (height, width, channels) pixel array into an elevation surface
pub fn generate_surface(pixels: &Array3<u8>, threshold: u8) -> Result<Array2<f32>> {
    let layout = Layout::for_channels(pixels.len_of(Axis(2)))?;
    Ok(pixels.map_axis(Axis(2), |px| layout.density(px, threshold)))
}
