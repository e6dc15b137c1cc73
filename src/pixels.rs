// pixels.rs - Image loading
//
// Decodes a raster file into a (height, width, channels) array of u8 samples.
// Channels is always 1 (luma), 3 (RGB) or 4 (RGBA).

use std::path::Path;

use image::{ColorType, DynamicImage};
use ndarray::{Array2, Array3, Axis};

use crate::error::{Error, Result};

/// Open and decode an image file into a pixel array
pub fn load_pixels(path: &Path) -> Result<Array3<u8>> {
    let img = image::open(path)
        .map_err(|source| Error::Image { path: path.to_path_buf(), source })?;
    to_pixel_array(&img)
}

/// Convert a decoded image into a pixel array.
///
/// Luma images keep a single channel, luma+alpha is widened to RGBA so the
/// alpha weighting still applies, anything deeper than 8 bits is reduced.
pub fn to_pixel_array(img: &DynamicImage) -> Result<Array3<u8>> {
    let (w, h) = (img.width() as usize, img.height() as usize);

    let arr = match img.color() {
        ColorType::L8 | ColorType::L16 => {
            with_channel_axis(Array2::from_shape_vec((h, w), img.to_luma8().into_raw())?)
        }
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => {
            Array3::from_shape_vec((h, w, 3), img.to_rgb8().into_raw())?
        }
        _ => Array3::from_shape_vec((h, w, 4), img.to_rgba8().into_raw())?,
    };
    Ok(arr)
}

/// Add a trailing channel axis of size 1 to a single-channel grid
pub fn with_channel_axis(gray: Array2<u8>) -> Array3<u8> {
    gray.insert_axis(Axis(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_gray_gets_channel_axis() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([200]));
        img.put_pixel(2, 1, Luma([7]));
        let arr = to_pixel_array(&DynamicImage::ImageLuma8(img)).unwrap();

        assert_eq!(arr.shape(), &[2, 3, 1]);
        assert_eq!(arr[[1, 2, 0]], 7);
        assert_eq!(arr[[0, 0, 0]], 200);
    }

    #[test]
    fn test_rgb_layout_is_row_major() {
        let mut img = RgbImage::from_pixel(4, 2, Rgb([255, 255, 255]));
        img.put_pixel(3, 0, Rgb([1, 2, 3]));
        let arr = to_pixel_array(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(arr.shape(), &[2, 4, 3]);
        assert_eq!(arr[[0, 3, 0]], 1);
        assert_eq!(arr[[0, 3, 1]], 2);
        assert_eq!(arr[[0, 3, 2]], 3);
        assert_eq!(arr[[1, 3, 0]], 255);
    }

    #[test]
    fn test_rgba_keeps_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let arr = to_pixel_array(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(arr.shape(), &[1, 1, 4]);
        assert_eq!(arr[[0, 0, 3]], 128);
    }

    #[test]
    fn test_luma_alpha_widens_to_rgba() {
        let img = image::ImageBuffer::from_pixel(2, 2, LumaA([10u8, 99]));
        let arr = to_pixel_array(&DynamicImage::ImageLumaA8(img)).unwrap();
        assert_eq!(arr.shape(), &[2, 2, 4]);
        assert_eq!(arr[[1, 1, 0]], 10);
        assert_eq!(arr[[1, 1, 3]], 99);
    }

    #[test]
    fn test_luma16_reduced_to_one_channel() {
        let mut img = image::ImageBuffer::from_pixel(3, 2, Luma([65535u16]));
        img.put_pixel(1, 1, Luma([257 * 7]));
        img.put_pixel(0, 1, Luma([0]));
        let arr = to_pixel_array(&DynamicImage::ImageLuma16(img)).unwrap();

        assert_eq!(arr.shape(), &[2, 3, 1]);
        assert_eq!(arr[[0, 0, 0]], 255);
        assert_eq!(arr[[1, 1, 0]], 7);
        assert_eq!(arr[[1, 0, 0]], 0);
    }

    #[test]
    fn test_rgb16_reduced_to_three_channels() {
        let mut img = image::ImageBuffer::from_pixel(2, 3, Rgb([65535u16, 65535, 65535]));
        img.put_pixel(1, 2, Rgb([0, 257 * 100, 257 * 200]));
        let arr = to_pixel_array(&DynamicImage::ImageRgb16(img)).unwrap();

        assert_eq!(arr.shape(), &[3, 2, 3]);
        assert_eq!(arr[[0, 0, 2]], 255);
        assert_eq!(arr[[2, 1, 0]], 0);
        assert_eq!(arr[[2, 1, 1]], 100);
        assert_eq!(arr[[2, 1, 2]], 200);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.png");
        RgbImage::from_pixel(5, 3, Rgb([0, 0, 0])).save(&path).unwrap();

        let arr = load_pixels(&path).unwrap();
        assert_eq!(arr.shape(), &[3, 5, 3]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_pixels(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::Image { .. }));
    }

    #[test]
    fn test_load_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_pixels(&path), Err(Error::Image { .. })));
    }
}
