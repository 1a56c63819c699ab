//! Raster file I/O.
//!
//! - `read_image`: decode any format the `image` crate knows into normalized RGB.
//! - `write_image`: clamp, quantize and save an [`Image`].
//! - `write_scalar_map`: save a [`ScalarMap`] as grayscale.
use crate::error::Result;
use crate::raster::{Image, ScalarMap};
use std::fs;
use std::path::Path;

/// Load an image from disk as 3-channel RGB with samples in `[0, 1]`.
pub fn read_image(path: &Path) -> Result<Image> {
    let img = image::ImageReader::open(path)?.decode()?.into_rgb32f();
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(Image::from(img))
}

/// Save an image, creating parent directories. The format follows the
/// file extension.
pub fn write_image(image: &Image, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.to_rgb8()?.save(path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Save a scalar map as a grayscale image, clamping to `[0, 1]`.
pub fn write_scalar_map(map: &ScalarMap, path: &Path) -> Result<()> {
    write_image(&map.to_image(1), path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
