//! Owned `f32` rasters used throughout the pipeline.
//!
//! [`Image`] stores `channels` interleaved samples per pixel in row-major
//! order, nominally in `[0, 1]`. [`ScalarMap`] is the single-channel variant
//! used for importance weights, angles and tensor components.
use crate::error::{PaintError, Result};
use image::{Rgb, Rgb32FImage, RgbImage};

/// Multi-channel float image (`height × width × channels`).
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub pixels: Vec<f32>,
}

impl Image {
    /// Zero-initialized image.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self::filled(width, height, channels, 0.0)
    }

    pub fn filled(width: usize, height: usize, channels: usize, value: f32) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: vec![value; width * height * channels],
        }
    }

    /// Build an image by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, usize) -> f32,
    ) -> Self {
        let mut pixels = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    pixels.push(f(x, y, c));
                }
            }
        }
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    /// All channels of the pixel at `(x, y)`.
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> &[f32] {
        let offset = self.offset(x, y);
        &self.pixels[offset..offset + self.channels]
    }

    #[inline]
    pub fn color_at_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let offset = self.offset(x, y);
        let channels = self.channels;
        &mut self.pixels[offset..offset + channels]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.pixels[self.offset(x, y) + c]
    }

    /// Copy one channel out as a scalar map.
    pub fn channel(&self, c: usize) -> ScalarMap {
        ScalarMap::from_fn(self.width, self.height, |x, y| self.get(x, y, c))
    }

    /// Weighted luminance `0.3 R + 0.6 G + 0.1 B`; the channel mean for
    /// anything that is not RGB.
    pub fn luminance(&self) -> ScalarMap {
        ScalarMap::from_fn(self.width, self.height, |x, y| {
            let px = self.color_at(x, y);
            if px.len() == 3 {
                0.3 * px[0] + 0.6 * px[1] + 0.1 * px[2]
            } else if px.is_empty() {
                0.0
            } else {
                px.iter().sum::<f32>() / px.len() as f32
            }
        })
    }

    /// Clamp to `[0, 1]` and quantize to 8-bit RGB. Single-channel images are
    /// replicated across R, G and B.
    pub fn to_rgb8(&self) -> Result<RgbImage> {
        if self.channels != 1 && self.channels != 3 {
            return Err(PaintError::ChannelMismatch {
                what: "image written as RGB",
                expected: 3,
                found: self.channels,
            });
        }
        let mut out = RgbImage::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let px = self.color_at(x, y);
                let rgb = if px.len() == 1 {
                    [px[0]; 3]
                } else {
                    [px[0], px[1], px[2]]
                };
                out.put_pixel(x as u32, y as u32, Rgb(rgb.map(quantize)));
            }
        }
        Ok(out)
    }
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl From<Rgb32FImage> for Image {
    fn from(img: Rgb32FImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self {
            width,
            height,
            channels: 3,
            pixels: img.into_raw(),
        }
    }
}

/// Single-channel float map with the same addressing as [`Image`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl ScalarMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.width + x] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Sum accumulated in `f64` so large maps of ones stay exact.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            0.0
        } else {
            self.sum() / self.data.len() as f64
        }
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    /// Elementwise map into a new buffer.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Replicate into a `channels`-channel image.
    pub fn to_image(&self, channels: usize) -> Image {
        Image::from_fn(self.width, self.height, channels, |x, y, _| self.get(x, y))
    }
}
