//! Generic raster filters: Gaussian blur, uniform scaling and rotation.
//!
//! All filters allocate their output; inputs are never modified.
use crate::raster::{Image, ScalarMap};
use std::f32::consts::TAU;

/// Normalized 1D Gaussian taps with radius `ceil(3σ)`.
fn gaussian_taps(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as isize;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let total: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= total;
    }
    taps
}

/// Separable Gaussian blur with clamped borders. `sigma <= 0` is a copy.
pub fn gaussian_blur(map: &ScalarMap, sigma: f32) -> ScalarMap {
    if sigma <= 0.0 || map.width == 0 || map.height == 0 {
        return map.clone();
    }
    let taps = gaussian_taps(sigma);
    let radius = (taps.len() / 2) as isize;
    let (w, h) = (map.width, map.height);

    let mut horizontal = ScalarMap::new(w, h);
    for y in 0..h {
        let row = map.row(y);
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, w as isize - 1) as usize;
                acc += row[sx] * t;
            }
            horizontal.set(x, y, acc);
        }
    }

    let mut out = ScalarMap::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let sy = (y as isize + k as isize - radius).clamp(0, h as isize - 1) as usize;
                acc += horizontal.get(x, sy) * t;
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Bilinear sample at fractional `(fx, fy)`. Taps outside the map read the
/// nearest border sample when `clamp` is set, zero otherwise.
fn bilinear(map: &ScalarMap, fx: f32, fy: f32, clamp: bool) -> f32 {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (w, h) = (map.width as isize, map.height as isize);
    let tap = |x: isize, y: isize| -> f32 {
        if clamp {
            map.get(x.clamp(0, w - 1) as usize, y.clamp(0, h - 1) as usize)
        } else if x < 0 || y < 0 || x >= w || y >= h {
            0.0
        } else {
            map.get(x as usize, y as usize)
        }
    };
    let (x0, y0) = (x0 as isize, y0 as isize);
    let top = tap(x0, y0) * (1.0 - tx) + tap(x0 + 1, y0) * tx;
    let bottom = tap(x0, y0 + 1) * (1.0 - tx) + tap(x0 + 1, y0 + 1) * tx;
    top * (1.0 - ty) + bottom * ty
}

/// Uniformly resize by `factor`. Output dimensions are
/// `round(dim * factor)` (at least 1). Downscaling prefilters with a
/// Gaussian of `σ = (1/factor − 1) / 2` before bilinear resampling.
pub fn scale_image(image: &Image, factor: f32) -> Image {
    let out_w = ((image.width as f32 * factor).round() as usize).max(1);
    let out_h = ((image.height as f32 * factor).round() as usize).max(1);
    if image.is_empty() {
        return Image::new(out_w, out_h, image.channels);
    }

    let sigma = if factor < 1.0 {
        0.5 * (1.0 / factor - 1.0)
    } else {
        0.0
    };
    let planes: Vec<_> = (0..image.channels)
        .map(|c| gaussian_blur(&image.channel(c), sigma))
        .collect();

    let sx = image.width as f32 / out_w as f32;
    let sy = image.height as f32 / out_h as f32;
    Image::from_fn(out_w, out_h, image.channels, |x, y, c| {
        let fx = (x as f32 + 0.5) * sx - 0.5;
        let fy = (y as f32 + 0.5) * sy - 0.5;
        bilinear(&planes[c], fx, fy, true)
    })
}

/// Rotate about the center by `angle` radians (image coordinates, y down:
/// the source x axis ends up pointing along `(cos θ, sin θ)`).
///
/// The result is a square of side `ceil(hypot(w, h))` so no part of the
/// source is clipped; uncovered samples are zero (transparent).
pub fn rotate_image(image: &Image, angle: f32) -> Image {
    let side = ((image.width as f32).hypot(image.height as f32).ceil() as usize).max(1);
    let planes: Vec<_> = (0..image.channels).map(|c| image.channel(c)).collect();
    let (sin, cos) = angle.sin_cos();
    let src_cx = (image.width as f32 - 1.0) / 2.0;
    let src_cy = (image.height as f32 - 1.0) / 2.0;
    let dst_c = (side as f32 - 1.0) / 2.0;

    Image::from_fn(side, side, image.channels, |x, y, c| {
        if image.is_empty() {
            return 0.0;
        }
        let dx = x as f32 - dst_c;
        let dy = y as f32 - dst_c;
        let fx = cos * dx + sin * dy + src_cx;
        let fy = -sin * dx + cos * dy + src_cy;
        bilinear(&planes[c], fx, fy, false)
    })
}

/// `n` rotated copies spanning a full turn, index `i` at `i · 2π / n`.
pub fn rotate_brushes(texture: &Image, n: usize) -> Vec<Image> {
    (0..n)
        .map(|i| rotate_image(texture, i as f32 * TAU / n as f32))
        .collect()
}
