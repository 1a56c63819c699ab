//! Detail map used as importance for the fine pass.
use crate::filters::gaussian_blur;
use crate::raster::{Image, ScalarMap};

/// Energy below this is blur round-off on flat input, not detail.
const ENERGY_FLOOR: f32 = 1e-10;
/// Normalized weights below this are clamped to zero.
const RELATIVE_FLOOR: f32 = 1e-6;

/// Local high-frequency energy of the luminance, normalized to `[0, 1]`.
///
/// `L − blur(L, σ)` isolates detail; its square is spread with a `4σ` blur
/// so strokes land around textured areas, not only on single pixels. A map
/// without any detail is all zero.
pub fn sharpness_map(image: &Image, sigma: f32) -> ScalarMap {
    let luminance = image.luminance();
    let low = gaussian_blur(&luminance, sigma);
    let mut energy = luminance;
    for (e, &l) in energy.data.iter_mut().zip(&low.data) {
        let high = *e - l;
        *e = high * high;
    }
    let spread = gaussian_blur(&energy, 4.0 * sigma);
    let max = spread.max();
    if max <= ENERGY_FLOOR {
        return ScalarMap::new(image.width, image.height);
    }
    spread.map(|v| {
        let v = v / max;
        if v < RELATIVE_FLOOR { 0.0 } else { v.min(1.0) }
    })
}
