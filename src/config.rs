//! Tunable parameters for the painting pipeline.
use crate::painter::StrokeParams;

/// Smoothing applied while building the structure tensor field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TensorParams {
    /// Blur applied to luminance before taking gradients.
    pub sigma_g: f32,
    /// Tensor components are blurred with `sigma_g * factor`.
    pub factor: f32,
}

impl Default for TensorParams {
    fn default() -> Self {
        Self {
            sigma_g: 1.0,
            factor: 4.0,
        }
    }
}

/// Parameters shared by the single-scale passes and the two-pass pipelines.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintConfig {
    /// Stroke size in pixels for the coarse pass. Textures larger than this
    /// are downscaled; smaller ones are used as-is.
    pub stroke_size: usize,
    /// Expected number of accepted strokes per pass.
    pub stroke_count: usize,
    /// Multiplicative per-channel color jitter, `±noise/2`.
    pub color_noise: f32,
    /// Number of rotated brush variants for oriented painting.
    pub n_angles: usize,
    /// Fine pass stroke size is `stroke_size / detail_divisor`.
    pub detail_divisor: usize,
    /// Base sigma of the sharpness (detail) map.
    pub sharpness_sigma: f32,
    pub tensor: TensorParams,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            stroke_size: 50,
            stroke_count: 10_000,
            color_noise: 0.3,
            n_angles: 36,
            detail_divisor: 4,
            sharpness_sigma: 1.0,
            tensor: TensorParams::default(),
        }
    }
}

impl PaintConfig {
    /// Stroke size of the detail pass, never below one pixel.
    pub fn detail_stroke_size(&self) -> usize {
        (self.stroke_size / self.detail_divisor.max(1)).max(1)
    }

    /// Coarse pass: full stroke size.
    pub fn coarse_pass(&self) -> StrokeParams {
        StrokeParams {
            stroke_size: self.stroke_size,
            stroke_count: self.stroke_count,
            color_noise: self.color_noise,
            n_angles: self.n_angles,
        }
    }

    /// Detail pass: stroke size divided by `detail_divisor`.
    pub fn detail_pass(&self) -> StrokeParams {
        StrokeParams {
            stroke_size: self.detail_stroke_size(),
            ..self.coarse_pass()
        }
    }
}
