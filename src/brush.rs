//! Brush stencils and the stroke compositor.
//!
//! A stencil is an [`Image`] whose samples are blend weights: 0 lets the
//! canvas show through, 1 replaces it with the stroke color. A stencil has
//! either one plane (shared by every canvas channel) or one plane per canvas
//! channel.
use crate::error::{PaintError, Result};
use crate::filters::{rotate_brushes, scale_image};
use crate::raster::Image;

/// Alpha-blend `color` through `stencil` centered at `(y, x)`.
///
/// The footprint is `[y − th/2, y − th/2 + th) × [x − tw/2, x − tw/2 + tw)`.
/// Strokes whose footprint is not entirely inside the canvas are skipped so
/// no clipped stroke ever lands on an edge. Returns whether the stroke was
/// applied.
pub fn paint(canvas: &mut Image, y: isize, x: isize, color: &[f32], stencil: &Image) -> bool {
    let top = y - (stencil.height / 2) as isize;
    let left = x - (stencil.width / 2) as isize;
    if top < 0
        || left < 0
        || top + stencil.height as isize > canvas.height as isize
        || left + stencil.width as isize > canvas.width as isize
    {
        return false;
    }
    let (top, left) = (top as usize, left as usize);
    let shared_alpha = stencil.channels == 1;

    for sy in 0..stencil.height {
        for sx in 0..stencil.width {
            let alpha = stencil.color_at(sx, sy);
            let out = canvas.color_at_mut(left + sx, top + sy);
            for (c, (o, &col)) in out.iter_mut().zip(color).enumerate() {
                let a = if shared_alpha { alpha[0] } else { alpha[c] };
                *o = a * col + (1.0 - a) * *o;
            }
        }
    }
    true
}

/// Check that a stencil can be composited onto a canvas with `channels`.
pub fn validate_stencil(stencil: &Image, channels: usize) -> Result<()> {
    if stencil.is_empty() {
        return Err(PaintError::EmptyImage {
            what: "brush texture",
            width: stencil.width,
            height: stencil.height,
        });
    }
    if stencil.channels != 1 && stencil.channels != channels {
        return Err(PaintError::ChannelMismatch {
            what: "brush texture",
            expected: channels,
            found: stencil.channels,
        });
    }
    Ok(())
}

/// Shrink `texture` so its larger side is at most `size`. Textures already
/// within `size` are returned unchanged; stencils are never upscaled.
pub fn scaled_stencil(texture: &Image, size: usize) -> Image {
    let factor = f32::min(
        size as f32 / texture.height as f32,
        size as f32 / texture.width as f32,
    );
    if factor < 1.0 {
        scale_image(texture, factor)
    } else {
        texture.clone()
    }
}

/// Rotated variants of one stencil, indexed by angle bucket.
#[derive(Clone, Debug)]
pub struct BrushSet {
    brushes: Vec<Image>,
}

impl BrushSet {
    /// Scale `texture` to `size`, then rotate it through `n_angles` evenly
    /// spaced angles covering a full turn.
    pub fn new(texture: &Image, size: usize, n_angles: usize) -> Self {
        let stencil = scaled_stencil(texture, size);
        Self {
            brushes: rotate_brushes(&stencil, n_angles),
        }
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    pub fn get(&self, bucket: usize) -> &Image {
        &self.brushes[bucket]
    }

    /// Largest footprint among the variants, `(height, width)`.
    pub fn footprint(&self) -> (usize, usize) {
        self.brushes.iter().fold((0, 0), |(h, w), b| {
            (h.max(b.height), w.max(b.width))
        })
    }
}

/// Procedural single-plane stencil: a soft ellipse filling a
/// `width × height` box, opaque in the middle with a smooth falloff over the
/// outer `feather` fraction of its radius.
pub fn soft_stencil(width: usize, height: usize, feather: f32) -> Image {
    let rx = width as f32 / 2.0;
    let ry = height as f32 / 2.0;
    let feather = feather.clamp(1e-3, 1.0);
    Image::from_fn(width, height, 1, |x, y, _| {
        let dx = (x as f32 + 0.5 - rx) / rx;
        let dy = (y as f32 + 0.5 - ry) / ry;
        let r = (dx * dx + dy * dy).sqrt();
        let t = ((1.0 - r) / feather).clamp(0.0, 1.0);
        // smoothstep
        t * t * (3.0 - 2.0 * t)
    })
}
