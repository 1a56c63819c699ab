//! Two-pass painterly pipelines and their single-pass and diagnostic
//! variants.
//!
//! Every entry point allocates a fresh zero canvas; the fine pass always
//! paints over the coarse pass's result.
use crate::brush;
use crate::config::{PaintConfig, TensorParams};
use crate::error::{PaintError, Result};
use crate::painter::{PassStats, paint_single_scale, paint_single_scale_oriented};
use crate::raster::{Image, ScalarMap};
use crate::sharpness::sharpness_map;
use crate::tensor::compute_angles;
use rand::Rng;
use std::f32::consts::TAU;

/// Canvas and per-pass statistics of a pipeline run.
#[derive(Clone, Debug)]
pub struct Painting {
    pub canvas: Image,
    pub passes: Vec<PassStats>,
}

fn ensure_source(source: &Image) -> Result<()> {
    if source.is_empty() {
        return Err(PaintError::EmptyImage {
            what: "source image",
            width: source.width,
            height: source.height,
        });
    }
    Ok(())
}

fn blank_canvas(source: &Image) -> Image {
    Image::new(source.width, source.height, source.channels)
}

/// One uniform-importance pass of unrotated strokes.
pub fn single_scale(
    source: &Image,
    texture: &Image,
    config: &PaintConfig,
    rng: &mut impl Rng,
) -> Result<Painting> {
    ensure_source(source)?;
    let mut canvas = blank_canvas(source);
    let ones = ScalarMap::filled(source.width, source.height, 1.0);
    let stats = paint_single_scale(
        source,
        &mut canvas,
        &ones,
        texture,
        &config.coarse_pass(),
        rng,
    )?;
    Ok(Painting {
        canvas,
        passes: vec![stats],
    })
}

/// Coarse strokes everywhere, then detail strokes where the source is sharp.
pub fn painterly(
    source: &Image,
    texture: &Image,
    config: &PaintConfig,
    rng: &mut impl Rng,
) -> Result<Painting> {
    ensure_source(source)?;
    let mut canvas = blank_canvas(source);
    let ones = ScalarMap::filled(source.width, source.height, 1.0);
    let sharpness = sharpness_map(source, config.sharpness_sigma);

    let mut passes = Vec::with_capacity(2);
    for (importance, params) in [
        (&ones, config.coarse_pass()),
        (&sharpness, config.detail_pass()),
    ] {
        passes.push(paint_single_scale(
            source,
            &mut canvas,
            importance,
            texture,
            &params,
            rng,
        )?);
    }
    Ok(Painting { canvas, passes })
}

/// One uniform-importance pass with strokes following local orientation.
pub fn single_scale_oriented(
    source: &Image,
    texture: &Image,
    config: &PaintConfig,
    rng: &mut impl Rng,
) -> Result<Painting> {
    ensure_source(source)?;
    let thetas = compute_angles(source, config.tensor);
    let mut canvas = blank_canvas(source);
    let ones = ScalarMap::filled(source.width, source.height, 1.0);
    let stats = paint_single_scale_oriented(
        source,
        &mut canvas,
        &thetas,
        &ones,
        texture,
        &config.coarse_pass(),
        rng,
    )?;
    Ok(Painting {
        canvas,
        passes: vec![stats],
    })
}

/// [`painterly`] with every stroke rotated to follow the local edge
/// direction. The angle map is computed once and shared by both passes.
pub fn oriented_paint(
    source: &Image,
    texture: &Image,
    config: &PaintConfig,
    rng: &mut impl Rng,
) -> Result<Painting> {
    ensure_source(source)?;
    let thetas = compute_angles(source, config.tensor);
    let mut canvas = blank_canvas(source);
    let ones = ScalarMap::filled(source.width, source.height, 1.0);
    let sharpness = sharpness_map(source, config.sharpness_sigma);

    let mut passes = Vec::with_capacity(2);
    for (importance, params) in [
        (&ones, config.coarse_pass()),
        (&sharpness, config.detail_pass()),
    ] {
        passes.push(paint_single_scale_oriented(
            source,
            &mut canvas,
            &thetas,
            importance,
            texture,
            &params,
            rng,
        )?);
    }
    Ok(Painting { canvas, passes })
}

/// Stroke orientation mapped to `[0, 1)` as `θ / 2π`, for inspection.
pub fn angle_visualization(source: &Image, params: TensorParams) -> Result<ScalarMap> {
    ensure_source(source)?;
    Ok(compute_angles(source, params).map(|theta| theta / TAU))
}

/// Stamp `strokes` strokes of a fixed `color` at uniformly random centers
/// anywhere on a `width × height` canvas. Strokes that would cross the
/// border are dropped by the compositor. Returns the canvas and the number
/// of strokes drawn.
pub fn brush_test(
    width: usize,
    height: usize,
    stencil: &Image,
    strokes: usize,
    color: &[f32],
    rng: &mut impl Rng,
) -> Result<(Image, usize)> {
    if width == 0 || height == 0 {
        return Err(PaintError::EmptyImage {
            what: "brush test canvas",
            width,
            height,
        });
    }
    brush::validate_stencil(stencil, color.len())?;
    let mut canvas = Image::new(width, height, color.len());
    let mut drawn = 0;
    for _ in 0..strokes {
        let y = rng.random_range(0..height) as isize;
        let x = rng.random_range(0..width) as isize;
        if brush::paint(&mut canvas, y, x, color, stencil) {
            drawn += 1;
        }
    }
    log::info!("brush test: {drawn}/{strokes} strokes drawn");
    Ok((canvas, drawn))
}
