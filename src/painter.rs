//! Importance-sampled single-scale painting.
//!
//! A pass draws candidate centers uniformly from the region where a stroke
//! fits, keeps each with probability equal to the importance weight at that
//! pixel, and stamps a noisy copy of the source color there. The number of
//! attempts is inflated by `1 / mean(importance)` so that roughly
//! `stroke_count` strokes are accepted however sparse the map is.
use crate::brush::{self, BrushSet};
use crate::error::{PaintError, Result};
use crate::raster::{Image, ScalarMap};
use crate::tensor::angle_bucket;
use rand::Rng;
use std::ops::RangeInclusive;

/// Stroke parameters of a single pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeParams {
    pub stroke_size: usize,
    pub stroke_count: usize,
    pub color_noise: f32,
    /// Brush-set size; only used by oriented passes.
    pub n_angles: usize,
}

/// Counters reported by a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Candidate centers drawn.
    pub attempts: usize,
    /// Candidates that passed the importance test.
    pub accepted: usize,
    /// Accepted strokes that were composited.
    pub drawn: usize,
}

/// Number of candidate draws for a pass: `stroke_count · floor(1 / mean)`.
/// Zero when the map carries no weight at all.
pub fn iteration_budget(importance: &ScalarMap, stroke_count: usize) -> usize {
    if importance.sum() <= 0.0 {
        return 0;
    }
    let per_stroke = (1.0 / importance.mean()).floor().max(1.0);
    stroke_count.saturating_mul(per_stroke as usize)
}

/// Centers along one axis for which a stencil of `stencil` pixels fits
/// entirely inside `canvas` pixels.
fn drawable_range(canvas: usize, stencil: usize) -> Option<RangeInclusive<usize>> {
    if stencil == 0 || stencil > canvas {
        return None;
    }
    let half = stencil / 2;
    Some(half..=canvas - (stencil - half))
}

fn validate_pass(
    source: &Image,
    canvas: &Image,
    importance: &ScalarMap,
    texture: &Image,
    params: &StrokeParams,
) -> Result<()> {
    if source.is_empty() {
        return Err(PaintError::EmptyImage {
            what: "source image",
            width: source.width,
            height: source.height,
        });
    }
    if (canvas.width, canvas.height) != (source.width, source.height) {
        return Err(PaintError::SizeMismatch {
            what: "canvas",
            expected_w: source.width,
            expected_h: source.height,
            found_w: canvas.width,
            found_h: canvas.height,
        });
    }
    if canvas.channels != source.channels {
        return Err(PaintError::ChannelMismatch {
            what: "canvas",
            expected: source.channels,
            found: canvas.channels,
        });
    }
    check_map_size("importance map", importance, source)?;
    brush::validate_stencil(texture, source.channels)?;
    if params.stroke_size == 0 {
        return Err(PaintError::InvalidArgument(
            "stroke size must be positive".into(),
        ));
    }
    if !params.color_noise.is_finite() || params.color_noise < 0.0 {
        return Err(PaintError::InvalidArgument(format!(
            "color noise must be a finite non-negative number, got {}",
            params.color_noise
        )));
    }
    Ok(())
}

pub(crate) fn check_map_size(what: &'static str, map: &ScalarMap, source: &Image) -> Result<()> {
    if (map.width, map.height) != (source.width, source.height) {
        return Err(PaintError::SizeMismatch {
            what,
            expected_w: source.width,
            expected_h: source.height,
            found_w: map.width,
            found_h: map.height,
        });
    }
    Ok(())
}

/// Shared sampling loop. `footprint` is the `(height, width)` of the largest
/// stencil `pick` can return.
fn run_pass<'a, R: Rng>(
    source: &Image,
    canvas: &mut Image,
    importance: &ScalarMap,
    footprint: (usize, usize),
    params: &StrokeParams,
    rng: &mut R,
    pick: impl Fn(usize, usize) -> &'a Image,
) -> PassStats {
    let mut stats = PassStats::default();
    let budget = iteration_budget(importance, params.stroke_count);
    if budget == 0 {
        log::debug!("importance map is empty, skipping pass");
        return stats;
    }
    let (Some(ys), Some(xs)) = (
        drawable_range(canvas.height, footprint.0),
        drawable_range(canvas.width, footprint.1),
    ) else {
        log::warn!(
            "{}x{} stroke does not fit a {}x{} canvas, skipping pass",
            footprint.1,
            footprint.0,
            canvas.width,
            canvas.height
        );
        return stats;
    };

    let noise = params.color_noise;
    let mut color = vec![0.0f32; source.channels];
    for _ in 0..budget {
        stats.attempts += 1;
        let y = rng.random_range(ys.clone());
        let x = rng.random_range(xs.clone());
        let r: f32 = rng.random();
        if r > importance.get(x, y) {
            continue;
        }
        stats.accepted += 1;
        for (out, &v) in color.iter_mut().zip(source.color_at(x, y)) {
            *out = v * (1.0 - noise / 2.0 + noise * rng.random::<f32>());
        }
        if brush::paint(canvas, y as isize, x as isize, &color, pick(x, y)) {
            stats.drawn += 1;
        }
    }
    stats
}

/// Paint one pass of unrotated strokes of `params.stroke_size` onto `canvas`.
pub fn paint_single_scale(
    source: &Image,
    canvas: &mut Image,
    importance: &ScalarMap,
    texture: &Image,
    params: &StrokeParams,
    rng: &mut impl Rng,
) -> Result<PassStats> {
    validate_pass(source, canvas, importance, texture, params)?;
    let stencil = brush::scaled_stencil(texture, params.stroke_size);
    log::debug!(
        "single-scale pass: size={} stencil={}x{} strokes={} noise={}",
        params.stroke_size,
        stencil.width,
        stencil.height,
        params.stroke_count,
        params.color_noise
    );
    let stats = run_pass(
        source,
        canvas,
        importance,
        (stencil.height, stencil.width),
        params,
        rng,
        |_, _| &stencil,
    );
    log::info!(
        "size {}: {}/{} strokes accepted, {} drawn",
        params.stroke_size,
        stats.accepted,
        stats.attempts,
        stats.drawn
    );
    Ok(stats)
}

/// Like [`paint_single_scale`], but each stroke is rotated to the angle in
/// `thetas` at its center, picked from a brush set of `params.n_angles`
/// variants.
pub fn paint_single_scale_oriented(
    source: &Image,
    canvas: &mut Image,
    thetas: &ScalarMap,
    importance: &ScalarMap,
    texture: &Image,
    params: &StrokeParams,
    rng: &mut impl Rng,
) -> Result<PassStats> {
    validate_pass(source, canvas, importance, texture, params)?;
    check_map_size("angle map", thetas, source)?;

    let brushes = BrushSet::new(texture, params.stroke_size, params.n_angles);
    if brushes.is_empty() {
        return Err(PaintError::InvalidArgument(
            "brush set needs at least one angle".into(),
        ));
    }
    let footprint = brushes.footprint();
    log::debug!(
        "oriented pass: size={} brushes={} footprint={}x{} strokes={}",
        params.stroke_size,
        brushes.len(),
        footprint.1,
        footprint.0,
        params.stroke_count
    );
    let stats = run_pass(
        source,
        canvas,
        importance,
        footprint,
        params,
        rng,
        |x, y| brushes.get(angle_bucket(thetas.get(x, y), params.n_angles)),
    );
    log::info!(
        "oriented size {}: {}/{} strokes accepted, {} drawn",
        params.stroke_size,
        stats.accepted,
        stats.attempts,
        stats.drawn
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params(size: usize, count: usize) -> StrokeParams {
        StrokeParams {
            stroke_size: size,
            stroke_count: count,
            color_noise: 0.3,
            n_angles: 8,
        }
    }

    #[test]
    fn budget_scales_with_inverse_mean_importance() {
        assert_eq!(iteration_budget(&ScalarMap::filled(10, 10, 1.0), 100), 100);
        assert_eq!(iteration_budget(&ScalarMap::filled(10, 10, 0.5), 100), 200);
        assert_eq!(iteration_budget(&ScalarMap::filled(10, 10, 0.3), 100), 300);
        assert_eq!(iteration_budget(&ScalarMap::new(10, 10), 100), 0);
    }

    #[test]
    fn drawable_range_is_exact() {
        assert_eq!(drawable_range(8, 3), Some(1..=6));
        assert_eq!(drawable_range(4, 2), Some(1..=3));
        assert_eq!(drawable_range(5, 5), Some(2..=2));
        assert_eq!(drawable_range(4, 5), None);
    }

    #[test]
    fn zero_importance_paints_nothing() {
        let source = Image::filled(20, 20, 3, 0.8);
        let mut canvas = Image::new(20, 20, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let stats = paint_single_scale(
            &source,
            &mut canvas,
            &ScalarMap::new(20, 20),
            &Image::filled(4, 4, 1, 1.0),
            &params(4, 50),
            &mut rng,
        )
        .unwrap();
        assert_eq!(stats, PassStats::default());
        assert_eq!(canvas, Image::new(20, 20, 3));
    }

    #[test]
    fn uniform_importance_accepts_and_draws_every_attempt() {
        let source = Image::filled(30, 30, 3, 0.5);
        let mut canvas = Image::new(30, 30, 3);
        let mut rng = StdRng::seed_from_u64(7);
        let stats = paint_single_scale(
            &source,
            &mut canvas,
            &ScalarMap::filled(30, 30, 1.0),
            &Image::filled(5, 5, 3, 1.0),
            &params(5, 40),
            &mut rng,
        )
        .unwrap();
        assert_eq!(stats.attempts, 40);
        assert_eq!(stats.accepted, 40);
        assert_eq!(stats.drawn, 40);
        // colors stay within the ±noise/2 jitter band around the source
        for &v in &canvas.pixels {
            assert!(v == 0.0 || (0.42..=0.58).contains(&v), "{v}");
        }
    }

    #[test]
    fn noise_is_drawn_per_channel() {
        let source = Image::filled(5, 5, 3, 0.5);
        let mut canvas = Image::new(5, 5, 3);
        let mut rng = StdRng::seed_from_u64(21);
        let p = StrokeParams {
            stroke_size: 1,
            stroke_count: 1,
            color_noise: 1.0,
            n_angles: 1,
        };
        let stats = paint_single_scale(
            &source,
            &mut canvas,
            &ScalarMap::filled(5, 5, 1.0),
            &Image::filled(1, 1, 3, 1.0),
            &p,
            &mut rng,
        )
        .unwrap();
        assert_eq!(stats.drawn, 1);

        let painted: Vec<&[f32]> = (0..5)
            .flat_map(|y| (0..5).map(move |x| (x, y)))
            .map(|(x, y)| canvas.color_at(x, y))
            .filter(|px| px.iter().any(|&v| v != 0.0))
            .collect();
        assert_eq!(painted.len(), 1);
        let px = painted[0];
        assert!(px.iter().all(|v| (0.25..=0.75).contains(v)), "{px:?}");
        assert!(px[0] != px[1] || px[1] != px[2], "channels share one jitter: {px:?}");
    }

    #[test]
    fn stencil_larger_than_canvas_skips_the_pass() {
        let source = Image::filled(6, 6, 3, 0.5);
        let mut canvas = Image::new(6, 6, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let stats = paint_single_scale(
            &source,
            &mut canvas,
            &ScalarMap::filled(6, 6, 1.0),
            &Image::filled(8, 8, 3, 1.0),
            &params(10, 10),
            &mut rng,
        )
        .unwrap();
        assert_eq!(stats.drawn, 0);
        assert_eq!(canvas, Image::new(6, 6, 3));
    }

    #[test]
    fn precondition_violations_are_reported() {
        let source = Image::filled(10, 10, 3, 0.5);
        let ones = ScalarMap::filled(10, 10, 1.0);
        let tex = Image::filled(3, 3, 3, 1.0);
        let mut rng = StdRng::seed_from_u64(0);

        let mut canvas = Image::new(10, 10, 3);
        let err = paint_single_scale(&source, &mut canvas, &ones, &tex, &params(0, 1), &mut rng);
        assert!(matches!(err, Err(PaintError::InvalidArgument(_))));

        let err = paint_single_scale(
            &source,
            &mut canvas,
            &ScalarMap::filled(9, 10, 1.0),
            &tex,
            &params(3, 1),
            &mut rng,
        );
        assert!(matches!(err, Err(PaintError::SizeMismatch { .. })));

        let mut wrong = Image::new(10, 10, 4);
        let err = paint_single_scale(&source, &mut wrong, &ones, &tex, &params(3, 1), &mut rng);
        assert!(matches!(err, Err(PaintError::ChannelMismatch { .. })));

        let mut noisy = params(3, 1);
        noisy.color_noise = f32::NAN;
        let err = paint_single_scale(&source, &mut canvas, &ones, &tex, &noisy, &mut rng);
        assert!(matches!(err, Err(PaintError::InvalidArgument(_))));

        let mut no_angles = params(3, 1);
        no_angles.n_angles = 0;
        let err = paint_single_scale_oriented(
            &source,
            &mut canvas,
            &ScalarMap::new(10, 10),
            &ones,
            &tex,
            &no_angles,
            &mut rng,
        );
        assert!(matches!(err, Err(PaintError::InvalidArgument(_))));
    }

    #[test]
    fn oriented_pass_uses_the_bucketed_brush() {
        // a horizontal bar rotated a quarter turn must paint a vertical bar
        let source = Image::filled(40, 40, 1, 1.0);
        let mut canvas = Image::new(40, 40, 1);
        let bar = Image::from_fn(9, 9, 1, |_, y, _| if y == 4 { 1.0 } else { 0.0 });
        let thetas = ScalarMap::filled(40, 40, std::f32::consts::FRAC_PI_2);
        let mut rng = StdRng::seed_from_u64(11);
        let p = StrokeParams {
            stroke_size: 9,
            stroke_count: 1,
            color_noise: 0.0,
            n_angles: 4,
        };
        let stats = paint_single_scale_oriented(
            &source,
            &mut canvas,
            &thetas,
            &ScalarMap::filled(40, 40, 1.0),
            &bar,
            &p,
            &mut rng,
        )
        .unwrap();
        assert_eq!(stats.drawn, 1);

        let painted: Vec<(usize, usize)> = (0..40)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get(x, y, 0) > 0.5)
            .collect();
        let xs: Vec<_> = painted.iter().map(|p| p.0).collect();
        let ys: Vec<_> = painted.iter().map(|p| p.1).collect();
        let x_span = xs.iter().max().unwrap() - xs.iter().min().unwrap();
        let y_span = ys.iter().max().unwrap() - ys.iter().min().unwrap();
        assert!(y_span > x_span, "x_span={x_span} y_span={y_span}");
    }

    #[test]
    fn diagonal_angle_picks_the_falling_brush() {
        // bucket 1 of 8 is an eighth turn: the bar must run with x and y growing together
        let source = Image::filled(40, 40, 1, 1.0);
        let mut canvas = Image::new(40, 40, 1);
        let bar = Image::from_fn(11, 11, 1, |_, y, _| if (4..7).contains(&y) { 1.0 } else { 0.0 });
        let thetas = ScalarMap::filled(40, 40, std::f32::consts::FRAC_PI_4 + 0.1);
        let p = StrokeParams {
            stroke_size: 11,
            stroke_count: 1,
            color_noise: 0.0,
            n_angles: 8,
        };
        let stats = paint_single_scale_oriented(
            &source,
            &mut canvas,
            &thetas,
            &ScalarMap::filled(40, 40, 1.0),
            &bar,
            &p,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(stats.drawn, 1);

        let (mut total, mut mx, mut my) = (0.0f64, 0.0f64, 0.0f64);
        for y in 0..40 {
            for x in 0..40 {
                let w = canvas.get(x, y, 0) as f64;
                total += w;
                mx += w * x as f64;
                my += w * y as f64;
            }
        }
        mx /= total;
        my /= total;
        let mut cov = 0.0f64;
        for y in 0..40 {
            for x in 0..40 {
                cov += canvas.get(x, y, 0) as f64 * (x as f64 - mx) * (y as f64 - my);
            }
        }
        assert!(cov > 0.0, "bar tilts the wrong way: cov={cov}");
    }
}
