//! Structure tensor field and local stroke orientation.
//!
//! The tensor at each pixel is the smoothed outer product of the luminance
//! gradient,
//!
//! ```text
//! | gx·gx  gx·gy |
//! | gx·gy  gy·gy |
//! ```
//!
//! Its eigenvector for the smallest eigenvalue points along the local edge,
//! which is the direction strokes should follow. Angles are measured in
//! image coordinates (x right, y down) and folded into `[0, π)` because a
//! stroke and its 180° rotation are the same orientation.
use crate::config::TensorParams;
use crate::filters::gaussian_blur;
use crate::raster::{Image, ScalarMap};
use nalgebra::{Matrix2, SymmetricEigen};
use std::f32::consts::{PI, TAU};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel symmetric 2×2 tensor stored as three component planes.
#[derive(Clone, Debug)]
pub struct TensorField {
    pub xx: ScalarMap,
    pub xy: ScalarMap,
    pub yy: ScalarMap,
}

impl TensorField {
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Matrix2<f32> {
        let xy = self.xy.get(x, y);
        Matrix2::new(self.xx.get(x, y), xy, xy, self.yy.get(x, y))
    }

    pub fn width(&self) -> usize {
        self.xx.width
    }

    pub fn height(&self) -> usize {
        self.xx.height
    }
}

/// Sobel derivatives with clamped borders.
fn sobel(l: &ScalarMap) -> (ScalarMap, ScalarMap) {
    let (w, h) = (l.width, l.height);
    let mut gx = ScalarMap::new(w, h);
    let mut gy = ScalarMap::new(w, h);
    if w == 0 || h == 0 {
        return (gx, gy);
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                for (kx, &xi) in x_idx.iter().enumerate() {
                    sum_x += row[xi] * SOBEL_KERNEL_X[ky][kx];
                    sum_y += row[xi] * SOBEL_KERNEL_Y[ky][kx];
                }
            }
            gx.set(x, y, sum_x);
            gy.set(x, y, sum_y);
        }
    }
    (gx, gy)
}

/// Build the smoothed structure tensor field of an image's luminance.
pub fn compute_tensor(image: &Image, params: TensorParams) -> TensorField {
    let luminance = gaussian_blur(&image.luminance(), params.sigma_g);
    let (gx, gy) = sobel(&luminance);

    let (w, h) = (image.width, image.height);
    let mut xx = ScalarMap::new(w, h);
    let mut xy = ScalarMap::new(w, h);
    let mut yy = ScalarMap::new(w, h);
    for i in 0..w * h {
        let (dx, dy) = (gx.data[i], gy.data[i]);
        xx.data[i] = dx * dx;
        xy.data[i] = dx * dy;
        yy.data[i] = dy * dy;
    }

    let sigma = params.sigma_g * params.factor;
    TensorField {
        xx: gaussian_blur(&xx, sigma),
        xy: gaussian_blur(&xy, sigma),
        yy: gaussian_blur(&yy, sigma),
    }
}

/// Orientation of the minor eigenvector of a tensor, in `[0, π)`.
pub fn minor_orientation(tensor: Matrix2<f32>) -> f32 {
    let eig = SymmetricEigen::new(tensor);
    let minor = if eig.eigenvalues[0] <= eig.eigenvalues[1] {
        eig.eigenvectors.column(0)
    } else {
        eig.eigenvectors.column(1)
    };
    normalize_angle(minor[1].atan2(minor[0]))
}

/// Fold an `atan2` result into `[0, π)`.
#[inline]
pub fn normalize_angle(theta: f32) -> f32 {
    let folded = if theta < 0.0 { theta + PI } else { theta };
    // atan2 can return exactly π, which is the same orientation as 0
    if folded >= PI { folded - PI } else { folded }
}

/// Per-pixel stroke orientation of `image`.
pub fn compute_angles(image: &Image, params: TensorParams) -> ScalarMap {
    let field = compute_tensor(image, params);
    ScalarMap::from_fn(field.width(), field.height(), |x, y| {
        minor_orientation(field.at(x, y))
    })
}

/// Brush-set index for angle `theta` among `n_angles` buckets covering a
/// full turn: `floor(θ · n / 2π)`, clamped to `[0, n − 1]`.
#[inline]
pub fn angle_bucket(theta: f32, n_angles: usize) -> usize {
    if n_angles == 0 {
        return 0;
    }
    let raw = (theta * n_angles as f32 / TAU).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(n_angles - 1)
    }
}
