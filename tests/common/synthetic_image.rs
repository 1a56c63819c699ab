use painterly::Image;

/// Anti-aliased straight edge through the image center. The edge runs along
/// `(cos θ, sin θ)` in image coordinates; one side is black, the other white.
pub fn straight_edge(width: usize, height: usize, theta: f32) -> Image {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let (sin, cos) = theta.sin_cos();
    Image::from_fn(width, height, 3, |x, y, _| {
        let d = signed_distance(x as f32 - cx, y as f32 - cy, sin, cos);
        (0.5 + d).clamp(0.0, 1.0)
    })
}

/// Signed distance of `(dx, dy)` from a line through the origin along
/// `(cos, sin)`.
pub fn signed_distance(dx: f32, dy: f32, sin: f32, cos: f32) -> f32 {
    -dx * sin + dy * cos
}

/// Flat orange on the left of `split`, a fine black/white checkerboard on
/// the right.
pub fn flat_and_checker(width: usize, height: usize, split: usize, cell: usize) -> Image {
    assert!(cell > 0, "cell size must be positive");
    const FLAT: [f32; 3] = [0.8, 0.5, 0.2];
    Image::from_fn(width, height, 3, |x, y, c| {
        if x < split {
            FLAT[c]
        } else if (x / cell + y / cell) % 2 == 0 {
            0.1
        } else {
            0.9
        }
    })
}

/// Smooth radial color blend, useful as a generic photograph stand-in.
pub fn radial_blend(width: usize, height: usize) -> Image {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let r_max = cx.hypot(cy);
    Image::from_fn(width, height, 3, |x, y, c| {
        let r = (x as f32 - cx).hypot(y as f32 - cy) / r_max;
        match c {
            0 => r,
            1 => 1.0 - r,
            _ => (x as f32 / width as f32 + r) / 2.0,
        }
    })
}
