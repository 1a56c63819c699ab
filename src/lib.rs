//! Painterly rendering: stamp oriented, colored brush stencils onto a canvas
//! guided by a photograph.
//!
//! A coarse pass covers the canvas with large strokes; a detail pass adds
//! small strokes where the source is sharp. The oriented variant rotates
//! each stroke to follow the local edge direction estimated from the
//! structure tensor.
//!
//! ```no_run
//! use painterly::prelude::*;
//! use rand::SeedableRng;
//! use std::path::Path;
//!
//! # fn main() -> painterly::Result<()> {
//! let source = read_image(Path::new("photo.png"))?;
//! let texture = soft_stencil(60, 20, 0.4);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let painting = oriented_paint(&source, &texture, &PaintConfig::default(), &mut rng)?;
//! write_image(&painting.canvas, Path::new("photo_oriented.png"))?;
//! # Ok(())
//! # }
//! ```

pub mod brush;
pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod painter;
pub mod pipeline;
pub mod raster;
pub mod sharpness;
pub mod tensor;

pub use crate::config::{PaintConfig, TensorParams};
pub use crate::error::{PaintError, Result};
pub use crate::painter::{PassStats, StrokeParams};
pub use crate::pipeline::{Painting, oriented_paint, painterly};
pub use crate::raster::{Image, ScalarMap};

pub mod prelude {
    pub use crate::brush::soft_stencil;
    pub use crate::io::{read_image, write_image};
    pub use crate::pipeline::{oriented_paint, painterly};
    pub use crate::{Image, PaintConfig, ScalarMap};
}
