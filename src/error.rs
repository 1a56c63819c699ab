//! Error type shared by the painting pipeline and its I/O helpers.

use std::io;
use thiserror::Error;

/// Errors surfaced at the public API boundary.
///
/// Stroke placement never fails: out-of-bounds strokes and empty importance
/// maps are policy, not errors. Everything here is a caller precondition
/// violation or an I/O failure.
#[derive(Error, Debug)]
pub enum PaintError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{what} is empty ({width}x{height})")]
    EmptyImage {
        what: &'static str,
        width: usize,
        height: usize,
    },

    #[error("{what} has {found} channels, expected {expected}")]
    ChannelMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} is {found_w}x{found_h}, expected {expected_w}x{expected_h}")]
    SizeMismatch {
        what: &'static str,
        expected_w: usize,
        expected_h: usize,
        found_w: usize,
        found_h: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, PaintError>;
