// src/error.rs

use core::fmt;

/// Errors surfaced by the thresholding primitives.
///
/// A zero maximum during gradient rescaling is deliberately *not* an error:
/// the policy there is to return an all-zero mask instead of faulting.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A color channel name outside {hue, lightness, saturation}.
    InvalidChannel { name: String },
    /// A derivative orientation name outside {x, y}.
    InvalidOrientation { name: String },
    /// Sobel/Gaussian kernel sizes must be odd and non-zero.
    InvalidKernelSize { ksize: usize },
    /// Buffer length does not match the declared dimensions.
    ShapeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel { name } => {
                write!(f, "unknown color channel '{name}' (expected hue, lightness or saturation)")
            }
            Self::InvalidOrientation { name } => {
                write!(f, "unknown derivative orientation '{name}' (expected x or y)")
            }
            Self::InvalidKernelSize { ksize } => {
                write!(f, "kernel size {ksize} is invalid: must be odd and non-zero")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "buffer length mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
