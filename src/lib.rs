// src/lib.rs
//
// Binary thresholding primitives for lane-line isolation.
//
// Raw frame -> region-of-interest mask -> color (HLS) and gradient (Sobel)
// range tests -> per-frame binary masks. Combining the masks into a final
// lane mask, fitting lane curves, and the surrounding video pipeline all
// live downstream of this crate.

pub mod color;
pub mod config;
pub mod error;
pub mod gradient;
pub mod pipeline;
pub mod region;
pub mod types;

pub use color::{grayscale, rgb_to_hls, Channel, ColorThresholder};
pub use config::{ColorThresholdConfig, GradientThresholdConfig, ThresholdConfig};
pub use error::{Error, Result};
pub use gradient::{GradientThresholder, Orientation};
pub use pipeline::{threshold_frame, FrameMasks};
pub use region::region_of_interest;
pub use types::{BinaryMask, Polygon};
