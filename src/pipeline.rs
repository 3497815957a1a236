// src/pipeline.rs
//
// Applies a configured thresholding recipe to one RGB frame. Combining the
// returned masks into a final lane mask is the caller's business.

use tracing::debug;

use crate::color::{grayscale, Channel, ColorThresholder};
use crate::config::ThresholdConfig;
use crate::error::Result;
use crate::gradient::{GradientThresholder, Orientation};
use crate::region::region_of_interest;
use crate::types::BinaryMask;

/// Every binary mask produced for a single frame.
#[derive(Debug, Clone)]
pub struct FrameMasks {
    pub color: BinaryMask,
    pub abs_x: BinaryMask,
    pub abs_y: BinaryMask,
    pub magnitude: BinaryMask,
    pub direction: BinaryMask,
}

/// Run the full recipe over one interleaved RGB frame.
pub fn threshold_frame(
    rgb: &[u8],
    width: usize,
    height: usize,
    config: &ThresholdConfig,
) -> Result<FrameMasks> {
    let channel: Channel = config.color.channel.parse()?;

    let color = ColorThresholder::new(rgb, width, height, &config.roi)?;
    let color_mask = color.threshold_channel(channel, config.color.min, config.color.max);

    // Gradients run over the same region-masked frame, collapsed to luma
    let masked = region_of_interest(rgb, width, height, 3, &config.roi)?;
    let gray = grayscale(&masked, width, height)?;
    let gradient = GradientThresholder::new(&gray, width, height)?;

    let ksize = config.gradient.kernel_size;
    let masks = FrameMasks {
        color: color_mask,
        abs_x: gradient.abs_sobel_thresh(Orientation::X, ksize, config.gradient.abs_x)?,
        abs_y: gradient.abs_sobel_thresh(Orientation::Y, ksize, config.gradient.abs_y)?,
        magnitude: gradient.mag_thresh(ksize, config.gradient.magnitude)?,
        direction: gradient.dir_thresh(ksize, config.gradient.direction)?,
    };

    debug!(
        width,
        height,
        color_px = masks.color.count_ones(),
        abs_x_px = masks.abs_x.count_ones(),
        "frame thresholded"
    );

    Ok(masks)
}
