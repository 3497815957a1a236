// src/color.rs
//
// HLS-based color thresholding for road markings.
//
// Lane paint is far easier to separate in HLS than in raw RGB: the
// saturation channel stays stable across shadows and washed-out sunlight,
// where an RGB range test falls apart. The conversion uses the 8-bit
// OpenCV convention (H in [0, 179] as degrees / 2, L and S in [0, 255])
// so thresholds tuned against that scale carry over directly.

use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::region::region_of_interest;
use crate::types::{BinaryMask, Polygon};

/// Selectable HLS channel for range thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Hue,
    Lightness,
    Saturation,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Hue => "hue",
            Channel::Lightness => "lightness",
            Channel::Saturation => "saturation",
        }
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "hue" => Ok(Channel::Hue),
            "l" | "lightness" => Ok(Channel::Lightness),
            "s" | "saturation" => Ok(Channel::Saturation),
            _ => Err(Error::InvalidChannel {
                name: s.to_string(),
            }),
        }
    }
}

/// Range-thresholds single HLS channels of a region-masked RGB frame.
///
/// The ROI mask and the HLS conversion both happen once, at construction;
/// every `threshold_channel` call afterwards is a cheap range test over the
/// cached planes.
#[derive(Debug)]
pub struct ColorThresholder {
    width: usize,
    height: usize,
    h: Vec<u8>,
    l: Vec<u8>,
    s: Vec<u8>,
}

impl ColorThresholder {
    /// `rgb` is interleaved row-major RGB, `len == width * height * 3`.
    pub fn new(
        rgb: &[u8],
        width: usize,
        height: usize,
        polygons: &[Polygon],
    ) -> Result<Self> {
        let masked = region_of_interest(rgb, width, height, 3, polygons)?;

        let n = width * height;
        let mut h = vec![0u8; n];
        let mut l = vec![0u8; n];
        let mut s = vec![0u8; n];

        for i in 0..n {
            let (hh, ll, ss) = rgb_to_hls(masked[i * 3], masked[i * 3 + 1], masked[i * 3 + 2]);
            h[i] = hh;
            l[i] = ll;
            s[i] = ss;
        }

        debug!(width, height, polygons = polygons.len(), "color thresholder ready");

        Ok(Self {
            width,
            height,
            h,
            l,
            s,
        })
    }

    /// Binary mask with 1 exactly where `min <= value <= max` (inclusive
    /// on both sides) in the selected channel.
    pub fn threshold_channel(&self, channel: Channel, min: u8, max: u8) -> BinaryMask {
        let plane = self.channel(channel);
        let mut mask = BinaryMask::zeros(self.width, self.height);

        for (out, &v) in mask.data.iter_mut().zip(plane.iter()) {
            if v >= min && v <= max {
                *out = 1;
            }
        }

        mask
    }

    /// Cached channel plane, same spatial shape as the input frame.
    pub fn channel(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Hue => &self.h,
            Channel::Lightness => &self.l,
            Channel::Saturation => &self.s,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Convert one RGB pixel to 8-bit HLS.
/// Returns (H: 0-179, L: 0-255, S: 0-255).
#[inline]
pub fn rgb_to_hls(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r_n = r as f32 / 255.0;
    let g_n = g as f32 / 255.0;
    let b_n = b as f32 / 255.0;

    let max = r_n.max(g_n).max(b_n);
    let min = r_n.min(g_n).min(b_n);
    let delta = max - min;

    let l = (max + min) / 2.0;

    let s = if delta < 1e-6 {
        0.0
    } else if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    // Hue in degrees [0, 360)
    let h = if delta < 1e-6 {
        0.0
    } else if (max - r_n).abs() < 1e-6 {
        60.0 * (((g_n - b_n) / delta) % 6.0)
    } else if (max - g_n).abs() < 1e-6 {
        60.0 * (((b_n - r_n) / delta) + 2.0)
    } else {
        60.0 * (((r_n - g_n) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    (
        (h / 2.0).round().min(179.0) as u8,
        (l * 255.0).round() as u8,
        (s * 255.0).round() as u8,
    )
}

/// Luma grayscale of an interleaved RGB buffer (ITU-R BT.601 weights).
pub fn grayscale(rgb: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let expected = width * height * 3;
    if rgb.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: rgb.len(),
        });
    }

    Ok(rgb
        .chunks_exact(3)
        .map(|px| {
            let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            y.round().clamp(0.0, 255.0) as u8
        })
        .collect())
}
