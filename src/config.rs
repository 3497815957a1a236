// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Tuned thresholding recipe for one camera setup, loaded from YAML.
///
/// Channel names are plain strings here and parsed into [`Channel`]
/// (crate::color::Channel) when the recipe is applied, so a typo in a
/// config file surfaces as `InvalidChannel` instead of being ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Region-of-interest polygons, (x, y) vertex lists.
    pub roi: Vec<Vec<(i32, i32)>>,
    pub color: ColorThresholdConfig,
    pub gradient: GradientThresholdConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorThresholdConfig {
    pub channel: String,
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientThresholdConfig {
    pub kernel_size: usize,
    pub abs_x: (u8, u8),
    pub abs_y: (u8, u8),
    pub magnitude: (u8, u8),
    /// Radians, within [0, pi/2].
    pub direction: (f32, f32),
}

impl ThresholdConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ThresholdConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for ThresholdConfig {
    /// Starting point for a forward-facing dashcam: saturation picks up
    /// both white and yellow paint, the x-derivative favors the
    /// near-vertical lane edges.
    fn default() -> Self {
        Self {
            roi: Vec::new(),
            color: ColorThresholdConfig {
                channel: "saturation".to_string(),
                min: 170,
                max: 255,
            },
            gradient: GradientThresholdConfig {
                kernel_size: 3,
                abs_x: (20, 100),
                abs_y: (20, 100),
                magnitude: (30, 100),
                direction: (0.7, 1.3),
            },
        }
    }
}
