// src/gradient.rs
//
// Sobel-based gradient thresholding over a grayscale frame.
//
// Lane lines show up as near-vertical edges, so the x-derivative and the
// gradient direction are the useful signals here. Derivatives are computed
// in f32, rescaled per call so the strongest observed response maps to 255,
// and range-tested into a binary mask. A frame with no gradient at all
// (uniform image) produces an all-zero mask instead of a division fault.

use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::BinaryMask;

/// Derivative axis for `abs_sobel_thresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    X,
    Y,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Orientation::X),
            "y" => Ok(Orientation::Y),
            _ => Err(Error::InvalidOrientation {
                name: s.to_string(),
            }),
        }
    }
}

/// Computes binary masks from Sobel responses of one grayscale frame.
///
/// The frame is stored once at construction and reused across calls; every
/// thresholding method is `&self` and allocates its own output, so a
/// constructed instance can be shared read-only across threads.
#[derive(Debug)]
pub struct GradientThresholder {
    gray: Vec<f32>,
    width: usize,
    height: usize,
}

impl GradientThresholder {
    pub fn new(gray: &[u8], width: usize, height: usize) -> Result<Self> {
        let expected = width * height;
        if gray.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: gray.len(),
            });
        }

        debug!(width, height, "gradient thresholder ready");

        Ok(Self {
            gray: gray.iter().map(|&v| v as f32).collect(),
            width,
            height,
        })
    }

    /// Threshold the absolute derivative along one axis.
    ///
    /// The response is rescaled so the strongest magnitude in *this* frame
    /// maps to 255, then tested against the inclusive `thresh` range. A
    /// zero maximum (uniform frame) yields an all-zero mask.
    pub fn abs_sobel_thresh(
        &self,
        orient: Orientation,
        ksize: usize,
        thresh: (u8, u8),
    ) -> Result<BinaryMask> {
        let deriv = self.sobel(orient, ksize)?;
        let magnitudes: Vec<f32> = deriv.iter().map(|v| v.abs()).collect();
        Ok(self.threshold_rescaled(&magnitudes, thresh))
    }

    /// Threshold the Euclidean gradient magnitude sqrt(dx^2 + dy^2).
    ///
    /// Same per-frame rescale and zero-maximum policy as
    /// [`abs_sobel_thresh`](Self::abs_sobel_thresh).
    pub fn mag_thresh(&self, ksize: usize, thresh: (u8, u8)) -> Result<BinaryMask> {
        let gx = self.sobel(Orientation::X, ksize)?;
        let gy = self.sobel(Orientation::Y, ksize)?;

        let magnitudes: Vec<f32> = gx
            .iter()
            .zip(gy.iter())
            .map(|(x, y)| (x * x + y * y).sqrt())
            .collect();

        Ok(self.threshold_rescaled(&magnitudes, thresh))
    }

    /// Threshold the gradient direction atan2(|dy|, |dx|), in radians.
    ///
    /// The absolute values fold the direction into [0, pi/2], so the full
    /// (0, pi/2) range always produces an all-ones mask. No rescaling is
    /// involved.
    pub fn dir_thresh(&self, ksize: usize, thresh: (f32, f32)) -> Result<BinaryMask> {
        let gx = self.sobel(Orientation::X, ksize)?;
        let gy = self.sobel(Orientation::Y, ksize)?;

        let mut mask = BinaryMask::zeros(self.width, self.height);
        for ((out, x), y) in mask.data.iter_mut().zip(gx.iter()).zip(gy.iter()) {
            let dir = y.abs().atan2(x.abs());
            if dir >= thresh.0 && dir <= thresh.1 {
                *out = 1;
            }
        }

        Ok(mask)
    }

    /// Gaussian-smooth the stored frame with an odd `ksize` x `ksize`
    /// kernel, sigma derived from the kernel size.
    pub fn gaussian_blur(&self, ksize: usize) -> Result<Vec<u8>> {
        if ksize == 0 || ksize % 2 == 0 {
            return Err(Error::InvalidKernelSize { ksize });
        }

        let kernel = gaussian_kernel(ksize);
        let blurred = convolve_separable(&self.gray, self.width, self.height, &kernel, &kernel);

        Ok(blurred
            .iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect())
    }

    /// Raw directional derivative, row-major f32, same shape as the frame.
    fn sobel(&self, orient: Orientation, ksize: usize) -> Result<Vec<f32>> {
        let (deriv, smooth) = sobel_kernels(ksize)?;

        Ok(match orient {
            Orientation::X => {
                convolve_separable(&self.gray, self.width, self.height, &deriv, &smooth)
            }
            Orientation::Y => {
                convolve_separable(&self.gray, self.width, self.height, &smooth, &deriv)
            }
        })
    }

    /// Map the strongest observed magnitude to 255, then apply the
    /// inclusive range test. Zero maximum short-circuits to all zeros.
    fn threshold_rescaled(&self, magnitudes: &[f32], thresh: (u8, u8)) -> BinaryMask {
        let mut mask = BinaryMask::zeros(self.width, self.height);

        let max = magnitudes.iter().copied().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return mask;
        }

        let scale = 255.0 / max;
        for (out, &v) in mask.data.iter_mut().zip(magnitudes.iter()) {
            let scaled = (v * scale).round() as u8;
            if scaled >= thresh.0 && scaled <= thresh.1 {
                *out = 1;
            }
        }

        mask
    }
}

/// 1-D derivative and smoothing rows for a Sobel kernel of odd size.
///
/// Size 3 gives the classic [-1, 0, 1] / [1, 2, 1] pair; larger odd sizes
/// grow both rows by repeated convolution with [1, 2, 1]. Size 1 is the
/// bare central-difference row with no cross-axis smoothing.
fn sobel_kernels(ksize: usize) -> Result<(Vec<f32>, Vec<f32>)> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(Error::InvalidKernelSize { ksize });
    }

    if ksize == 1 {
        return Ok((vec![-1.0, 0.0, 1.0], vec![1.0]));
    }

    let mut deriv = vec![-1.0, 0.0, 1.0];
    let mut smooth = vec![1.0, 2.0, 1.0];
    while smooth.len() < ksize {
        deriv = convolve_full(&deriv, &[1.0, 2.0, 1.0]);
        smooth = convolve_full(&smooth, &[1.0, 2.0, 1.0]);
    }

    Ok((deriv, smooth))
}

/// Normalized 1-D Gaussian row; sigma follows the usual kernel-size rule
/// sigma = 0.3 * ((k - 1) * 0.5 - 1) + 0.8.
fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = (ksize / 2) as isize;

    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let x = i as f32;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Full 1-D convolution, output length a.len() + b.len() - 1.
fn convolve_full(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0f32; a.len() + b.len() - 1];
    for (i, &av) in a.iter().enumerate() {
        for (j, &bv) in b.iter().enumerate() {
            out[i + j] += av * bv;
        }
    }
    out
}

/// Separable 2-D correlation with border clamp (edge replication).
///
/// `kx` runs along rows, `ky` along columns; both must be odd-length.
fn convolve_separable(
    src: &[f32],
    width: usize,
    height: usize,
    kx: &[f32],
    ky: &[f32],
) -> Vec<f32> {
    let rx = (kx.len() / 2) as isize;
    let ry = (ky.len() / 2) as isize;

    // Horizontal pass
    let mut tmp = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (i, &k) in kx.iter().enumerate() {
                let sx = (x as isize + i as isize - rx).clamp(0, width as isize - 1);
                acc += k * row[sx as usize];
            }
            tmp[y * width + x] = acc;
        }
    }

    // Vertical pass
    let mut out = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (j, &k) in ky.iter().enumerate() {
                let sy = (y as isize + j as isize - ry).clamp(0, height as isize - 1);
                acc += k * tmp[sy as usize * width + x];
            }
            out[y * width + x] = acc;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    /// Left half dark, right half bright: a single vertical edge.
    fn vertical_edge(width: usize, height: usize) -> Vec<u8> {
        let mut img = vec![0u8; width * height];
        for y in 0..height {
            for x in width / 2..width {
                img[y * width + x] = 200;
            }
        }
        img
    }

    fn horizontal_edge(width: usize, height: usize) -> Vec<u8> {
        let mut img = vec![0u8; width * height];
        for y in height / 2..height {
            for x in 0..width {
                img[y * width + x] = 200;
            }
        }
        img
    }

    #[test]
    fn test_orientation_parsing() {
        assert_eq!("x".parse::<Orientation>().unwrap(), Orientation::X);
        assert_eq!("Y".parse::<Orientation>().unwrap(), Orientation::Y);
        let err = "diag".parse::<Orientation>().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidOrientation {
                name: "diag".to_string()
            }
        );
    }

    #[test]
    fn test_sobel_kernel_growth() {
        let (deriv, smooth) = sobel_kernels(3).unwrap();
        assert_eq!(deriv, vec![-1.0, 0.0, 1.0]);
        assert_eq!(smooth, vec![1.0, 2.0, 1.0]);

        let (deriv, smooth) = sobel_kernels(5).unwrap();
        assert_eq!(deriv, vec![-1.0, -2.0, 0.0, 2.0, 1.0]);
        assert_eq!(smooth, vec![1.0, 4.0, 6.0, 4.0, 1.0]);
    }

    #[test]
    fn test_even_kernel_size_rejected() {
        let img = vertical_edge(8, 8);
        let thres = GradientThresholder::new(&img, 8, 8).unwrap();
        let err = thres.abs_sobel_thresh(Orientation::X, 4, (0, 255)).unwrap_err();
        assert_eq!(err, Error::InvalidKernelSize { ksize: 4 });
        let err = thres.gaussian_blur(0).unwrap_err();
        assert_eq!(err, Error::InvalidKernelSize { ksize: 0 });
    }

    #[test]
    fn test_uniform_image_gives_all_zero_mask() {
        // Constant gray: every derivative is zero, the rescale maximum is
        // zero, and the policy is an all-zero mask rather than a fault.
        let img = vec![100u8; 6 * 6];
        let thres = GradientThresholder::new(&img, 6, 6).unwrap();

        let mask = thres.abs_sobel_thresh(Orientation::X, 3, (0, 0)).unwrap();
        assert!(mask.is_all_zero());

        let mask = thres.abs_sobel_thresh(Orientation::X, 3, (0, 255)).unwrap();
        assert!(mask.is_all_zero());

        let mask = thres.mag_thresh(3, (0, 255)).unwrap();
        assert!(mask.is_all_zero());
    }

    #[test]
    fn test_vertical_edge_triggers_x_response() {
        let img = vertical_edge(8, 8);
        let thres = GradientThresholder::new(&img, 8, 8).unwrap();

        // The strongest |dx| pixels sit on the edge columns and rescale
        // to 255, so a high threshold keeps exactly those
        let mask = thres.abs_sobel_thresh(Orientation::X, 3, (200, 255)).unwrap();
        assert_eq!(mask.width, 8);
        assert_eq!(mask.height, 8);
        for y in 0..8 {
            assert_eq!(mask.get(3, y), 1, "edge column, row {y}");
            assert_eq!(mask.get(4, y), 1, "edge column, row {y}");
            assert_eq!(mask.get(0, y), 0, "flat column, row {y}");
            assert_eq!(mask.get(7, y), 0, "flat column, row {y}");
        }

        // The same frame has no y gradient at all
        let mask = thres.abs_sobel_thresh(Orientation::Y, 3, (0, 255)).unwrap();
        assert!(mask.is_all_zero());
    }

    #[test]
    fn test_magnitude_matches_single_axis_edge() {
        // With only a horizontal edge, magnitude reduces to |dy|
        let img = horizontal_edge(8, 8);
        let thres = GradientThresholder::new(&img, 8, 8).unwrap();

        let mag = thres.mag_thresh(3, (200, 255)).unwrap();
        let abs_y = thres.abs_sobel_thresh(Orientation::Y, 3, (200, 255)).unwrap();
        assert_eq!(mag, abs_y);
        assert!(mag.count_ones() > 0);
    }

    #[test]
    fn test_full_direction_range_is_all_ones() {
        let img = vertical_edge(8, 8);
        let thres = GradientThresholder::new(&img, 8, 8).unwrap();
        let mask = thres.dir_thresh(3, (0.0, FRAC_PI_2)).unwrap();
        assert!(mask.is_all_one());
    }

    #[test]
    fn test_direction_separates_edge_orientations() {
        // A horizontal edge has gradients pointing along y, direction near
        // pi/2; a narrow band around pi/2 keeps them
        let img = horizontal_edge(8, 8);
        let thres = GradientThresholder::new(&img, 8, 8).unwrap();

        let mask = thres.dir_thresh(3, (1.4, FRAC_PI_2)).unwrap();
        for x in 0..8 {
            assert_eq!(mask.get(x, 3), 1, "edge row, column {x}");
            assert_eq!(mask.get(x, 4), 1, "edge row, column {x}");
        }

        // A band near zero keeps the flat regions (atan2(0, 0) == 0) but
        // not the edge rows
        let mask = thres.dir_thresh(3, (0.0, 0.1)).unwrap();
        for x in 0..8 {
            assert_eq!(mask.get(x, 3), 0, "edge row, column {x}");
            assert_eq!(mask.get(x, 0), 1, "flat row, column {x}");
        }
    }

    #[test]
    fn test_gaussian_blur_preserves_constant_image() {
        let img = vec![77u8; 5 * 5];
        let thres = GradientThresholder::new(&img, 5, 5).unwrap();
        let blurred = thres.gaussian_blur(5).unwrap();
        assert_eq!(blurred, img);
    }

    #[test]
    fn test_gaussian_blur_smooths_edge() {
        let img = vertical_edge(8, 4);
        let thres = GradientThresholder::new(&img, 8, 4).unwrap();
        let blurred = thres.gaussian_blur(3).unwrap();

        assert_eq!(blurred.len(), img.len());
        // Edge-adjacent pixels move toward the middle
        assert!(blurred[3] > 0);
        assert!(blurred[4] < 200);
        // Far from the edge the clamp border keeps values intact
        assert_eq!(blurred[0], 0);
        assert_eq!(blurred[7], 200);
    }

    #[test]
    fn test_shape_mismatch_on_construction() {
        let img = vec![0u8; 10];
        let err = GradientThresholder::new(&img, 4, 4).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                expected: 16,
                actual: 10
            }
        );
    }
}
