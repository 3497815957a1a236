// src/region.rs
//
// Region-of-interest masking shared by the color and gradient thresholders.
// Only the region inside the polygon(s) survives; everything else is set to
// black, via a full-intensity fill mask ANDed against the input.

use crate::error::{Error, Result};
use crate::types::Polygon;

/// Zero every pixel outside the union of `polygons`.
///
/// `data` is an interleaved row-major buffer of `channels` bytes per pixel
/// (1 for grayscale, 3 for RGB). The input is never mutated; a fresh buffer
/// of the same shape is returned. An empty polygon list yields an all-black
/// image, and degenerate polygons (fewer than 3 points, or zero area)
/// simply contribute no unmasked pixels.
pub fn region_of_interest(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    polygons: &[Polygon],
) -> Result<Vec<u8>> {
    let expected = width * height * channels;
    if data.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let coverage = fill_polygons(width, height, polygons);

    let mut masked = vec![0u8; expected];
    for (i, &fill) in coverage.iter().enumerate() {
        if fill != 0 {
            let base = i * channels;
            for c in 0..channels {
                masked[base + c] = data[base + c] & fill;
            }
        }
    }

    Ok(masked)
}

/// Rasterize the union of `polygons` into a single-channel 0/255 mask.
///
/// Scanline even-odd fill, sampled at pixel centers. A pixel belongs to a
/// polygon when its center (x + 0.5, y + 0.5) falls inside it.
fn fill_polygons(width: usize, height: usize, polygons: &[Polygon]) -> Vec<u8> {
    let mut mask = vec![0u8; width * height];
    let mut crossings: Vec<f32> = Vec::new();

    for poly in polygons {
        if poly.len() < 3 {
            continue;
        }

        for y in 0..height {
            let yc = y as f32 + 0.5;
            crossings.clear();

            for i in 0..poly.len() {
                let (x0, y0) = poly[i];
                let (x1, y1) = poly[(i + 1) % poly.len()];
                let (x0, y0) = (x0 as f32, y0 as f32);
                let (x1, y1) = (x1 as f32, y1 as f32);

                // Horizontal edges never cross a scanline; the half-open
                // range keeps shared vertices from being counted twice.
                let (y_lo, y_hi) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
                if y0 == y1 || yc < y_lo || yc >= y_hi {
                    continue;
                }

                crossings.push(x0 + (yc - y0) * (x1 - x0) / (y1 - y0));
            }

            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks(2) {
                let &[x_enter, x_exit] = pair else { continue };

                // Pixel centers inside [x_enter, x_exit], clipped to the frame
                let x_from = (x_enter - 0.5).ceil().max(0.0) as usize;
                let x_to = (x_exit - 0.5).floor().min(width as f32 - 1.0);
                if x_to < 0.0 {
                    continue;
                }

                for x in x_from..=(x_to as usize) {
                    mask[y * width + x] = 255;
                }
            }
        }
    }

    mask
}
