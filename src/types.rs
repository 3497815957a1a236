// src/types.rs

/// One polygon as an ordered list of (x, y) vertices.
///
/// Vertices may lie outside the image; masking clips to the frame.
pub type Polygon = Vec<(i32, i32)>;

/// Per-pixel 0/1 mask produced by a thresholding call.
///
/// Always matches the spatial dimensions of the channel it was computed
/// from, and is allocated fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl BinaryMask {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    pub fn is_all_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    pub fn is_all_one(&self) -> bool {
        self.data.iter().all(|&v| v == 1)
    }
}
