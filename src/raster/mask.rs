//! Per-pixel visibility masks restricting where dots may be painted

use bitvec::prelude::*;
use image::{GrayImage, Luma};

/// Bit grid marking which pixels of an image are visible
///
/// Stored row-major, one bit per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMask {
    bits: BitVec,
    width: u32,
    height: u32,
}

impl VisibilityMask {
    /// Create a mask with every pixel hidden
    pub fn hidden(width: u32, height: u32) -> Self {
        Self {
            bits: bitvec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Create a mask with every pixel visible
    pub fn visible(width: u32, height: u32) -> Self {
        Self {
            bits: bitvec![1; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Build a mask by evaluating `visible` for every pixel
    pub fn from_fn(width: u32, height: u32, mut visible: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::hidden(width, height);
        for y in 0..height {
            for x in 0..width {
                if visible(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Treat every non-zero pixel of a gray image as visible
    pub fn from_gray(img: &GrayImage) -> Self {
        Self::from_fn(img.width(), img.height(), |x, y| img.get_pixel(x, y).0[0] > 0)
    }

    /// Mask width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Test a single pixel; pixels outside the mask are hidden
    pub fn is_visible(&self, x: u32, y: u32) -> bool {
        self.index(x, y)
            .is_some_and(|idx| self.bits.get(idx).as_deref() == Some(&true))
    }

    /// Mark a pixel visible or hidden, ignoring out-of-bounds positions
    pub fn set(&mut self, x: u32, y: u32, visible: bool) {
        if let Some(idx) = self.index(x, y) {
            self.bits.set(idx, visible);
        }
    }

    /// Number of visible pixels
    pub fn visible_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Whether any pixel inside the rectangle is visible
    ///
    /// The rectangle is clamped to the mask bounds, so cells straddling the
    /// image border only consider their in-bounds part.
    pub fn any_visible_in(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let end_x = x.saturating_add(width).min(self.width);
        let end_y = y.saturating_add(height).min(self.height);
        if x >= end_x {
            return false;
        }

        (y..end_y).any(|row| {
            let start = row as usize * self.width as usize;
            self.bits
                .get(start + x as usize..start + end_x as usize)
                .is_some_and(|bits| bits.any())
        })
    }

    /// Render the mask as a black/white gray image
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.is_visible(x, y) { u8::MAX } else { 0 }])
        })
    }
}
