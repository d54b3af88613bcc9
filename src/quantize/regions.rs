//! Splits a posterized image into one visibility mask per gray level

use crate::io::configuration::REGION_MIN_TOLERANCE;
use crate::raster::VisibilityMask;
use image::GrayImage;

/// Expected gray levels of a posterized image and their match tolerance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSubdivision {
    levels: Vec<u8>,
    tolerance: u8,
}

impl RegionSubdivision {
    /// Derive levels `i * (255 / (layers - 1))` for `layers` regions
    ///
    /// The tolerance is an even share of the level range per side, never
    /// below 5. Fewer than two layers produce no levels.
    pub fn new(layers: usize) -> Self {
        if layers < 2 {
            return Self {
                levels: Vec::new(),
                tolerance: REGION_MIN_TOLERANCE,
            };
        }

        let step = usize::from(u8::MAX) / (layers - 1);
        let levels: Vec<u8> = (0..layers)
            .map(|i| u8::try_from(i * step).unwrap_or(u8::MAX))
            .collect();

        let range = usize::from(levels.last().copied().unwrap_or(0))
            - usize::from(levels.first().copied().unwrap_or(0));
        let share = u8::try_from(range / (layers * 2)).unwrap_or(u8::MAX);

        Self {
            levels,
            tolerance: share.max(REGION_MIN_TOLERANCE),
        }
    }

    /// Gray value of each region, darkest first
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    /// Largest gray distance still matched to a level
    pub const fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Build one mask per level, darkest first
    ///
    /// A pixel is visible in a level's mask when its value lies within the
    /// tolerance of that level. Without levels a single fully visible mask
    /// is returned.
    pub fn extract(&self, posterized: &GrayImage) -> Vec<VisibilityMask> {
        let (width, height) = posterized.dimensions();
        if self.levels.is_empty() {
            return vec![VisibilityMask::visible(width, height)];
        }

        let masks: Vec<VisibilityMask> = self
            .levels
            .iter()
            .map(|&level| {
                VisibilityMask::from_fn(width, height, |x, y| {
                    posterized.get_pixel(x, y).0[0].abs_diff(level) <= self.tolerance
                })
            })
            .collect();

        for (level, mask) in self.levels.iter().zip(&masks) {
            log::trace!("Region level {level}: {} visible pixels", mask.visible_count());
        }
        masks
    }
}
