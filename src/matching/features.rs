//! # Feature Extraction
//!
//! Binarizes a [`PixelImage`] into a [`ModulusImage`] of the working
//! transform size. Each classified pixel becomes the role's `present` or
//! `absent` value; cells the strategy cannot classify (outside the source,
//! or on the edge strategy's last row and column) stay zero so they drop out
//! of the correlation sum.

use serde::{Deserialize, Serialize};

use crate::error::MatchResult;
use crate::ntt::ModulusImage;
use crate::ntt::field::{Element, MODULUS};
use crate::pixel::PixelImage;

/// Channel-sum cutoff for [`FeatureStrategy::Threshold`]: an average channel above 48.
pub const THRESHOLD_LEVEL: i32 = 3 * 48;

/// Channel-sum jump to a neighbour that counts as an edge.
pub const EDGE_DELTA: i32 = 132;

/// How pixels are classified as foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStrategy {
    /// Bright pixels are present. Suits crisp, high-contrast rendered glyphs.
    Threshold,
    /// Pixels on a sharp brightness step to the right or below are present.
    /// Suits noisy or anti-aliased captures.
    Edge,
}

impl FeatureStrategy {
    /// Parse a strategy name as typed by an operator.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "threshold" | "thresh" => Some(FeatureStrategy::Threshold),
            "edge" | "edges" => Some(FeatureStrategy::Edge),
            _ => None,
        }
    }

    /// Binarize `source` into a `width` x `height` field image.
    ///
    /// # Errors
    /// Fails if `width` or `height` is not a power of two within the field's
    /// transform order.
    pub fn extract(
        self,
        source: &PixelImage,
        width: usize,
        height: usize,
        encoding: Encoding,
    ) -> MatchResult<Features> {
        let mut image = ModulusImage::zeroed(width, height)?;
        let (cols, rows) = self.classified_extent(source);
        let cols = cols.min(width as u32);
        let rows = rows.min(height as u32);

        let mut present_count = 0usize;
        for y in 0..rows {
            for x in 0..cols {
                let value = if self.is_present(source, x, y) {
                    present_count += 1;
                    encoding.present
                } else {
                    encoding.absent
                };
                image.set(x as usize, y as usize, value);
            }
        }
        Ok(Features { image, present_count })
    }

    /// Columns and rows of `source` this strategy can classify.
    pub(crate) fn classified_extent(self, source: &PixelImage) -> (u32, u32) {
        match self {
            FeatureStrategy::Threshold => (source.width(), source.height()),
            FeatureStrategy::Edge => (
                source.width().saturating_sub(1),
                source.height().saturating_sub(1),
            ),
        }
    }

    #[inline]
    fn is_present(self, source: &PixelImage, x: u32, y: u32) -> bool {
        let level = source.channel_sum(x, y);
        match self {
            FeatureStrategy::Threshold => level > THRESHOLD_LEVEL,
            FeatureStrategy::Edge => {
                let right = source.channel_sum(x + 1, y);
                let below = source.channel_sum(x, y + 1);
                (level - right).abs() > EDGE_DELTA || (level - below).abs() > EDGE_DELTA
            }
        }
    }
}

/// Field values written for classified pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub present: Element,
    pub absent: Element,
}

impl Encoding {
    /// Haystack role: a plain 0/1 indicator.
    pub const HAYSTACK: Encoding = Encoding {
        present: 1,
        absent: 0,
    };

    /// Needle role: `-1` for present, `+1` for absent. Against the 0/1
    /// haystack, the correlation at an offset then equals
    /// `mismatches - needle_present_count`.
    pub const NEEDLE: Encoding = Encoding {
        present: (MODULUS - 1) as Element,
        absent: 1,
    };
}

/// Output of [`FeatureStrategy::extract`].
#[derive(Debug, Clone)]
pub struct Features {
    pub image: ModulusImage,
    /// Number of pixels classified as present.
    pub present_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient() -> PixelImage {
        // columns 0..2 black, column 2.. white
        let mut buffer = RgbaImage::from_pixel(5, 3, Rgba([0, 0, 0, 255]));
        for y in 0..3 {
            for x in 2..5 {
                buffer.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        PixelImage::from(buffer)
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(FeatureStrategy::from_name("Edges"), Some(FeatureStrategy::Edge));
        assert_eq!(FeatureStrategy::from_name(" threshold "), Some(FeatureStrategy::Threshold));
        assert_eq!(FeatureStrategy::from_name("ncc"), None);
    }

    #[test]
    fn threshold_marks_bright_pixels_and_pads_with_zero() {
        let features = FeatureStrategy::Threshold
            .extract(&gradient(), 8, 4, Encoding::NEEDLE)
            .unwrap();
        assert_eq!(features.present_count, 9);
        let image = &features.image;
        assert_eq!(image.get(0, 0), 1);
        assert_eq!(image.get(2, 0), (MODULUS - 1) as Element);
        assert_eq!(image.get(4, 2), (MODULUS - 1) as Element);
        // outside the 5x3 source
        assert_eq!(image.get(5, 0), 0);
        assert_eq!(image.get(0, 3), 0);
    }

    #[test]
    fn threshold_cutoff_is_strict() {
        let mut buffer = RgbaImage::from_pixel(2, 1, Rgba([48, 48, 48, 255]));
        buffer.put_pixel(1, 0, Rgba([49, 48, 48, 255]));
        let features = FeatureStrategy::Threshold
            .extract(&PixelImage::from(buffer), 2, 1, Encoding::HAYSTACK)
            .unwrap();
        assert_eq!(features.image.pixels(), &[0, 1]);
        assert_eq!(features.present_count, 1);
    }

    #[test]
    fn edge_marks_steps_and_skips_last_row_and_column() {
        let features = FeatureStrategy::Edge
            .extract(&gradient(), 8, 4, Encoding::NEEDLE)
            .unwrap();
        let image = &features.image;
        // the black pixel left of the step is the only edge in each row
        assert_eq!(image.get(1, 0), (MODULUS - 1) as Element);
        assert_eq!(image.get(1, 1), (MODULUS - 1) as Element);
        assert_eq!(image.get(0, 0), 1);
        assert_eq!(image.get(2, 0), 1);
        assert_eq!(image.get(3, 1), 1);
        // unclassifiable cells
        assert_eq!(image.get(4, 0), 0);
        assert_eq!(image.get(0, 2), 0);
        assert_eq!(features.present_count, 2);
    }

    #[test]
    fn edge_delta_is_strict() {
        let mut buffer = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        buffer.put_pixel(1, 0, Rgba([44, 44, 44, 255]));
        let features = FeatureStrategy::Edge
            .extract(&PixelImage::from(buffer.clone()), 2, 2, Encoding::HAYSTACK)
            .unwrap();
        assert_eq!(features.present_count, 0);

        buffer.put_pixel(1, 0, Rgba([45, 44, 44, 255]));
        let features = FeatureStrategy::Edge
            .extract(&PixelImage::from(buffer), 2, 2, Encoding::HAYSTACK)
            .unwrap();
        assert_eq!(features.present_count, 1);
        assert_eq!(features.image.get(0, 0), 1);
    }

    #[test]
    fn extract_rejects_bad_working_size() {
        assert!(FeatureStrategy::Threshold
            .extract(&gradient(), 6, 4, Encoding::HAYSTACK)
            .is_err());
    }
}
