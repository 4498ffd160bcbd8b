//! # Pixel Images
//!
//! The 4-channel bitmaps handed to the matcher by the capture and text
//! rendering providers, plus the crop/trim/resize helpers used to prepare
//! them.
//!
//! ## Channel layouts
//! - **Straight**: RGBA with unassociated alpha (what the `image` crate decodes to)
//! - **Premultiplied**: RGBA with colour already scaled by alpha (what most
//!   screen grabbers return)
//!
//! Feature extraction reads only the colour channels, so both layouts are
//! handled the same way. Anything else is rejected up front.

use image::imageops;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};

/// How the fourth channel relates to the colour channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelLayout {
    Straight,
    Premultiplied,
}

/// An immutable 4-byte-per-pixel bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelImage {
    layout: ChannelLayout,
    buffer: RgbaImage,
}

impl PixelImage {
    /// Wrap a raw row-major RGBA byte buffer.
    ///
    /// # Errors
    /// `BufferSize` if `bytes` is not exactly `4 * width * height` long.
    pub fn new(
        layout: ChannelLayout,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    ) -> MatchResult<Self> {
        let expected = 4 * width as usize * height as usize;
        let actual = bytes.len();
        let buffer = RgbaImage::from_raw(width, height, bytes)
            .filter(|_| actual == expected)
            .ok_or(MatchError::BufferSize { expected, actual })?;
        Ok(Self { layout, buffer })
    }

    /// Wrap a buffer whose colour channels are premultiplied by alpha.
    pub fn premultiplied(buffer: RgbaImage) -> Self {
        Self {
            layout: ChannelLayout::Premultiplied,
            buffer,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Sum of the three colour channels at `(x, y)`, in `0..=765`.
    #[inline]
    pub fn channel_sum(&self, x: u32, y: u32) -> i32 {
        let p = self.buffer.get_pixel(x, y);
        p[0] as i32 + p[1] as i32 + p[2] as i32
    }

    /// Copy of the rectangle at `(x, y)` of `width` x `height`, clamped to
    /// the image bounds.
    pub fn clip(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let buffer = imageops::crop_imm(&self.buffer, x, y, width, height).to_image();
        Self {
            layout: self.layout,
            buffer,
        }
    }

    /// Crop to the bounding box of pixels whose colour is not pure black.
    /// An all-black image comes back unchanged.
    pub fn trim(&self) -> Self {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in self.buffer.enumerate_pixels() {
            if p[0] == 0 && p[1] == 0 && p[2] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                }
            });
        }
        match bounds {
            Some((min_x, min_y, max_x, max_y)) => {
                self.clip(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
            }
            None => self.clone(),
        }
    }

    /// Nearest-neighbour resample to `width` x `height`. Destination pixel
    /// `x` samples source column `x * src_width / width`, rounded down, and
    /// likewise for rows.
    pub fn resize(&self, width: u32, height: u32) -> Self {
        let (src_width, src_height) = self.buffer.dimensions();
        let buffer = if src_width == 0 || src_height == 0 {
            RgbaImage::new(width, height)
        } else {
            RgbaImage::from_fn(width, height, |x, y| {
                let sx = (x as u64 * src_width as u64 / width as u64) as u32;
                let sy = (y as u64 * src_height as u64 / height as u64) as u32;
                *self.buffer.get_pixel(sx, sy)
            })
        };
        Self {
            layout: self.layout,
            buffer,
        }
    }
}

impl From<RgbaImage> for PixelImage {
    fn from(buffer: RgbaImage) -> Self {
        Self {
            layout: ChannelLayout::Straight,
            buffer,
        }
    }
}

impl TryFrom<DynamicImage> for PixelImage {
    type Error = MatchError;

    /// Only 8-bit RGBA is accepted; other colour types are a caller error and
    /// are not converted behind their back.
    fn try_from(image: DynamicImage) -> MatchResult<Self> {
        match image {
            DynamicImage::ImageRgba8(buffer) => Ok(buffer.into()),
            other => Err(MatchError::UnsupportedLayout(format!("{:?}", other.color()))),
        }
    }
}
