//! # Screen Match
//!
//! Exact template matching for locating small reference bitmaps (icons,
//! rendered text) inside screenshots.
//!
//! Both images are binarized, then correlated with a 2D number-theoretic
//! transform over the prime field 61441 instead of a floating-point FFT, so
//! every mismatch count is exact. Transform passes run on a worker pool
//! spawned per call.
//!
//! ## Modules
//! - [`pixel`]: input bitmaps and crop/trim/resize helpers
//! - [`ntt`]: field arithmetic and the 1D/2D transforms
//! - [`matching`]: feature extraction, correlation and peak selection
//! - [`error`]: precondition failures
//!
//! ## Usage
//! ```no_run
//! use screen_match::{PixelImage, find_with_threshold};
//!
//! # fn run(screen: image::RgbaImage, label: image::RgbaImage) -> screen_match::MatchResult<()> {
//! let haystack = PixelImage::premultiplied(screen);
//! let needle = PixelImage::from(label).trim();
//! if let Some(best) = find_with_threshold(&haystack, &needle)?.first() {
//!     let (x, y) = best.center();
//!     println!("found at ({x}, {y}) with score {:.3}", best.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod matching;
pub mod ntt;
pub mod pixel;

pub use error::{MatchError, MatchResult};
pub use matching::{
    FeatureStrategy, MatchLocation, SearchPreset, find, find_with_edges, find_with_threshold,
};
pub use ntt::ModulusImage;
pub use pixel::{ChannelLayout, PixelImage};
