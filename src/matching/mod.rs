//! # Template Matching
//!
//! Locates every occurrence of a small reference bitmap (the needle) inside a
//! screenshot (the haystack) and scores each one.
//!
//! ## Pipeline
//! 1. Pick the working size: per axis, the next power of two covering both images
//! 2. Binarize both images ([`features`]); the needle with a signed encoding
//! 3. Reverse the needle so the spectral product correlates instead of convolves
//! 4. Forward transform both, multiply pointwise, inverse transform
//! 5. Add back the needle's present count, leaving per-offset mismatch counts
//! 6. Score, bound, rank and deduplicate ([`peaks`])
//!
//! ## Presets
//! - [`find_with_threshold`]: brightness threshold, cutoff 0.85
//! - [`find_with_edges`]: edge detection, cutoff 0.95
//!
//! All arithmetic is exact modulo 61441; no floating point until scoring.

pub mod features;
pub mod peaks;
pub mod preset;

use std::time::Instant;

pub use features::{Encoding, FeatureStrategy, Features};
pub use peaks::{MatchLocation, deduplicate, sort_by_score};
pub use preset::SearchPreset;

use crate::error::{Axis, MatchResult};
use crate::ntt::field::{self, Element, MODULUS};
use crate::ntt::parallel::available_workers;
use crate::ntt::{self, forward_transform_2d, inverse_transform_2d};
use crate::pixel::PixelImage;
use peaks::Footprint;

/// Find `needle` in `haystack` after binarizing both by brightness.
pub fn find_with_threshold(
    haystack: &PixelImage,
    needle: &PixelImage,
) -> MatchResult<Vec<MatchLocation>> {
    find(haystack, needle, &SearchPreset::THRESHOLD)
}

/// Find `needle` in `haystack` after reducing both to their edges.
pub fn find_with_edges(
    haystack: &PixelImage,
    needle: &PixelImage,
) -> MatchResult<Vec<MatchLocation>> {
    find(haystack, needle, &SearchPreset::EDGES)
}

/// Find `needle` in `haystack` with an explicit preset.
///
/// # Returns
/// Matches best first, no two within `preset.dedup_radius` of each other.
/// An empty list when nothing scores above the cutoff, when the needle does
/// not fit inside the haystack, or when the strategy can classify none of the
/// needle's pixels (an empty needle, or a one pixel wide or high needle under
/// [`FeatureStrategy::Edge`]).
///
/// # Errors
/// `TransformTooLarge` when either image needs a working side beyond the
/// field's transform order, or `WorkerPool` if transform threads cannot be
/// spawned.
pub fn find(
    haystack: &PixelImage,
    needle: &PixelImage,
    preset: &SearchPreset,
) -> MatchResult<Vec<MatchLocation>> {
    let (width, height) = working_size(haystack, needle)?;

    // a needle with no classifiable pixels is all padding and would score 1.0 everywhere
    let (columns, rows) = preset.strategy.classified_extent(needle);
    if columns == 0
        || rows == 0
        || needle.width() > haystack.width()
        || needle.height() > haystack.height()
    {
        log::debug!(
            "needle {}x{} cannot fit haystack {}x{}",
            needle.width(),
            needle.height(),
            haystack.width(),
            haystack.height()
        );
        return Ok(Vec::new());
    }

    let area = needle.width() as u64 * needle.height() as u64;
    if area >= MODULUS {
        log::warn!("needle area {area} reaches the field modulus; mismatch counts may wrap");
    }

    let started = Instant::now();
    log::debug!(
        "{:?} search: needle {}x{} in haystack {}x{}, working size {width}x{height}, {} workers",
        preset.strategy,
        needle.width(),
        needle.height(),
        haystack.width(),
        haystack.height(),
        available_workers()
    );

    let mut spectrum = preset
        .strategy
        .extract(haystack, width, height, Encoding::HAYSTACK)?
        .image;
    let Features {
        image: mut product,
        present_count,
    } = preset.strategy.extract(needle, width, height, Encoding::NEEDLE)?;

    product.reverse();
    forward_transform_2d(&mut spectrum)?;
    forward_transform_2d(&mut product)?;

    // pointwise product, in place in the needle buffer
    for (value, &other) in product.pixels_mut().iter_mut().zip(spectrum.pixels()) {
        *value = field::mul(*value as u64, other as u64) as Element;
    }
    drop(spectrum);
    inverse_transform_2d(&mut product)?;

    // each cell becomes the mismatch count at its offset
    let bias = field::reduce(present_count) as u64;
    for value in product.pixels_mut() {
        *value = field::add(*value as u64, bias) as Element;
    }

    let footprint = Footprint {
        needle_width: needle.width(),
        needle_height: needle.height(),
        haystack_width: haystack.width(),
        haystack_height: haystack.height(),
    };
    let mut candidates = peaks::select_candidates(&product, footprint, preset.cutoff);
    let candidate_count = candidates.len();
    sort_by_score(&mut candidates);
    let matches = deduplicate(candidates, preset.dedup_radius);

    log::debug!(
        "{candidate_count} candidates above {}, {} after dedup, took {:?}",
        preset.cutoff,
        matches.len(),
        started.elapsed()
    );
    Ok(matches)
}

/// Working transform size for a search: per axis, the smallest power of two
/// covering both images.
///
/// # Errors
/// `TransformTooLarge` if that exceeds the field's transform order.
pub fn working_size(haystack: &PixelImage, needle: &PixelImage) -> MatchResult<(usize, usize)> {
    let width = ntt::transform_side(Axis::Width, haystack.width().max(needle.width()) as usize)?;
    let height =
        ntt::transform_side(Axis::Height, haystack.height().max(needle.height()) as usize)?;
    Ok((width, height))
}
