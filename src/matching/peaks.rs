//! Peak selection: scoring, bounds filtering, ranking and deduplication of
//! correlation cells.

use imageproc::rect::Rect;

use crate::ntt::ModulusImage;

/// Chebyshev radius within which two match corners are the same match.
pub const DEFAULT_DEDUP_RADIUS: u32 = 2;

/// Where the needle was found and how well it fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchLocation {
    /// The needle's footprint inside the haystack.
    pub rect: Rect,
    /// `1 - mismatches / needle_area`; 1.0 is a pixel-perfect feature match.
    pub score: f32,
}

impl MatchLocation {
    /// # Panics
    /// If `width` or `height` is zero.
    pub fn new(x: u32, y: u32, width: u32, height: u32, score: f32) -> Self {
        Self {
            rect: Rect::at(x as i32, y as i32).of_size(width, height),
            score,
        }
    }

    pub fn x(&self) -> u32 {
        self.rect.left() as u32
    }

    pub fn y(&self) -> u32 {
        self.rect.top() as u32
    }

    /// Centre of the footprint, the point a caller would click.
    pub fn center(&self) -> (u32, u32) {
        (
            self.x() + self.rect.width() / 2,
            self.y() + self.rect.height() / 2,
        )
    }

    /// True if both corner offsets are within `radius`.
    pub fn is_near(&self, other: &MatchLocation, radius: u32) -> bool {
        let dx = (self.rect.left() - other.rect.left()).unsigned_abs();
        let dy = (self.rect.top() - other.rect.top()).unsigned_abs();
        dx <= radius && dy <= radius
    }
}

/// Needle and haystack extents, in source pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Footprint {
    pub needle_width: u32,
    pub needle_height: u32,
    pub haystack_width: u32,
    pub haystack_height: u32,
}

impl Footprint {
    fn needle_area(&self) -> f32 {
        (self.needle_width as u64 * self.needle_height as u64) as f32
    }

    fn fits_at(&self, x: u32, y: u32) -> bool {
        x + self.needle_width <= self.haystack_width
            && y + self.needle_height <= self.haystack_height
    }
}

/// Turn a grid of mismatch counts into candidates scoring above `cutoff`.
///
/// Cell `(cx, cy)` describes the needle anchored at `(cx + 1, cy + 1)`,
/// wrapping around the working size: the end-to-end needle reversal shifts
/// the cyclic correlation by one cell on each axis.
pub(crate) fn select_candidates(
    mismatches: &ModulusImage,
    footprint: Footprint,
    cutoff: f32,
) -> Vec<MatchLocation> {
    let (width, height) = (mismatches.width(), mismatches.height());
    let area = footprint.needle_area();
    let mut candidates = Vec::new();
    for (index, &count) in mismatches.pixels().iter().enumerate() {
        let score = 1.0 - count as f32 / area;
        if score <= cutoff {
            continue;
        }
        let x = ((index % width + 1) % width) as u32;
        let y = ((index / width + 1) % height) as u32;
        if !footprint.fits_at(x, y) {
            continue;
        }
        candidates.push(MatchLocation::new(
            x,
            y,
            footprint.needle_width,
            footprint.needle_height,
            score,
        ));
    }
    candidates
}

/// Best score first. Stable, so ties keep raster order.
pub fn sort_by_score(candidates: &mut [MatchLocation]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Greedy suppression over score-sorted candidates: keep a candidate only if
/// no already kept one lies within `radius` (Chebyshev) of its corner.
pub fn deduplicate(sorted: Vec<MatchLocation>, radius: u32) -> Vec<MatchLocation> {
    let mut kept: Vec<MatchLocation> = Vec::new();
    for candidate in sorted {
        if !kept.iter().any(|k| k.is_near(&candidate, radius)) {
            kept.push(candidate);
        }
    }
    kept
}
