//! # Number-Theoretic Transform
//!
//! Exact integer transforms over the prime field of [`field`], used to turn
//! 2D correlation into a pointwise product.
//!
//! - [`field`]: constants, modular exponentiation and inversion
//! - [`transform`]: strided 1D forward/inverse transforms
//! - [`parallel`]: row/column 2D compositions on a per-call worker pool

pub mod field;
pub mod parallel;
pub mod transform;

pub use field::{Element, LOG2_ROOT_ORDER, MODULUS, PRIMITIVE_ROOT, ROOT_ORDER};
pub use parallel::{forward_transform_2d, inverse_transform_2d};
pub use transform::{forward_transform_1d, inverse_transform_1d};

use crate::error::{Axis, MatchError, MatchResult};

/// A row-major grid of field elements whose sides are powers of two no larger
/// than [`ROOT_ORDER`], ready for [`forward_transform_2d`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulusImage {
    width: usize,
    height: usize,
    pixels: Vec<Element>,
}

impl ModulusImage {
    /// A zero-filled image.
    pub fn zeroed(width: usize, height: usize) -> MatchResult<Self> {
        check_side(Axis::Width, width)?;
        check_side(Axis::Height, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; width * height],
        })
    }

    /// Wrap existing field data. Values are reduced into the field.
    pub fn from_pixels(width: usize, height: usize, mut pixels: Vec<Element>) -> MatchResult<Self> {
        check_side(Axis::Width, width)?;
        check_side(Axis::Height, height)?;
        if pixels.len() != width * height {
            return Err(MatchError::BufferSize {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        for value in pixels.iter_mut() {
            *value = field::reduce(*value as usize);
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn log2_width(&self) -> u32 {
        self.width.trailing_zeros()
    }

    pub fn log2_height(&self) -> u32 {
        self.height.trailing_zeros()
    }

    pub fn pixels(&self) -> &[Element] {
        &self.pixels
    }

    /// Raw element access. Writers must keep every value below [`MODULUS`].
    pub(crate) fn pixels_mut(&mut self) -> &mut [Element] {
        &mut self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Element {
        self.pixels[y * self.width + x]
    }

    /// Store `value` reduced into the field.
    pub fn set(&mut self, x: usize, y: usize, value: Element) {
        self.pixels[y * self.width + x] = field::reduce(value as usize);
    }

    /// Flip the element order end to end, which reverses both axes at once.
    pub fn reverse(&mut self) {
        self.pixels.reverse();
    }

    pub fn into_pixels(self) -> Vec<Element> {
        self.pixels
    }
}

/// Smallest power of two `>= size` that the field can transform along `axis`.
pub fn transform_side(axis: Axis, size: usize) -> MatchResult<usize> {
    let side = size.max(1).next_power_of_two();
    check_side(axis, side)?;
    Ok(side)
}

fn check_side(axis: Axis, size: usize) -> MatchResult<()> {
    if size > ROOT_ORDER {
        return Err(MatchError::TransformTooLarge {
            axis,
            requested: size,
            capacity: ROOT_ORDER,
        });
    }
    if !size.is_power_of_two() {
        return Err(MatchError::NotPowerOfTwo { axis, size });
    }
    Ok(())
}
