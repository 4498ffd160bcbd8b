//! # Strided 1D Transforms
//!
//! In-place number-theoretic transforms over a strided view of a buffer:
//! `2^log2_size` elements starting at `offset`, `stride` apart. Stride 1
//! walks a row, stride = row length walks a column, so both passes of the 2D
//! transform share these routines without copying.
//!
//! Neither direction reorders its output. The forward pass leaves the
//! spectrum in bit-reversed order and the inverse pass consumes it in that
//! order, which is all a pointwise product needs.

use std::marker::PhantomData;

use super::field::{self, Element, LOG2_ROOT_ORDER, MODULUS, ROOT_ORDER};
use crate::error::{Axis, MatchError, MatchResult};

/// Forward decimation-in-frequency transform of one strided lane.
///
/// # Errors
/// `TransformTooLarge` when `2^log2_size > ROOT_ORDER`, `LaneOutOfBounds`
/// when the lane does not fit inside `buffer`, `OutOfField` when a lane
/// element is not below `MODULUS`.
pub fn forward_transform_1d(
    buffer: &mut [Element],
    offset: usize,
    stride: usize,
    log2_size: u32,
) -> MatchResult<()> {
    check_lane(buffer.len(), offset, stride, log2_size)?;
    check_elements(buffer, offset, stride, log2_size)?;
    forward_checked(buffer, offset, stride, log2_size);
    Ok(())
}

/// Inverse decimation-in-time transform of one strided lane, including the
/// `1 / 2^log2_size` normalization. Undoes [`forward_transform_1d`] exactly.
///
/// # Errors
/// Same as [`forward_transform_1d`].
pub fn inverse_transform_1d(
    buffer: &mut [Element],
    offset: usize,
    stride: usize,
    log2_size: u32,
) -> MatchResult<()> {
    check_lane(buffer.len(), offset, stride, log2_size)?;
    check_elements(buffer, offset, stride, log2_size)?;
    inverse_checked(buffer, offset, stride, log2_size);
    Ok(())
}

/// Forward transform of a lane that already passed [`check_lane`] and holds
/// only field elements.
pub(crate) fn forward_checked(
    buffer: &mut [Element],
    offset: usize,
    stride: usize,
    log2_size: u32,
) {
    let data = RawField::new(buffer);
    // SAFETY: the caller validated the lane against `buffer`, and the
    // exclusive borrow rules out any concurrent access.
    unsafe { forward_lane(data, offset, stride, log2_size) };
}

/// Inverse counterpart of [`forward_checked`].
pub(crate) fn inverse_checked(
    buffer: &mut [Element],
    offset: usize,
    stride: usize,
    log2_size: u32,
) {
    let data = RawField::new(buffer);
    // SAFETY: as in forward_checked.
    unsafe { inverse_lane(data, offset, stride, log2_size) };
}

/// Validate that a lane of `2^log2_size` elements is transformable and fits
/// in a buffer of `buffer_len`.
pub(crate) fn check_lane(
    buffer_len: usize,
    offset: usize,
    stride: usize,
    log2_size: u32,
) -> MatchResult<()> {
    if log2_size > LOG2_ROOT_ORDER {
        return Err(MatchError::TransformTooLarge {
            axis: Axis::Lane,
            requested: 1usize.checked_shl(log2_size).unwrap_or(usize::MAX),
            capacity: ROOT_ORDER,
        });
    }
    let length = 1usize << log2_size;
    let last = stride
        .checked_mul(length - 1)
        .and_then(|span| span.checked_add(offset));
    match last {
        Some(last) if last < buffer_len && (stride > 0 || length == 1) => Ok(()),
        _ => Err(MatchError::LaneOutOfBounds {
            offset,
            stride,
            length,
            buffer_len,
        }),
    }
}

/// Reject lane elements outside `[0, MODULUS)`. The lane must already have
/// passed [`check_lane`].
fn check_elements(
    buffer: &[Element],
    offset: usize,
    stride: usize,
    log2_size: u32,
) -> MatchResult<()> {
    let lane = (0..1usize << log2_size).map(|i| offset + i * stride);
    for index in lane {
        let value = buffer[index];
        if value as u64 >= MODULUS {
            return Err(MatchError::OutOfField { index, value });
        }
    }
    Ok(())
}

/// Shared raw view of a field buffer, so that workers can transform disjoint
/// lanes of the same allocation at once.
#[derive(Clone, Copy)]
pub(crate) struct RawField<'a> {
    ptr: *mut Element,
    len: usize,
    _buffer: PhantomData<&'a mut [Element]>,
}

// SAFETY: RawField only hands out element reads/writes through unsafe
// methods whose callers guarantee that no two threads touch the same index.
unsafe impl Send for RawField<'_> {}
unsafe impl Sync for RawField<'_> {}

impl<'a> RawField<'a> {
    pub(crate) fn new(buffer: &'a mut [Element]) -> Self {
        Self {
            ptr: buffer.as_mut_ptr(),
            len: buffer.len(),
            _buffer: PhantomData,
        }
    }

    /// # Safety
    /// `index < len` and no other thread writes `index` concurrently.
    #[inline]
    unsafe fn read(self, index: usize) -> u64 {
        debug_assert!(index < self.len);
        unsafe { *self.ptr.add(index) as u64 }
    }

    /// # Safety
    /// `index < len` and no other thread accesses `index` concurrently.
    #[inline]
    unsafe fn write(self, index: usize, value: u64) {
        debug_assert!(index < self.len);
        unsafe { *self.ptr.add(index) = value as Element }
    }
}

/// # Safety
/// The lane must have passed [`check_lane`] against `data`, and no other
/// thread may touch any of its indices for the duration of the call.
pub(crate) unsafe fn forward_lane(
    data: RawField<'_>,
    offset: usize,
    stride: usize,
    log2_size: u32,
) {
    let n = 1usize << log2_size;
    let mut span = n;
    for s in (1..=log2_size).rev() {
        let step_root = field::mod_pow((ROOT_ORDER - (ROOT_ORDER >> s)) as u64);
        let half = span / 2;
        for block in (0..n).step_by(span) {
            let mut w = 1u64;
            let mut left = offset + stride * block;
            let mut right = offset + stride * (block + half);
            for _ in 0..half {
                unsafe {
                    let u = data.read(left);
                    let t = data.read(right);
                    data.write(left, field::add(u, t));
                    data.write(right, field::mul(field::sub(u, t), w));
                }
                w = field::mul(w, step_root);
                left += stride;
                right += stride;
            }
        }
        span >>= 1;
    }
}

/// # Safety
/// Same contract as [`forward_lane`].
pub(crate) unsafe fn inverse_lane(
    data: RawField<'_>,
    offset: usize,
    stride: usize,
    log2_size: u32,
) {
    let n = 1usize << log2_size;
    let mut span = 2usize;
    let mut pos_diff = stride;
    for s in 1..=log2_size {
        let step_root = field::mod_pow((ROOT_ORDER >> s) as u64);
        let half = span / 2;
        let mut left = offset;
        let mut right = offset + pos_diff;
        for _ in (0..n).step_by(span) {
            let mut w = 1u64;
            for _ in 0..half {
                unsafe {
                    let t = field::mul(w, data.read(right));
                    let u = data.read(left);
                    data.write(left, field::add(u, t));
                    data.write(right, field::sub(u, t));
                }
                w = field::mul(w, step_root);
                left += stride;
                right += stride;
            }
            left += pos_diff;
            right += pos_diff;
        }
        span <<= 1;
        pos_diff <<= 1;
    }

    let scale = field::invert(n as u64);
    let mut pos = offset;
    for _ in 0..n {
        unsafe { data.write(pos, field::mul(data.read(pos), scale)) };
        pos += stride;
    }
}
