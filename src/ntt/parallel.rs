//! # Parallel 2D Transforms
//!
//! Row pass then column pass (forward), or column pass then row pass
//! (inverse). Each pass fans out over a worker pool spawned for the call and
//! dropped when it returns. Worker `k` of `P` takes lanes `k, k+P, k+2P, ...`,
//! so the split balances whatever the aspect ratio. A pass returns only once
//! every lane is done, which is the barrier the next pass relies on.
//!
//! Rows are contiguous and go through rayon's `par_chunks_mut`. Columns
//! interleave in memory, so the column pass shares one raw view of the buffer
//! across workers.

use std::num::NonZeroUsize;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use super::ModulusImage;
use super::field::Element;
use super::transform::{self, RawField};
use crate::error::MatchResult;

/// Worker threads for one 2D transform call.
pub(crate) struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

/// Units of hardware parallelism, the worker count of every pool.
pub(crate) fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl WorkerPool {
    /// Spawn one worker per unit of available hardware parallelism.
    pub(crate) fn spawn() -> Result<Self, rayon::ThreadPoolBuildError> {
        let workers = available_workers();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("ntt-worker-{index}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    /// Run `task` once for every lane in `0..lanes`, interleaved across the
    /// workers. Blocks until all of them finish.
    pub(crate) fn for_each_lane<F>(&self, lanes: usize, task: F)
    where
        F: Fn(usize) + Sync,
    {
        let task = &task;
        let workers = self.workers;
        self.pool.scope(|scope| {
            for first in 0..workers.min(lanes) {
                scope.spawn(move |_| {
                    for lane in (first..lanes).step_by(workers) {
                        task(lane);
                    }
                });
            }
        });
    }

    /// Run `task` on every contiguous row of `pixels`. Rows are plain
    /// disjoint slices, so this pass needs no raw view.
    pub(crate) fn for_each_row<F>(&self, pixels: &mut [Element], width: usize, task: F)
    where
        F: Fn(&mut [Element]) + Send + Sync,
    {
        self.pool
            .install(|| pixels.par_chunks_mut(width).for_each(|row| task(row)));
    }
}

/// Forward 2D transform in place: every row, then every column.
pub fn forward_transform_2d(image: &mut ModulusImage) -> MatchResult<()> {
    let pool = WorkerPool::spawn()?;
    let (width, height) = (image.width(), image.height());
    let (log2_width, log2_height) = (image.log2_width(), image.log2_height());

    let started = Instant::now();
    pool.for_each_row(image.pixels_mut(), width, |row| {
        transform::forward_checked(row, 0, 1, log2_width)
    });
    log::trace!("forward row pass over {height} rows took {:?}", started.elapsed());

    let started = Instant::now();
    let data = RawField::new(image.pixels_mut());
    // SAFETY: ModulusImage guarantees power-of-two sides within ROOT_ORDER and
    // a buffer of exactly width * height, so every column lane is in bounds.
    // Each column goes to exactly one worker and columns are pairwise
    // disjoint.
    pool.for_each_lane(width, |column| unsafe {
        transform::forward_lane(data, column, width, log2_height)
    });
    log::trace!("forward column pass over {width} columns took {:?}", started.elapsed());
    Ok(())
}

/// Inverse 2D transform in place: every column, then every row. Undoes
/// [`forward_transform_2d`] exactly.
pub fn inverse_transform_2d(image: &mut ModulusImage) -> MatchResult<()> {
    let pool = WorkerPool::spawn()?;
    let (width, height) = (image.width(), image.height());
    let (log2_width, log2_height) = (image.log2_width(), image.log2_height());

    let started = Instant::now();
    let data = RawField::new(image.pixels_mut());
    // SAFETY: see forward_transform_2d.
    pool.for_each_lane(width, |column| unsafe {
        transform::inverse_lane(data, column, width, log2_height)
    });
    log::trace!("inverse column pass over {width} columns took {:?}", started.elapsed());

    let started = Instant::now();
    pool.for_each_row(image.pixels_mut(), width, |row| {
        transform::inverse_checked(row, 0, 1, log2_width)
    });
    log::trace!("inverse row pass over {height} rows took {:?}", started.elapsed());
    Ok(())
}
