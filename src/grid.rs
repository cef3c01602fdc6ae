//! Whole-grid evaluation.
//!
//! Pixel `(px, py)` of a `W x H` grid is sampled at `(px / W, py / H)`. Output
//! buffers are row-major and every cell is written by exactly one worker.

use bytemuck::Zeroable;
use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};
use thiserror::Error;

use crate::{colour::Colour, evaluator::Evaluator, pixel::Escape, screen};

#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Normalized coordinate of pixel `(px, py)`.
pub fn normalized(size: screen::Size, px: u32, py: u32) -> (f32, f32) {
    (
        px as f32 / size.width as f32,
        py as f32 / size.height as f32,
    )
}

/// `(px, py, u, v)` for every pixel, in row-major order.
pub fn coordinates(size: screen::Size) -> impl Iterator<Item = (u32, u32, f32, f32)> {
    (0..size.height).flat_map(move |py| {
        (0..size.width).map(move |px| {
            let (u, v) = normalized(size, px, py);
            (px, py, u, v)
        })
    })
}

/// Single-threaded evaluation, the baseline every parallel variant must match.
pub fn evaluate_sequential(evaluator: &Evaluator, size: screen::Size) -> Vec<Colour> {
    coordinates(size)
        .map(|(_, _, u, v)| evaluator.evaluate(u, v).colour)
        .collect()
}

/// Evaluate on the current rayon pool, one row per task.
pub fn evaluate_parallel(evaluator: &Evaluator, size: screen::Size) -> Vec<Colour> {
    fill_rows(size, |px, py| {
        let (u, v) = normalized(size, px, py);
        evaluator.evaluate(u, v).colour
    })
}

/// Iteration counts only, for hosts that colour pixels themselves.
pub fn escapes_parallel(evaluator: &Evaluator, size: screen::Size) -> Vec<Escape> {
    fill_rows(size, |px, py| {
        let (u, v) = normalized(size, px, py);
        evaluator.escape_at(u, v)
    })
}

/// Evaluate with the flat buffer split into tasks of `cells_per_task` cells,
/// regardless of row boundaries.
pub fn evaluate_partitioned(
    evaluator: &Evaluator,
    size: screen::Size,
    cells_per_task: usize,
) -> Vec<Colour> {
    let mut colours = vec![Colour::zeroed(); size.area()];
    if size.is_empty() {
        return colours;
    }

    let width = size.width as usize;
    colours
        .par_chunks_mut(cells_per_task.max(1))
        .enumerate()
        .for_each(|(task, chunk)| {
            let first = task * cells_per_task.max(1);
            for (offset, colour) in chunk.iter_mut().enumerate() {
                let index = first + offset;
                let (u, v) = normalized(size, (index % width) as u32, (index / width) as u32);
                *colour = evaluator.evaluate(u, v).colour;
            }
        });

    colours
}

/// Evaluate on a dedicated pool of `workers` threads.
pub fn evaluate_with_workers(
    evaluator: &Evaluator,
    size: screen::Size,
    workers: usize,
) -> Result<Vec<Colour>, GridError> {
    let pool = worker_pool(workers)?;
    Ok(pool.install(|| evaluate_parallel(evaluator, size)))
}

/// A rayon pool with exactly `workers` threads.
pub fn worker_pool(workers: usize) -> Result<rayon::ThreadPool, GridError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|index| format!("grid-worker-{}", index))
        .build()?;
    Ok(pool)
}

/// One worker per logical CPU.
pub fn default_workers() -> usize {
    num_cpus::get()
}

fn fill_rows<A, F>(size: screen::Size, function: F) -> Vec<A>
where
    A: Zeroable + Copy + Send,
    F: Fn(u32, u32) -> A + Sync,
{
    trace!("begin fill_rows {:?}", size);

    let mut cells = vec![A::zeroed(); size.area()];
    if !size.is_empty() {
        cells
            .par_chunks_mut(size.width as usize)
            .enumerate()
            .for_each(|(py, row)| {
                for (px, cell) in row.iter_mut().enumerate() {
                    *cell = function(px as u32, py as u32);
                }
            });
    }

    trace!("end fill_rows");
    cells
}
