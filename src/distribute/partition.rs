use super::{evaluate_guarded, DistributeError, Distributor};
use crate::progress::Progress;
use log::warn;
use std::thread;

/// One contiguous, equal-sized slice of items per thread, no shared queue.
///
/// Fine when every item costs about the same, which holds for a fixed trial
/// count per requirement.
pub struct StaticPartition {
    workers: usize,
}

impl StaticPartition {
    pub fn new(workers: usize) -> Self {
        StaticPartition {
            workers: workers.max(1),
        }
    }

    /// Bounds of slice `worker` out of `workers` over `len` items
    pub fn slice_bounds(len: usize, workers: usize, worker: usize) -> (usize, usize) {
        (worker * len / workers, (worker + 1) * len / workers)
    }
}

impl Distributor for StaticPartition {
    fn name(&self) -> &'static str {
        "partitioned"
    }

    fn evaluate<T, R, F>(
        &self,
        items: &[T],
        eval: &F,
        progress: &Progress,
    ) -> Result<Vec<Option<R>>, DistributeError>
    where
        T: Sync,
        R: Send + Sync,
        F: Fn(&T) -> R + Sync,
    {
        let mut output: Vec<Option<R>> = items.iter().map(|_| None).collect();
        let workers = self.workers.min(items.len()).max(1);

        thread::scope(|scope| {
            let mut rest: &mut [Option<R>] = &mut output;
            let mut handles = Vec::with_capacity(workers);
            for worker in 0..workers {
                let (start, end) = Self::slice_bounds(items.len(), workers, worker);
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(end - start);
                rest = tail;
                let chunk_items = &items[start..end];
                handles.push(scope.spawn(move || {
                    for (offset, (slot, item)) in chunk.iter_mut().zip(chunk_items).enumerate() {
                        *slot = evaluate_guarded(eval, item, start + offset);
                        progress.completed(1);
                    }
                }));
            }
            for handle in handles {
                if handle.join().is_err() {
                    warn!("partition worker panicked; its remaining results are left unset");
                }
            }
        });

        Ok(output)
    }
}
