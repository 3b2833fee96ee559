//! Fan a pure per-item evaluation out over parallel workers.
//!
//! Every backend returns one slot per input item, in input order. A slot is
//! `None` only when evaluating that item panicked; nothing is retried.

pub mod data_parallel;
pub mod partition;
pub mod queue;

pub use data_parallel::DataParallel;
pub use partition::StaticPartition;
pub use queue::{Job, QueuePool, WorkQueue};

use crate::config::Strategy;
use crate::progress::Progress;
use log::{info, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistributeError {
    #[error("execution backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("result slot {0} was written twice")]
    DuplicateWrite(usize),
}

/// An execution backend that runs `eval` once per item
pub trait Distributor {
    fn name(&self) -> &'static str;

    fn evaluate<T, R, F>(
        &self,
        items: &[T],
        eval: &F,
        progress: &Progress,
    ) -> Result<Vec<Option<R>>, DistributeError>
    where
        T: Sync,
        R: Send + Sync,
        F: Fn(&T) -> R + Sync;
}

/// Run `eval` on one item, turning a panic into an unset slot
pub(crate) fn evaluate_guarded<T, R, F>(eval: &F, item: &T, index: usize) -> Option<R>
where
    F: Fn(&T) -> R,
{
    match catch_unwind(AssertUnwindSafe(|| eval(item))) {
        Ok(result) => Some(result),
        Err(_) => {
            warn!("evaluation of item {} panicked; leaving its result unset", index);
            None
        }
    }
}

/// Evaluate `items` with the chosen strategy.
///
/// If the data-parallel pool cannot be built the worker queue takes over.
pub fn distribute<T, R, F>(
    strategy: Strategy,
    workers: usize,
    items: &[T],
    eval: &F,
    progress: &Progress,
) -> Result<Vec<Option<R>>, DistributeError>
where
    T: Sync,
    R: Send + Sync,
    F: Fn(&T) -> R + Sync,
{
    match strategy {
        Strategy::Queue => {
            evaluate_with_fallback(&QueuePool::new(workers), workers, items, eval, progress)
        }
        Strategy::Partitioned => {
            evaluate_with_fallback(&StaticPartition::new(workers), workers, items, eval, progress)
        }
        Strategy::DataParallel => {
            evaluate_with_fallback(&DataParallel::new(workers), workers, items, eval, progress)
        }
    }
}

/// Run `primary`, handing the whole input to a `QueuePool` if its backend is unavailable
pub fn evaluate_with_fallback<D, T, R, F>(
    primary: &D,
    workers: usize,
    items: &[T],
    eval: &F,
    progress: &Progress,
) -> Result<Vec<Option<R>>, DistributeError>
where
    D: Distributor,
    T: Sync,
    R: Send + Sync,
    F: Fn(&T) -> R + Sync,
{
    info!(
        "dispatching {} items to the {} backend on {} workers",
        items.len(),
        primary.name(),
        workers
    );
    match primary.evaluate(items, eval, progress) {
        Err(DistributeError::BackendUnavailable(reason)) => {
            let fallback = QueuePool::new(workers);
            warn!(
                "{} backend unavailable ({}), falling back to the {}",
                primary.name(),
                reason,
                fallback.name()
            );
            fallback.evaluate(items, eval, progress)
        }
        other => other,
    }
}
