use super::{evaluate_guarded, DistributeError, Distributor};
use crate::progress::Progress;
use rayon::prelude::*;

/// Data-parallel map over the whole item array on a dedicated rayon pool.
///
/// Each item is one logical work-item; the pool schedules them. Failing to
/// build the pool reports the backend as unavailable so the caller can pick
/// another strategy.
pub struct DataParallel {
    threads: usize,
}

impl DataParallel {
    /// `threads == 0` lets rayon size the pool
    pub fn new(threads: usize) -> Self {
        DataParallel { threads }
    }
}

impl Distributor for DataParallel {
    fn name(&self) -> &'static str {
        "data-parallel"
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
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("estimator-{}", i))
            .build()
            .map_err(|e| DistributeError::BackendUnavailable(e.to_string()))?;

        let output: Vec<Option<R>> = pool.install(|| {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| {
                    let result = evaluate_guarded(eval, item, index);
                    progress.completed(1);
                    result
                })
                .collect()
        });
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sequential_map() {
        let items: Vec<u64> = (0..500).collect();
        let progress = Progress::hidden(items.len());
        let backend = DataParallel::new(3);
        let output = backend
            .evaluate(&items, &|x: &u64| x.wrapping_mul(2654435761), &progress)
            .expect("data-parallel evaluation");
        let expected: Vec<Option<u64>> =
            items.iter().map(|x| Some(x.wrapping_mul(2654435761))).collect();
        assert_eq!(output, expected);
        assert_eq!(backend.name(), "data-parallel");
    }
}
