use super::{evaluate_guarded, DistributeError, Distributor};
use crate::progress::Progress;
use log::warn;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, OnceLock};
use std::thread;

/// Message pulled by a queue worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Evaluate(usize),
    /// One per worker; the worker that takes it exits
    Shutdown,
}

/// Unbounded blocking FIFO of jobs
#[derive(Default)]
pub struct WorkQueue {
    jobs: Mutex<VecDeque<Job>>,
    ready: Condvar,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, job: Job) {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        jobs.push_back(job);
        self.ready.notify_one();
    }

    /// Take the next job, waiting while the queue is empty
    pub fn pop(&self) -> Job {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(job) = jobs.pop_front() {
                return job;
            }
            jobs = self.ready.wait(jobs).unwrap_or_else(|e| e.into_inner());
        }
    }
}

/// Fixed set of threads pulling requirement indices from a shared queue.
///
/// Results go into write-once slots, one per index, so the output needs no lock.
pub struct QueuePool {
    workers: usize,
}

impl QueuePool {
    pub fn new(workers: usize) -> Self {
        QueuePool {
            workers: workers.max(1),
        }
    }
}

fn work<T, R, F>(
    queue: &WorkQueue,
    items: &[T],
    slots: &[OnceLock<R>],
    eval: &F,
    progress: &Progress,
) -> Result<(), DistributeError>
where
    F: Fn(&T) -> R,
{
    loop {
        match queue.pop() {
            Job::Shutdown => return Ok(()),
            Job::Evaluate(index) => {
                progress.dequeued(index);
                if let Some(result) = evaluate_guarded(eval, &items[index], index) {
                    slots[index]
                        .set(result)
                        .map_err(|_| DistributeError::DuplicateWrite(index))?;
                }
                progress.completed(1);
            }
        }
    }
}

impl Distributor for QueuePool {
    fn name(&self) -> &'static str {
        "queue"
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
        let queue = WorkQueue::new();
        let slots: Vec<OnceLock<R>> = items.iter().map(|_| OnceLock::new()).collect();

        let outcome = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|_| {
                    let (queue, slots) = (&queue, &slots);
                    scope.spawn(move || work(queue, items, slots, eval, progress))
                })
                .collect();

            for index in 0..items.len() {
                queue.push(Job::Evaluate(index));
            }
            for _ in 0..self.workers {
                queue.push(Job::Shutdown);
            }

            let mut outcome = Ok(());
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => outcome = Err(e),
                    Err(_) => warn!("queue worker panicked; its results are left unset"),
                }
            }
            outcome
        });
        outcome?;

        Ok(slots.into_iter().map(OnceLock::into_inner).collect())
    }
}
