//! Fixed-size worker pool for per-entry jobs
//!
//! Workers pull `(index, job)` pairs from a shared MPMC channel and push
//! `(index, outcome)` pairs back; the pool re-sequences outcomes by index
//! so callers see results in job order regardless of completion order.
//! Failures travel as `Err` outcomes and are collected, never swallowed.

use std::num::NonZeroUsize;
use std::thread;
use tracing::debug;

/// A bounded set of parallel workers consuming a queue of jobs.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with `requested` workers, capped at the host's
    /// available parallelism. `None` uses the full host parallelism.
    pub fn new(requested: Option<usize>) -> Self {
        let host = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let workers = requested.unwrap_or(host).clamp(1, host);
        Self { workers }
    }

    /// Number of workers the pool runs with.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` over every job, returning outcomes in job order.
    ///
    /// Jobs are immutable once enqueued and independent of each other;
    /// `work` receives each job's index alongside the job. The call blocks
    /// until every in-flight job has finished; no job is dropped.
    pub fn run<J, R, F>(&self, jobs: Vec<J>, work: F) -> Vec<R>
    where
        J: Send,
        R: Send,
        F: Fn(usize, J) -> R + Sync,
    {
        let job_count = jobs.len();
        if job_count == 0 {
            return Vec::new();
        }

        let worker_count = self.workers.min(job_count);
        debug!("Dispatching {job_count} jobs across {worker_count} workers");

        let (job_tx, job_rx) = flume::unbounded();
        for job in jobs.into_iter().enumerate() {
            // The channel is unbounded and the receiver is alive
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let (outcome_tx, outcome_rx) = flume::unbounded();
        let mut outcomes: Vec<(usize, R)> = Vec::with_capacity(job_count);

        thread::scope(|scope| {
            for _ in 0..worker_count {
                let job_rx = job_rx.clone();
                let outcome_tx = outcome_tx.clone();
                let work = &work;
                scope.spawn(move || {
                    while let Ok((index, job)) = job_rx.recv() {
                        let outcome = work(index, job);
                        if outcome_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(outcome_tx);

            while let Ok(pair) = outcome_rx.recv() {
                outcomes.push(pair);
            }
        });

        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}
