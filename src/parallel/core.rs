use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag telling workers and producers to stop taking new work
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Bounded pool of worker threads fed through crossbeam channels.
///
/// Results are handed back to the calling thread in completion order, one at a
/// time, while later items are still being processed.
pub struct ParallelExecutor {
    max_workers: usize,
    buffer_size: usize,
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, T, R, F> {
    worker_id: usize,
    work_rx: Receiver<T>,
    result_tx: Sender<(T, R)>,
    processor: &'a F,
    cancel: &'a CancelToken,
}

impl ParallelExecutor {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers * 2,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Run `processor` over `work_items` and call `on_complete` for each item as
    /// soon as its result is available. Returns the number of completed items.
    ///
    /// `work_items` is consumed lazily by a producer thread, so enumeration
    /// overlaps with processing. `on_complete` always runs on the calling thread.
    pub fn execute<I, T, R, F, C>(
        &self,
        work_items: I,
        processor: F,
        mut on_complete: C,
        cancel: &CancelToken,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
        C: FnMut(T, R),
    {
        let work_items = work_items.into_iter();
        let (work_tx, work_rx): (Sender<T>, Receiver<T>) = bounded(self.buffer_size);
        let (result_tx, result_rx): (Sender<(T, R)>, Receiver<(T, R)>) = bounded(self.buffer_size);
        let processor = &processor;

        crossbeam::thread::scope(|s| {
            for worker_id in 0..self.max_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    processor,
                    cancel,
                };
                s.spawn(move |_| Self::worker_thread(ctx));
            }

            // Producer thread: feed work to workers
            s.spawn(move |_| {
                for work_item in work_items {
                    if cancel.is_cancelled() || work_tx.send(work_item).is_err() {
                        break;
                    }
                }
            });

            // Only the workers and the producer may keep the channels open
            drop(work_rx);
            drop(result_tx);

            Self::collect_results(result_rx, &mut on_complete, cancel)
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))
    }

    fn worker_thread<T, R, F>(ctx: WorkerContext<'_, T, R, F>)
    where
        F: Fn(&T, usize) -> R,
    {
        while let Ok(work_item) = ctx.work_rx.recv() {
            if ctx.cancel.is_cancelled() {
                break;
            }
            let result = (ctx.processor)(&work_item, ctx.worker_id);
            if ctx.result_tx.send((work_item, result)).is_err() {
                break; // Collector gone
            }
        }
        tracing::trace!(worker = ctx.worker_id, "worker finished");
    }

    fn collect_results<T, R, C>(
        result_rx: Receiver<(T, R)>,
        on_complete: &mut C,
        cancel: &CancelToken,
    ) -> usize
    where
        C: FnMut(T, R),
    {
        let mut completed = 0;
        while let Ok((work_item, result)) = result_rx.recv() {
            if cancel.is_cancelled() {
                break;
            }
            on_complete(work_item, result);
            completed += 1;
        }
        completed
    }
}

/// Single-threaded execution with the same callback contract
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<I, T, R, F, C>(
        work_items: I,
        processor: F,
        mut on_complete: C,
        cancel: &CancelToken,
    ) -> usize
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T, usize) -> R,
        C: FnMut(T, R),
    {
        let mut completed = 0;
        for work_item in work_items {
            if cancel.is_cancelled() {
                break;
            }
            let result = processor(&work_item, 0);
            on_complete(work_item, result);
            completed += 1;
        }
        completed
    }
}

/// Execution strategy enum for choosing between parallel and sequential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    /// Strategy for an explicit job count: one job runs on the calling thread
    pub fn from_jobs(jobs: usize) -> Self {
        if jobs <= 1 {
            ExecutionStrategy::Sequential
        } else {
            ExecutionStrategy::Parallel { workers: jobs }
        }
    }

    pub fn workers(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers } => *workers,
        }
    }

    pub fn execute<I, T, R, F, C>(
        &self,
        work_items: I,
        processor: F,
        on_complete: C,
        cancel: &CancelToken,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
        C: FnMut(T, R),
    {
        match self {
            ExecutionStrategy::Sequential => Ok(SequentialExecutor::execute(
                work_items,
                processor,
                on_complete,
                cancel,
            )),
            ExecutionStrategy::Parallel { workers } => {
                ParallelExecutor::new(*workers).execute(work_items, processor, on_complete, cancel)
            }
        }
    }

    /// Calculate optimal workers based on available system resources and configuration limits
    ///
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads_config, percentage_result) if max_threads_config > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        Self::optimal_workers_for(num_cpus::get(), max_threads_config, thread_percentage)
    }

    fn optimal_workers_for(
        available_cores: usize,
        max_threads_config: usize,
        thread_percentage: u8,
    ) -> usize {
        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}
