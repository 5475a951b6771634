use crossbeam::channel::{Receiver, Sender, bounded};

/// Fixed-size pool of worker threads draining a FIFO work queue.
///
/// A producer thread feeds items into a bounded channel in input order; each
/// worker takes one item at a time, so at most `workers` items are being
/// processed at any moment. Results are handed back over a second channel to
/// the calling thread, which sees them in completion order.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Calculate a worker count from the available CPU cores.
    ///
    /// `thread_percentage` of the cores is used (at least one), capped by
    /// `max_threads` when it is non-zero.
    pub fn auto_workers(max_threads: usize, thread_percentage: u8) -> usize {
        let cpu_cores = num_cpus::get();
        let by_percentage = std::cmp::max(1, (cpu_cores * thread_percentage as usize) / 100);

        if max_threads > 0 {
            std::cmp::min(max_threads, by_percentage)
        } else {
            by_percentage
        }
    }

    /// Process every item and pass each result to `on_complete` as soon as it
    /// arrives. Returns once all workers have been joined.
    ///
    /// `process` receives the item and the id of the worker running it.
    /// A panic in a worker is propagated to the caller after the remaining
    /// workers have finished.
    pub fn run<T, R, F, C>(&self, items: Vec<T>, process: F, mut on_complete: C)
    where
        T: Send,
        R: Send,
        F: Fn(T, usize) -> R + Sync,
        C: FnMut(R),
    {
        if items.is_empty() {
            return;
        }

        // Never more threads or channel slots than there are items
        let actual_workers = std::cmp::min(self.workers, items.len());
        let buffer_size = actual_workers.saturating_mul(2);
        let (work_tx, work_rx): (Sender<T>, Receiver<T>) = bounded(buffer_size);
        let (result_tx, result_rx): (Sender<R>, Receiver<R>) = bounded(buffer_size);
        let process = &process;

        let scope_result = crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();

                s.spawn(move |_| {
                    while let Ok(item) = work_rx.recv() {
                        let result = process(item, worker_id);
                        if result_tx.send(result).is_err() {
                            break; // Collector dropped
                        }
                    }
                });
            }

            // Producer: feed work in input order
            s.spawn(move |_| {
                for item in items {
                    if work_tx.send(item).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop our copies so the channels close when the threads finish
            drop(work_rx);
            drop(result_tx);

            for result in result_rx.iter() {
                on_complete(result);
            }
        });

        if let Err(panic) = scope_result {
            std::panic::resume_unwind(panic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_every_item_processed_once() {
        let pool = WorkerPool::new(4);
        let mut results = Vec::new();
        pool.run((0..50).collect(), |x: i32, _worker_id| x * 2, |r| results.push(r));

        results.sort();
        assert_eq!(results, (0..50).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        let pool = WorkerPool::new(4);
        let mut calls = 0;
        pool.run(Vec::<i32>::new(), |x, _| x, |_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_worker_limit_respected() {
        let pool = WorkerPool::new(3);
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        pool.run(
            (0..24).collect::<Vec<i32>>(),
            |_, _| {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(5));
                in_flight.fetch_sub(1, Ordering::SeqCst);
            },
            |_| {},
        );

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_worker_ids_within_pool() {
        let pool = WorkerPool::new(2);
        let mut ids = Vec::new();
        pool.run((0..10).collect::<Vec<i32>>(), |_, worker_id| worker_id, |id| ids.push(id));
        assert!(ids.iter().all(|&id| id < 2));
    }

    #[test]
    fn test_huge_worker_count_is_capped_by_items() {
        let pool = WorkerPool::new(usize::MAX);
        let mut results = Vec::new();
        pool.run(vec![1, 2, 3], |x: i32, worker_id| (x, worker_id), |r| results.push(r));

        results.sort();
        assert_eq!(results.iter().map(|(x, _)| *x).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(results.iter().all(|&(_, worker_id)| worker_id < 3));
    }

    #[test]
    fn test_auto_workers() {
        assert!(WorkerPool::auto_workers(0, 75) >= 1);
        assert!(WorkerPool::auto_workers(2, 100) <= 2);
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }
}
