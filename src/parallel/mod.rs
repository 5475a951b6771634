//! Bounded parallel execution
//!
//! A small worker pool built on crossbeam scoped threads and channels. The
//! pool only manages threads; it knows nothing about documents or
//! credentials.
//!
//! ```text
//! ┌──────────┐  bounded   ┌──────────┐  results  ┌──────────────┐
//! │ producer │──────────▶│ workers  │─────────▶│ caller       │
//! │ (input   │  channel   │ (≤ N at  │  channel  │ (completion  │
//! │  order)  │            │  a time) │           │  order)      │
//! └──────────┘            └──────────┘           └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use pdfseal::parallel::WorkerPool;
//!
//! let pool = WorkerPool::new(4);
//! let mut total = 0;
//! pool.run(vec![1, 2, 3], |x, _worker_id| x * 10, |r| total += r);
//! assert_eq!(total, 60);
//! ```

pub mod processor;

pub use processor::WorkerPool;
