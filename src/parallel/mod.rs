//! Generic parallel execution framework
//!
//! Worker-pool plumbing shared by every rename command. The module knows nothing
//! about files or fingerprints: it runs a processor over a stream of work items and
//! hands each `(item, result)` pair back to the calling thread as soon as it is done.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Resource Calculation**: Applies user configuration (thread percentage, max threads)
//! - **Execution Strategy**: Sequential vs Parallel execution with worker management
//! - **Cancellation**: Stops feeding workers once a [`CancelToken`] is tripped
//!
//! ## What This Module Does NOT Do:
//! - **Ordering**: Results arrive in completion order, never in submission order
//! - **Side Effects**: Callers perform their own writes inside `on_complete`, which
//!   always runs on the calling thread
//!
//! ```text
//! ┌──────────────┐   work    ┌──────────────┐  (item, result)  ┌──────────────┐
//! │   Producer   │──────────▶│   Workers    │─────────────────▶│  Collector   │
//! │ (lazy iter)  │  bounded  │  processor() │     bounded      │ on_complete()│
//! └──────────────┘           └──────────────┘                  └──────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use hrenamer::parallel::{CancelToken, ExecutionStrategy};
//!
//! let strategy = ExecutionStrategy::Parallel { workers: 4 };
//! let mut total = 0;
//! let completed = strategy
//!     .execute(1..=10, |n, _worker_id| n * n, |_, sq| total += sq, &CancelToken::new())
//!     .unwrap();
//! assert_eq!(completed, 10);
//! assert_eq!(total, 385);
//! ```

pub mod core;

// Re-export main types for easier access
pub use self::core::{CancelToken, ExecutionStrategy, ParallelExecutor, SequentialExecutor};
