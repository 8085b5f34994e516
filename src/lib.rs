//! Fibonacci Heap for Rust
//!
//! This crate provides a mergeable min-priority queue, the Fibonacci heap, with
//! the operations graph algorithms such as Prim's minimum spanning tree and
//! Dijkstra's shortest paths lean on:
//!
//! - O(1) amortized `insert`, `decrease_key`, and `merge`
//! - O(log n) amortized `extract_min` and `delete`
//! - O(1) `peek` / `min_handle`, `len`, `is_empty`
//!
//! Every inserted element gets a [`FibonacciHandle`](fibonacci::FibonacciHandle)
//! that stays valid across merges and restructuring. Handles are generational:
//! using one after its element was removed, or with a heap that never owned it,
//! is reported as [`HeapError::InvalidHandle`] instead of corrupting the heap.
//!
//! # Example
//!
//! ```rust
//! use fib_heap::fibonacci::FibonacciHeap;
//!
//! let mut heap1 = FibonacciHeap::new();
//! heap1.insert(10, "X");
//!
//! let mut heap2 = FibonacciHeap::new();
//! let y = heap2.insert(2, "Y");
//! heap2.insert(7, "Z");
//!
//! heap1.merge(heap2);
//! assert_eq!(heap1.len(), 3);
//! assert_eq!(heap1.min_handle(), Some(y));
//!
//! heap1.decrease_key(&y, 1).unwrap();
//! assert_eq!(heap1.extract_min(), Some((1, "Y")));
//! ```
//!
//! # Features
//!
//! - `validate-ops`: run [`FibonacciHeap::validate`](fibonacci::FibonacciHeap::validate)
//!   after every mutating operation and panic on the first violation
//! - `perf-counters`: hardware counter benchmarks (Linux)

pub mod arena;
pub mod degree;
pub mod fibonacci;
pub mod invariants;
pub mod traits;

pub use fibonacci::{union, FibonacciHandle, FibonacciHeap};
pub use invariants::InvariantViolation;
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
