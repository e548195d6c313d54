//! # Concurrency Utilities
//!
//! Thread-safe containers used to hand work between the I/O tasks and
//! application threads: a mutex-guarded FIFO and a reader-writer-locked map.

pub mod queue;
pub mod registry;

pub use queue::ConcurrentQueue;
pub use registry::ConcurrentRegistry;
