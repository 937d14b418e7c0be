//! Specialized data structures
//!
//! - **[`ring_buffer`]**: Fixed-size ring buffer with FIFO eviction
//!
//! ## Usage
//!
//! ```rust
//! use cadence_common::collections::RingBuffer;
//!
//! let mut buffer = RingBuffer::new(10);
//! buffer.push(1);
//! assert_eq!(buffer.last(), Some(&1));
//! ```

pub mod ring_buffer;

// Re-export commonly used types
pub use ring_buffer::RingBuffer;
