//! A fixed-capacity FIFO buffer that evicts its oldest element on overflow.
//!
//! A [`RingBuffer`] stores items in insertion order while keeping its length
//! bounded by the caller-provided capacity. When [`push`](RingBuffer::push)
//! receives a value and the buffer is full, the oldest element (logical index
//! `0`) is removed and handed back to the caller, so eviction is observable
//! instead of silent.
//!
//! Elements can be addressed from either end: [`get`](RingBuffer::get)
//! counts from the oldest element, [`get_from_newest`](RingBuffer::get_from_newest)
//! counts backwards from the most recent one.
//!
//! # Complexity
//! - `push`, `pop`, `get`, `get_from_newest`, `last`, `len`, `is_full` are
//!   **O(1)**.
//!
//! # Panic Safety
//! - Public methods avoid panicking; there are no `unwrap`/`expect` calls in
//!   the implementation.

use std::collections::VecDeque;

/// A fixed-capacity buffer storing elements in first-in-first-out order.
///
/// # Examples
///
/// ```rust
/// use cadence_common::collections::RingBuffer;
///
/// let mut buffer = RingBuffer::new(3);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
/// let evicted = buffer.push(4); // evicts the oldest item (`1`)
///
/// assert_eq!(evicted, Some(1));
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(buffer.get_from_newest(0), Some(&4));
/// assert_eq!(buffer.get_from_newest(2), Some(&2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new buffer with the provided capacity.
    ///
    /// A capacity of zero is clamped to `1`, ensuring at least one slot without
    /// panicking.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Builds a buffer from an oldest-first sequence, keeping only the newest
    /// `capacity` items.
    #[must_use]
    pub fn from_oldest_first<I>(capacity: usize, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut buffer = Self::new(capacity);
        for item in items {
            let _ = buffer.push(item);
        }
        buffer
    }

    /// Appends an item, returning the evicted oldest item when the buffer was
    /// already full.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        evicted
    }

    /// Removes and returns the oldest item in the buffer.
    #[inline]
    #[must_use]
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    /// Returns the value at `idx`, counting from the oldest element.
    #[inline]
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.buf.get(idx)
    }

    /// Returns the value `steps_back` positions before the newest element.
    ///
    /// `get_from_newest(0)` is the most recent item.
    #[inline]
    #[must_use]
    pub fn get_from_newest(&self, steps_back: usize) -> Option<&T> {
        let len = self.buf.len();
        if steps_back >= len {
            return None;
        }
        self.buf.get(len - 1 - steps_back)
    }

    /// Returns a mutable reference to the first element matching `predicate`,
    /// searching from newest to oldest.
    pub fn find_newest_mut<P>(&mut self, mut predicate: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        self.buf.iter_mut().rev().find(|item| predicate(item))
    }

    /// Returns the most recently pushed item.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Returns the number of items currently stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when the buffer has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` when the buffer reached its capacity.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Returns the maximum number of items the buffer can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all elements, leaving the capacity unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Returns an iterator visiting elements from oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buf.iter()
    }
}

impl<T> Default for RingBuffer<T> {
    /// Creates a single-slot buffer that evicts on every push after the first.
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = std::collections::vec_deque::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for collections::ring_buffer.
    use super::RingBuffer;

    /// Validates that overflow evicts the oldest element and reports it.
    #[test]
    fn test_push_reports_evicted_oldest() {
        let mut buffer = RingBuffer::new(3);
        assert_eq!(buffer.push(1), None);
        assert_eq!(buffer.push(2), None);
        assert_eq!(buffer.push(3), None);
        assert_eq!(buffer.push(4), Some(1));
        assert_eq!(buffer.push(5), Some(2));

        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_get_from_newest_counts_backwards() {
        let mut buffer = RingBuffer::new(4);
        for value in ["alpha", "beta", "gamma"] {
            let _ = buffer.push(value);
        }

        assert_eq!(buffer.get_from_newest(0), Some(&"gamma"));
        assert_eq!(buffer.get_from_newest(1), Some(&"beta"));
        assert_eq!(buffer.get_from_newest(2), Some(&"alpha"));
        assert_eq!(buffer.get_from_newest(3), None);
        assert_eq!(buffer.last(), Some(&"gamma"));
        assert_eq!(buffer.get(0), Some(&"alpha"));
    }

    #[test]
    fn test_find_newest_mut_prefers_recent_match() {
        let mut buffer = RingBuffer::new(4);
        for value in [(1, 'a'), (2, 'b'), (1, 'c')] {
            let _ = buffer.push(value);
        }

        if let Some(item) = buffer.find_newest_mut(|(key, _)| *key == 1) {
            item.1 = 'z';
        }

        assert_eq!(buffer.iter().map(|(_, v)| *v).collect::<String>(), "abz");
        assert!(buffer.find_newest_mut(|(key, _)| *key == 9).is_none());
    }

    #[test]
    fn test_from_oldest_first_keeps_newest_items() {
        let buffer = RingBuffer::from_oldest_first(2, vec![10, 20, 30]);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![20, 30]);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_capacity_one_edge_case() {
        let mut buffer = RingBuffer::new(1);
        let _ = buffer.push('a');
        assert_eq!(buffer.push('b'), Some('a'));

        assert_eq!(buffer.len(), 1);
        assert!(buffer.is_full());
        assert_eq!(buffer.pop(), Some('b'));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear_resets_length_but_retains_capacity() {
        let mut buffer = RingBuffer::new(2);
        let _ = buffer.push(10);
        let _ = buffer.push(20);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);

        let _ = buffer.push(30);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![30]);
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let mut buffer = RingBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);

        let _ = buffer.push(42);
        let _ = buffer.push(43);

        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![43]);
    }
}
