//! Fixed-capacity FIFO buffer.

use std::collections::VecDeque;

/// Ring buffer holding the most recent `capacity` items, oldest first.
///
/// Pushing into a full buffer evicts exactly one item, the oldest.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the evicted one if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// The most recent `n` items, oldest of the slice first.
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &T> {
        self.items.iter().skip(self.items.len().saturating_sub(n))
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> RingBuffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_within_capacity() {
        let mut buffer = RingBuffer::new(3);
        assert_eq!(buffer.push(1), None);
        assert_eq!(buffer.push(2), None);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut buffer = RingBuffer::new(20);
        for i in 1..=25 {
            buffer.push(i);
            assert!(buffer.len() <= 20);
        }

        assert_eq!(buffer.len(), 20);
        assert_eq!(buffer.front(), Some(&6));
        assert_eq!(buffer.back(), Some(&25));
        assert_eq!(buffer.to_vec(), (6..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_push_returns_evicted() {
        let mut buffer = RingBuffer::new(2);
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.push("c"), Some("a"));
    }

    #[test]
    fn test_last_n() {
        let mut buffer = RingBuffer::new(10);
        for i in 0..5 {
            buffer.push(i);
        }

        assert_eq!(buffer.last_n(3).copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(buffer.last_n(15).count(), 5);
    }

    #[test]
    fn test_zero_capacity() {
        let mut buffer = RingBuffer::new(0);
        buffer.push(1);
        buffer.push(2);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.to_vec(), vec![2]);
    }

    proptest! {
        #[test]
        fn prop_holds_most_recent_oldest_first(
            capacity in 1usize..32,
            items in prop::collection::vec(any::<u32>(), 0..100),
        ) {
            let mut buffer = RingBuffer::new(capacity);
            let mut evicted = Vec::new();

            for item in &items {
                if let Some(old) = buffer.push(*item) {
                    evicted.push(old);
                }
                prop_assert!(buffer.len() <= capacity);
            }

            let kept = items.len().min(capacity);
            let split = items.len() - kept;
            prop_assert_eq!(buffer.to_vec(), items[split..].to_vec());
            prop_assert_eq!(evicted, items[..split].to_vec());
        }
    }
}
