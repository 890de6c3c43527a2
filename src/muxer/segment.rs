//! Per-channel segment queues
//!
//! Each channel holds an ordered run of segments. Ingestion appends to the
//! tail segment, draining consumes the front segment. There is always at
//! least one segment.

use std::collections::VecDeque;

/// Ordered segments of one channel
#[derive(Debug)]
pub struct Segments<T> {
    segments: VecDeque<T>,
}

impl<T: Default> Segments<T> {
    pub fn new() -> Self {
        Self {
            segments: VecDeque::from([T::default()]),
        }
    }

    /// Start a new, empty tail segment
    pub fn begin(&mut self) {
        self.segments.push_back(T::default());
    }

    /// Drop the front segment, returning what it still held
    ///
    /// The last remaining segment is never dropped.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.segments.len() > 1 {
            self.segments.pop_front()
        } else {
            None
        }
    }
}

impl<T: Default> Default for Segments<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Segments<T> {
    /// Segment being drained
    pub fn front(&self) -> &T {
        &self.segments[0]
    }

    pub fn front_mut(&mut self) -> &mut T {
        &mut self.segments[0]
    }

    /// Segment being appended to
    pub fn back(&self) -> &T {
        &self.segments[self.segments.len() - 1]
    }

    pub fn back_mut(&mut self) -> &mut T {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// Number of queued segments
    pub fn count(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_segment() {
        let segments: Segments<Vec<i16>> = Segments::new();
        assert_eq!(segments.count(), 1);
        assert!(segments.front().is_empty());
    }

    #[test]
    fn test_append_to_tail_drain_from_front() {
        let mut segments: Segments<Vec<i16>> = Segments::new();
        segments.back_mut().extend([1, 2]);
        segments.begin();
        segments.back_mut().extend([3]);

        assert_eq!(segments.count(), 2);
        assert_eq!(segments.front(), &vec![1, 2]);
        assert_eq!(segments.back(), &vec![3]);

        assert_eq!(segments.pop_front(), Some(vec![1, 2]));
        assert_eq!(segments.front(), &vec![3]);
    }

    #[test]
    fn test_last_segment_is_kept() {
        let mut segments: Segments<Vec<i16>> = Segments::new();
        segments.back_mut().push(7);
        assert_eq!(segments.pop_front(), None);
        assert_eq!(segments.count(), 1);
        assert_eq!(segments.front(), &vec![7]);
    }
}
