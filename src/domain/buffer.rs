// Bounded stream buffer with FIFO eviction
use crate::domain::sample::Sample;
use std::collections::VecDeque;

/// Append-only sample buffer bounded at `capacity`. Overflow evicts from the
/// head (oldest first) and never rejects the append.
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl StreamBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(16_384)),
            capacity,
        }
    }

    pub fn with_initial(initial: Vec<Sample>, capacity: usize) -> Self {
        let mut buffer = Self::new(capacity);
        for sample in initial {
            buffer.append(sample);
        }
        buffer
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Shrinking below the current length evicts oldest-first, same as append
    /// overflow.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.samples.back().map(|s| s.timestamp)
    }

    /// Read-only copy of the buffered samples in insertion order.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }
}
