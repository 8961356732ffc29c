//! Dispatch queue for batch items.

use std::collections::VecDeque;

/// FIFO of item indices with at most one item in flight.
///
/// `next` hands out the following index only once the previous one was
/// `settle`d, which is what keeps uploads strictly sequential.
#[derive(Debug, Clone, Default)]
pub struct SequentialQueue {
    pending: VecDeque<usize>,
    in_flight: Option<usize>,
}

impl SequentialQueue {
    /// Queue indices `0..len` in order.
    pub fn new(len: usize) -> Self {
        Self {
            pending: (0..len).collect(),
            in_flight: None,
        }
    }

    /// Next index to run, or `None` if one is still in flight or nothing is left.
    pub fn next(&mut self) -> Option<usize> {
        if self.in_flight.is_some() {
            return None;
        }
        let index = self.pending.pop_front()?;
        self.in_flight = Some(index);
        Some(index)
    }

    /// Mark `index` as settled. Settling anything but the in-flight index is ignored.
    pub fn settle(&mut self, index: usize) {
        if self.in_flight == Some(index) {
            self.in_flight = None;
        }
    }

    #[cfg(test)]
    fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_none()
    }
}
