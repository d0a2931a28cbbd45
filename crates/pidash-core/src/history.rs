//! Bounded sample histories for the dashboard charts.
//!
//! Two independent instances back the frequency and core-voltage charts.
//! Capacity is fixed and small: the charts show a sliding window of the
//! last ten readings, oldest evicted first.

use std::collections::VecDeque;

/// Points retained per chart.
pub const HISTORY_CAPACITY: usize = 10;

/// One charted reading: a timestamp label and the value.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub label: String,
    pub value: f64,
}

/// Fixed-capacity FIFO of chart points.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    capacity: usize,
    points: VecDeque<HistoryPoint>,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a point, evicting the oldest when full.
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.points.push_back(HistoryPoint {
            label: label.into(),
            value,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    /// Values in insertion order, for chart datasets.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
