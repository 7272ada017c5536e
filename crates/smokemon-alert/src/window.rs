use smokemon_common::types::Reading;
use std::collections::VecDeque;

/// Upper bound on slots reserved up front; larger windows grow on push.
const MAX_PREALLOCATED: usize = 1024;

/// Statistics over a full window with at least two valid values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub first_valid: f64,
    pub last_valid: f64,
    /// `|first_valid - last_valid|`
    pub delta: f64,
    pub span_minutes: f64,
    pub valid_count: usize,
    pub newest: Reading,
}

/// What a window can currently report to a policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowStatus {
    /// Fewer than `capacity` readings seen so far.
    Collecting { len: usize, capacity: usize },
    /// Full, but fewer than two readings carry a value.
    InsufficientData { valid: usize },
    Ready(WindowStats),
}

/// Fixed-capacity, insertion-ordered ring of readings for one channel.
///
/// Dropouts occupy a slot like any other reading. Once full the window stays
/// full: every push evicts the oldest reading.
#[derive(Debug, Clone)]
pub struct ChannelWindow {
    capacity: usize,
    data: VecDeque<Reading>,
}

impl ChannelWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            data: VecDeque::with_capacity(capacity.min(MAX_PREALLOCATED)),
        }
    }

    pub fn push(&mut self, reading: Reading) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(reading);
    }

    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn valid_values(&self) -> Vec<f64> {
        self.data.iter().filter_map(|r| r.value).collect()
    }

    pub fn first_valid(&self) -> Option<f64> {
        self.data.iter().find_map(|r| r.value)
    }

    pub fn last_valid(&self) -> Option<f64> {
        self.data.iter().rev().find_map(|r| r.value)
    }

    /// Wall-clock time between the oldest and newest reading held, in minutes.
    ///
    /// Out-of-order timestamps yield the absolute distance.
    pub fn span_minutes(&self) -> f64 {
        match (self.data.front(), self.data.back()) {
            (Some(oldest), Some(newest)) => {
                let millis = (newest.timestamp - oldest.timestamp).num_milliseconds();
                (millis as f64 / 60_000.0).abs()
            }
            _ => 0.0,
        }
    }

    pub fn status(&self) -> WindowStatus {
        if !self.is_full() {
            return WindowStatus::Collecting {
                len: self.data.len(),
                capacity: self.capacity,
            };
        }

        let valid_count = self.data.iter().filter(|r| r.value.is_some()).count();
        let (Some(first_valid), Some(last_valid), Some(newest)) =
            (self.first_valid(), self.last_valid(), self.data.back())
        else {
            return WindowStatus::InsufficientData { valid: valid_count };
        };
        if valid_count < 2 {
            return WindowStatus::InsufficientData { valid: valid_count };
        }

        WindowStatus::Ready(WindowStats {
            first_valid,
            last_valid,
            delta: (first_valid - last_valid).abs(),
            span_minutes: self.span_minutes(),
            valid_count,
            newest: *newest,
        })
    }
}
