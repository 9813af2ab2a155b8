//! Frame timing
//!
//! Frame deltas drive the hover eases; the rolling statistics are shown in
//! the debug panel.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Upper bound on the delta handed to the eases after a stall (seconds)
const MAX_DELTA_SECS: f32 = 0.25;

/// Frame timing statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Average frame time in milliseconds
    pub avg_ms: f64,
    /// Minimum frame time in milliseconds
    pub min_ms: f64,
    /// Maximum frame time in milliseconds
    pub max_ms: f64,
    /// 95th percentile frame time
    pub p95_ms: f64,
    /// Number of samples in the statistics
    pub sample_count: usize,
}

/// Frame profiler for CPU timing
///
/// Collects frame intervals and computes statistics.
pub struct FrameProfiler {
    /// Frame durations
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep (5 seconds at 60fps)
    max_samples: usize,
    /// Last frame start time
    last_frame_start: Option<Instant>,
    /// Frame start times for FPS calculation
    frame_starts: VecDeque<Instant>,
}

impl Default for FrameProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProfiler {
    pub fn new() -> Self {
        Self::with_capacity(300)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        let max_samples = max_samples.max(2);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            last_frame_start: None,
            frame_starts: VecDeque::with_capacity(max_samples),
        }
    }

    /// Mark the beginning of a frame and return seconds since the last one
    pub fn begin_frame(&mut self) -> f32 {
        self.record_frame(Instant::now())
    }

    /// Record a frame that started at `now`.
    ///
    /// Returns the interval since the previous frame in seconds, clamped to
    /// a quarter second. The first frame returns zero.
    pub fn record_frame(&mut self, now: Instant) -> f32 {
        let mut delta = 0.0;

        if let Some(start) = self.last_frame_start {
            let duration = now.saturating_duration_since(start);
            delta = duration.as_secs_f32().min(MAX_DELTA_SECS);
            self.frame_times.push_back(duration);
            if self.frame_times.len() > self.max_samples {
                self.frame_times.pop_front();
            }
        }

        self.last_frame_start = Some(now);

        self.frame_starts.push_back(now);
        if self.frame_starts.len() > self.max_samples {
            self.frame_starts.pop_front();
        }

        delta
    }

    /// Get frame timing statistics
    pub fn stats(&self) -> FrameStats {
        if self.frame_times.is_empty() {
            return FrameStats::default();
        }

        let mut times: Vec<f64> = self
            .frame_times
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect();
        times.sort_by(|a, b| a.total_cmp(b));

        let sum: f64 = times.iter().sum();

        FrameStats {
            avg_ms: sum / times.len() as f64,
            min_ms: times.first().copied().unwrap_or(0.0),
            max_ms: times.last().copied().unwrap_or(0.0),
            p95_ms: percentile(&times, 0.95),
            sample_count: times.len(),
        }
    }

    /// Calculate current FPS from frame start times
    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frame_starts.front(), self.frame_starts.back()) else {
            return 0.0;
        };
        if self.frame_starts.len() < 2 {
            return 0.0;
        }

        let duration = last.duration_since(*first).as_secs_f64();
        if duration > 0.0 {
            (self.frame_starts.len() - 1) as f64 / duration
        } else {
            0.0
        }
    }
}

/// Calculate percentile from sorted array
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * p) as usize;
    sorted[idx]
}
