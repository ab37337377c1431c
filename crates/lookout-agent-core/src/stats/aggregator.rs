// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::{RateSnapshot, SampleKind};
use std::sync::Mutex;
use std::time::Instant;

/// Concurrent response-time and sampling counters, drained once per
/// collection tick.
///
/// [`snapshot`](Self::snapshot) is reset-on-read: consecutive snapshots cover
/// disjoint windows, and recordings landing while a snapshot runs count
/// toward the next one.
pub struct StatsAggregator {
    inner: Mutex<Counters>,
}

struct Counters {
    response_time_sum: i64,
    response_count: i64,
    response_max: i64,
    sampled_new: i64,
    sampled_continuation: i64,
    unsampled_new: i64,
    unsampled_continuation: i64,
    skipped_new: i64,
    skipped_continuation: i64,
    window_start: Instant,
}

impl Counters {
    fn reset(&mut self, now: Instant) {
        self.response_time_sum = 0;
        self.response_count = 0;
        self.response_max = 0;
        self.sampled_new = 0;
        self.sampled_continuation = 0;
        self.unsampled_new = 0;
        self.unsampled_continuation = 0;
        self.skipped_new = 0;
        self.skipped_continuation = 0;
        self.window_start = now;
    }
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters {
                response_time_sum: 0,
                response_count: 0,
                response_max: 0,
                sampled_new: 0,
                sampled_continuation: 0,
                unsampled_new: 0,
                unsampled_continuation: 0,
                skipped_new: 0,
                skipped_continuation: 0,
                window_start: Instant::now(),
            }),
        }
    }

    /// Record one completed transaction's response time in milliseconds.
    pub fn record_response_time(&self, millis: i64) {
        let mut counters = self.inner.lock().expect("lock poisoned");
        counters.response_time_sum += millis;
        counters.response_count += 1;
        if counters.response_max < millis {
            counters.response_max = millis;
        }
    }

    /// Record one sampling decision.
    pub fn record_sample(&self, kind: SampleKind) {
        let mut counters = self.inner.lock().expect("lock poisoned");
        match kind {
            SampleKind::SampledNew => counters.sampled_new += 1,
            SampleKind::SampledContinuation => counters.sampled_continuation += 1,
            SampleKind::UnsampledNew => counters.unsampled_new += 1,
            SampleKind::UnsampledContinuation => counters.unsampled_continuation += 1,
            SampleKind::SkippedNew => counters.skipped_new += 1,
            SampleKind::SkippedContinuation => counters.skipped_continuation += 1,
        }
    }

    /// Drain the current window into per-second rates and reset.
    ///
    /// The window length is clamped to one whole second, so a snapshot taken
    /// early never divides by zero.
    pub fn snapshot(&self, now: Instant) -> RateSnapshot {
        let mut counters = self.inner.lock().expect("lock poisoned");

        let elapsed_secs = now
            .duration_since(counters.window_start)
            .as_secs()
            .max(1) as i64;

        let snapshot = RateSnapshot {
            response_avg_ms: if counters.response_count > 0 {
                counters.response_time_sum / counters.response_count
            } else {
                0
            },
            response_max_ms: counters.response_max,
            sampled_new: counters.sampled_new / elapsed_secs,
            sampled_continuation: counters.sampled_continuation / elapsed_secs,
            unsampled_new: counters.unsampled_new / elapsed_secs,
            unsampled_continuation: counters.unsampled_continuation / elapsed_secs,
            skipped_new: counters.skipped_new / elapsed_secs,
            skipped_continuation: counters.skipped_continuation / elapsed_secs,
        };

        counters.reset(now);
        snapshot
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
