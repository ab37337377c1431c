// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::{RuntimeObserver, RuntimeReading, StatSample};
use crate::stats::{ActiveSpanRegistry, StatsAggregator};
use num_cpus;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// Turns cumulative runtime readings into per-interval samples.
///
/// Holds the previous reading so CPU time and garbage-collection counters can
/// be reported as deltas. One collector instance belongs to the stat upload
/// task; it is not shared.
pub struct StatsCollector {
    observer: Arc<dyn RuntimeObserver>,
    aggregator: Arc<StatsAggregator>,
    registry: Arc<ActiveSpanRegistry>,
    last_reading: RuntimeReading,
    last_collect: Instant,
    cpu_count: usize,
}

impl StatsCollector {
    pub fn new(
        observer: Arc<dyn RuntimeObserver>,
        aggregator: Arc<StatsAggregator>,
        registry: Arc<ActiveSpanRegistry>,
    ) -> Self {
        let last_reading = observer.read();
        Self {
            observer,
            aggregator,
            registry,
            last_reading,
            last_collect: Instant::now(),
            cpu_count: num_cpus::get(),
        }
    }

    /// Produce one sample covering the interval since the previous call (or
    /// since construction).
    pub fn collect(&mut self, wall: SystemTime, now: Instant) -> StatSample {
        let reading = self.observer.read();
        let elapsed = now.duration_since(self.last_collect);

        let sample = StatSample {
            sample_time: wall,
            user_cpu_percent: cpu_percent(
                reading.user_cpu_time,
                self.last_reading.user_cpu_time,
                elapsed,
                self.cpu_count,
            ),
            system_cpu_percent: cpu_percent(
                reading.system_cpu_time,
                self.last_reading.system_cpu_time,
                elapsed,
                self.cpu_count,
            ),
            heap_used: reading.heap_used,
            heap_max: reading.heap_max,
            non_heap_used: reading.non_heap_used,
            non_heap_max: reading.non_heap_max,
            gc_count: reading.gc_count.saturating_sub(self.last_reading.gc_count),
            gc_time_ms: reading
                .gc_time_ms
                .saturating_sub(self.last_reading.gc_time_ms),
            rates: self.aggregator.snapshot(now),
            active_span_histogram: self.registry.histogram(now),
        };

        self.last_reading = reading;
        self.last_collect = now;
        sample
    }
}

/// CPU busy time over wall time, as a percent of one machine.
fn cpu_percent(current: Duration, previous: Duration, elapsed: Duration, cpu_count: usize) -> f64 {
    if elapsed.is_zero() || cpu_count == 0 {
        return 0.0;
    }
    // Cumulative counters can step backwards when the runtime re-reads them
    // from a restarted source; report zero rather than a negative rate.
    let busy = current.checked_sub(previous).unwrap_or(Duration::ZERO);
    busy.as_secs_f64() / elapsed.as_secs_f64() * 100.0 / cpu_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedObserver {
        reading: Mutex<RuntimeReading>,
    }

    impl ScriptedObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                reading: Mutex::new(RuntimeReading::default()),
            })
        }

        fn set(&self, reading: RuntimeReading) {
            *self.reading.lock().unwrap() = reading;
        }
    }

    impl RuntimeObserver for ScriptedObserver {
        fn read(&self) -> RuntimeReading {
            *self.reading.lock().unwrap()
        }
    }

    fn collector_parts() -> (
        Arc<ScriptedObserver>,
        Arc<StatsAggregator>,
        Arc<ActiveSpanRegistry>,
        StatsCollector,
    ) {
        let observer = ScriptedObserver::new();
        let aggregator = Arc::new(StatsAggregator::new());
        let registry = Arc::new(ActiveSpanRegistry::new());
        let collector = StatsCollector::new(
            Arc::clone(&observer) as Arc<dyn RuntimeObserver>,
            Arc::clone(&aggregator),
            Arc::clone(&registry),
        );
        (observer, aggregator, registry, collector)
    }

    #[test]
    fn cpu_percent_normalizes_over_cpus() {
        let percent = cpu_percent(
            Duration::from_secs(3),
            Duration::from_secs(1),
            Duration::from_secs(1),
            4,
        );
        assert_eq!(percent, 50.0);
    }

    #[test]
    fn cpu_percent_handles_degenerate_inputs() {
        assert_eq!(
            cpu_percent(Duration::from_secs(1), Duration::ZERO, Duration::ZERO, 4),
            0.0
        );
        // Counter stepped backwards.
        assert_eq!(
            cpu_percent(
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(1),
                4
            ),
            0.0
        );
    }

    #[test]
    fn collect_reports_interval_deltas_and_gauges() {
        let (observer, aggregator, registry, mut collector) = collector_parts();

        observer.set(RuntimeReading {
            user_cpu_time: Duration::from_millis(800),
            system_cpu_time: Duration::from_millis(400),
            heap_used: 64 << 20,
            heap_max: 256 << 20,
            non_heap_used: 8 << 20,
            non_heap_max: 16 << 20,
            gc_count: 3,
            gc_time_ms: 45,
        });
        aggregator.record_response_time(100);
        aggregator.record_response_time(300);
        let now = Instant::now() + Duration::from_secs(2);
        registry.add(7, now - Duration::from_millis(100));

        let wall = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let sample = collector.collect(wall, now);

        assert_eq!(sample.sample_time, wall);
        assert_eq!(sample.heap_used, 64 << 20);
        assert_eq!(sample.heap_max, 256 << 20);
        assert_eq!(sample.non_heap_used, 8 << 20);
        assert_eq!(sample.non_heap_max, 16 << 20);
        assert_eq!(sample.gc_count, 3);
        assert_eq!(sample.gc_time_ms, 45);
        assert_eq!(sample.rates.response_avg_ms, 200);
        assert_eq!(sample.rates.response_max_ms, 300);
        assert_eq!(sample.active_span_histogram, [1, 0, 0, 0]);

        // Construction primed last_collect a moment before `now`, so the
        // window is two seconds give or take scheduler noise.
        let expected_user = 0.8 / 2.0 * 100.0 / num_cpus::get() as f64;
        assert!((sample.user_cpu_percent - expected_user).abs() < 1.0);
        assert!(sample.system_cpu_percent > 0.0);
        assert!(sample.system_cpu_percent < sample.user_cpu_percent);
    }

    #[test]
    fn consecutive_collects_window_the_counters() {
        let (observer, _aggregator, _registry, mut collector) = collector_parts();

        observer.set(RuntimeReading {
            gc_count: 3,
            gc_time_ms: 45,
            ..RuntimeReading::default()
        });
        let first_now = Instant::now() + Duration::from_secs(2);
        collector.collect(SystemTime::now(), first_now);

        observer.set(RuntimeReading {
            gc_count: 5,
            gc_time_ms: 75,
            ..RuntimeReading::default()
        });
        let sample = collector.collect(SystemTime::now(), first_now + Duration::from_secs(2));

        assert_eq!(sample.gc_count, 2);
        assert_eq!(sample.gc_time_ms, 30);
        assert_eq!(sample.user_cpu_percent, 0.0);
        assert_eq!(sample.system_cpu_percent, 0.0);
    }

    #[test]
    fn backwards_counters_clamp_to_zero() {
        let (observer, _aggregator, _registry, mut collector) = collector_parts();

        observer.set(RuntimeReading {
            gc_count: 3,
            ..RuntimeReading::default()
        });
        let first_now = Instant::now() + Duration::from_secs(1);
        collector.collect(SystemTime::now(), first_now);

        observer.set(RuntimeReading {
            gc_count: 1,
            ..RuntimeReading::default()
        });
        let sample = collector.collect(SystemTime::now(), first_now + Duration::from_secs(1));

        assert_eq!(sample.gc_count, 0);
    }
}
