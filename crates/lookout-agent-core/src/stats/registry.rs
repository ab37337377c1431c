// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// In-flight span tracker keyed by span id.
///
/// Spans register when they start and deregister when they finish; the
/// histogram buckets whatever is still in flight by age. Lock-free reads and
/// writes let request paths touch the registry without contending with the
/// stat collector.
pub struct ActiveSpanRegistry {
    spans: DashMap<i64, Instant>,
}

impl ActiveSpanRegistry {
    pub fn new() -> Self {
        Self {
            spans: DashMap::new(),
        }
    }

    pub fn add(&self, span_id: i64, started_at: Instant) {
        self.spans.insert(span_id, started_at);
    }

    pub fn remove(&self, span_id: i64) {
        self.spans.remove(&span_id);
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Count in-flight spans into four age buckets: under one second, one to
    /// three, three to five, and five or more. A span aged exactly one second
    /// lands in the second bucket.
    pub fn histogram(&self, now: Instant) -> [i32; 4] {
        let mut buckets = [0i32; 4];
        for entry in self.spans.iter() {
            let age = now.duration_since(*entry.value());
            let bucket = if age < Duration::from_secs(1) {
                0
            } else if age < Duration::from_secs(3) {
                1
            } else if age < Duration::from_secs(5) {
                2
            } else {
                3
            };
            buckets[bucket] += 1;
        }
        buckets
    }
}

impl Default for ActiveSpanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn span_moves_across_buckets_as_it_ages() {
        let registry = ActiveSpanRegistry::new();
        let started = Instant::now();
        registry.add(7, started);

        assert_eq!(
            registry.histogram(started + Duration::from_millis(500)),
            [1, 0, 0, 0]
        );
        assert_eq!(
            registry.histogram(started + Duration::from_secs(4)),
            [0, 0, 1, 0]
        );

        registry.remove(7);
        assert_eq!(
            registry.histogram(started + Duration::from_secs(4)),
            [0, 0, 0, 0]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn bucket_boundaries_are_half_open() {
        let registry = ActiveSpanRegistry::new();
        let now = Instant::now() + Duration::from_secs(30);
        registry.add(1, now - Duration::from_secs(1));
        registry.add(2, now - Duration::from_secs(3));
        registry.add(3, now - Duration::from_secs(5));

        assert_eq!(registry.histogram(now), [0, 1, 1, 1]);
    }

    #[test]
    fn re_adding_a_span_id_refreshes_its_start() {
        let registry = ActiveSpanRegistry::new();
        let now = Instant::now() + Duration::from_secs(30);
        registry.add(9, now - Duration::from_secs(10));
        registry.add(9, now - Duration::from_millis(100));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.histogram(now), [1, 0, 0, 0]);
    }

    #[test]
    fn concurrent_registration_keeps_counts_consistent() {
        let registry = Arc::new(ActiveSpanRegistry::new());
        let started = Instant::now();

        let mut handles = Vec::new();
        for worker in 0..4i64 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for i in 0..100i64 {
                    let id = worker * 1000 + i;
                    registry.add(id, started);
                    if i % 2 == 0 {
                        registry.remove(id);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 200);
        let histogram = registry.histogram(started + Duration::from_millis(10));
        assert_eq!(histogram.iter().sum::<i32>(), 200);
    }

    proptest! {
        #[test]
        fn histogram_counts_every_entry(ages_ms in proptest::collection::vec(0u64..10_000, 0..64)) {
            let registry = ActiveSpanRegistry::new();
            let now = Instant::now() + Duration::from_secs(20);
            for (id, age_ms) in ages_ms.iter().enumerate() {
                registry.add(id as i64, now - Duration::from_millis(*age_ms));
            }

            let histogram = registry.histogram(now);
            prop_assert_eq!(histogram.iter().map(|&n| n as usize).sum::<usize>(), ages_ms.len());
        }
    }
}
