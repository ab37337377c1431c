// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Stat wire encoding.

use crate::model::StatSample;
use lookout_collector_proto::v1;

use super::epoch_millis;

/// Collector-defined gc report type for a unified runtime.
const GC_TYPE: i32 = 1;
/// Histogram layout identifier understood by the collector.
const HISTOGRAM_SCHEMA_TYPE: i32 = 2;

/// Wrap one collection batch for the stat upload stream.
pub fn stat_batch(samples: &[StatSample], collect_interval_ms: u64) -> v1::StatMessage {
    v1::StatMessage {
        field: Some(v1::stat_message::Field::AgentStatBatch(v1::AgentStatBatch {
            agent_stat: samples
                .iter()
                .map(|s| agent_stat(s, collect_interval_ms))
                .collect(),
        })),
    }
}

pub fn agent_stat(sample: &StatSample, collect_interval_ms: u64) -> v1::AgentStat {
    v1::AgentStat {
        timestamp: epoch_millis(sample.sample_time),
        collect_interval: collect_interval_ms as i64,
        gc: Some(v1::GcStat {
            gc_type: GC_TYPE,
            heap_used: sample.heap_used,
            heap_max: sample.heap_max,
            non_heap_used: sample.non_heap_used,
            non_heap_max: sample.non_heap_max,
            gc_count: sample.gc_count,
            gc_time: sample.gc_time_ms,
        }),
        cpu_load: Some(v1::CpuLoad {
            user_cpu_load: sample.user_cpu_percent,
            system_cpu_load: sample.system_cpu_percent,
        }),
        transaction: Some(v1::TransactionStat {
            sampled_new_count: sample.rates.sampled_new,
            sampled_continuation_count: sample.rates.sampled_continuation,
            unsampled_new_count: sample.rates.unsampled_new,
            unsampled_continuation_count: sample.rates.unsampled_continuation,
            skipped_new_count: sample.rates.skipped_new,
            skipped_continuation_count: sample.rates.skipped_continuation,
        }),
        active_trace: Some(v1::ActiveTrace {
            histogram: Some(v1::ActiveTraceHistogram {
                version: 1,
                histogram_schema_type: HISTOGRAM_SCHEMA_TYPE,
                active_trace_count: sample.active_span_histogram.to_vec(),
            }),
        }),
        response_time: Some(v1::ResponseTime {
            avg: sample.rates.response_avg_ms,
            max: sample.rates.response_max_ms,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RateSnapshot;
    use std::time::{Duration, UNIX_EPOCH};

    fn test_sample() -> StatSample {
        StatSample {
            sample_time: UNIX_EPOCH + Duration::from_millis(1_700_000_000_000),
            user_cpu_percent: 12.5,
            system_cpu_percent: 3.25,
            heap_used: 64 << 20,
            heap_max: 512 << 20,
            non_heap_used: 2 << 20,
            non_heap_max: 8 << 20,
            gc_count: 2,
            gc_time_ms: 17,
            rates: RateSnapshot {
                response_avg_ms: 200,
                response_max_ms: 300,
                sampled_new: 40,
                sampled_continuation: 8,
                unsampled_new: 2,
                unsampled_continuation: 1,
                skipped_new: 0,
                skipped_continuation: 0,
            },
            active_span_histogram: [5, 2, 1, 0],
        }
    }

    #[test]
    fn stat_encodes_all_sections() {
        let stat = agent_stat(&test_sample(), 5000);
        assert_eq!(stat.timestamp, 1_700_000_000_000);
        assert_eq!(stat.collect_interval, 5000);

        let gc = stat.gc.unwrap();
        assert_eq!(gc.gc_type, 1);
        assert_eq!(gc.heap_used, 64 << 20);
        assert_eq!(gc.non_heap_max, 8 << 20);
        assert_eq!(gc.gc_count, 2);
        assert_eq!(gc.gc_time, 17);

        let cpu = stat.cpu_load.unwrap();
        assert_eq!(cpu.user_cpu_load, 12.5);
        assert_eq!(cpu.system_cpu_load, 3.25);

        let tx = stat.transaction.unwrap();
        assert_eq!(tx.sampled_new_count, 40);
        assert_eq!(tx.skipped_continuation_count, 0);

        let response = stat.response_time.unwrap();
        assert_eq!((response.avg, response.max), (200, 300));
    }

    #[test]
    fn histogram_uses_normal_schema() {
        let stat = agent_stat(&test_sample(), 5000);
        let histogram = stat.active_trace.unwrap().histogram.unwrap();
        assert_eq!(histogram.version, 1);
        assert_eq!(histogram.histogram_schema_type, 2);
        assert_eq!(histogram.active_trace_count, vec![5, 2, 1, 0]);
    }

    #[test]
    fn batch_preserves_sample_order() {
        let mut first = test_sample();
        first.sample_time = UNIX_EPOCH + Duration::from_millis(1_000);
        let mut second = test_sample();
        second.sample_time = UNIX_EPOCH + Duration::from_millis(6_000);

        let msg = stat_batch(&[first, second], 5000);
        let Some(v1::stat_message::Field::AgentStatBatch(batch)) = msg.field else {
            panic!("expected batch");
        };
        let stamps: Vec<i64> = batch.agent_stat.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![1_000, 6_000]);
    }
}
