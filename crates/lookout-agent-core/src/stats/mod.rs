// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Runtime telemetry: response-time/sampling counters, the in-flight span
//! registry, and the per-tick sample collector.

mod aggregator;
mod collector;
mod registry;

pub use aggregator::StatsAggregator;
pub use collector::StatsCollector;
pub use registry::ActiveSpanRegistry;
