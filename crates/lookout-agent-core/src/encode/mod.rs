// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Stateless mapping from the internal telemetry model to `lookout.v1` wire
//! messages.

pub mod command;
pub mod span;
pub mod stat;

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, 0 for pre-epoch times.
pub(crate) fn epoch_millis(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
