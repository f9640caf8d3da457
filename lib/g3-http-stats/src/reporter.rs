/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use g3_statsd_client::StatsdClient;
use g3_types::metrics::MetricTags;

/// The stats backend as seen by the request path.
///
/// Emission is fire and forget, implementations must not fail or block
/// the caller for long.
///
/// The `Mutex<StatsdClient>` reporter runs on the request task: it waits
/// for the lock while the stat thread flushes, and does a blocking socket
/// send when its buffer goes over `cache_size`.
pub trait StatsReporter {
    fn inc_counter(&self, name: &str, tags: &MetricTags, delta: u64);

    fn record_timer(&self, name: &str, tags: &MetricTags, duration: Duration);
}

impl StatsReporter for Mutex<StatsdClient> {
    fn inc_counter(&self, name: &str, tags: &MetricTags, delta: u64) {
        let mut client = self.lock().unwrap_or_else(|e| e.into_inner());
        client.count_with_tags(name, tags, delta).send();
    }

    fn record_timer(&self, name: &str, tags: &MetricTags, duration: Duration) {
        let mut client = self.lock().unwrap_or_else(|e| e.into_inner());
        client.timer_with_tags(name, tags, duration).send();
    }
}

impl<T: StatsReporter + ?Sized> StatsReporter for Arc<T> {
    #[inline]
    fn inc_counter(&self, name: &str, tags: &MetricTags, delta: u64) {
        (**self).inc_counter(name, tags, delta)
    }

    #[inline]
    fn record_timer(&self, name: &str, tags: &MetricTags, duration: Duration) {
        (**self).record_timer(name, tags, duration)
    }
}

/// `None` discards all metrics, used when no stats target is configured.
impl<T: StatsReporter> StatsReporter for Option<T> {
    #[inline]
    fn inc_counter(&self, name: &str, tags: &MetricTags, delta: u64) {
        if let Some(r) = self {
            r.inc_counter(name, tags, delta)
        }
    }

    #[inline]
    fn record_timer(&self, name: &str, tags: &MetricTags, duration: Duration) {
        if let Some(r) = self {
            r.record_timer(name, tags, duration)
        }
    }
}

impl<T: StatsReporter + ?Sized> StatsReporter for &T {
    #[inline]
    fn inc_counter(&self, name: &str, tags: &MetricTags, delta: u64) {
        (**self).inc_counter(name, tags, delta)
    }

    #[inline]
    fn record_timer(&self, name: &str, tags: &MetricTags, duration: Duration) {
        (**self).record_timer(name, tags, duration)
    }
}
