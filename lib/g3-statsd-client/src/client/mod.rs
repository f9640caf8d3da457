/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::time::Instant;

use log::warn;

use g3_types::metrics::MetricsName;

use crate::StatsdMetricsSink;

mod formatter;
pub use formatter::MetricFormatter;

pub struct StatsdClient {
    prefix: MetricsName,
    sink: StatsdMetricsSink,

    create_instant: Instant,
    last_error_report: Option<u64>,
}

impl StatsdClient {
    pub(crate) fn new(prefix: MetricsName, sink: StatsdMetricsSink) -> Self {
        StatsdClient {
            prefix,
            sink,
            create_instant: Instant::now(),
            last_error_report: None,
        }
    }

    #[inline]
    pub fn prefix(&self) -> &MetricsName {
        &self.prefix
    }

    pub fn flush_sink(&mut self) {
        if let Err(e) = self.sink.flush() {
            self.handle_emit_error(e);
        }
    }

    fn handle_emit_error(&mut self, e: io::Error) {
        let time_slice = self.create_instant.elapsed().as_secs() >> 6; // every 64s
        if self.last_error_report != Some(time_slice) {
            warn!("sending metrics error: {e:?}");
            self.last_error_report = Some(time_slice);
        }
    }
}
