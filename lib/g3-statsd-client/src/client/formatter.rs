/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::time::Duration;

use g3_types::metrics::{MetricTags, encode_name};

use super::StatsdClient;

enum MetricType {
    Count,
    Timer,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Count => "c",
            MetricType::Timer => "ms",
        }
    }
}

/// One pending metric line, nothing is buffered until `send` is called.
pub struct MetricFormatter<'a> {
    client: &'a mut StatsdClient,
    metric_type: MetricType,
    name: Cow<'a, str>,
    value: String,
}

impl StatsdClient {
    pub fn count<'a>(&'a mut self, name: &'a str, value: u64) -> MetricFormatter<'a> {
        let mut buffer = itoa::Buffer::new();
        let value = buffer.format(value).to_string();
        self.metric_with_type(MetricType::Count, Cow::Borrowed(name), value)
    }

    /// Count with the tag values folded into the metric name.
    pub fn count_with_tags<'a>(
        &'a mut self,
        name: &str,
        tags: &MetricTags,
        value: u64,
    ) -> MetricFormatter<'a> {
        let name = encode_name(name, tags);
        let mut buffer = itoa::Buffer::new();
        let value = buffer.format(value).to_string();
        self.metric_with_type(MetricType::Count, Cow::Owned(name), value)
    }

    /// Timer value is sent in milliseconds.
    pub fn timer<'a>(&'a mut self, name: &'a str, duration: Duration) -> MetricFormatter<'a> {
        let value = format_millis(duration);
        self.metric_with_type(MetricType::Timer, Cow::Borrowed(name), value)
    }

    /// Timer with the tag values folded into the metric name.
    pub fn timer_with_tags<'a>(
        &'a mut self,
        name: &str,
        tags: &MetricTags,
        duration: Duration,
    ) -> MetricFormatter<'a> {
        let name = encode_name(name, tags);
        let value = format_millis(duration);
        self.metric_with_type(MetricType::Timer, Cow::Owned(name), value)
    }

    fn metric_with_type<'a>(
        &'a mut self,
        metric_type: MetricType,
        name: Cow<'a, str>,
        value: String,
    ) -> MetricFormatter<'a> {
        MetricFormatter {
            client: self,
            metric_type,
            name,
            value,
        }
    }
}

fn format_millis(duration: Duration) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(duration.as_nanos() as f64 / 1_000_000.0).to_string()
}

impl MetricFormatter<'_> {
    pub fn send(self) {
        let MetricFormatter {
            client,
            metric_type,
            name,
            value,
        } = self;

        let r = client.sink.emit(|buf| {
            if !client.prefix.is_empty() {
                buf.extend_from_slice(client.prefix.as_str().as_bytes());
                buf.push(b'.');
            }
            buf.extend_from_slice(name.as_bytes());
            buf.push(b':');
            buf.extend_from_slice(value.as_bytes());
            buf.push(b'|');
            buf.extend_from_slice(metric_type.as_str().as_bytes());
        });
        if let Err(e) = r {
            client.handle_emit_error(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis() {
        assert_eq!(format_millis(Duration::ZERO), "0.0");
        assert_eq!(format_millis(Duration::from_millis(20)), "20.0");
        assert_eq!(format_millis(Duration::from_micros(1500)), "1.5");
    }
}
