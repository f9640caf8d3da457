/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::MetricTags;
use super::tag::push_sanitized;

const NO_OS: &str = "no-os";
const NO_BROWSER: &str = "no-browser";

/// Fold the tag values into the metric name.
///
/// The layout is `name[.host][.extra...].(os|no-os).(browser|no-browser)`,
/// with extra tags in ascending key order. Empty values count as absent.
pub fn encode_name(name: &str, tags: &MetricTags) -> String {
    let mut buf = String::with_capacity(name.len() + 32);
    encode_name_to(&mut buf, name, tags);
    buf
}

/// Same as [`encode_name`], but append to an existing buffer.
pub fn encode_name_to(buf: &mut String, name: &str, tags: &MetricTags) {
    buf.push_str(name);

    if let Some(host) = tags.host.as_deref()
        && !host.is_empty()
    {
        buf.push('.');
        push_sanitized(buf, host);
    }

    for (_, v) in tags.extra() {
        if v.is_empty() {
            continue;
        }
        buf.push('.');
        push_sanitized(buf, v);
    }

    push_or_fallback(buf, tags.os.as_deref(), NO_OS);
    push_or_fallback(buf, tags.browser.as_deref(), NO_BROWSER);
}

fn push_or_fallback(buf: &mut String, value: Option<&str>, fallback: &str) {
    buf.push('.');
    match value {
        Some(v) if !v.is_empty() => push_sanitized(buf, v),
        _ => buf.push_str(fallback),
    }
}
