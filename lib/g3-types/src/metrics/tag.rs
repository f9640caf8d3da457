/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::collections::BTreeMap;

pub const TAG_KEY_OS: &str = "os";
pub const TAG_KEY_BROWSER: &str = "browser";
pub const TAG_KEY_HOST: &str = "host";

#[inline]
fn is_unsafe_char(c: char) -> bool {
    matches!(c, '{' | '}' | '/' | '\\' | ':') || c.is_whitespace()
}

/// Replace each char that would break the dot delimited metric name
/// syntax with a single `-`.
pub fn sanitize_tag_value(value: &str) -> Cow<'_, str> {
    if value.chars().any(is_unsafe_char) {
        Cow::Owned(
            value
                .chars()
                .map(|c| if is_unsafe_char(c) { '-' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}

pub(super) fn push_sanitized(buf: &mut String, value: &str) {
    buf.reserve(value.len());
    for c in value.chars() {
        if is_unsafe_char(c) {
            buf.push('-');
        } else {
            buf.push(c);
        }
    }
}

/// Tags attached to one metric emission.
///
/// `os` and `browser` have fallback segments when encoded, `host` and
/// the extra tags are simply omitted when absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricTags {
    pub os: Option<String>,
    pub browser: Option<String>,
    pub host: Option<String>,
    extra: BTreeMap<String, String>,
}

impl MetricTags {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.os.is_none() && self.browser.is_none() && self.host.is_none() && self.extra.is_empty()
    }

    /// Set a tag by key, the well known keys go to their own fields.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: AsRef<str> + Into<String>,
        V: Into<String>,
    {
        let value = value.into();
        match key.as_ref() {
            TAG_KEY_OS => self.os.replace(value),
            TAG_KEY_BROWSER => self.browser.replace(value),
            TAG_KEY_HOST => self.host.replace(value),
            _ => self.extra.insert(key.into(), value),
        }
    }

    pub fn with_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: AsRef<str> + Into<String>,
        V: Into<String>,
    {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            TAG_KEY_OS => self.os.as_deref(),
            TAG_KEY_BROWSER => self.browser.as_deref(),
            TAG_KEY_HOST => self.host.as_deref(),
            _ => self.extra.get(key).map(|v| v.as_str()),
        }
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Caller supplied tags in ascending key order.
    #[inline]
    pub fn extra(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for MetricTags
where
    K: AsRef<str> + Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tags = MetricTags::default();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_tag_value("Linu{}/\tx"), "Linu----x");
        assert_eq!(sanitize_tag_value("Chro\\:me"), "Chro--me");
        assert_eq!(sanitize_tag_value("Mac OS X"), "Mac-OS-X");
        assert_eq!(sanitize_tag_value("a\r\n\u{3000}b"), "a---b");
        assert_eq!(sanitize_tag_value(""), "");
    }

    #[test]
    fn sanitize_borrow_clean() {
        assert!(matches!(sanitize_tag_value("Chrome"), Cow::Borrowed(_)));
        assert!(matches!(sanitize_tag_value("Chr ome"), Cow::Owned(_)));
    }

    #[test]
    fn sanitize_idempotent() {
        for v in ["Linu{}/\tx", "Chro\\:me", "plain", " : ", "a.b_c-d", "语言 中"] {
            let once = sanitize_tag_value(v);
            let twice = sanitize_tag_value(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn insert_routes_known_keys() {
        let mut tags = MetricTags::default();
        assert!(tags.is_empty());
        tags.insert("os", "Linux");
        tags.insert("browser", "Firefox");
        tags.insert("host", "web-1");
        tags.insert("endpoint", "stats");

        assert_eq!(tags.os.as_deref(), Some("Linux"));
        assert_eq!(tags.browser.as_deref(), Some("Firefox"));
        assert_eq!(tags.host.as_deref(), Some("web-1"));
        assert_eq!(tags.get("endpoint"), Some("stats"));
        assert_eq!(tags.extra().collect::<Vec<_>>(), vec![("endpoint", "stats")]);

        assert_eq!(tags.insert("os", "Windows"), Some("Linux".to_string()));
        assert!(tags.contains("host"));
        assert!(!tags.contains("zone"));
    }
}
