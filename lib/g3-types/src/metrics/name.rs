/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use super::{ParseError, chars_allowed_in_opentsdb};

/// A metric name prefix which is safe to be used as the leading
/// segments of a statsd metric line.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct MetricsName(String);

impl MetricsName {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for MetricsName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        chars_allowed_in_opentsdb(s)?;
        if s.starts_with('.') || s.ends_with('.') || s.contains("..") {
            return Err(ParseError::InvalidGraphic('.'));
        }
        Ok(MetricsName(s.to_string()))
    }
}

impl AsRef<str> for MetricsName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MetricsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
