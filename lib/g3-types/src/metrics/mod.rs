/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod name;
pub use name::MetricsName;

mod tag;
pub use tag::{
    MetricTags, TAG_KEY_BROWSER, TAG_KEY_HOST, TAG_KEY_OS, sanitize_tag_value,
};

mod encode;
pub use encode::{encode_name, encode_name_to};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty string")]
    Empty,
    #[error("invalid graphic char: {0}")]
    InvalidGraphic(char),
    #[error("not alpha numeric char")]
    NotAlphaNumeric,
}

fn chars_allowed_in_opentsdb(s: &str) -> Result<(), ParseError> {
    for c in s.chars() {
        // Same character range as OpenTSDB
        // http://opentsdb.net/docs/build/html/user_guide/writing/index.html#metrics-and-tags
        if c.is_ascii() {
            match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '/' => {}
                _ => {
                    return if c.is_ascii_graphic() {
                        Err(ParseError::InvalidGraphic(c))
                    } else {
                        Err(ParseError::NotAlphaNumeric)
                    };
                }
            }
        } else if !c.is_alphanumeric() {
            return Err(ParseError::NotAlphaNumeric);
        }
    }
    Ok(())
}
