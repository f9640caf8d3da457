/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

/// Config keys are matched case-insensitively, and `-` is treated as `_`.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
