/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Load the single yaml document in the file at `path`.
///
/// An empty file yields `Yaml::Null`.
pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let content = fs::read_to_string(path)
        .context(format!("failed to read file {}", path.display()))?;
    let mut docs = YamlLoader::load_from_str(&content)
        .map_err(|e| anyhow!("failed to load yaml file {}: {e}", path.display()))?;
    match docs.len() {
        0 => Ok(Yaml::Null),
        1 => Ok(docs.remove(0)),
        n => Err(anyhow!(
            "yaml file {} should contain only one document, found {n}",
            path.display()
        )),
    }
}
