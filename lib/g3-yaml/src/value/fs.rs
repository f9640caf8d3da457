/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_absolute_path(v: &Yaml) -> anyhow::Result<PathBuf> {
    let Yaml::String(path) = v else {
        return Err(anyhow!(
            "yaml value type for absolute path should be string"
        ));
    };
    let path = PathBuf::from(path);
    if path.is_relative() {
        return Err(anyhow!(
            "invalid value: {} is not an absolute path",
            path.display()
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn absolute_path() {
        let v = Yaml::String("/run/statsd.sock".to_string());
        assert_eq!(
            as_absolute_path(&v).unwrap(),
            PathBuf::from("/run/statsd.sock")
        );

        let v = Yaml::String("run/statsd.sock".to_string());
        assert!(as_absolute_path(&v).is_err());

        assert!(as_absolute_path(&Yaml::Null).is_err());
    }
}
