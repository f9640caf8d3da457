/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

use g3_types::metrics::{MetricTags, MetricsName};

pub fn as_metrics_name(v: &Yaml) -> anyhow::Result<MetricsName> {
    if let Yaml::String(s) = v {
        MetricsName::from_str(s).map_err(|e| anyhow!("invalid metrics name: {e}"))
    } else {
        Err(anyhow!(
            "yaml value type for 'metrics name' should be 'string'"
        ))
    }
}

/// Tag values are kept as is, they will be sanitized when encoded.
pub fn as_metric_tags(v: &Yaml) -> anyhow::Result<MetricTags> {
    if let Yaml::Hash(map) = v {
        let mut tags = MetricTags::default();
        crate::foreach_kv(map, |k, v| {
            if k.is_empty() {
                return Err(anyhow!("empty tag name"));
            }
            let value = crate::value::as_string(v)?;
            tags.insert(k, value);
            Ok(())
        })?;
        Ok(tags)
    } else {
        Err(anyhow!(
            "yaml value type for 'metric tags' should be 'map'"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_name() {
        let v = Yaml::String("g3reqstat".to_string());
        assert_eq!(as_metrics_name(&v).unwrap().as_str(), "g3reqstat");

        let v = Yaml::String("a:b".to_string());
        assert!(as_metrics_name(&v).is_err());
    }

    #[test]
    fn metric_tags() {
        let v = yaml_doc!(
            r#"
                endpoint: stats
                zone: 1
            "#
        );
        let tags = as_metric_tags(&v).unwrap();
        assert_eq!(tags.get("endpoint"), Some("stats"));
        assert_eq!(tags.get("zone"), Some("1"));

        assert!(as_metric_tags(&Yaml::Array(Vec::new())).is_err());
    }
}
