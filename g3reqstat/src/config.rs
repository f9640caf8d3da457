/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use g3_statsd_client::StatsdClientConfig;
use g3_types::metrics::{MetricTags, MetricsName, TAG_KEY_BROWSER, TAG_KEY_HOST, TAG_KEY_OS};

const DEFAULT_LISTEN_PORT: u16 = 8080;

pub struct AppConfig {
    pub listen: SocketAddr,
    pub stat: Option<StatsdClientConfig>,
    pub static_tags: MetricTags,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            listen: SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), DEFAULT_LISTEN_PORT),
            stat: None,
            static_tags: MetricTags::default(),
        }
    }
}

fn default_metrics_prefix() -> anyhow::Result<MetricsName> {
    MetricsName::from_str(crate::build::PKG_NAME)
        .map_err(|e| anyhow!("invalid default metrics prefix: {e}"))
}

impl AppConfig {
    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match g3_yaml::key::normalize(k).as_str() {
            "listen" => {
                self.listen = g3_yaml::value::as_sockaddr(v)
                    .context(format!("invalid socket address value for key {k}"))?;
            }
            "stat" => {
                let config = StatsdClientConfig::parse_yaml(v, default_metrics_prefix()?)
                    .context(format!("invalid statsd client config value for key {k}"))?;
                self.stat = Some(config);
            }
            "static_tags" => {
                let tags = g3_yaml::value::as_metric_tags(v)
                    .context(format!("invalid metric tags value for key {k}"))?;
                for key in [TAG_KEY_OS, TAG_KEY_BROWSER, TAG_KEY_HOST] {
                    if tags.contains(key) {
                        return Err(anyhow!(
                            "tag {key} is set per request and can not be used in {k}"
                        ));
                    }
                }
                self.static_tags = tags;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }

    fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let mut config = AppConfig::default();
        match v {
            Yaml::Hash(map) => g3_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?,
            Yaml::Null => {}
            _ => return Err(anyhow!("yaml value type for main config should be 'map'")),
        }
        Ok(config)
    }
}

pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let doc = g3_yaml::load_doc(path)?;
    AppConfig::parse_yaml(&doc)
}
