/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

/// Accepts `"200ms"` style strings, or plain integer / real seconds.
pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                if let Ok(u) = u64::from_str(value) {
                    Ok(Duration::from_secs(u))
                } else {
                    let f = f64::from_str(value).map_err(|_| anyhow!("invalid duration string"))?;
                    Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
                }
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            let u = u64::try_from(*value).map_err(|_| anyhow!("negative duration value"))?;
            Ok(Duration::from_secs(u))
        }
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid f64 value: {e}"))?;
            Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer' or 'real'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration() {
        let v = Yaml::String("200ms".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(200));

        let v = Yaml::String("1h2m".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(3720));

        let v = Yaml::String("10".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(10));

        let v = Yaml::Integer(3);
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(3));

        let v = Yaml::Real("0.25".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn parse_duration_err() {
        assert!(as_duration(&Yaml::Integer(-1)).is_err());
        assert!(as_duration(&Yaml::String("abc".to_string())).is_err());
        assert!(as_duration(&Yaml::Array(Vec::new())).is_err());
    }
}
