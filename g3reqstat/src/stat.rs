/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::anyhow;

use g3_statsd_client::StatsdClient;

use crate::frontend::FrontendStats;

fn emit_frontend_stats(client: &mut StatsdClient, s: &FrontendStats) {
    macro_rules! emit_count {
        ($take:ident, $name:literal) => {
            let v = s.$take();
            if v > 0 {
                client.count(concat!("frontend.", $name), v).send();
            }
        };
    }

    emit_count!(take_conn_total, "conn_total");
    emit_count!(take_request_total, "request_total");
    emit_count!(take_request_invalid, "request_invalid");
    emit_count!(take_response_fail, "response_fail");
}

fn wait_duration(emit_interval: Duration, instant_start: Instant) {
    let spend = instant_start.elapsed();
    if emit_interval > spend {
        std::thread::sleep(emit_interval - spend);
    }
}

/// Flush the request metrics buffered in `client` every `emit_interval`,
/// together with the frontend counters.
pub(crate) fn spawn_working_thread(
    client: Arc<Mutex<StatsdClient>>,
    emit_interval: Duration,
    frontend_stats: Arc<FrontendStats>,
) -> anyhow::Result<JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name("stat-main".to_string())
        .spawn(move || {
            loop {
                let instant_start = Instant::now();

                {
                    let mut client = client.lock().unwrap_or_else(|e| e.into_inner());
                    emit_frontend_stats(&mut client, &frontend_stats);
                    client.flush_sink();
                }

                wait_duration(emit_interval, instant_start);
            }
        })
        .map_err(|e| anyhow!("failed to spawn thread: {e:?}"))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;
    use std::str::FromStr;

    use g3_statsd_client::{StatsdBackend, StatsdClientConfig};
    use g3_types::metrics::MetricsName;

    #[test]
    fn periodic_flush() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        let mut config = StatsdClientConfig::with_prefix(MetricsName::from_str("test").unwrap());
        config.set_backend(StatsdBackend::Udp(server.local_addr().unwrap(), None));
        let client = Arc::new(Mutex::new(config.build().unwrap()));

        let stats = Arc::new(FrontendStats::default());
        stats.add_request_total();
        stats.add_request_total();

        let _handle =
            spawn_working_thread(client, Duration::from_millis(10), stats.clone()).unwrap();

        let mut buf = [0u8; 512];
        let n = server.recv(&mut buf).unwrap();
        let msg = std::str::from_utf8(&buf[..n]).unwrap();
        assert_eq!(msg, "test.frontend.request_total:2|c");
    }
}
