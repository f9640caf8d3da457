/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{SocketAddr, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::PathBuf;
#[cfg(test)]
use std::sync::{Arc, Mutex};

enum MetricsSinkIo {
    #[cfg(test)]
    Buf(Arc<Mutex<Vec<u8>>>),
    Udp(SocketAddr, UdpSocket),
    #[cfg(unix)]
    Unix(PathBuf, UnixDatagram),
}

impl MetricsSinkIo {
    fn send_msg(&self, msg: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(test)]
            MetricsSinkIo::Buf(buf) => {
                let mut buf = buf.lock().unwrap();
                buf.extend_from_slice(msg);
                Ok(msg.len())
            }
            MetricsSinkIo::Udp(addr, socket) => socket.send_to(msg, addr),
            #[cfg(unix)]
            MetricsSinkIo::Unix(path, socket) => socket.send_to(msg, path),
        }
    }
}

/// Buffers metric lines and sends them as `\n` joined datagrams,
/// each no larger than `cache_size` unless a single line is larger.
pub(crate) struct StatsdMetricsSink {
    cache_size: usize,
    buf: Vec<u8>,
    io: MetricsSinkIo,
}

impl StatsdMetricsSink {
    #[cfg(test)]
    pub(crate) fn buf_with_capacity(buf: Arc<Mutex<Vec<u8>>>, cache_size: usize) -> Self {
        StatsdMetricsSink {
            cache_size,
            buf: Vec::with_capacity(cache_size),
            io: MetricsSinkIo::Buf(buf),
        }
    }

    pub(crate) fn udp_with_capacity(
        addr: SocketAddr,
        socket: UdpSocket,
        cache_size: usize,
    ) -> Self {
        StatsdMetricsSink {
            cache_size,
            buf: Vec::with_capacity(cache_size),
            io: MetricsSinkIo::Udp(addr, socket),
        }
    }

    #[cfg(unix)]
    pub(crate) fn unix_with_capacity(
        path: PathBuf,
        socket: UnixDatagram,
        cache_size: usize,
    ) -> Self {
        StatsdMetricsSink {
            cache_size,
            buf: Vec::with_capacity(cache_size),
            io: MetricsSinkIo::Unix(path, socket),
        }
    }

    pub(crate) fn emit<F>(&mut self, format: F) -> io::Result<()>
    where
        F: FnOnce(&mut Vec<u8>),
    {
        let old_len = self.buf.len();
        if old_len > 0 {
            self.buf.push(b'\n');
        }
        format(&mut self.buf);

        if old_len > 0 && self.buf.len() > self.cache_size {
            // send the cached lines, and keep the new one for the next packet
            let r = self.io.send_msg(&self.buf[..old_len]);
            self.buf.drain(..=old_len);
            r?;
        }
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let r = self.io.send_msg(&self.buf);
        self.buf.clear();
        r.map(|_| ())
    }
}
