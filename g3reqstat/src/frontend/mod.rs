/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use g3_http_stats::Handler;

use crate::handler::{self, HttpResponse, Router};

mod stats;
pub(crate) use stats::FrontendStats;

mod request;
use request::RequestParseError;

mod response;

pub(crate) struct HttpFrontend<H> {
    listener: TcpListener,
    router: Arc<Router<H>>,
    stats: Arc<FrontendStats>,
}

impl<H> HttpFrontend<H>
where
    H: Handler<(), Output = HttpResponse> + Send + Sync + 'static,
{
    pub(crate) async fn new(
        addr: SocketAddr,
        router: Router<H>,
        stats: Arc<FrontendStats>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .context(format!("failed to listen on {addr}"))?;
        Ok(HttpFrontend {
            listener,
            router: Arc::new(router),
            stats,
        })
    }

    pub(crate) fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to get local address")
    }

    /// Accept connections until `quit` resolves.
    pub(crate) async fn run<F>(self, quit: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut quit = std::pin::pin!(quit);
        loop {
            tokio::select! {
                biased;

                _ = &mut quit => {
                    info!("quit signal received, stop accepting new connections");
                    return Ok(());
                }
                r = self.listener.accept() => {
                    match r {
                        Ok((stream, peer)) => {
                            self.stats.add_conn_total();
                            let router = self.router.clone();
                            let stats = self.stats.clone();
                            tokio::spawn(async move {
                                serve_connection(stream, peer, &router, &stats).await;
                            });
                        }
                        Err(e) => {
                            warn!("failed to accept new connection: {e}");
                        }
                    }
                }
            }
        }
    }
}

async fn serve_connection<H>(
    mut stream: TcpStream,
    peer: SocketAddr,
    router: &Router<H>,
    stats: &FrontendStats,
) where
    H: Handler<(), Output = HttpResponse>,
{
    let rsp = match request::read_request(&mut stream).await {
        Ok(Some(req)) => {
            stats.add_request_total();
            router.route(req)
        }
        Ok(None) => return,
        Err(RequestParseError::ReadFailed(e)) => {
            debug!("failed to read request from {peer}: {e}");
            return;
        }
        Err(e) => {
            stats.add_request_invalid();
            debug!("invalid request from {peer}: {e}");
            handler::bad_request()
        }
    };

    let data = response::encode_response(&rsp);
    if let Err(e) = stream.write_all(&data).await {
        stats.add_response_fail();
        debug!("failed to send response to {peer}: {e}");
        return;
    }
    let _ = stream.shutdown().await;
}
