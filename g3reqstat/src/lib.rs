/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};

use anyhow::Context;
use ::log::{info, warn};

pub mod config;
use config::AppConfig;

mod build;

pub mod log;
pub mod opts;

mod stat;

mod frontend;
use frontend::{FrontendStats, HttpFrontend};

mod handler;
use handler::Router;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let frontend_stats = Arc::new(FrontendStats::default());

    let reporter = match &config.stat {
        Some(stat_config) => {
            let client = stat_config
                .build()
                .context("failed to build statsd client")?;
            let client = Arc::new(Mutex::new(client));
            stat::spawn_working_thread(
                client.clone(),
                stat_config.emit_interval,
                frontend_stats.clone(),
            )?;
            Some(client)
        }
        None => {
            warn!("no stat config found, request metrics will be dropped");
            None
        }
    };

    let stats_handler =
        g3_http_stats::instrument(handler::hello, reporter).with_static_tags(config.static_tags);
    let frontend =
        HttpFrontend::new(config.listen, Router::new(stats_handler), frontend_stats).await?;
    info!("listening on {}", frontend.local_addr()?);

    frontend
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for ctrl-c signal: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await
}
