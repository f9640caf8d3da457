/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::Context;
use log::{error, info};

fn main() -> anyhow::Result<()> {
    let Some(proc_args) = g3reqstat::opts::parse_clap().context("failed to parse command line")?
    else {
        return Ok(());
    };

    let _log_guard = g3reqstat::log::setup(&proc_args).context("failed to setup logger")?;

    let config = g3reqstat::config::load(&proc_args.config_file)
        .context(format!("failed to load config file {}", proc_args.config_file.display()))?;
    if proc_args.test_config {
        info!("the format of the config file is ok");
        return Ok(());
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let ret = rt.block_on(g3reqstat::run(config));
    if let Err(e) = &ret {
        error!("{e:?}");
    }
    ret
}
