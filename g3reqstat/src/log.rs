/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use slog::{Drain, slog_o};
use slog_scope::GlobalLoggerGuard;

use crate::opts::ProcArgs;

fn log_level(verbose_level: u8) -> log::Level {
    match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

pub fn setup(args: &ProcArgs) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let drain = g3_stdlog::StdLogDrain::new(args.verbose_level > 2, false);
    let logger = slog::Logger::root(drain.fuse(), slog_o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    slog_stdlog::init_with_level(log_level(args.verbose_level))?;
    Ok(scope_guard)
}
