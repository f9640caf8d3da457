/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use clap_complete::Shell;

const ARGS_COMPLETION: &str = "completion";
const ARGS_VERSION: &str = "version";
const ARGS_VERBOSE: &str = "verbose";
const ARGS_TEST_CONFIG: &str = "test-config";
const ARGS_CONFIG_FILE: &str = "config-file";

#[derive(Debug, Default)]
pub struct ProcArgs {
    pub config_file: PathBuf,
    pub verbose_level: u8,
    pub test_config: bool,
}

fn build_cli_args() -> Command {
    Command::new(crate::build::PKG_NAME)
        .disable_version_flag(true)
        .arg(
            Arg::new(ARGS_COMPLETION)
                .num_args(1)
                .value_name("SHELL")
                .long("completion")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
        .arg(
            Arg::new(ARGS_VERSION)
                .help("Show version")
                .action(ArgAction::SetTrue)
                .short('V')
                .long("version"),
        )
        .arg(
            Arg::new(ARGS_VERBOSE)
                .help("Show verbose output")
                .action(ArgAction::Count)
                .short('v')
                .long("verbose"),
        )
        .arg(
            Arg::new(ARGS_TEST_CONFIG)
                .help("Test the format of config file and exit")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test-config"),
        )
        .arg(
            Arg::new(ARGS_CONFIG_FILE)
                .help("Config file path")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .required_unless_present_any([ARGS_COMPLETION, ARGS_VERSION])
                .short('c')
                .long("config-file"),
        )
}

fn parse_matches(args: &ArgMatches) -> ProcArgs {
    let mut proc_args = ProcArgs {
        verbose_level: args.get_count(ARGS_VERBOSE),
        test_config: args.get_flag(ARGS_TEST_CONFIG),
        ..Default::default()
    };
    if let Some(path) = args.get_one::<PathBuf>(ARGS_CONFIG_FILE) {
        proc_args.config_file.clone_from(path);
    }
    proc_args
}

pub fn parse_clap() -> anyhow::Result<Option<ProcArgs>> {
    let args = build_cli_args().try_get_matches()?;

    if let Some(target) = args.get_one::<Shell>(ARGS_COMPLETION) {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
        return Ok(None);
    }

    let proc_args = parse_matches(&args);
    if args.get_flag(ARGS_VERSION) {
        crate::build::print_version(proc_args.verbose_level);
        return Ok(None);
    }

    Ok(Some(proc_args))
}
