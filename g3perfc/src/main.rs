/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use clap_complete::Shell;
use log::info;

use g3_perf_counter::{CounterStore, StoreConfig};

mod logger;
mod output;

mod cmd_get;
mod cmd_known;
mod cmd_list;

const GLOBAL_ARG_COMPLETION: &str = "completion";
const GLOBAL_ARG_CONFIG: &str = "config";
const GLOBAL_ARG_FILE: &str = "file";
const GLOBAL_ARG_DELIMITER: &str = "delimiter";
const GLOBAL_ARG_VERBOSE: &str = "verbose";

fn build_cli_args() -> Command {
    Command::new("g3perfc")
        .arg(
            Arg::new(GLOBAL_ARG_COMPLETION)
                .num_args(1)
                .value_name("SHELL")
                .long("completion")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_CONFIG)
                .help("yaml config file")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_parser(value_parser!(PathBuf))
                .long(GLOBAL_ARG_CONFIG)
                .short('c')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_FILE)
                .help("performance counter file")
                .num_args(1)
                .value_name("FILE PATH")
                .value_parser(value_parser!(PathBuf))
                .long(GLOBAL_ARG_FILE)
                .short('f')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_DELIMITER)
                .help("field delimiter")
                .num_args(1)
                .value_name("CHAR")
                .value_parser(value_parser!(char))
                .long(GLOBAL_ARG_DELIMITER)
                .short('d')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_VERBOSE)
                .help("show verbose message")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .global(true),
        )
        .subcommand(cmd_list::command())
        .subcommand(cmd_get::command())
        .subcommand(cmd_known::command())
}

fn build_store_config(args: &ArgMatches) -> anyhow::Result<StoreConfig> {
    let mut config = match args.get_one::<PathBuf>(GLOBAL_ARG_CONFIG) {
        Some(file) => StoreConfig::load_yaml_file(file)?,
        None => StoreConfig::default(),
    };
    if let Some(path) = args.get_one::<PathBuf>(GLOBAL_ARG_FILE) {
        config.set_path(path.clone());
    }
    if let Some(c) = args.get_one::<char>(GLOBAL_ARG_DELIMITER) {
        let delimiter =
            u8::try_from(*c).map_err(|_| anyhow!("delimiter {c:?} is not an ascii char"))?;
        config.set_delimiter(delimiter)?;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = build_cli_args().get_matches();

    if let Some(target) = args.get_one::<Shell>(GLOBAL_ARG_COMPLETION) {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let verbose_level = args
        .get_one::<u8>(GLOBAL_ARG_VERBOSE)
        .copied()
        .unwrap_or_default();
    logger::SyncLogger::new(verbose_level)
        .into_global_logger()
        .map_err(|e| anyhow!("failed to setup logger: {e}"))?;

    let config = build_store_config(&args)?;
    let Some((subcommand, args)) = args.subcommand() else {
        return Err(anyhow!("no subcommand found"));
    };

    info!("using performance counter file {}", config.path().display());
    let mut store = CounterStore::open(config);
    store.reload().map_err(|e| {
        anyhow!(
            "failed to load performance counters from {}: {e}",
            store.config().path().display()
        )
    })?;

    match subcommand {
        cmd_list::COMMAND => cmd_list::run(&store, args),
        cmd_get::COMMAND => cmd_get::run(&store, args),
        cmd_known::COMMAND => cmd_known::run(&store, args),
        cmd => Err(anyhow!("invalid subcommand {cmd}")),
    }
}
