/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use clap::{Arg, ArgMatches, Command, value_parser};

use g3_perf_counter::CounterStore;

pub(super) const COMMAND: &str = "list";

const COMMAND_ARG_MAX: &str = "max";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("List all records")
        .arg(
            Arg::new(COMMAND_ARG_MAX)
                .help("max number of records to print")
                .value_name("COUNT")
                .long(COMMAND_ARG_MAX)
                .num_args(1)
                .value_parser(value_parser!(usize)),
        )
        .arg(super::output::json_arg())
}

pub(super) fn run(store: &CounterStore, args: &ArgMatches) -> anyhow::Result<()> {
    let max = args
        .get_one::<usize>(COMMAND_ARG_MAX)
        .copied()
        .unwrap_or_else(|| store.snapshot().capacity());
    let records = store.all(max);
    super::output::print_records(args, &records)
}
