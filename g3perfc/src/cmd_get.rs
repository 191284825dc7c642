/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use clap::{Arg, ArgAction, ArgMatches, Command};

use g3_perf_counter::CounterStore;

pub(super) const COMMAND: &str = "get";

const COMMAND_ARG_TYPE: &str = "type";
const COMMAND_ARG_PROPERTY: &str = "property";
const COMMAND_ARG_ALL: &str = "all";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Get the record of a counter")
        .arg(
            Arg::new(COMMAND_ARG_TYPE)
                .value_name("TYPE")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_PROPERTY)
                .value_name("PROPERTY")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_ALL)
                .help("print all matched records")
                .long(COMMAND_ARG_ALL)
                .num_args(0)
                .action(ArgAction::SetTrue),
        )
        .arg(super::output::json_arg())
}

pub(super) fn run(store: &CounterStore, args: &ArgMatches) -> anyhow::Result<()> {
    let Some(type_name) = args.get_one::<String>(COMMAND_ARG_TYPE) else {
        return Err(anyhow!("no counter type set"));
    };
    let Some(property_name) = args.get_one::<String>(COMMAND_ARG_PROPERTY) else {
        return Err(anyhow!("no counter property set"));
    };

    let records = if args.get_flag(COMMAND_ARG_ALL) {
        store.lookup_many(type_name, property_name, store.config().max_records())
    } else {
        store.lookup(type_name, property_name).map(|r| vec![r])
    }
    .map_err(|e| anyhow!("failed to get {type_name}\\{property_name}: {e}"))?;

    super::output::print_records(args, &records)
}
