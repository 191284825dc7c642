/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use clap::{ArgMatches, Command};
use log::debug;

use g3_perf_counter::{CounterKey, CounterLookup, CounterStore, PerfErrorKind};

pub(super) const COMMAND: &str = "known";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Print every well-known counter present")
        .arg(super::output::json_arg())
}

pub(super) fn run(store: &CounterStore, args: &ArgMatches) -> anyhow::Result<()> {
    let mut records = Vec::with_capacity(CounterKey::WELL_KNOWN.len());
    for key in CounterKey::WELL_KNOWN {
        match store.lookup_key(key) {
            Ok(r) => records.push(r),
            Err(e) if e.kind() == PerfErrorKind::NotFound => debug!("{key} not found"),
            Err(e) => return Err(e.into()),
        }
    }
    super::output::print_records(args, &records)
}
