/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};

use clap::{Arg, ArgAction, ArgMatches};
use serde_json::{Value, json};

use g3_perf_counter::{CounterRecord, CounterValue};

const COMMAND_ARG_JSON: &str = "json";

pub(crate) fn json_arg() -> Arg {
    Arg::new(COMMAND_ARG_JSON)
        .help("print records as json")
        .long(COMMAND_ARG_JSON)
        .num_args(0)
        .action(ArgAction::SetTrue)
}

fn value_to_json(value: &CounterValue) -> Value {
    match value {
        CounterValue::Int32(v) => json!(v),
        CounterValue::Int64(v) => json!(v),
        CounterValue::Double(v) => json!(v),
        CounterValue::String(s) => json!(s.to_str_lossy()),
    }
}

fn record_to_json(r: &CounterRecord) -> Value {
    json!({
        "counter_type": r.counter_type.as_str(),
        "type_name": r.type_name.to_str_lossy(),
        "property_name": r.property_name.to_str_lossy(),
        "instance_name": r.instance_name.to_str_lossy(),
        "is_empty": r.is_empty,
        "value": r.value.as_ref().map(value_to_json),
        "unit_name": r.unit_name.to_str_lossy(),
        "refresh_interval": r.refresh_interval,
        "timestamp": r.timestamp,
        "machine_name": r.machine_name.to_str_lossy(),
    })
}

fn write_text<W: Write>(w: &mut W, r: &CounterRecord) -> io::Result<()> {
    write!(w, "{}\\{}", r.type_name, r.property_name)?;
    if !r.instance_name.is_empty() {
        write!(w, " [{}]", r.instance_name)?;
    }
    match &r.value {
        Some(v) => write!(w, " = {v}")?,
        None => write!(w, " = <empty>")?,
    }
    if !r.unit_name.is_empty() {
        write!(w, " {}", r.unit_name)?;
    }
    writeln!(
        w,
        " (type {}, refresh {}s, timestamp {}, machine {})",
        r.counter_type, r.refresh_interval, r.timestamp, r.machine_name
    )
}

pub(crate) fn print_records(args: &ArgMatches, records: &[CounterRecord]) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if args.get_flag(COMMAND_ARG_JSON) {
        let list: Vec<Value> = records.iter().map(record_to_json).collect();
        serde_json::to_writer_pretty(&mut stdout, &list)?;
        writeln!(stdout)?;
    } else {
        for r in records {
            write_text(&mut stdout, r)?;
        }
    }
    Ok(())
}
