/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Snapshot store for the `;` delimited performance counter file written by
//! the enhanced monitoring agent.
//!
//! ```no_run
//! use g3_perf_counter::{CounterStore, StoreConfig, WellKnownCounters};
//!
//! let mut store = CounterStore::open(StoreConfig::default());
//! store.reload()?;
//! let record = store.cpu_current_hw_frequency()?;
//! println!("{:?}", record.value);
//! # Ok::<(), g3_perf_counter::PerfError>(())
//! ```

mod error;
pub use error::{CounterField, FormatError, PerfError, PerfErrorKind, ReadError};

mod text;
pub use text::BoundedText;

mod record;
pub use record::{
    CounterRecord, CounterType, CounterValue, INSTANCE_NAME_MAX, InstanceName, MACHINE_NAME_MAX,
    MachineName, PROPERTY_NAME_MAX, PropertyName, STRING_VALUE_MAX, StringValue, TYPE_NAME_MAX,
    TypeName, UNIT_NAME_MAX, UnitName,
};

pub mod reader;
mod parser;

mod config;
pub use config::{DEFAULT_PERF_COUNTER_FILE, PERF_COUNT_MAX, StoreConfig};

mod store;
pub use store::{CounterStore, SharedCounterStore, Snapshot};

mod query;
pub use query::CounterLookup;

mod metric;
pub use metric::{CounterKey, WellKnownCounters};
