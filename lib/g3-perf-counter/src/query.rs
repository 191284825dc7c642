/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::{CounterKey, CounterRecord, CounterStore, PerfError, SharedCounterStore, Snapshot};

/// Keyed access to performance counter records.
pub trait CounterLookup {
    /// Get a copy of the last record with the given key.
    fn lookup(&self, type_name: &str, property_name: &str) -> Result<CounterRecord, PerfError>;

    fn lookup_key(&self, key: &CounterKey) -> Result<CounterRecord, PerfError> {
        self.lookup(key.type_name(), key.property_name())
    }
}

impl CounterLookup for Snapshot {
    fn lookup(&self, type_name: &str, property_name: &str) -> Result<CounterRecord, PerfError> {
        Snapshot::lookup(self, type_name, property_name)
    }
}

impl CounterLookup for CounterStore {
    fn lookup(&self, type_name: &str, property_name: &str) -> Result<CounterRecord, PerfError> {
        CounterStore::lookup(self, type_name, property_name)
    }
}

impl CounterLookup for SharedCounterStore {
    fn lookup(&self, type_name: &str, property_name: &str) -> Result<CounterRecord, PerfError> {
        SharedCounterStore::lookup(self, type_name, property_name)
    }
}
