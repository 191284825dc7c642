/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fs::File;
use std::io::{BufRead, BufReader};

use log::{debug, warn};

use crate::{CounterRecord, PerfError, StoreConfig};

mod snapshot;
pub use snapshot::Snapshot;

mod shared;
pub use shared::SharedCounterStore;

const READER_SOURCE: &str = "reader";

fn load_file(snapshot: &mut Snapshot, config: &StoreConfig) -> Result<(), PerfError> {
    let path = config.path();
    snapshot.clear();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            let e = PerfError::io(format!("failed to open file {}: {e}", path.display()), &e);
            warn!("performance counter reload failed: {e}");
            return snapshot.fail(e);
        }
    };

    let source = path.display().to_string();
    load_stream(snapshot, BufReader::new(file), config.delimiter(), &source)
}

fn load_stream<R: BufRead>(
    snapshot: &mut Snapshot,
    stream: R,
    delimiter: u8,
    source: &str,
) -> Result<(), PerfError> {
    match snapshot.load(stream, delimiter, source) {
        Ok(_) => {
            debug!(
                "loaded {} performance counters from {source}",
                snapshot.len()
            );
            Ok(())
        }
        Err(e) => {
            warn!(
                "performance counter reload from {source} failed after {} records: {e}",
                snapshot.len()
            );
            Err(e)
        }
    }
}

/// Single owner store of performance counters.
///
/// The table is replaced in place on reload, use [`SharedCounterStore`] if the
/// records should be read from other threads.
pub struct CounterStore {
    config: StoreConfig,
    snapshot: Snapshot,
}

impl Default for CounterStore {
    fn default() -> Self {
        CounterStore::open(StoreConfig::default())
    }
}

impl CounterStore {
    /// Create an empty store, the source is only opened on reload.
    pub fn open(config: StoreConfig) -> Self {
        let snapshot = Snapshot::new(config.max_records());
        CounterStore { config, snapshot }
    }

    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Reload all records from the configured file.
    ///
    /// On error the store keeps the records parsed before the failure, but
    /// [`CounterStore::all`] and the lookups will refuse to use them.
    pub fn reload(&mut self) -> Result<(), PerfError> {
        load_file(&mut self.snapshot, &self.config)
    }

    /// Reload all records from an already opened stream.
    pub fn reload_from<R: BufRead>(&mut self, stream: R) -> Result<(), PerfError> {
        load_stream(
            &mut self.snapshot,
            stream,
            self.config.delimiter(),
            READER_SOURCE,
        )
    }

    /// Drop all records and the error status.
    pub fn close(&mut self) {
        self.snapshot.clear();
    }

    #[inline]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[inline]
    pub fn status(&self) -> Option<&PerfError> {
        self.snapshot.status()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn all(&self, max: usize) -> Vec<CounterRecord> {
        self.snapshot.all(max)
    }

    pub fn lookup(
        &self,
        type_name: &str,
        property_name: &str,
    ) -> Result<CounterRecord, PerfError> {
        self.snapshot.lookup(type_name, property_name)
    }

    pub fn lookup_many(
        &self,
        type_name: &str,
        property_name: &str,
        max: usize,
    ) -> Result<Vec<CounterRecord>, PerfError> {
        self.snapshot.lookup_many(type_name, property_name, max)
    }
}
