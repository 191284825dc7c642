/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io::BufRead;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;

use super::{READER_SOURCE, Snapshot};
use crate::{CounterRecord, PerfError, StoreConfig};

/// Performance counter store that can be shared between threads.
///
/// Each reload parses into a new snapshot and publishes it at once, readers
/// keep using the snapshot they loaded until they load again.
pub struct SharedCounterStore {
    config: StoreConfig,
    current: ArcSwap<Snapshot>,
    reload_lock: Mutex<()>,
}

impl Default for SharedCounterStore {
    fn default() -> Self {
        SharedCounterStore::open(StoreConfig::default())
    }
}

impl SharedCounterStore {
    pub fn open(config: StoreConfig) -> Self {
        let snapshot = Snapshot::new(config.max_records());
        SharedCounterStore {
            config,
            current: ArcSwap::from_pointee(snapshot),
            reload_lock: Mutex::new(()),
        }
    }

    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock_reload(&self) -> MutexGuard<'_, ()> {
        self.reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish<F>(&self, load: F) -> Result<(), PerfError>
    where
        F: FnOnce(&mut Snapshot) -> Result<(), PerfError>,
    {
        let _guard = self.lock_reload();
        let mut snapshot = Snapshot::new(self.config.max_records());
        let r = load(&mut snapshot);
        self.current.store(Arc::new(snapshot));
        r
    }

    pub fn reload(&self) -> Result<(), PerfError> {
        self.publish(|snapshot| super::load_file(snapshot, &self.config))
    }

    pub fn reload_from<R: BufRead>(&self, stream: R) -> Result<(), PerfError> {
        self.publish(|snapshot| {
            super::load_stream(snapshot, stream, self.config.delimiter(), READER_SOURCE)
        })
    }

    /// Publish an empty snapshot.
    pub fn close(&self) {
        let _guard = self.lock_reload();
        let snapshot = Snapshot::new(self.config.max_records());
        self.current.store(Arc::new(snapshot));
    }

    /// Get the current snapshot, it will not change after return.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn status(&self) -> Option<PerfError> {
        self.current.load().status().cloned()
    }

    pub fn all(&self, max: usize) -> Vec<CounterRecord> {
        self.current.load().all(max)
    }

    pub fn lookup(
        &self,
        type_name: &str,
        property_name: &str,
    ) -> Result<CounterRecord, PerfError> {
        self.current.load().lookup(type_name, property_name)
    }

    pub fn lookup_many(
        &self,
        type_name: &str,
        property_name: &str,
        max: usize,
    ) -> Result<Vec<CounterRecord>, PerfError> {
        self.current
            .load()
            .lookup_many(type_name, property_name, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn line(instance: &str) -> String {
        format!("4;config;Cloud Provider;{instance};0;Microsoft Azure;;0;1;vm0\n")
    }

    #[test]
    fn publish_new_snapshot() {
        let store = SharedCounterStore::default();
        store.reload_from(line("old").as_bytes()).unwrap();
        let old = store.snapshot();

        store.reload_from(line("new").as_bytes()).unwrap();
        let r = old.lookup("config", "Cloud Provider").unwrap();
        assert_eq!(r.instance_name, "old");
        let r = store.lookup("config", "Cloud Provider").unwrap();
        assert_eq!(r.instance_name, "new");

        assert!(store.reload_from("x".as_bytes()).is_err());
        assert!(store.status().is_some());
        assert!(store.all(10).is_empty());
        assert_eq!(old.all(10).len(), 1);

        store.close();
        assert!(store.status().is_none());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn close_after_failure() {
        let store = SharedCounterStore::default();
        assert!(store.reload_from("1;cpu;".as_bytes()).is_err());
        let failed = store.snapshot();

        store.close();
        assert!(store.status().is_none());
        assert!(store.snapshot().is_empty());
        assert_eq!(store.snapshot().capacity(), store.config().max_records());
        assert!(failed.status().is_some());

        store.close();
        assert!(store.status().is_none());
        assert_eq!(
            store.lookup("config", "Cloud Provider"),
            Err(PerfError::NotFound)
        );
    }

    #[test]
    fn concurrent_readers() {
        let store = Arc::new(SharedCounterStore::default());
        let data = (0..64).map(|_| line("i")).collect::<String>();
        store.reload_from(data.as_bytes()).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let snapshot = store.snapshot();
                        if snapshot.is_ok() {
                            assert_eq!(snapshot.all(128).len(), snapshot.len());
                        }
                    }
                })
            })
            .collect();

        for i in 0..20 {
            let data = (0..=i).map(|_| line("i")).collect::<String>();
            store.reload_from(data.as_bytes()).unwrap();
        }

        for h in readers {
            h.join().unwrap();
        }
        assert_eq!(store.snapshot().len(), 20);
    }
}
