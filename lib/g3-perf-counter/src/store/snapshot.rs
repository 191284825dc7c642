/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io::BufRead;

use crate::parser::{RecordError, parse_record};
use crate::reader::FieldReader;
use crate::{CounterRecord, PerfError, ReadError};

/// Records of one reload, in file order, and the first error met while loading.
#[derive(Clone, Debug)]
pub struct Snapshot {
    records: Vec<CounterRecord>,
    capacity: usize,
    status: Option<PerfError>,
}

impl Snapshot {
    pub fn new(capacity: usize) -> Self {
        Snapshot {
            records: Vec::with_capacity(capacity),
            capacity,
            status: None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.status = None;
    }

    pub(crate) fn fail(&mut self, e: PerfError) -> Result<(), PerfError> {
        self.status = Some(e.clone());
        Err(e)
    }

    /// Replace the content by records parsed from `stream`.
    ///
    /// Parsing stops at the first error, only complete records are kept.
    pub(crate) fn load<R: BufRead>(
        &mut self,
        stream: R,
        delimiter: u8,
        source: &str,
    ) -> Result<(), PerfError> {
        self.clear();

        let mut reader = FieldReader::new(stream, delimiter);
        loop {
            match reader.at_eof() {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => {
                    return self.fail(PerfError::io(format!("failed to read {source}: {e}"), &e));
                }
            }

            if self.records.len() >= self.capacity {
                return self.fail(PerfError::BufferOverflow(self.capacity));
            }

            let record_no = self.records.len() + 1;
            match parse_record(&mut reader) {
                Ok(record) => self.records.push(record),
                Err(RecordError {
                    field,
                    source: ReadError::Format(cause),
                }) => {
                    return self.fail(PerfError::BadFormat {
                        record: record_no,
                        field,
                        cause,
                    });
                }
                Err(RecordError {
                    source: ReadError::Io(e),
                    ..
                }) => {
                    return self.fail(PerfError::io(
                        format!("failed to read record #{record_no} from {source}: {e}"),
                        &e,
                    ));
                }
            }
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of complete records, also after a failed load.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn status(&self) -> Option<&PerfError> {
        self.status.as_ref()
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status.is_none()
    }

    fn check_status(&self) -> Result<(), PerfError> {
        match &self.status {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Copy at most `max` records, nothing if the last load failed.
    pub fn all(&self, max: usize) -> Vec<CounterRecord> {
        if self.status.is_some() {
            return Vec::new();
        }
        self.records.iter().take(max).cloned().collect()
    }

    /// Find the last record with the given key.
    pub fn lookup(
        &self,
        type_name: &str,
        property_name: &str,
    ) -> Result<CounterRecord, PerfError> {
        self.check_status()?;
        self.records
            .iter()
            .rev()
            .find(|r| r.matches(type_name, property_name))
            .cloned()
            .ok_or(PerfError::NotFound)
    }

    /// Find the first `max` records with the given key, in file order.
    pub fn lookup_many(
        &self,
        type_name: &str,
        property_name: &str,
        max: usize,
    ) -> Result<Vec<CounterRecord>, PerfError> {
        self.check_status()?;
        let found: Vec<CounterRecord> = self
            .records
            .iter()
            .filter(|r| r.matches(type_name, property_name))
            .take(max)
            .cloned()
            .collect();
        if found.is_empty() {
            Err(PerfError::NotFound)
        } else {
            Ok(found)
        }
    }
}
