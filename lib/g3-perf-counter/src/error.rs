/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io;

use thiserror::Error;

/// Grammar failures of the format reader.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("no valid numeral")]
    InvalidNumber,
    #[error("expected delimiter but found byte {0:#04x}")]
    NoDelimiter(u8),
    #[error("field capacity {0} exceeds the scratch buffer limit")]
    CapacityTooLarge(usize),
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Position of a field inside one record, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterField {
    CounterType,
    TypeName,
    PropertyName,
    InstanceName,
    IsEmptyFlag,
    Value,
    UnitName,
    RefreshInterval,
    Timestamp,
    MachineName,
}

impl CounterField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CounterField::CounterType => "counter type",
            CounterField::TypeName => "type name",
            CounterField::PropertyName => "property name",
            CounterField::InstanceName => "instance name",
            CounterField::IsEmptyFlag => "is empty flag",
            CounterField::Value => "value",
            CounterField::UnitName => "unit name",
            CounterField::RefreshInterval => "refresh interval",
            CounterField::Timestamp => "timestamp",
            CounterField::MachineName => "machine name",
        }
    }

    /// Legacy numeric status code of a bad field.
    ///
    /// The is-empty flag and the value share `-15`.
    pub const fn code(&self) -> i32 {
        match self {
            CounterField::CounterType => -11,
            CounterField::TypeName => -12,
            CounterField::PropertyName => -13,
            CounterField::InstanceName => -14,
            CounterField::IsEmptyFlag => -15,
            CounterField::Value => -15,
            CounterField::UnitName => -16,
            CounterField::RefreshInterval => -17,
            CounterField::Timestamp => -18,
            CounterField::MachineName => -19,
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerfErrorKind {
    NotFound,
    BufferOverflow,
    IoError,
    BadFormat,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PerfError {
    #[error("performance counter not found")]
    NotFound,
    #[error("too many performance counters, at most {0} can be loaded")]
    BufferOverflow(usize),
    #[error("{msg}")]
    IoError { msg: String, os_code: Option<i32> },
    #[error("invalid {field} in record #{record}: {cause}")]
    BadFormat {
        record: usize,
        field: CounterField,
        cause: FormatError,
    },
}

const EIO: i32 = 5;

impl PerfError {
    pub(crate) fn io(msg: String, e: &io::Error) -> Self {
        PerfError::IoError {
            msg,
            os_code: e.raw_os_error(),
        }
    }

    pub fn kind(&self) -> PerfErrorKind {
        match self {
            PerfError::NotFound => PerfErrorKind::NotFound,
            PerfError::BufferOverflow(_) => PerfErrorKind::BufferOverflow,
            PerfError::IoError { .. } => PerfErrorKind::IoError,
            PerfError::BadFormat { .. } => PerfErrorKind::BadFormat,
        }
    }

    /// Legacy numeric status code.
    ///
    /// I/O failures report the positive OS error number, like `errno`.
    pub fn code(&self) -> i32 {
        match self {
            PerfError::NotFound => -1,
            PerfError::BufferOverflow(_) => -2,
            PerfError::IoError { os_code, .. } => os_code.unwrap_or(EIO),
            PerfError::BadFormat { field, .. } => field.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_code() {
        assert_eq!(PerfError::NotFound.code(), -1);
        assert_eq!(PerfError::BufferOverflow(128).code(), -2);

        let e = PerfError::BadFormat {
            record: 3,
            field: CounterField::Timestamp,
            cause: FormatError::InvalidNumber,
        };
        assert_eq!(e.code(), -18);
        assert_eq!(e.kind(), PerfErrorKind::BadFormat);
        assert_eq!(
            e.to_string(),
            "invalid timestamp in record #3: no valid numeral"
        );

        let io_err = io::Error::from_raw_os_error(2);
        let e = PerfError::io("failed to open file /nonexistent".to_string(), &io_err);
        assert_eq!(e.code(), 2);
        assert_eq!(e.kind(), PerfErrorKind::IoError);

        let io_err = io::Error::other("broken");
        let e = PerfError::io("failed to read".to_string(), &io_err);
        assert_eq!(e.code(), EIO);
    }

    #[test]
    fn shared_value_code() {
        assert_eq!(
            CounterField::IsEmptyFlag.code(),
            CounterField::Value.code()
        );
    }
}
