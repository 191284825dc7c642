/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io::BufRead;

use crate::reader::FieldReader;
use crate::{CounterField, CounterRecord, CounterType, CounterValue, ReadError};

#[derive(Debug)]
pub(crate) struct RecordError {
    pub(crate) field: CounterField,
    pub(crate) source: ReadError,
}

trait FieldContext<T> {
    fn field(self, field: CounterField) -> Result<T, RecordError>;
}

impl<T> FieldContext<T> for Result<T, ReadError> {
    fn field(self, field: CounterField) -> Result<T, RecordError> {
        self.map_err(|source| RecordError { field, source })
    }
}

/// Parse one record, the stream should be positioned at its first field.
///
/// A single trailing line end is consumed after the last field.
pub(crate) fn parse_record<R: BufRead>(
    reader: &mut FieldReader<R>,
) -> Result<CounterRecord, RecordError> {
    let code = reader.read_int().field(CounterField::CounterType)?;
    let counter_type = CounterType::from_code(code);

    let type_name = reader.read_text().field(CounterField::TypeName)?;
    let property_name = reader.read_text().field(CounterField::PropertyName)?;
    let instance_name = reader.read_text().field(CounterField::InstanceName)?;
    let is_empty = reader.read_int().field(CounterField::IsEmptyFlag)? != 0;

    let value = if is_empty {
        skip_value(reader)?;
        None
    } else {
        match counter_type {
            CounterType::Int => Some(CounterValue::Int32(
                reader.read_int().field(CounterField::Value)?,
            )),
            CounterType::Large => Some(CounterValue::Int64(
                reader.read_int64().field(CounterField::Value)?,
            )),
            CounterType::Double => Some(CounterValue::Double(
                reader.read_double().field(CounterField::Value)?,
            )),
            CounterType::String => Some(CounterValue::String(
                reader.read_text().field(CounterField::Value)?,
            )),
            CounterType::Invalid => {
                skip_value(reader)?;
                None
            }
        }
    };

    let unit_name = reader.read_text().field(CounterField::UnitName)?;
    let refresh_interval = reader.read_uint().field(CounterField::RefreshInterval)?;
    let timestamp = reader.read_int64().field(CounterField::Timestamp)?;
    let machine_name = reader.read_tail_text().field(CounterField::MachineName)?;

    reader
        .discard_line_end()
        .map_err(ReadError::Io)
        .field(CounterField::MachineName)?;

    Ok(CounterRecord {
        counter_type,
        type_name,
        property_name,
        instance_name,
        is_empty,
        value,
        unit_name,
        refresh_interval,
        timestamp,
        machine_name,
    })
}

fn skip_value<R: BufRead>(reader: &mut FieldReader<R>) -> Result<(), RecordError> {
    reader.read_separator(false).field(CounterField::Value)
}
