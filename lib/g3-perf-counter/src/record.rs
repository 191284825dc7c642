/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use crate::BoundedText;

pub const TYPE_NAME_MAX: usize = 64;
pub const PROPERTY_NAME_MAX: usize = 128;
pub const INSTANCE_NAME_MAX: usize = 256;
pub const STRING_VALUE_MAX: usize = 256;
pub const UNIT_NAME_MAX: usize = 64;
pub const MACHINE_NAME_MAX: usize = 128;

pub type TypeName = BoundedText<TYPE_NAME_MAX>;
pub type PropertyName = BoundedText<PROPERTY_NAME_MAX>;
pub type InstanceName = BoundedText<INSTANCE_NAME_MAX>;
pub type StringValue = BoundedText<STRING_VALUE_MAX>;
pub type UnitName = BoundedText<UNIT_NAME_MAX>;
pub type MachineName = BoundedText<MACHINE_NAME_MAX>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CounterType {
    #[default]
    Invalid,
    Int,
    Double,
    Large,
    String,
}

impl CounterType {
    /// Unknown codes are mapped to [`CounterType::Invalid`].
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => CounterType::Int,
            2 => CounterType::Double,
            3 => CounterType::Large,
            4 => CounterType::String,
            _ => CounterType::Invalid,
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            CounterType::Invalid => 0,
            CounterType::Int => 1,
            CounterType::Double => 2,
            CounterType::Large => 3,
            CounterType::String => 4,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CounterType::Invalid => "invalid",
            CounterType::Int => "int",
            CounterType::Double => "double",
            CounterType::Large => "large",
            CounterType::String => "string",
        }
    }
}

impl fmt::Display for CounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CounterValue {
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(StringValue),
}

impl CounterValue {
    pub fn counter_type(&self) -> CounterType {
        match self {
            CounterValue::Int32(_) => CounterType::Int,
            CounterValue::Int64(_) => CounterType::Large,
            CounterValue::Double(_) => CounterType::Double,
            CounterValue::String(_) => CounterType::String,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CounterValue::Int32(v) => Some(i64::from(*v)),
            CounterValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CounterValue::Int32(v) => Some(f64::from(*v)),
            CounterValue::Int64(v) => Some(*v as f64),
            CounterValue::Double(v) => Some(*v),
            CounterValue::String(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&StringValue> {
        match self {
            CounterValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CounterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterValue::Int32(v) => write!(f, "{v}"),
            CounterValue::Int64(v) => write!(f, "{v}"),
            CounterValue::Double(v) => write!(f, "{v}"),
            CounterValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// One line of the performance counter file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CounterRecord {
    pub counter_type: CounterType,
    pub type_name: TypeName,
    pub property_name: PropertyName,
    pub instance_name: InstanceName,
    pub is_empty: bool,
    /// Set only if the record is not empty and has a known counter type.
    pub value: Option<CounterValue>,
    pub unit_name: UnitName,
    pub refresh_interval: u32,
    pub timestamp: i64,
    pub machine_name: MachineName,
}

impl CounterRecord {
    /// Exact byte comparison of the `(type_name, property_name)` key.
    pub fn matches(&self, type_name: &str, property_name: &str) -> bool {
        self.type_name.as_bytes() == type_name.as_bytes()
            && self.property_name.as_bytes() == property_name.as_bytes()
    }
}
