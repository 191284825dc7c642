/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::fmt;

/// Byte string limited to `MAX - 1` bytes.
///
/// `MAX` is the size of the matching fixed buffer in the file producer, which
/// also holds the trailing NUL. Content is kept byte for byte, it is not
/// required to be valid UTF-8.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedText<const MAX: usize> {
    buf: Vec<u8>,
}

impl<const MAX: usize> BoundedText<MAX> {
    pub const CAPACITY: usize = MAX - 1;

    /// Build from `bytes`, dropping everything past the capacity.
    pub fn truncate_from(bytes: &[u8]) -> Self {
        let len = bytes.len().min(Self::CAPACITY);
        BoundedText {
            buf: bytes[..len].to_vec(),
        }
    }

    pub(crate) fn from_vec(mut buf: Vec<u8>) -> Self {
        buf.truncate(Self::CAPACITY);
        BoundedText { buf }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.buf.len() == Self::CAPACITY
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.buf).ok()
    }

    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buf)
    }
}

impl<const MAX: usize> PartialEq<str> for BoundedText<MAX> {
    fn eq(&self, other: &str) -> bool {
        self.buf == other.as_bytes()
    }
}

impl<const MAX: usize> PartialEq<&str> for BoundedText<MAX> {
    fn eq(&self, other: &&str) -> bool {
        self.buf == other.as_bytes()
    }
}

impl<const MAX: usize> From<&str> for BoundedText<MAX> {
    fn from(s: &str) -> Self {
        BoundedText::truncate_from(s.as_bytes())
    }
}

impl<const MAX: usize> fmt::Debug for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_str_lossy(), f)
    }
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}
