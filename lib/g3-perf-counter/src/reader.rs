/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io::{self, BufRead};

use atoi::FromRadix10SignedChecked;
use memchr::{memchr, memchr2};

use crate::{BoundedText, FormatError, ReadError};

/// Largest string field capacity the reader accepts.
pub const STR_BUF_MAX: usize = 256;

pub const DEFAULT_DELIMITER: u8 = b';';

struct Numeral {
    buf: Vec<u8>,
}

impl Numeral {
    fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn has_digit(&self) -> bool {
        self.as_bytes().iter().any(u8::is_ascii_digit)
    }
}

/// Forward only field tokenizer over a buffered byte stream.
pub struct FieldReader<R> {
    inner: R,
    delimiter: u8,
}

impl<R: BufRead> FieldReader<R> {
    pub fn new(inner: R, delimiter: u8) -> Self {
        FieldReader { inner, delimiter }
    }

    #[inline]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        loop {
            match self.inner.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        // already buffered, no more io here
        self.inner.fill_buf()
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        Ok(self.fill_buf()?.first().copied())
    }

    #[inline]
    fn bump(&mut self) {
        self.inner.consume(1);
    }

    /// Skip ASCII whitespace, the delimiter is never skipped.
    pub fn skip_whitespace(&mut self) -> io::Result<()> {
        let delimiter = self.delimiter;
        loop {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            let n = buf
                .iter()
                .take_while(|b| b.is_ascii_whitespace() && **b != delimiter)
                .count();
            let drained = n == buf.len();
            self.inner.consume(n);
            if !drained {
                return Ok(());
            }
        }
    }

    /// Check if only whitespace is left in the stream.
    pub fn at_eof(&mut self) -> io::Result<bool> {
        self.skip_whitespace()?;
        Ok(self.fill_buf()?.is_empty())
    }

    /// Discard one `\n` or `\r\n` if present.
    pub fn discard_line_end(&mut self) -> io::Result<()> {
        if self.peek()? == Some(b'\r') {
            self.bump();
        }
        if self.peek()? == Some(b'\n') {
            self.bump();
        }
        Ok(())
    }

    pub fn read_separator(&mut self, strict: bool) -> Result<(), ReadError> {
        if strict {
            return match self.peek()? {
                Some(b) if b == self.delimiter => {
                    self.bump();
                    Ok(())
                }
                Some(b) => Err(FormatError::NoDelimiter(b).into()),
                None => Err(FormatError::UnexpectedEof.into()),
            };
        }

        let delimiter = self.delimiter;
        loop {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                return Err(FormatError::UnexpectedEof.into());
            }
            match memchr(delimiter, buf) {
                Some(pos) => {
                    self.inner.consume(pos + 1);
                    return Ok(());
                }
                None => {
                    let len = buf.len();
                    self.inner.consume(len);
                }
            }
        }
    }

    fn read_numeral(&mut self, float: bool) -> Result<Numeral, ReadError> {
        self.skip_whitespace()?;

        let mut n = Numeral { buf: Vec::new() };
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(b) = self.peek()? {
            let prev = n.as_bytes().last().copied();
            let accept = match b {
                b'0'..=b'9' => true,
                b'+' | b'-' => prev.is_none() || (float && matches!(prev, Some(b'e' | b'E'))),
                b'.' => float && !seen_dot && !seen_exp,
                b'e' | b'E' => float && !seen_exp && n.has_digit(),
                _ => false,
            };
            if !accept {
                break;
            }
            seen_dot |= b == b'.';
            seen_exp |= matches!(b, b'e' | b'E');
            n.buf.push(b);
            self.bump();
        }

        if n.buf.is_empty() {
            return if self.peek()?.is_none() {
                Err(FormatError::UnexpectedEof.into())
            } else {
                Err(FormatError::InvalidNumber.into())
            };
        }
        if !n.has_digit() {
            return Err(FormatError::InvalidNumber.into());
        }
        Ok(n)
    }

    fn read_signed<T: FromRadix10SignedChecked>(&mut self) -> Result<T, ReadError> {
        let n = self.read_numeral(false)?;
        let token = n.as_bytes();
        match T::from_radix_10_signed_checked(token) {
            (Some(v), used) if used == token.len() => Ok(v),
            _ => Err(FormatError::InvalidNumber.into()),
        }
    }

    /// Read a decimal `i32` followed strictly by the delimiter.
    pub fn read_int(&mut self) -> Result<i32, ReadError> {
        let v = self.read_signed::<i32>()?;
        self.read_separator(true)?;
        Ok(v)
    }

    /// Read a decimal `i64` followed strictly by the delimiter.
    pub fn read_int64(&mut self) -> Result<i64, ReadError> {
        let v = self.read_signed::<i64>()?;
        self.read_separator(true)?;
        Ok(v)
    }

    /// Read a decimal `u32` followed strictly by the delimiter.
    ///
    /// Negative values are rejected.
    pub fn read_uint(&mut self) -> Result<u32, ReadError> {
        let v = self.read_signed::<i64>()?;
        let v = u32::try_from(v).map_err(|_| FormatError::InvalidNumber)?;
        self.read_separator(true)?;
        Ok(v)
    }

    /// Read a floating point literal followed strictly by the delimiter.
    pub fn read_double(&mut self) -> Result<f64, ReadError> {
        let n = self.read_numeral(true)?;
        let v = std::str::from_utf8(n.as_bytes())
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(FormatError::InvalidNumber)?;
        self.read_separator(true)?;
        Ok(v)
    }

    /// Read a string field of at most `max_size - 1` bytes.
    ///
    /// The field ends at the delimiter, which is consumed. If the size limit is
    /// hit first, the rest of the field is discarded.
    pub fn read_str(&mut self, max_size: usize) -> Result<Vec<u8>, ReadError> {
        self.read_bytes(max_size, false)
    }

    pub fn read_text<const MAX: usize>(&mut self) -> Result<BoundedText<MAX>, ReadError> {
        self.read_str(MAX).map(BoundedText::from_vec)
    }

    /// Read the last field of a record.
    ///
    /// It may also end at a line end, which is left in the stream, or at the end
    /// of input.
    pub fn read_tail_text<const MAX: usize>(&mut self) -> Result<BoundedText<MAX>, ReadError> {
        self.read_bytes(MAX, true).map(BoundedText::from_vec)
    }

    fn read_bytes(&mut self, max_size: usize, tail: bool) -> Result<Vec<u8>, ReadError> {
        if max_size > STR_BUF_MAX {
            return Err(FormatError::CapacityTooLarge(max_size).into());
        }
        let limit = max_size.saturating_sub(1);
        let delimiter = self.delimiter;

        let mut out = Vec::with_capacity(limit.min(32));
        while out.len() < limit {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                return if tail {
                    Ok(out)
                } else {
                    Err(FormatError::UnexpectedEof.into())
                };
            }

            let take = buf.len().min(limit - out.len());
            let found = if tail {
                memchr2(delimiter, b'\n', &buf[..take])
            } else {
                memchr(delimiter, &buf[..take])
            };
            match found {
                Some(pos) => {
                    let hit = buf[pos];
                    out.extend_from_slice(&buf[..pos]);
                    if hit == delimiter {
                        self.inner.consume(pos + 1);
                    } else {
                        self.inner.consume(pos);
                        if out.last() == Some(&b'\r') {
                            out.pop();
                        }
                    }
                    return Ok(out);
                }
                None => {
                    out.extend_from_slice(&buf[..take]);
                    self.inner.consume(take);
                }
            }
        }

        if tail {
            // the window may end right between `\r` and `\n`
            if out.last() == Some(&b'\r') && self.peek()? == Some(b'\n') {
                out.pop();
            }
            self.skip_tail()?;
        } else {
            self.read_separator(false)?;
        }
        Ok(out)
    }

    fn skip_tail(&mut self) -> io::Result<()> {
        let delimiter = self.delimiter;
        loop {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            match memchr2(delimiter, b'\n', buf) {
                Some(pos) => {
                    let hit = buf[pos];
                    if hit == delimiter {
                        self.inner.consume(pos + 1);
                    } else {
                        self.inner.consume(pos);
                    }
                    return Ok(());
                }
                None => {
                    let len = buf.len();
                    self.inner.consume(len);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn reader(data: &[u8]) -> FieldReader<&[u8]> {
        FieldReader::new(data, DEFAULT_DELIMITER)
    }

    fn small_reader(data: &[u8]) -> FieldReader<BufReader<&[u8]>> {
        FieldReader::new(BufReader::with_capacity(3, data), DEFAULT_DELIMITER)
    }

    fn format_err<T: std::fmt::Debug>(r: Result<T, ReadError>) -> FormatError {
        match r {
            Err(ReadError::Format(e)) => e,
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn int_fields() {
        let mut r = reader(b"42;-7; +3;\n 9;");
        assert_eq!(r.read_int().unwrap(), 42);
        assert_eq!(r.read_int().unwrap(), -7);
        assert_eq!(r.read_int().unwrap(), 3);
        assert_eq!(r.read_int().unwrap(), 9);
        assert!(r.at_eof().unwrap());
    }

    #[test]
    fn int_strict_separator() {
        let mut r = reader(b"42x;");
        assert_eq!(format_err(r.read_int()), FormatError::NoDelimiter(b'x'));

        let mut r = reader(b"42");
        assert_eq!(format_err(r.read_int()), FormatError::UnexpectedEof);

        let mut r = reader(b"42 ;");
        assert_eq!(format_err(r.read_int()), FormatError::NoDelimiter(b' '));
    }

    #[test]
    fn int_invalid() {
        let mut r = reader(b"abc;");
        assert_eq!(format_err(r.read_int()), FormatError::InvalidNumber);

        let mut r = reader(b";");
        assert_eq!(format_err(r.read_int()), FormatError::InvalidNumber);

        let mut r = reader(b"-;");
        assert_eq!(format_err(r.read_int()), FormatError::InvalidNumber);

        let mut r = reader(b"2147483648;");
        assert_eq!(format_err(r.read_int()), FormatError::InvalidNumber);

        let mut r = reader(b"   ");
        assert_eq!(format_err(r.read_int()), FormatError::UnexpectedEof);
    }

    #[test]
    fn int64_and_uint() {
        let mut r = reader(b"9223372036854775807;-1000000000000;60;");
        assert_eq!(r.read_int64().unwrap(), i64::MAX);
        assert_eq!(r.read_int64().unwrap(), -1_000_000_000_000);
        assert_eq!(r.read_uint().unwrap(), 60);

        let mut r = reader(b"-1;");
        assert_eq!(format_err(r.read_uint()), FormatError::InvalidNumber);

        let mut r = reader(b"4294967296;");
        assert_eq!(format_err(r.read_uint()), FormatError::InvalidNumber);
    }

    #[test]
    fn double_fields() {
        let mut r = reader(b"3.5;-0.25;1e3;2.5E-1;.5;7.;+4;");
        assert_eq!(r.read_double().unwrap(), 3.5);
        assert_eq!(r.read_double().unwrap(), -0.25);
        assert_eq!(r.read_double().unwrap(), 1000.0);
        assert_eq!(r.read_double().unwrap(), 0.25);
        assert_eq!(r.read_double().unwrap(), 0.5);
        assert_eq!(r.read_double().unwrap(), 7.0);
        assert_eq!(r.read_double().unwrap(), 4.0);

        let mut r = reader(b"1.5.2;");
        assert_eq!(format_err(r.read_double()), FormatError::NoDelimiter(b'.'));

        let mut r = reader(b"1e;");
        assert_eq!(format_err(r.read_double()), FormatError::InvalidNumber);

        let mut r = reader(b".;");
        assert_eq!(format_err(r.read_double()), FormatError::InvalidNumber);
    }

    #[test]
    fn double_precision() {
        let v = 0.1f64 + 0.2f64;
        let s = format!("{v};");
        let mut r = reader(s.as_bytes());
        assert_eq!(r.read_double().unwrap(), v);
    }

    #[test]
    fn str_fields() {
        let mut r = small_reader(b"cpu;Current Hw Frequency;;");
        assert_eq!(r.read_str(64).unwrap(), b"cpu");
        assert_eq!(r.read_str(128).unwrap(), b"Current Hw Frequency");
        assert_eq!(r.read_str(64).unwrap(), b"");
        assert!(r.at_eof().unwrap());
    }

    #[test]
    fn str_truncate() {
        let mut r = small_reader(b"abcdefgh;next;");
        assert_eq!(r.read_str(4).unwrap(), b"abc");
        assert_eq!(r.read_str(8).unwrap(), b"next");

        // exactly at the limit, the delimiter is found by the non-strict search
        let mut r = small_reader(b"abc;next;");
        assert_eq!(r.read_str(4).unwrap(), b"abc");
        assert_eq!(r.read_str(8).unwrap(), b"next");
    }

    #[test]
    fn str_eof() {
        let mut r = reader(b"abc");
        assert_eq!(format_err(r.read_str(64)), FormatError::UnexpectedEof);

        let mut r = reader(b"abcdefgh");
        assert_eq!(format_err(r.read_str(4)), FormatError::UnexpectedEof);
    }

    #[test]
    fn str_capacity_limit() {
        let mut r = reader(b"abc;");
        assert_eq!(
            format_err(r.read_str(STR_BUF_MAX + 1)),
            FormatError::CapacityTooLarge(STR_BUF_MAX + 1)
        );
        assert_eq!(r.read_str(STR_BUF_MAX).unwrap(), b"abc");
    }

    #[test]
    fn tail_text() {
        let mut r = small_reader(b"myhost\nnext;");
        let t = r.read_tail_text::<128>().unwrap();
        assert_eq!(t, "myhost");
        r.discard_line_end().unwrap();
        assert_eq!(r.read_str(64).unwrap(), b"next");

        let mut r = small_reader(b"myhost;\r\n");
        assert_eq!(r.read_tail_text::<128>().unwrap(), "myhost");
        r.discard_line_end().unwrap();
        assert!(r.at_eof().unwrap());

        let mut r = small_reader(b"myhost\r\n");
        assert_eq!(r.read_tail_text::<128>().unwrap(), "myhost");
        r.discard_line_end().unwrap();
        assert!(r.at_eof().unwrap());

        let mut r = small_reader(b"myhost");
        assert_eq!(r.read_tail_text::<128>().unwrap(), "myhost");
        assert!(r.at_eof().unwrap());

        let mut r = small_reader(b"0123456789\n1;");
        assert_eq!(r.read_tail_text::<5>().unwrap(), "0123");
        r.discard_line_end().unwrap();
        assert_eq!(r.read_int().unwrap(), 1);
    }

    #[test]
    fn tail_text_cr_at_limit() {
        let mut r = small_reader(b"012\r\n1;");
        assert_eq!(r.read_tail_text::<5>().unwrap(), "012");
        r.discard_line_end().unwrap();
        assert_eq!(r.read_int().unwrap(), 1);

        let host = "h".repeat(126);
        let data = format!("{host}\r\n");
        let mut r = reader(data.as_bytes());
        let t = r.read_tail_text::<128>().unwrap();
        assert_eq!(t.len(), 126);
        assert_eq!(t.as_bytes().last(), Some(&b'h'));
        r.discard_line_end().unwrap();
        assert!(r.at_eof().unwrap());

        // a `\r` inside a truncated field is kept
        let mut r = small_reader(b"012\rx\r\n");
        assert_eq!(r.read_tail_text::<5>().unwrap().as_bytes(), b"012\r");
        r.discard_line_end().unwrap();
        assert!(r.at_eof().unwrap());
    }

    #[test]
    fn long_numerals() {
        let data = format!("{}42;", "0".repeat(70));
        let mut r = small_reader(data.as_bytes());
        assert_eq!(r.read_int().unwrap(), 42);

        let data = format!("-{}7;", "0".repeat(300));
        let mut r = small_reader(data.as_bytes());
        assert_eq!(r.read_int64().unwrap(), -7);

        let data = format!("0.{}5;", "0".repeat(100));
        let mut r = reader(data.as_bytes());
        assert_eq!(r.read_double().unwrap(), 5e-101);

        let data = format!("1{};", "0".repeat(80));
        let mut r = reader(data.as_bytes());
        assert_eq!(format_err(r.read_int64()), FormatError::InvalidNumber);
    }

    #[test]
    fn separator() {
        let mut r = reader(b";x;");
        r.read_separator(true).unwrap();
        assert_eq!(format_err(r.read_separator(true)), FormatError::NoDelimiter(b'x'));
        r.read_separator(false).unwrap();
        assert_eq!(format_err(r.read_separator(false)), FormatError::UnexpectedEof);

        let mut r = small_reader(b"skipped value;42;");
        r.read_separator(false).unwrap();
        assert_eq!(r.read_int().unwrap(), 42);
    }

    #[test]
    fn custom_delimiter() {
        let mut r = FieldReader::new(&b"1|cpu|3.5|"[..], b'|');
        assert_eq!(r.delimiter(), b'|');
        assert_eq!(r.read_int().unwrap(), 1);
        assert_eq!(r.read_str(64).unwrap(), b"cpu");
        assert_eq!(r.read_double().unwrap(), 3.5);

        let mut r = FieldReader::new(&b"1\tcpu\t"[..], b'\t');
        assert_eq!(r.read_int().unwrap(), 1);
        assert_eq!(r.read_str(64).unwrap(), b"cpu");
    }
}
