use std::io::{self, BufRead, ErrorKind, Read};
use std::marker::PhantomData;
use std::str::FromStr;

use byteorder::ByteOrder;
use byteorder::ReadBytesExt;

use crate::PlyError;

/// Sequential reader for fixed-layout binary records.
pub struct BinValReader<R: BufRead, E: ByteOrder> {
    reader: R,
    _endian: PhantomData<E>,
}

impl<R: BufRead, E: ByteOrder> BinValReader<R, E> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            _endian: PhantomData,
        }
    }

    pub fn read_i32(&mut self) -> Result<i32, PlyError> {
        self.reader.read_i32::<E>().map_err(truncated)
    }

    pub fn read_f32(&mut self) -> Result<f32, PlyError> {
        self.reader.read_f32::<E>().map_err(truncated)
    }

    /// Discard exactly `len` bytes.
    pub fn skip(&mut self, len: u64) -> Result<(), PlyError> {
        let skipped = io::copy(&mut (&mut self.reader).take(len), &mut io::sink())?;
        if skipped < len {
            return Err(PlyError::Truncated);
        }
        Ok(())
    }

    /// Whether any unread bytes remain in the stream.
    pub fn has_remaining(&mut self) -> Result<bool, PlyError> {
        Ok(!self.reader.fill_buf()?.is_empty())
    }
}

fn truncated(e: io::Error) -> PlyError {
    if e.kind() == ErrorKind::UnexpectedEof {
        PlyError::Truncated
    } else {
        PlyError::Io(e)
    }
}

/// One whitespace-separated data row of the text format.
pub struct AsciiRow<'a> {
    text: &'a str,
    tokens: Vec<&'a str>,
    line: usize,
}

impl<'a> AsciiRow<'a> {
    pub fn new(text: &'a str, line: usize) -> Self {
        Self {
            text,
            tokens: text.split_whitespace().collect(),
            line,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, column: usize) -> Result<&'a str, PlyError> {
        self.tokens
            .get(column)
            .copied()
            .ok_or(PlyError::MissingColumn {
                line: self.line,
                column,
            })
    }

    pub fn read_f32(&self, column: usize) -> Result<f32, PlyError> {
        Ok(self.token(column)?.parse::<f32>()?)
    }

    pub fn read_int<T>(&self, column: usize) -> Result<T, PlyError>
    where
        T: FromStr,
        PlyError: From<T::Err>,
    {
        Ok(self.token(column)?.parse::<T>()?)
    }
}
