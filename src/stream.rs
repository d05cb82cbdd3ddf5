use std::io::{self, BufRead, ErrorKind, Read};

const CHUNK_SIZE: usize = 8 * 1024;

/// Buffered reader that can look ahead without consuming.
///
/// Bytes returned by [`LookaheadReader::peek`] stay in the buffer and are
/// handed out again by the next `read`/`read_line`, which gives the same
/// guarantees as a mark followed by a reset.
pub struct LookaheadReader<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    consumed: u64,
}

impl<R: Read> LookaheadReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            pos: 0,
            consumed: 0,
        }
    }

    /// Return up to `len` upcoming bytes without advancing the read position.
    ///
    /// Fewer bytes are returned only when the underlying reader is exhausted.
    /// The buffer grows one chunk at a time, so a large `len` costs no more
    /// memory than the stream actually holds.
    pub fn peek(&mut self, len: usize) -> io::Result<&[u8]> {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        }

        while self.buf.len() - self.pos < len {
            let start = self.buf.len();
            let wanted = (len - (start - self.pos)).min(CHUNK_SIZE);
            self.buf.resize(start + wanted, 0);
            match self.inner.read(&mut self.buf[start..]) {
                Ok(0) => {
                    self.buf.truncate(start);
                    break;
                }
                Ok(n) => self.buf.truncate(start + n),
                Err(e) if e.kind() == ErrorKind::Interrupted => self.buf.truncate(start),
                Err(e) => {
                    self.buf.truncate(start);
                    return Err(e);
                }
            }
        }

        let end = self.pos.saturating_add(len).min(self.buf.len());
        Ok(&self.buf[self.pos..end])
    }

    /// Number of bytes consumed so far. Peeking never changes it.
    pub fn position(&self) -> u64 {
        self.consumed
    }
}

impl<R: Read> Read for LookaheadReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for LookaheadReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.buf.len() {
            self.buf.clear();
            self.pos = 0;
            self.buf.resize(CHUNK_SIZE, 0);
            let read = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.buf.clear();
                        return Err(e);
                    }
                }
            };
            self.buf.truncate(read);
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        let amt = amt.min(self.buf.len() - self.pos);
        self.pos += amt;
        self.consumed += amt as u64;
    }
}
