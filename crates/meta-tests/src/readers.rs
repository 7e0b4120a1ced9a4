//! Readers with awkward but legal behavior
//!
//! Real sources (sockets, pipes, decompressors) return short reads and get
//! interrupted. These wrappers reproduce that deterministically.

use std::io::{self, Read};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Returns between 1 and `max_read` bytes per call and is occasionally interrupted
#[derive(Debug)]
pub struct TrickleReader<R> {
    inner: R,
    rng: ChaCha8Rng,
    max_read: usize,
    interrupt_every: usize,
    calls: usize,
}

impl<R: Read> TrickleReader<R> {
    /// Wrap `inner`; the same seed gives the same read pattern
    pub fn new(inner: R, seed: u64, max_read: usize) -> Self {
        Self {
            inner,
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_read: max_read.max(1),
            interrupt_every: 7,
            calls: 0,
        }
    }

    /// Total calls to `read` so far, including interrupted ones
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl<R: Read> Read for TrickleReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls % self.interrupt_every == 0 {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let n = self.rng.gen_range(1..=self.max_read).min(buf.len());
        self.inner.read(&mut buf[..n])
    }
}

/// Fails with `kind` once `limit` bytes have been read
#[derive(Debug)]
pub struct FailAfter<R> {
    inner: R,
    remaining: usize,
    kind: io::ErrorKind,
}

impl<R: Read> FailAfter<R> {
    /// Wrap `inner`
    pub fn new(inner: R, limit: usize, kind: io::ErrorKind) -> Self {
        Self {
            inner,
            remaining: limit,
            kind,
        }
    }
}

impl<R: Read> Read for FailAfter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::new(self.kind, "injected failure"));
        }
        let n = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..n])?;
        self.remaining -= n;
        Ok(n)
    }
}

/// Counts the bytes pulled through it
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    count: usize,
}

impl<R: Read> CountingReader<R> {
    /// Wrap `inner`
    pub fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    /// Bytes read so far
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n;
        Ok(n)
    }
}
