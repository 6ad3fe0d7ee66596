//! Read-only byte window over a shared buffer
//!
//! A [`ByteWindow`] is an offset + length view into a [`Bytes`] buffer with its
//! own cursor. Decoded nodes keep a window over their value octets instead of a
//! copy, and constructed values hand out sub-windows to their children.

use asn1net_core::{Asn1Error, Asn1Result};
use bytes::Bytes;
use std::io::{self, SeekFrom};

/// Bounded view over a region of an immutable buffer
#[derive(Clone, PartialEq, Eq)]
pub struct ByteWindow {
    /// Shared buffer, already sliced to the window region
    buffer: Bytes,
    /// Cursor relative to the window start
    position: usize,
}

impl ByteWindow {
    /// Create a window over `len` bytes of `buffer` starting at `start`
    ///
    /// # Errors
    /// Returns `OutOfRange` if the region does not fit inside `buffer`.
    pub fn new(buffer: Bytes, start: usize, len: usize) -> Asn1Result<Self> {
        let end = start
            .checked_add(len)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| {
                Asn1Error::out_of_range(format!(
                    "Window {}+{} exceeds buffer of {} bytes",
                    start,
                    len,
                    buffer.len()
                ))
            })?;
        Ok(Self {
            buffer: buffer.slice(start..end),
            position: 0,
        })
    }

    /// Create a window spanning the whole buffer
    pub fn from_bytes(buffer: impl Into<Bytes>) -> Self {
        Self {
            buffer: buffer.into(),
            position: 0,
        }
    }

    /// Window length, fixed at construction
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Cursor position relative to the window start
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the window end
    pub fn remaining(&self) -> usize {
        self.len() - self.position
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.len()
    }

    /// Move the cursor
    ///
    /// # Errors
    /// Returns `OutOfRange` if the target lies before the start or past the end
    /// of the window. The cursor is left unchanged in that case.
    pub fn seek(&mut self, pos: SeekFrom) -> Asn1Result<usize> {
        let (base, offset) = match pos {
            SeekFrom::Start(offset) => (0i128, offset as i128),
            SeekFrom::Current(offset) => (self.position as i128, offset as i128),
            SeekFrom::End(offset) => (self.len() as i128, offset as i128),
        };
        let target = base + offset;
        if target < 0 || target > self.len() as i128 {
            return Err(Asn1Error::out_of_range(format!(
                "Seek to {} outside window of {} bytes",
                target,
                self.len()
            )));
        }
        self.position = target as usize;
        Ok(self.position)
    }

    /// Rewind the cursor to the window start
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Read up to `count` bytes, fewer only at the end of the window
    pub fn read(&mut self, count: usize) -> Bytes {
        let count = count.min(self.remaining());
        let start = self.position;
        self.position += count;
        self.buffer.slice(start..start + count)
    }

    /// Read exactly `count` bytes
    ///
    /// # Errors
    /// Returns `OutOfRange` if fewer than `count` bytes remain; nothing is consumed.
    pub fn read_exact(&mut self, count: usize) -> Asn1Result<Bytes> {
        if count > self.remaining() {
            return Err(Asn1Error::out_of_range(format!(
                "Need {} bytes, have {}",
                count,
                self.remaining()
            )));
        }
        Ok(self.read(count))
    }

    /// Read everything from the cursor to the end of the window
    pub fn read_to_end(&mut self) -> Bytes {
        self.read(self.remaining())
    }

    /// Read one byte
    pub fn read_byte(&mut self) -> Asn1Result<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Look at the next byte without consuming it
    pub fn peek_byte(&self) -> Asn1Result<u8> {
        self.buffer.get(self.position).copied().ok_or_else(|| {
            Asn1Error::out_of_range(format!("Read at end of window ({} bytes)", self.len()))
        })
    }

    /// Window over `len` bytes starting at `offset` (relative to this window's start)
    pub fn sub_window(&self, offset: usize, len: usize) -> Asn1Result<ByteWindow> {
        ByteWindow::new(self.buffer.clone(), offset, len)
    }

    /// All bytes of the window, independent of the cursor
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// The window region as a shared buffer
    pub fn to_bytes(&self) -> Bytes {
        self.buffer.clone()
    }
}

impl io::Read for ByteWindow {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = ByteWindow::read(self, buf.len());
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl std::fmt::Debug for ByteWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteWindow")
            .field("len", &self.len())
            .field("position", &self.position)
            .finish()
    }
}
