/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::{ByteIoError, ByteReaderTrait, ByteSeekFrom};

/// An in-memory source of bytes
///
/// Works in `no_std` environments and avoids the `std::io` machinery,
/// prefer it over [`Cursor`](std::io::Cursor) for data already in memory.
pub struct ByteCursor<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

impl<T: AsRef<[u8]>> ByteCursor<T> {
    pub fn new(buffer: T) -> ByteCursor<T> {
        ByteCursor {
            stream:   buffer,
            position: 0
        }
    }

    /// Return the underlying buffer
    pub fn into_inner(self) -> T {
        self.stream
    }

    #[inline]
    fn remaining(&self) -> &[u8] {
        let data = self.stream.as_ref();
        let start = core::cmp::min(self.position, data.len());
        &data[start..]
    }
}

impl<T: AsRef<[u8]>> ByteReaderTrait for ByteCursor<T> {
    #[inline(always)]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let remaining = self.remaining();

        if remaining.len() < buf.len() {
            // do not move the position, callers may want to retry
            return Err(ByteIoError::NotEnoughBytes(buf.len(), remaining.len()));
        }
        buf.copy_from_slice(&remaining[..buf.len()]);
        self.position += buf.len();

        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        let remaining = self.remaining();
        let len = core::cmp::min(remaining.len(), buf.len());

        buf[..len].copy_from_slice(&remaining[..len]);
        self.position += len;

        Ok(len)
    }

    #[inline(always)]
    fn byte_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
        let (base, offset) = match from {
            ByteSeekFrom::Start(position) => {
                self.position = usize::try_from(position)?;
                return Ok(position);
            }
            ByteSeekFrom::End(offset) => (self.stream.as_ref().len(), offset),
            ByteSeekFrom::Current(offset) => (self.position, offset)
        };
        let new_position = i64::try_from(base)?
            .checked_add(offset)
            .ok_or(ByteIoError::SeekError("Seek position overflows"))?;

        if new_position < 0 {
            return Err(ByteIoError::SeekError("Cannot seek before the start of the stream"));
        }
        self.position = usize::try_from(new_position)?;

        Ok(self.position as u64)
    }

    #[inline(always)]
    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.position as u64)
    }

    fn name(&self) -> &'static str {
        "ByteCursor<T>"
    }
}
