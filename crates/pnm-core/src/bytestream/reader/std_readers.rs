/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "std")]

use std::fs::File;
use std::io::{BufReader, Read, Seek};

use crate::bytestream::reader::{ByteIoError, ByteSeekFrom};
use crate::bytestream::ByteReaderTrait;

impl<T> ByteReaderTrait for std::io::Cursor<T>
where
    T: AsRef<[u8]>
{
    #[inline(always)]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.read_exact(buf).map_err(ByteIoError::from)
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.read(buf).map_err(ByteIoError::from)
    }

    #[inline(always)]
    fn byte_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
        self.seek(from.to_std_seek()).map_err(ByteIoError::from)
    }

    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.position())
    }

    fn name(&self) -> &'static str {
        "Cursor<T>"
    }
}

impl<T: Read + Seek> ByteReaderTrait for BufReader<T> {
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.read_exact(buf).map_err(ByteIoError::from)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.read(buf).map_err(ByteIoError::from)
    }

    fn byte_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
        // relative seeks that stay inside the buffer do not
        // discard it
        if let ByteSeekFrom::Current(offset) = from {
            self.seek_relative(offset)?;
            return self.stream_position().map_err(ByteIoError::from);
        }
        self.seek(from.to_std_seek()).map_err(ByteIoError::from)
    }

    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        self.stream_position().map_err(ByteIoError::from)
    }

    fn name(&self) -> &'static str {
        "BufReader<T>"
    }
}

impl ByteReaderTrait for File {
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.read_exact(buf).map_err(ByteIoError::from)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.read(buf).map_err(ByteIoError::from)
    }

    fn byte_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
        self.seek(from.to_std_seek()).map_err(ByteIoError::from)
    }

    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        self.stream_position().map_err(ByteIoError::from)
    }

    fn name(&self) -> &'static str {
        "File"
    }
}
