/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Traits for reading images in pnm
//!
//! This exposes the trait and implementations for readers
//! used by the pnm decoders.

use crate::bytestream::reader::{ByteIoError, ByteSeekFrom};

/// The Input trait implemented for readers.
///
/// Decoders need random access to the underlying bytes, so every
/// implementation must be able to seek in both directions.
///
/// # Considerations
///
/// If you have an in memory buffer, prefer [`ByteCursor`](crate::bytestream::ByteCursor) over [`Cursor`](std::io::Cursor).
/// We implement this trait for `ByteCursor`, `Cursor`, `BufReader<T: Read + Seek>` and `File`.
pub trait ByteReaderTrait {
    /// Read exact bytes required to fill `buf` or return an error if that isn't possible
    ///
    /// ## Arguments
    ///  - `buf`: Buffer to fill with bytes from the underlying reader
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError>;

    /// Read bytes into `buf` returning how many bytes you have read or an error if one occurred
    ///
    /// This doesn't guarantee that buf will be filled with bytes for such a guarantee see
    /// [`read_exact_bytes`](Self::read_exact_bytes)
    ///
    /// ## Returns
    ///  - `Ok(usize)` - Actual bytes read into the buffer, `0` at the end of the stream
    ///  - `Err()` - The error encountered when reading bytes for which we couldn't recover
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError>;

    /// Seek into a new position from the buffer
    ///
    /// This is similar to the [seek](std::io::Seek::seek) function in the [Seek](std::io::Seek) trait
    /// but implemented to work for no-std environments
    fn byte_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError>;

    /// Return the current position of the inner cursor.
    fn byte_position(&mut self) -> Result<u64, ByteIoError>;

    /// Name of the implementation, used in log messages
    fn name(&self) -> &'static str;
}
