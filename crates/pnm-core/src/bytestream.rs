/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A seekable bytestream reader
//!
//! Decoders read through [`ByteReader`], which wraps anything implementing
//! [`ByteReaderTrait`]. The trait is implemented for the in-memory
//! [`ByteCursor`] and, with the `std` feature, for `std::io::Cursor`,
//! `std::io::BufReader` and `std::fs::File`.
pub use reader::{ByteCursor, ByteIoError, ByteReader, ByteSeekFrom};
pub use traits::ByteReaderTrait;

mod reader;
mod traits;
