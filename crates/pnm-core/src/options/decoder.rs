/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global Decoder options

use crate::bit_depth::ByteEndian;

/// Decoder options
///
/// Limits and output preferences respected by the decoders.
///
/// Options are built by chaining setters on the default value
///
/// ```
/// use pnm_core::bit_depth::ByteEndian;
/// use pnm_core::options::DecoderOptions;
///
/// let options = DecoderOptions::default()
///     .set_max_width(1024)
///     .set_max_height(1024)
///     .set_byte_endian(ByteEndian::BE);
///
/// assert_eq!(options.get_max_width(), 1024);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 65535
    max_width:   usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 65535
    max_height:  usize,
    /// Reject samples that lie outside the declared range
    /// instead of clamping them to it
    ///
    /// - Default value: true
    strict_mode: bool,
    /// The byte endian of the returned bytes will be stored in
    /// in case a single sample spans more than a byte
    ///
    /// - Default value: native endian
    endianness:  ByteEndian
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:   usize::from(u16::MAX),
            max_height:  usize::from(u16::MAX),
            strict_mode: true,
            endianness:  ByteEndian::native()
        }
    }
}

impl DecoderOptions {
    /// Create options with strict mode turned off
    ///
    /// Decoders running with these options clamp samples larger
    /// than the declared maximum value to that maximum and log a warning
    /// instead of failing.
    pub fn new_lenient() -> DecoderOptions {
        DecoderOptions::default().set_strict_mode(false)
    }

    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    /// And reject most errors
    pub const fn get_strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Get the byte endian for which samples that span more than one byte will
    /// be treated
    pub const fn get_byte_endian(&self) -> ByteEndian {
        self.endianness
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    ///
    /// # Arguments
    ///
    /// * `width`:  The maximum width allowed
    ///
    /// returns: DecoderOptions
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    /// # Arguments
    ///
    /// * `height`: The maximum height allowed
    ///
    /// returns: DecoderOptions
    ///
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Set whether the decoder should be in standards conforming/
    /// strict mode
    ///
    /// This reduces the error tolerance level for the decoders and invalid
    /// samples will be rejected by the decoder. Turning it off clamps
    /// them to the declared range.
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    /// Set the byte endian for which raw samples will be stored in
    /// in case a single pixel sample spans more than a byte.
    ///
    /// The default is native endian hence big endian values
    /// will be converted to little endian on little endian systems,
    ///
    /// and left alone on big endian systems
    ///
    /// # Arguments
    ///
    /// * `endian`: The endianness to which to set the bytes to
    ///
    /// returns: DecoderOptions
    pub fn set_byte_endian(mut self, endian: ByteEndian) -> Self {
        self.endianness = endian;
        self
    }
}
