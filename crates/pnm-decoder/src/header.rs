/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Netpbm header parsing
//!
//! A binary Netpbm header is
//!
//! ```text
//! "P5" | "P6"  WS  <width>  WS  <height>  WS  <maxval>  WS1  <raw samples>
//! ```
//!
//! where `WS` is any run of whitespace and `#` comments and `WS1` is
//! exactly one whitespace byte.
use pnm_core::bytestream::{ByteIoError, ByteReader, ByteReaderTrait};
use pnm_core::colorspace::ColorSpace;
use pnm_core::log::trace;
use pnm_core::options::DecoderOptions;

use crate::errors::PnmDecodeErrors;

/// Binary Netpbm formats the decoder understands
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PnmFormat {
    /// `P5`, a binary graymap
    GrayscaleBinary,
    /// `P6`, a binary pixmap
    ColorBinary
}

impl PnmFormat {
    /// The two magic bytes a file of this format starts with
    pub const fn magic(self) -> [u8; 2] {
        match self {
            PnmFormat::GrayscaleBinary => *b"P5",
            PnmFormat::ColorBinary => *b"P6"
        }
    }

    /// Match magic bytes to a format
    pub const fn from_magic(magic: [u8; 2]) -> Option<PnmFormat> {
        match &magic {
            b"P5" => Some(PnmFormat::GrayscaleBinary),
            b"P6" => Some(PnmFormat::ColorBinary),
            _ => None
        }
    }

    /// Colorspace of the samples stored in this format
    pub const fn colorspace(self) -> ColorSpace {
        match self {
            PnmFormat::GrayscaleBinary => ColorSpace::Luma,
            PnmFormat::ColorBinary => ColorSpace::RGB
        }
    }
}

/// A parsed and validated Netpbm header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageHeader {
    format:           PnmFormat,
    width:            u32,
    height:           u32,
    max_sample_value: u32,
    data_offset:      u64
}

impl ImageHeader {
    pub const fn format(&self) -> PnmFormat {
        self.format
    }
    pub const fn width(&self) -> u32 {
        self.width
    }
    pub const fn height(&self) -> u32 {
        self.height
    }
    /// The declared maximum sample value, between 1 and 65535
    pub const fn max_sample_value(&self) -> u32 {
        self.max_sample_value
    }
    /// Stream position of the first sample
    pub const fn data_offset(&self) -> u64 {
        self.data_offset
    }
    pub const fn colorspace(&self) -> ColorSpace {
        self.format.colorspace()
    }
    /// Number of bits needed to hold the maximum sample value
    pub const fn significant_bits(&self) -> u32 {
        u32::BITS - self.max_sample_value.leading_zeros()
    }
    /// Bytes a single stored sample occupies, one up to a
    /// maximum sample value of 255 and two above it
    pub const fn raw_sample_size(&self) -> usize {
        if self.max_sample_value > 255 {
            2
        } else {
            1
        }
    }
    /// Bytes a stored pixel occupies
    pub const fn raw_pixel_size(&self) -> usize {
        self.raw_sample_size() * self.colorspace().num_components()
    }
    /// Bytes a stored row occupies, samples are never bit packed
    pub const fn raw_row_size(&self) -> u64 {
        self.width as u64 * self.raw_pixel_size() as u64
    }
}

/// Whitespace as Netpbm defines it
const fn is_pnm_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

fn map_eof(err: ByteIoError) -> PnmDecodeErrors {
    if err.is_eof() {
        PnmDecodeErrors::TruncatedHeader
    } else {
        PnmDecodeErrors::IoFailure(err)
    }
}

/// Parse a header from the start of `stream`
///
/// Reads one byte at a time and stops right after the byte
/// terminating the maximum sample value, no pixel data is read.
/// On success the stream is positioned at [`ImageHeader::data_offset`].
///
/// # Example
/// ```
/// use pnm_core::bytestream::{ByteCursor, ByteReader};
/// use pnm_core::options::DecoderOptions;
/// use pnm_decoder::{parse_header, PnmFormat};
///
/// let mut reader = ByteReader::new(ByteCursor::new(b"P6\n# made by hand\n3 2\n255\n"));
/// let header = parse_header(&mut reader, &DecoderOptions::default()).unwrap();
///
/// assert_eq!(header.format(), PnmFormat::ColorBinary);
/// assert_eq!((header.width(), header.height()), (3, 2));
/// assert_eq!(header.data_offset(), 26);
/// ```
pub fn parse_header<T: ByteReaderTrait>(
    reader: &mut ByteReader<T>, options: &DecoderOptions
) -> Result<ImageHeader, PnmDecodeErrors> {
    let magic = reader.read_fixed_bytes_or_error::<2>().map_err(map_eof)?;

    let format = PnmFormat::from_magic(magic).ok_or(PnmDecodeErrors::UnsupportedFormat(magic))?;

    trace!("Format: {:?}", format);

    let width = read_dimension(reader, options.get_max_width(), "Image width is zero")?;
    let height = read_dimension(reader, options.get_max_height(), "Image height is zero")?;

    trace!("Width: {}, height: {}", width, height);

    let max_sample_value = read_field(reader, u64::from(u16::MAX))?;

    if max_sample_value == 0 || max_sample_value > u64::from(u16::MAX) {
        return Err(PnmDecodeErrors::InvalidMaxValue(max_sample_value));
    }

    trace!("Maximum sample value: {}", max_sample_value);

    // a single whitespace byte, the samples start right after it
    match reader.get_u8_or_eof()? {
        Some(byte) if is_pnm_whitespace(byte) => (),
        Some(_) => {
            return Err(PnmDecodeErrors::MalformedHeader(
                "Expected a single whitespace after the maximum sample value"
            ))
        }
        None => return Err(PnmDecodeErrors::TruncatedHeader)
    }
    let data_offset = reader.position()?;

    trace!("Data offset: {}", data_offset);

    Ok(ImageHeader {
        format,
        width,
        height,
        max_sample_value: max_sample_value as u32,
        data_offset
    })
}

fn read_dimension<T: ByteReaderTrait>(
    reader: &mut ByteReader<T>, max: usize, zero_msg: &'static str
) -> Result<u32, PnmDecodeErrors> {
    // dimensions are stored as u32 no matter the configured limit
    let limit = core::cmp::min(max as u64, u64::from(u32::MAX));
    let value = read_field(reader, limit)?;

    if value > limit {
        return Err(PnmDecodeErrors::DimensionOverflow(max, value));
    }
    if value == 0 {
        return Err(PnmDecodeErrors::MalformedHeader(zero_msg));
    }
    Ok(value as u32)
}

/// Skip the separator preceding a field and read the field
///
/// Stops consuming digits once the value exceeds `limit`, the
/// returned value is then larger than `limit`.
fn read_field<T: ByteReaderTrait>(
    reader: &mut ByteReader<T>, limit: u64
) -> Result<u64, PnmDecodeErrors> {
    if skip_spaces(reader)? == 0 {
        return Err(PnmDecodeErrors::MalformedHeader(
            "Expected whitespace between header fields"
        ));
    }
    get_integer(reader, limit)
}

/// Skip all whitespace characters and comments
/// until one hits a character that isn't a space
///
/// Returns the number of bytes skipped, the stream is left
/// at the first byte that isn't a space.
fn skip_spaces<T: ByteReaderTrait>(reader: &mut ByteReader<T>) -> Result<usize, PnmDecodeErrors> {
    let mut skipped = 0;

    loop {
        let byte = reader
            .get_u8_or_eof()?
            .ok_or(PnmDecodeErrors::TruncatedHeader)?;

        if byte == b'#' {
            // skip the whole comment
            loop {
                let byte = reader
                    .get_u8_or_eof()?
                    .ok_or(PnmDecodeErrors::TruncatedHeader)?;
                skipped += 1;

                if byte == b'\n' || byte == b'\r' {
                    break;
                }
            }
            skipped += 1;
        } else if is_pnm_whitespace(byte) {
            skipped += 1;
        } else {
            // go back one step, we hit something that is not a space
            reader.rewind(1)?;
            return Ok(skipped);
        }
    }
}

fn get_integer<T: ByteReaderTrait>(
    reader: &mut ByteReader<T>, limit: u64
) -> Result<u64, PnmDecodeErrors> {
    let mut value = 0_u64;
    let mut digits = 0;

    loop {
        let byte = reader
            .get_u8_or_eof()?
            .ok_or(PnmDecodeErrors::TruncatedHeader)?;

        if byte.is_ascii_digit() {
            // limit is at most u32::MAX so this can't overflow
            value = value * 10 + u64::from(byte - b'0');
            digits += 1;

            if value > limit {
                return Ok(value);
            }
        } else if digits == 0 {
            return Err(PnmDecodeErrors::MalformedHeader(
                "Expected a decimal integer in header"
            ));
        } else {
            // rewind to the previous byte
            reader.rewind(1)?;
            return Ok(value);
        }
    }
}
