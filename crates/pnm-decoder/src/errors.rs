/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding.
use core::fmt::{Debug, Display, Formatter};

use pnm_core::bytestream::ByteIoError;

use crate::frame::Rect;

/// Host features a Netpbm image has no equivalent for
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    Palette,
    Thumbnail,
    Preview,
    ColorContexts,
    MetadataQueryReader
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Feature::Palette => "palette",
            Feature::Thumbnail => "thumbnail",
            Feature::Preview => "preview",
            Feature::ColorContexts => "color contexts",
            Feature::MetadataQueryReader => "metadata query reader"
        };
        f.write_str(name)
    }
}

/// Possible Errors that may occur during decoding
pub enum PnmDecodeErrors {
    /// The header contains something other than
    /// whitespace, comments and decimal integers where
    /// they are expected
    MalformedHeader(&'static str),
    /// The stream ended before the header did
    TruncatedHeader,
    /// The stream does not start with `P5` or `P6`
    ///
    /// The argument is the two bytes found
    UnsupportedFormat([u8; 2]),
    /// Width or height is larger than the configured maximum
    ///
    /// # Arguments
    /// - 1st argument is the maximum allowed
    /// - 2nd argument is the value found
    DimensionOverflow(usize, u64),
    /// The maximum sample value is outside `1..=65535`
    InvalidMaxValue(u64),
    /// A pixmap declared a maximum sample value other than 255
    UnsupportedColorRange(u32),
    /// A graymap declared a maximum sample value that no
    /// output depth can hold
    UnsupportedGrayRange(u32),
    /// The requested region is empty or not inside the frame
    InvalidRegion(Rect),
    /// The destination stride or buffer is too small
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes needed
    /// - 2nd argument is the number of bytes given
    BufferTooSmall(usize, usize),
    /// A sample is larger than the declared maximum sample value,
    /// raised unless strict mode is turned off
    ///
    /// # Arguments
    /// - 1st argument is the sample found
    /// - 2nd argument is the maximum sample value
    SampleOutOfRange(u16, u16),
    /// A Netpbm file holds exactly one frame
    InvalidFrameIndex(u32),
    /// The feature does not exist for Netpbm images.
    ///
    /// This is not a decoding failure, the image may be perfectly fine
    NotApplicable(Feature),
    /// The decoder was never initialized or failed to initialize
    NotOpen,
    /// The stream ends before the pixel data the header describes
    ///
    /// # Arguments
    /// - 1st argument is the stream length the header implies
    /// - 2nd argument is the actual stream length
    TruncatedData(u64, u64),
    /// The underlying stream failed to read or seek
    IoFailure(ByteIoError)
}

impl PnmDecodeErrors {
    /// Return true if the error reports a missing feature
    /// rather than a failure to decode
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, PnmDecodeErrors::NotApplicable(_))
    }
}

impl Debug for PnmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MalformedHeader(reason) => {
                writeln!(f, "Malformed header, reason: {reason}")
            }
            Self::TruncatedHeader => {
                writeln!(f, "Stream ended before the end of the header")
            }
            Self::UnsupportedFormat(magic) => {
                writeln!(
                    f,
                    "Unsupported magic bytes `{}{}`, supported formats are P5 and P6",
                    magic[0] as char, magic[1] as char
                )
            }
            Self::DimensionOverflow(expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            Self::InvalidMaxValue(value) => {
                writeln!(f, "Invalid maximum sample value {value}, expected 1..=65535")
            }
            Self::UnsupportedColorRange(value) => {
                writeln!(
                    f,
                    "Unsupported maximum sample value {value} for a pixmap, only 255 is supported"
                )
            }
            Self::UnsupportedGrayRange(value) => {
                writeln!(f, "Unsupported maximum sample value {value} for a graymap")
            }
            Self::InvalidRegion(rect) => {
                writeln!(f, "Invalid region {rect:?}")
            }
            Self::BufferTooSmall(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            Self::SampleOutOfRange(sample, max) => {
                writeln!(f, "Sample {sample} is larger than the maximum sample value {max}")
            }
            Self::InvalidFrameIndex(index) => {
                writeln!(f, "Invalid frame index {index}, Netpbm images have a single frame")
            }
            Self::NotApplicable(feature) => {
                writeln!(f, "Netpbm images have no {feature}")
            }
            Self::NotOpen => {
                writeln!(f, "Decoder is not initialized")
            }
            Self::TruncatedData(expected, found) => {
                writeln!(
                    f,
                    "Stream holds {found} bytes but the image needs {expected}"
                )
            }
            Self::IoFailure(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl Display for PnmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PnmDecodeErrors {}

impl From<ByteIoError> for PnmDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        PnmDecodeErrors::IoFailure(value)
    }
}
