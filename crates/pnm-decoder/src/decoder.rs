/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::mem;

use pnm_core::bytestream::{ByteReader, ByteReaderTrait};
use pnm_core::log::{trace, warn};
use pnm_core::options::DecoderOptions;

use crate::errors::{Feature, PnmDecodeErrors};
use crate::frame::FrameDecoder;
use crate::header::PnmFormat;
use crate::pixel_format::PixelFormat;

/// Container formats this crate decodes
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContainerFormat {
    Netpbm
}

/// Check whether `bytes` start with a binary Netpbm signature
///
/// # Example
/// ```
/// use pnm_decoder::{probe, PnmFormat};
///
/// assert_eq!(probe(b"P6 1 1 255\n"), Some(PnmFormat::ColorBinary));
/// assert_eq!(probe(b"P3 1 1 255\n"), None);
/// assert_eq!(probe(b"P"), None);
/// ```
pub fn probe(bytes: &[u8]) -> Option<PnmFormat> {
    match bytes {
        [a, b, ..] => PnmFormat::from_magic([*a, *b]),
        _ => None
    }
}

/// Check whether the stream starts with a binary Netpbm signature,
/// the stream position is restored afterwards
pub fn probe_stream<T: ByteReaderTrait>(
    reader: &mut ByteReader<T>
) -> Result<Option<PnmFormat>, PnmDecodeErrors> {
    let start = reader.position()?;
    let mut magic = [0; 2];
    let read = reader.read_bytes(&mut magic)?;

    reader.set_position(start)?;

    Ok(probe(&magic[..read]))
}

enum State<T: ByteReaderTrait> {
    Uninitialized(ByteReader<T>, DecoderOptions),
    Initialized(FrameDecoder<T>),
    Failed
}

/// A Netpbm image
///
/// A Netpbm file holds exactly one frame, this wraps its
/// [`FrameDecoder`] with the container level queries and
/// lazy header decoding.
///
/// # Example
/// ```
/// use pnm_core::bytestream::ByteCursor;
/// use pnm_decoder::PnmDecoder;
///
/// let mut decoder = PnmDecoder::new(ByteCursor::new(b"P5 2 1 255\n\x10\x20"));
///
/// assert_eq!(decoder.frame_count().unwrap(), 1);
/// assert_eq!(decoder.frame(0).unwrap().decode().unwrap(), [0x10, 0x20]);
/// ```
pub struct PnmDecoder<T: ByteReaderTrait> {
    state: State<T>
}

impl<T: ByteReaderTrait> PnmDecoder<T> {
    /// Create a decoder with the default options
    ///
    /// Nothing is read until headers are needed
    pub fn new(source: T) -> PnmDecoder<T> {
        PnmDecoder::new_with_options(source, DecoderOptions::default())
    }

    pub fn new_with_options(source: T, options: DecoderOptions) -> PnmDecoder<T> {
        PnmDecoder {
            state: State::Uninitialized(ByteReader::new(source), options)
        }
    }

    /// Parse the header and resolve the pixel format
    ///
    /// Does nothing if headers were already decoded. On failure the
    /// stream is dropped and every later call returns
    /// [`PnmDecodeErrors::NotOpen`].
    pub fn decode_headers(&mut self) -> Result<(), PnmDecodeErrors> {
        match mem::replace(&mut self.state, State::Failed) {
            State::Uninitialized(stream, options) => {
                match FrameDecoder::from_reader(stream, options) {
                    Ok(frame) => {
                        self.state = State::Initialized(frame);
                        Ok(())
                    }
                    Err(err) => {
                        warn!("Could not decode headers: {:?}", err);
                        Err(err)
                    }
                }
            }
            State::Initialized(frame) => {
                self.state = State::Initialized(frame);
                Ok(())
            }
            State::Failed => {
                trace!("Headers requested from a failed decoder");
                Err(PnmDecodeErrors::NotOpen)
            }
        }
    }

    fn initialized(&mut self) -> Result<&mut FrameDecoder<T>, PnmDecodeErrors> {
        self.decode_headers()?;

        match &mut self.state {
            State::Initialized(frame) => Ok(frame),
            _ => Err(PnmDecodeErrors::NotOpen)
        }
    }

    pub const fn container_format(&self) -> ContainerFormat {
        ContainerFormat::Netpbm
    }

    /// Number of frames, always one once headers decode
    pub fn frame_count(&mut self) -> Result<u32, PnmDecodeErrors> {
        self.initialized().map(|_| 1)
    }

    /// Get the frame at `index`, only index 0 exists
    pub fn frame(&mut self, index: u32) -> Result<&mut FrameDecoder<T>, PnmDecodeErrors> {
        let frame = self.initialized()?;

        if index != 0 {
            return Err(PnmDecodeErrors::InvalidFrameIndex(index));
        }
        Ok(frame)
    }

    /// Consume the container and return its only frame
    pub fn into_frame(mut self) -> Result<FrameDecoder<T>, PnmDecodeErrors> {
        self.decode_headers()?;

        match self.state {
            State::Initialized(frame) => Ok(frame),
            _ => Err(PnmDecodeErrors::NotOpen)
        }
    }

    /// Width and height of the image, or `None` if headers
    /// were not decoded
    pub fn get_dimensions(&self) -> Option<(u32, u32)> {
        match &self.state {
            State::Initialized(frame) => Some(frame.size()),
            _ => None
        }
    }

    /// Output pixel format, or `None` if headers were not decoded
    pub fn get_pixel_format(&self) -> Option<PixelFormat> {
        match &self.state {
            State::Initialized(frame) => Some(frame.pixel_format()),
            _ => None
        }
    }

    pub fn preview(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::Preview))
    }

    pub fn thumbnail(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::Thumbnail))
    }

    pub fn palette(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::Palette))
    }

    pub fn color_contexts(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::ColorContexts))
    }

    pub fn metadata_query_reader(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::MetadataQueryReader))
    }
}
