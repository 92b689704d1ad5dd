/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use pnm_core::bytestream::{ByteReader, ByteReaderTrait, ByteSeekFrom};
use pnm_core::log::{debug, trace, warn};
use pnm_core::options::DecoderOptions;

use crate::errors::{Feature, PnmDecodeErrors};
use crate::header::{parse_header, ImageHeader};
use crate::pixel_format::PixelFormat;
use crate::samples::SampleConverter;

/// Horizontal and vertical resolution reported for every frame,
/// Netpbm files carry no physical size
pub const DEFAULT_RESOLUTION: (f64, f64) = (96.0, 96.0);

/// A rectangular window of a frame, in pixels
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rect {
    pub x:      u32,
    pub y:      u32,
    pub width:  u32,
    pub height: u32
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Rect {
        Rect {
            x,
            y,
            width,
            height
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle is non empty and lies inside a
    /// `width` by `height` frame
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        // u64 so that x + width can't wrap
        !self.is_empty()
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Decoder for the single frame of a Netpbm image
///
/// Opening a frame reads the header and nothing else. Pixels are read
/// on demand by [`copy_pixels`](Self::copy_pixels), which may be called
/// any number of times, for any region and in any order.
///
/// The decoder owns the stream, dropping it drops the stream.
pub struct FrameDecoder<T: ByteReaderTrait> {
    stream:       ByteReader<T>,
    header:       ImageHeader,
    pixel_format: PixelFormat,
    converter:    SampleConverter,
    row_buffer:   Vec<u8>,
    // where the stream is known to be, None after an error
    position:     Option<u64>
}

impl<T: ByteReaderTrait> FrameDecoder<T> {
    /// Open a frame with the default options
    ///
    /// Parses the header and resolves the output pixel format,
    /// on failure the stream is dropped.
    pub fn open(source: T) -> Result<FrameDecoder<T>, PnmDecodeErrors> {
        Self::open_with_options(source, DecoderOptions::default())
    }

    /// Open a frame with custom options
    ///
    /// # Example
    /// ```
    /// use pnm_core::bit_depth::{BitDepth, ByteEndian};
    /// use pnm_core::bytestream::ByteCursor;
    /// use pnm_core::options::DecoderOptions;
    /// use pnm_decoder::FrameDecoder;
    ///
    /// let options = DecoderOptions::default().set_byte_endian(ByteEndian::BE);
    /// let mut frame =
    ///     FrameDecoder::open_with_options(ByteCursor::new(b"P5 1 1 1023\n\x03\xFF"), options).unwrap();
    ///
    /// assert_eq!(frame.pixel_format().bit_depth(), BitDepth::Sixteen);
    /// assert_eq!(frame.decode().unwrap(), [0xFF, 0xC0]);
    /// ```
    pub fn open_with_options(
        source: T, options: DecoderOptions
    ) -> Result<FrameDecoder<T>, PnmDecodeErrors> {
        Self::from_reader(ByteReader::new(source), options)
    }

    pub(crate) fn from_reader(
        mut stream: ByteReader<T>, options: DecoderOptions
    ) -> Result<FrameDecoder<T>, PnmDecodeErrors> {
        let header = parse_header(&mut stream, &options)?;
        let pixel_format = PixelFormat::resolve(&header)?;
        let converter = SampleConverter::new(&header, &pixel_format, &options);

        debug!(
            "Opened {:?} frame from {}, {}x{} {:?}",
            header.format(),
            stream.name(),
            header.width(),
            header.height(),
            pixel_format
        );

        Ok(FrameDecoder {
            position: Some(header.data_offset()),
            stream,
            header,
            pixel_format,
            converter,
            row_buffer: Vec::new()
        })
    }

    /// Width and height of the frame
    pub const fn size(&self) -> (u32, u32) {
        (self.header.width(), self.header.height())
    }

    pub const fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Dots per inch, always [`DEFAULT_RESOLUTION`]
    pub const fn resolution(&self) -> (f64, f64) {
        DEFAULT_RESOLUTION
    }

    pub const fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Number of bytes needed to hold the whole frame with rows
    /// packed tightly
    ///
    /// Returns `None` if the size does not fit in a usize
    pub fn output_buffer_size(&self) -> Option<usize> {
        self.pixel_format
            .min_stride(self.header.width())?
            .checked_mul(self.header.height() as usize)
    }

    /// Copy a region of the frame into `destination`
    ///
    /// # Arguments
    /// - `region`: The pixels to copy, `None` copies the whole frame
    /// - `destination_stride`: Bytes between the starts of consecutive
    ///   rows in `destination`, at least [`PixelFormat::min_stride`] of the region width
    /// - `destination`: Output, at least `destination_stride * region.height` bytes
    ///
    /// Row `i` of the region is written to
    /// `destination[i * destination_stride..]`, bytes between the end
    /// of a row and the next stride are left untouched.
    ///
    /// Errors leave the decoder usable.
    pub fn copy_pixels(
        &mut self, region: Option<Rect>, destination_stride: u32, destination: &mut [u8]
    ) -> Result<(), PnmDecodeErrors> {
        let (width, height) = self.size();

        let region = match region {
            None => Rect::new(0, 0, width, height),
            Some(rect) => {
                if !rect.fits_within(width, height) {
                    return Err(PnmDecodeErrors::InvalidRegion(rect));
                }
                rect
            }
        };
        self.copy_region(region, destination_stride as usize, destination)
    }

    /// Decode the whole frame into `pixels`, rows packed tightly
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), PnmDecodeErrors> {
        let (width, height) = self.size();
        let stride = self
            .pixel_format
            .min_stride(width)
            .ok_or(PnmDecodeErrors::DimensionOverflow(usize::MAX, u64::from(width)))?;

        self.copy_region(Rect::new(0, 0, width, height), stride, pixels)
    }

    /// Decode the whole frame into a new buffer, rows packed tightly
    ///
    /// The stream is checked to hold all of the pixel data before
    /// the buffer is allocated, a short stream fails with
    /// [`TruncatedData`](PnmDecodeErrors::TruncatedData).
    pub fn decode(&mut self) -> Result<Vec<u8>, PnmDecodeErrors> {
        self.check_data_length()?;

        let size = self
            .output_buffer_size()
            .ok_or(PnmDecodeErrors::DimensionOverflow(
                usize::MAX,
                u64::from(self.header.height())
            ))?;
        let mut pixels = vec![0; size];

        self.decode_into(&mut pixels)?;

        Ok(pixels)
    }

    fn check_data_length(&mut self) -> Result<(), PnmDecodeErrors> {
        let height = u64::from(self.header.height());
        let expected = self
            .header
            .raw_row_size()
            .checked_mul(height)
            .and_then(|size| size.checked_add(self.header.data_offset()))
            .ok_or(PnmDecodeErrors::DimensionOverflow(usize::MAX, height))?;

        // the next row read seeks back from here
        self.position = None;
        let end = self.stream.seek(ByteSeekFrom::End(0))?;
        self.position = Some(end);

        if end < expected {
            return Err(PnmDecodeErrors::TruncatedData(expected, end));
        }
        Ok(())
    }

    fn copy_region(
        &mut self, region: Rect, stride: usize, destination: &mut [u8]
    ) -> Result<(), PnmDecodeErrors> {
        let row_size = self
            .pixel_format
            .min_stride(region.width)
            .ok_or(PnmDecodeErrors::BufferTooSmall(usize::MAX, stride))?;

        if stride < row_size {
            return Err(PnmDecodeErrors::BufferTooSmall(row_size, stride));
        }
        let needed = stride
            .checked_mul(region.height as usize)
            .ok_or(PnmDecodeErrors::BufferTooSmall(usize::MAX, destination.len()))?;

        if destination.len() < needed {
            return Err(PnmDecodeErrors::BufferTooSmall(needed, destination.len()));
        }

        trace!("Copying {:?} with a stride of {}", region, stride);

        let result = self.copy_rows(region, stride, row_size, destination);

        if result.is_err() {
            // a failed read or seek may have moved the stream anywhere
            self.position = None;
        }
        let clamped = result?;

        if clamped > 0 {
            warn!(
                "{} samples were larger than {} and were clamped",
                clamped,
                self.header.max_sample_value()
            );
        }
        Ok(())
    }

    fn copy_rows(
        &mut self, region: Rect, stride: usize, row_size: usize, destination: &mut [u8]
    ) -> Result<usize, PnmDecodeErrors> {
        let raw_pixel_size = self.header.raw_pixel_size();
        let raw_row_size = region.width as usize * raw_pixel_size;
        let frame_width = u64::from(self.header.width());

        self.row_buffer.resize(raw_row_size, 0);

        let mut clamped = 0;

        for (y, out) in (region.y..region.y + region.height).zip(destination.chunks_mut(stride)) {
            let offset = self.header.data_offset()
                + (u64::from(y) * frame_width + u64::from(region.x)) * raw_pixel_size as u64;

            if self.position != Some(offset) {
                self.stream.set_position(offset)?;
            }
            self.position = None;
            self.stream.read_exact_bytes(&mut self.row_buffer)?;
            self.position = Some(offset + raw_row_size as u64);

            clamped += self
                .converter
                .convert_row(&self.row_buffer, &mut out[..row_size])?;
        }
        Ok(clamped)
    }

    /// Netpbm frames have no palette
    pub fn palette(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::Palette))
    }

    /// Netpbm frames have no embedded thumbnail
    pub fn thumbnail(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::Thumbnail))
    }

    /// Netpbm frames carry no color profile
    pub fn color_contexts(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::ColorContexts))
    }

    /// Netpbm frames carry no metadata
    pub fn metadata_query_reader(&self) -> Result<(), PnmDecodeErrors> {
        Err(PnmDecodeErrors::NotApplicable(Feature::MetadataQueryReader))
    }

    /// Consume the decoder and return the stream
    pub fn into_inner(self) -> T {
        self.stream.consume()
    }
}

#[cfg(test)]
mod tests {
    use pnm_core::bytestream::ByteCursor;

    use crate::errors::PnmDecodeErrors;
    use crate::frame::{FrameDecoder, Rect};

    #[test]
    fn rect_bounds() {
        assert!(Rect::new(0, 0, 2, 2).fits_within(2, 2));
        assert!(Rect::new(1, 1, 1, 1).fits_within(2, 2));
        assert!(!Rect::new(1, 0, 2, 1).fits_within(2, 2));
        assert!(!Rect::new(0, 0, 0, 1).fits_within(2, 2));
        assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(u32::MAX, 1));
    }

    #[test]
    fn region_and_stride_checks() {
        let data = b"P5 3 2 255\n\x01\x02\x03\x04\x05\x06";
        let mut frame = FrameDecoder::open(ByteCursor::new(data)).unwrap();
        let mut out = [0; 6];

        assert!(matches!(
            frame.copy_pixels(Some(Rect::new(2, 0, 2, 1)), 3, &mut out),
            Err(PnmDecodeErrors::InvalidRegion(_))
        ));
        assert!(matches!(
            frame.copy_pixels(None, 2, &mut out),
            Err(PnmDecodeErrors::BufferTooSmall(3, 2))
        ));
        assert!(matches!(
            frame.copy_pixels(None, 4, &mut out),
            Err(PnmDecodeErrors::BufferTooSmall(8, 6))
        ));

        frame.copy_pixels(None, 3, &mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn truncated_data_keeps_decoder_usable() {
        let data = b"P5 2 2 255\n\x0A\x0B\x0C";
        let mut frame = FrameDecoder::open(ByteCursor::new(data)).unwrap();
        let mut out = [0; 4];

        assert!(matches!(
            frame.copy_pixels(None, 2, &mut out),
            Err(PnmDecodeErrors::IoFailure(_))
        ));
        // the first row is still there
        frame
            .copy_pixels(Some(Rect::new(0, 0, 2, 1)), 2, &mut out)
            .unwrap();
        assert_eq!(&out[..2], &[0x0A, 0x0B]);
    }

    #[test]
    fn decode_checks_the_stream_length_first() {
        // 65535 x 65535 two byte samples, with no pixel data behind the header
        let data = b"P5 65535 65535 65535\n";
        let mut frame = FrameDecoder::open(ByteCursor::new(data)).unwrap();

        assert!(matches!(
            frame.decode(),
            Err(PnmDecodeErrors::TruncatedData(8_589_672_471, 21))
        ));

        let data = b"P5 2 2 255\n\x0A\x0B\x0C";
        let mut frame = FrameDecoder::open(ByteCursor::new(data)).unwrap();

        assert!(matches!(
            frame.decode(),
            Err(PnmDecodeErrors::TruncatedData(15, 14))
        ));
        // the seek to the end does not break later copies
        let mut out = [0; 2];
        frame
            .copy_pixels(Some(Rect::new(0, 0, 2, 1)), 2, &mut out)
            .unwrap();
        assert_eq!(out, [0x0A, 0x0B]);
    }

    #[test]
    fn not_applicable_queries() {
        let frame = FrameDecoder::open(ByteCursor::new(b"P6 1 1 255\n\0\0\0")).unwrap();

        assert!(frame.palette().unwrap_err().is_not_applicable());
        assert!(frame.thumbnail().unwrap_err().is_not_applicable());
        assert!(frame.color_contexts().unwrap_err().is_not_applicable());
        assert!(frame.metadata_query_reader().unwrap_err().is_not_applicable());
        assert_eq!(frame.resolution(), (96.0, 96.0));
    }
}
