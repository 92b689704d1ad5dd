/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Conversion of stored samples to output samples
//!
//! Stored samples are right justified to the maximum sample value,
//! output samples are left justified to the output depth, so a
//! sample equal to the maximum becomes all ones in its top bits.
use pnm_core::bit_depth::{BitDepth, ByteEndian};
use pnm_core::options::DecoderOptions;

use crate::errors::PnmDecodeErrors;
use crate::header::ImageHeader;
use crate::pixel_format::PixelFormat;

#[derive(Copy, Clone, Debug)]
pub(crate) struct SampleConverter {
    depth:     BitDepth,
    raw_size:  usize,
    shift:     u32,
    max_value: u16,
    endian:    ByteEndian,
    strict:    bool
}

impl SampleConverter {
    pub fn new(
        header: &ImageHeader, format: &PixelFormat, options: &DecoderOptions
    ) -> SampleConverter {
        SampleConverter {
            depth: format.bit_depth(),
            raw_size: header.raw_sample_size(),
            shift: format.bits_per_sample() - header.significant_bits(),
            max_value: header.max_sample_value() as u16,
            endian: options.get_byte_endian(),
            strict: options.get_strict_mode()
        }
    }

    /// Stored bytes are already output bytes
    const fn is_identity(&self) -> bool {
        matches!(self.depth, BitDepth::Eight) && self.raw_size == 1 && self.max_value == 255
    }

    /// Convert the stored samples in `raw` into `out`
    ///
    /// `raw` must hold whole samples and `out` must hold at least the
    /// packed size of those samples, bytes after that are not touched.
    ///
    /// Returns the number of samples larger than the maximum sample value
    /// that were clamped to it. With strict mode on such a sample is an error.
    pub fn convert_row(&self, raw: &[u8], out: &mut [u8]) -> Result<usize, PnmDecodeErrors> {
        if self.is_identity() {
            out[..raw.len()].copy_from_slice(raw);
            return Ok(0);
        }
        let mut clamped = 0;

        match self.depth {
            BitDepth::Eight => {
                for (sample, byte) in raw.chunks_exact(self.raw_size).zip(out.iter_mut()) {
                    *byte = self.normalize(sample, &mut clamped)? as u8;
                }
            }
            BitDepth::Sixteen => {
                for (sample, bytes) in raw
                    .chunks_exact(self.raw_size)
                    .zip(out.chunks_exact_mut(2))
                {
                    let value = self.normalize(sample, &mut clamped)?;

                    let value = match self.endian {
                        ByteEndian::LE => value.to_le_bytes(),
                        ByteEndian::BE => value.to_be_bytes()
                    };
                    bytes.copy_from_slice(&value);
                }
            }
            BitDepth::Two | BitDepth::Four => {
                let bits = self.depth.bits() as usize;
                let per_byte = 8 / bits;

                for (group, byte) in raw
                    .chunks(self.raw_size * per_byte)
                    .zip(out.iter_mut())
                {
                    let mut packed = 0_u8;

                    for (i, sample) in group.chunks_exact(self.raw_size).enumerate() {
                        let value = self.normalize(sample, &mut clamped)? as u8;
                        // first sample goes to the most significant bits
                        packed |= value << (8 - bits * (i + 1));
                    }
                    *byte = packed;
                }
            }
        }
        Ok(clamped)
    }

    #[inline(always)]
    fn normalize(&self, sample: &[u8], clamped: &mut usize) -> Result<u16, PnmDecodeErrors> {
        let mut value = if self.raw_size == 1 {
            u16::from(sample[0])
        } else {
            u16::from_be_bytes([sample[0], sample[1]])
        };

        if value > self.max_value {
            if self.strict {
                return Err(PnmDecodeErrors::SampleOutOfRange(value, self.max_value));
            }
            value = self.max_value;
            *clamped += 1;
        }
        Ok(value << self.shift)
    }
}

#[cfg(test)]
mod tests {
    use pnm_core::bit_depth::ByteEndian;
    use pnm_core::bytestream::{ByteCursor, ByteReader};
    use pnm_core::options::DecoderOptions;

    use crate::errors::PnmDecodeErrors;
    use crate::header::parse_header;
    use crate::pixel_format::PixelFormat;
    use crate::samples::SampleConverter;

    fn converter(header: &[u8], options: DecoderOptions) -> SampleConverter {
        let mut reader = ByteReader::new(ByteCursor::new(header));
        let header = parse_header(&mut reader, &options).unwrap();
        let format = PixelFormat::resolve(&header).unwrap();

        SampleConverter::new(&header, &format, &options)
    }

    #[test]
    fn eight_bit_copy() {
        let conv = converter(b"P6 2 1 255\n", DecoderOptions::default());
        let mut out = [0; 6];

        assert_eq!(conv.convert_row(&[1, 2, 3, 4, 5, 6], &mut out).unwrap(), 0);
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn eight_bit_left_justified() {
        // 100 needs seven bits
        let conv = converter(b"P5 3 1 100\n", DecoderOptions::default());
        let mut out = [0; 3];

        conv.convert_row(&[0, 1, 100], &mut out).unwrap();
        assert_eq!(out, [0, 2, 200]);
    }

    #[test]
    fn sixteen_bit_byte_order() {
        let raw = [0x03, 0xFF, 0x00, 0x01];

        let conv = converter(
            b"P5 2 1 1023\n",
            DecoderOptions::default().set_byte_endian(ByteEndian::LE)
        );
        let mut out = [0; 4];
        conv.convert_row(&raw, &mut out).unwrap();
        assert_eq!(out, [0xC0, 0xFF, 0x40, 0x00]);

        let conv = converter(
            b"P5 2 1 1023\n",
            DecoderOptions::default().set_byte_endian(ByteEndian::BE)
        );
        conv.convert_row(&raw, &mut out).unwrap();
        assert_eq!(out, [0xFF, 0xC0, 0x00, 0x40]);
    }

    #[test]
    fn packed_two_bit() {
        let conv = converter(b"P5 5 1 3\n", DecoderOptions::default());
        let mut out = [0xAA; 3];

        conv.convert_row(&[3, 0, 1, 2, 3], &mut out).unwrap();
        // trailing bits of the last byte are zero, the third byte is untouched
        assert_eq!(out, [0b1100_0110, 0b1100_0000, 0xAA]);
    }

    #[test]
    fn packed_four_bit_from_one_bit_range() {
        // a maximum of 1 decodes to two bits, 1 -> 0b10
        let conv = converter(b"P5 3 1 1\n", DecoderOptions::default());
        let mut out = [0; 1];
        conv.convert_row(&[1, 0, 1], &mut out).unwrap();
        assert_eq!(out, [0b1000_1000]);

        let conv = converter(b"P5 3 1 15\n", DecoderOptions::default());
        let mut out = [0; 2];
        conv.convert_row(&[15, 1, 8], &mut out).unwrap();
        assert_eq!(out, [0xF1, 0x80]);
    }

    #[test]
    fn out_of_range_samples_are_rejected() {
        let conv = converter(b"P5 2 1 15\n", DecoderOptions::default());
        let mut out = [0; 1];

        assert!(matches!(
            conv.convert_row(&[0x1F, 2], &mut out),
            Err(PnmDecodeErrors::SampleOutOfRange(0x1F, 15))
        ));

        let conv = converter(b"P5 2 1 100\n", DecoderOptions::default());
        let mut out = [0; 2];

        assert!(matches!(
            conv.convert_row(&[100, 127], &mut out),
            Err(PnmDecodeErrors::SampleOutOfRange(127, 100))
        ));
    }

    #[test]
    fn lenient_mode_clamps_to_the_maximum() {
        let conv = converter(b"P5 2 1 15\n", DecoderOptions::new_lenient());
        let mut out = [0; 1];

        assert_eq!(conv.convert_row(&[0x1F, 2], &mut out).unwrap(), 1);
        assert_eq!(out, [0xF2]);

        // 127 fits in the seven significant bits of 100 but is still above it
        let conv = converter(b"P5 2 1 100\n", DecoderOptions::new_lenient());
        let mut out = [0; 2];

        assert_eq!(conv.convert_row(&[100, 127], &mut out).unwrap(), 1);
        assert_eq!(out, [200, 200]);
    }
}
