/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pnm_core::bit_depth::BitDepth;
use pnm_core::colorspace::ColorSpace;

use crate::errors::PnmDecodeErrors;
use crate::header::{ImageHeader, PnmFormat};

/// Layout of a decoded pixel
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PixelFormat {
    bit_depth:  BitDepth,
    colorspace: ColorSpace
}

/// Every format [`resolve`](PixelFormat::resolve) can return
pub const SUPPORTED_PIXEL_FORMATS: [PixelFormat; 5] = [
    PixelFormat::new(BitDepth::Two, ColorSpace::Luma),
    PixelFormat::new(BitDepth::Four, ColorSpace::Luma),
    PixelFormat::new(BitDepth::Eight, ColorSpace::Luma),
    PixelFormat::new(BitDepth::Sixteen, ColorSpace::Luma),
    PixelFormat::new(BitDepth::Eight, ColorSpace::RGB)
];

impl PixelFormat {
    pub(crate) const fn new(bit_depth: BitDepth, colorspace: ColorSpace) -> PixelFormat {
        PixelFormat {
            bit_depth,
            colorspace
        }
    }

    /// Choose the output format for a parsed header
    ///
    /// Pixmaps decode to 24 bit RGB and must declare a maximum
    /// sample value of 255. Graymaps decode to the smallest of
    /// 2, 4, 8 or 16 bits that holds the maximum sample value.
    pub fn resolve(header: &ImageHeader) -> Result<PixelFormat, PnmDecodeErrors> {
        let max_value = header.max_sample_value();

        match header.format() {
            PnmFormat::ColorBinary => {
                if max_value != 255 {
                    return Err(PnmDecodeErrors::UnsupportedColorRange(max_value));
                }
                Ok(PixelFormat::new(BitDepth::Eight, ColorSpace::RGB))
            }
            PnmFormat::GrayscaleBinary => {
                let depth = BitDepth::from_max_value(max_value)
                    .ok_or(PnmDecodeErrors::UnsupportedGrayRange(max_value))?;

                Ok(PixelFormat::new(depth, ColorSpace::Luma))
            }
        }
    }

    pub const fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub const fn bits_per_sample(&self) -> u32 {
        self.bit_depth.bits()
    }

    pub const fn channels(&self) -> usize {
        self.colorspace.num_components()
    }

    pub const fn bits_per_pixel(&self) -> u32 {
        self.bits_per_sample() * self.channels() as u32
    }

    /// Smallest number of bytes a row of `width` pixels occupies
    /// in the output
    ///
    /// Packed rows are rounded up to a whole byte. Returns `None`
    /// if the number of bits in the row does not fit in a usize.
    pub const fn min_stride(&self, width: u32) -> Option<usize> {
        match (width as usize).checked_mul(self.bits_per_pixel() as usize) {
            Some(bits) => Some(bits / 8 + (bits % 8 != 0) as usize),
            None => None
        }
    }
}
