/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image bit depth, information and manipulations

/// The bit depth of a decoded sample.
///
/// Depths below eight bits are packed most significant bit first
/// into bytes, eight bit samples take a byte each and sixteen bit samples
/// take two bytes in the byte order configured on the decoder.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BitDepth {
    /// Two bits per sample, four samples to a byte
    Two,
    /// Four bits per sample, two samples to a byte
    Four,
    /// Eight bit depth.
    ///
    /// Samples use a [`u8`] and the whole range from 0-255.
    Eight,
    /// Sixteen bit depth
    ///
    /// Samples use a [`u16`] and use the whole range
    /// i.e 0-65535
    Sixteen
}

/// All depths in ascending order.
pub const ALL_BIT_DEPTHS: [BitDepth; 4] =
    [BitDepth::Two, BitDepth::Four, BitDepth::Eight, BitDepth::Sixteen];

impl BitDepth {
    /// Number of bits a sample of this depth occupies
    pub const fn bits(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16
        }
    }

    /// Get the max value supported by the bit depth
    #[rustfmt::skip]
    #[allow(clippy::zero_prefixed_literal)]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Two     => (1 << 02) - 1,
            Self::Four    => (1 << 04) - 1,
            Self::Eight   => (1 << 08) - 1,
            Self::Sixteen => u16::MAX,
        }
    }

    /// Return the smallest depth whose range covers `max_value`
    ///
    /// Returns `None` if the value does not fit in sixteen bits.
    ///
    /// # Example
    /// ```
    /// use pnm_core::bit_depth::BitDepth;
    /// assert_eq!(BitDepth::from_max_value(3), Some(BitDepth::Two));
    /// assert_eq!(BitDepth::from_max_value(4), Some(BitDepth::Four));
    /// assert_eq!(BitDepth::from_max_value(256), Some(BitDepth::Sixteen));
    /// assert_eq!(BitDepth::from_max_value(65536), None);
    /// ```
    pub const fn from_max_value(max_value: u32) -> Option<BitDepth> {
        let mut i = 0;
        while i < ALL_BIT_DEPTHS.len() {
            if ALL_BIT_DEPTHS[i].max_value() as u32 >= max_value {
                return Some(ALL_BIT_DEPTHS[i]);
            }
            i += 1;
        }
        None
    }
}

/// Byte order of samples that span more than one byte
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ByteEndian {
    /// Little endian, least significant byte first
    LE,
    /// Big endian, most significant byte first
    BE
}

impl ByteEndian {
    /// The byte order of the target the crate is compiled for
    pub const fn native() -> ByteEndian {
        if cfg!(target_endian = "little") {
            ByteEndian::LE
        } else {
            ByteEndian::BE
        }
    }
}

impl Default for ByteEndian {
    fn default() -> Self {
        Self::native()
    }
}
