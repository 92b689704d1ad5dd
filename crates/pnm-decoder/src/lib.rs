/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A binary Netpbm decoder
//!
//! Decodes `P5` (graymap) and `P6` (pixmap) images into caller supplied
//! buffers, one rectangular window at a time.
//!
//! # Features
//! - Header parsing that never reads past the start of the pixel data
//! - Output depths of 2, 4, 8 and 16 bits for graymaps and 24 bit RGB for pixmaps
//! - Samples are left justified to the output depth
//! - Repeated, partial and out of order copies through a seekable stream
//! - `no_std` with `alloc`
//!
//! # Example
//! ```
//! use pnm_core::bytestream::ByteCursor;
//! use pnm_decoder::{FrameDecoder, Rect};
//!
//! let data = b"P5 2 2 255\n\x00\x40\x80\xff";
//! let mut frame = FrameDecoder::open(ByteCursor::new(data)).unwrap();
//!
//! assert_eq!(frame.size(), (2, 2));
//!
//! let mut pixels = [0_u8; 1];
//! frame.copy_pixels(Some(Rect::new(1, 1, 1, 1)), 1, &mut pixels).unwrap();
//! assert_eq!(pixels, [0xff]);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

pub use decoder::*;
pub use errors::*;
pub use frame::*;
pub use header::*;
pub use pixel_format::*;
pub use pnm_core;

mod decoder;
mod errors;
mod frame;
mod header;
mod pixel_format;
pub mod registration;
mod samples;
