/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by the pnm crates
//!
//! It currently contains
//!
//! - A seekable bytestream reader
//! - Colorspace and bit depth information shared by decoded frames
//! - Decoder options
//! - A logging facade that compiles to nothing when the `log` feature is off
//!
//! This library is `#[no_std]` with `alloc` needed for the scratch buffers
//! held by readers.
//!
//! # Features
//!  - `std`: Implements the reader trait for `std::io` types and
//!    `std::error::Error` for the error types.
//!
//!  - `log`: Routes the logging macros to the [`log`](https://docs.rs/log) crate.
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
//!
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub mod bit_depth;
pub mod bytestream;
pub mod colorspace;
#[cfg(not(feature = "log"))]
pub mod log;
pub mod options;
pub mod serde;

#[cfg(feature = "log")]
pub use log;
