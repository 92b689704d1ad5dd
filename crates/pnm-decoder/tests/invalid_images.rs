/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pnm_core::bytestream::ByteCursor;
use pnm_core::options::DecoderOptions;
use pnm_decoder::{FrameDecoder, PnmDecodeErrors};

fn open(data: &[u8]) -> Result<FrameDecoder<ByteCursor<&[u8]>>, PnmDecodeErrors> {
    FrameDecoder::open(ByteCursor::new(data))
}

#[test]
fn unsupported_magic() {
    let err = open(b"P4 10 10 255\n").err().unwrap();

    assert!(matches!(err, PnmDecodeErrors::UnsupportedFormat(m) if &m == b"P4"));
}

#[test]
fn ascii_formats_are_not_supported() {
    for magic in [&b"P1"[..], b"P2", b"P3", b"P7", b"PF"] {
        let mut data = magic.to_vec();
        data.extend_from_slice(b" 1 1 255\n");

        assert!(matches!(
            open(&data).err(),
            Some(PnmDecodeErrors::UnsupportedFormat(_))
        ));
    }
}

#[test]
fn color_with_wide_samples() {
    let err = open(b"P6 1 1 300\n\0\0\0\0\0\0").err().unwrap();

    assert!(matches!(err, PnmDecodeErrors::UnsupportedColorRange(300)));
}

#[test]
fn empty_stream() {
    assert!(matches!(open(b"").err(), Some(PnmDecodeErrors::TruncatedHeader)));
}

#[test]
fn header_without_terminator() {
    assert!(matches!(
        open(b"P5 4 4 255").err(),
        Some(PnmDecodeErrors::TruncatedHeader)
    ));
}

#[test]
fn comment_after_max_value() {
    assert!(matches!(
        open(b"P5 4 4 255# comment\n").err(),
        Some(PnmDecodeErrors::MalformedHeader(_))
    ));
}

#[test]
fn too_wide() {
    assert!(matches!(
        open(b"P5 70000 1 255\n").err(),
        Some(PnmDecodeErrors::DimensionOverflow(65535, 70000))
    ));

    let options = DecoderOptions::default().set_max_height(10);
    let err = FrameDecoder::open_with_options(ByteCursor::new(b"P5 1 11 255\n"), options)
        .err()
        .unwrap();

    assert!(matches!(err, PnmDecodeErrors::DimensionOverflow(10, 11)));
}

#[test]
fn huge_dimensions_are_allowed_when_configured() {
    let options = DecoderOptions::default().set_max_width(1 << 20);
    let frame =
        FrameDecoder::open_with_options(ByteCursor::new(b"P5 100000 1 255\n"), options).unwrap();

    assert_eq!(frame.size(), (100000, 1));
    assert_eq!(frame.output_buffer_size(), Some(100000));
}

#[test]
fn header_promising_more_data_than_the_stream_holds() {
    let data = b"P5 65535 65535 65535\n";
    let mut frame = open(data).unwrap();

    assert!(matches!(
        frame.decode(),
        Err(PnmDecodeErrors::TruncatedData(expected, 21)) if expected == 65535 * 65535 * 2 + 21
    ));

    let mut data = b"P6 4 4 255\n".to_vec();
    data.extend_from_slice(&[0; 4 * 4 * 3 - 1]);

    let mut frame = open(&data).unwrap();
    assert!(matches!(
        frame.decode(),
        Err(PnmDecodeErrors::TruncatedData(59, 58))
    ));
}

#[test]
fn errors_are_printable() {
    let err = open(b"P9").err().unwrap();
    let message = format!("{err}");

    assert!(message.contains("P9"));
    assert!(!err.is_not_applicable());
}
