/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{BufReader, Cursor};

use pnm_core::bit_depth::{BitDepth, ByteEndian};
use pnm_core::bytestream::ByteCursor;
use pnm_core::colorspace::ColorSpace;
use pnm_core::options::DecoderOptions;
use pnm_decoder::{FrameDecoder, PnmDecodeErrors, Rect};
use xxhash_rust::xxh3::xxh3_64;

/// Build a graymap whose stored samples count up from zero
/// modulo `max_value + 1`
fn graymap(width: u32, height: u32, max_value: u32) -> Vec<u8> {
    let mut data = format!("P5\n{width} {height}\n{max_value}\n").into_bytes();

    for i in 0..width * height {
        let sample = i % (max_value + 1);

        if max_value > 255 {
            data.extend_from_slice(&(sample as u16).to_be_bytes());
        } else {
            data.push(sample as u8);
        }
    }
    data
}

fn open_le(data: &[u8]) -> FrameDecoder<ByteCursor<&[u8]>> {
    let options = DecoderOptions::default().set_byte_endian(ByteEndian::LE);
    FrameDecoder::open_with_options(ByteCursor::new(data), options).unwrap()
}

#[test]
fn eight_bit_graymap_is_copied_unchanged() {
    let mut data = b"P5 512 512 255\n".to_vec();
    data.extend((0..512 * 512).map(|i: u32| (i * 7 % 256) as u8));

    let mut frame = FrameDecoder::open(ByteCursor::new(&data[..])).unwrap();

    assert_eq!(frame.size(), (512, 512));
    assert_eq!(frame.pixel_format().bit_depth(), BitDepth::Eight);
    assert_eq!(frame.pixel_format().colorspace(), ColorSpace::Luma);

    let mut pixels = vec![0; 512 * 512];
    frame.copy_pixels(None, 512, &mut pixels).unwrap();

    assert_eq!(pixels, &data[15..]);
}

#[test]
fn twelve_bit_samples_are_left_justified() {
    let mut frame = open_le(b"P5 2 1 4095\n\x0F\xFF\x00\x00");

    assert_eq!(frame.pixel_format().bit_depth(), BitDepth::Sixteen);

    let mut pixels = [0; 4];
    frame.copy_pixels(None, 4, &mut pixels).unwrap();

    let samples: Vec<u16> = pixels
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    assert_eq!(samples, [0xFFF0, 0x0000]);
}

#[test]
fn max_value_round_trip() {
    for max_value in [1, 3, 15, 255, 1023, 4095, 65535] {
        let width = 37;
        let data = graymap(width, 3, max_value);
        let mut frame = open_le(&data);

        let depth = frame.pixel_format().bit_depth();
        let bits = 32 - max_value.leading_zeros();
        let shift = depth.bits() - bits;

        let pixels = frame.decode().unwrap();
        let stride = frame.pixel_format().min_stride(width).unwrap();

        assert_eq!(pixels.len(), stride * 3);

        for i in 0..width * 3 {
            let (x, y) = ((i % width) as usize, (i / width) as usize);
            let row = &pixels[y * stride..];

            let decoded = match depth {
                BitDepth::Sixteen => u32::from(u16::from_le_bytes([row[2 * x], row[2 * x + 1]])),
                BitDepth::Eight => u32::from(row[x]),
                BitDepth::Four => u32::from(row[x / 2] >> (4 - 4 * (x % 2)) & 0xF),
                BitDepth::Two => u32::from(row[x / 4] >> (6 - 2 * (x % 4)) & 0x3)
            };
            let expected = i % (max_value + 1);

            assert_eq!(decoded >> shift, expected, "max value {max_value}, pixel {i}");
            // the maximum maps to the top of the output range
            if expected == max_value {
                assert_eq!(decoded | ((1 << shift) - 1), u32::from(depth.max_value()));
            }
        }
    }
}

#[test]
fn repeated_copies_are_identical() {
    let data = graymap(64, 48, 1023);
    let mut frame = open_le(&data);

    let first = xxh3_64(&frame.decode().unwrap());

    for _ in 0..3 {
        assert_eq!(xxh3_64(&frame.decode().unwrap()), first);
    }
}

#[test]
fn regions_match_the_full_frame() {
    let mut data = b"P6 5 4 255\n".to_vec();
    data.extend((0..5 * 4 * 3).map(|i| i as u8));

    let mut frame = FrameDecoder::open(ByteCursor::new(&data[..])).unwrap();
    let full = frame.decode().unwrap();

    // out of order, overlapping, with padding between rows
    for rect in [
        Rect::new(3, 2, 2, 2),
        Rect::new(0, 0, 1, 1),
        Rect::new(1, 1, 3, 3),
        Rect::new(0, 3, 5, 1)
    ] {
        let stride = rect.width as usize * 3 + 5;
        let mut out = vec![0xEE; stride * rect.height as usize];

        frame
            .copy_pixels(Some(rect), stride as u32, &mut out)
            .unwrap();

        for row in 0..rect.height as usize {
            let src = ((rect.y as usize + row) * 5 + rect.x as usize) * 3;
            let len = rect.width as usize * 3;

            assert_eq!(&out[row * stride..row * stride + len], &full[src..src + len]);
            // padding is left alone
            assert!(out[row * stride + len..(row + 1) * stride]
                .iter()
                .all(|b| *b == 0xEE));
        }
    }
}

#[test]
fn invalid_region_keeps_decoder_usable() {
    let data = graymap(4, 4, 255);
    let mut frame = FrameDecoder::open(ByteCursor::new(&data[..])).unwrap();
    let mut out = [0; 16];

    let err = frame
        .copy_pixels(Some(Rect::new(3, 3, 2, 2)), 4, &mut out)
        .unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::InvalidRegion(r) if r == Rect::new(3, 3, 2, 2)));

    let err = frame
        .copy_pixels(Some(Rect::new(0, 0, 0, 2)), 4, &mut out)
        .unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::InvalidRegion(_)));

    frame.copy_pixels(None, 4, &mut out).unwrap();
    assert_eq!(out[15], 15);
}

#[test]
fn packed_rows_start_on_byte_boundaries() {
    // 5 two bit pixels per row need two bytes
    let data = graymap(5, 2, 3);
    let mut frame = FrameDecoder::open(ByteCursor::new(&data[..])).unwrap();

    assert_eq!(frame.pixel_format().min_stride(5), Some(2));

    let pixels = frame.decode().unwrap();
    // row 0: 0 1 2 3 0, row 1: 1 2 3 0 1
    assert_eq!(pixels, [0b0001_1011, 0b0000_0000, 0b0110_1100, 0b0100_0000]);
}

#[test]
fn std_readers() {
    let data = graymap(16, 16, 255);
    let expected = FrameDecoder::open(ByteCursor::new(&data[..]))
        .unwrap()
        .decode()
        .unwrap();

    let mut frame = FrameDecoder::open(Cursor::new(data.clone())).unwrap();
    assert_eq!(frame.decode().unwrap(), expected);

    let mut frame = FrameDecoder::open(BufReader::with_capacity(7, Cursor::new(data))).unwrap();
    let mut out = vec![0; 4 * 4];
    frame
        .copy_pixels(Some(Rect::new(8, 8, 4, 4)), 4, &mut out)
        .unwrap();
    assert_eq!(&out[..4], &expected[8 * 16 + 8..8 * 16 + 12]);
}

#[test]
fn out_of_range_samples() {
    let data = b"P5 3 1 100\n\x64\xC8\x01";

    let mut frame = FrameDecoder::open(ByteCursor::new(&data[..])).unwrap();
    assert!(matches!(
        frame.decode(),
        Err(PnmDecodeErrors::SampleOutOfRange(200, 100))
    ));
    // samples before the bad one still decode
    let mut out = [0; 1];
    frame
        .copy_pixels(Some(Rect::new(0, 0, 1, 1)), 1, &mut out)
        .unwrap();
    assert_eq!(out, [200]);

    let mut frame = FrameDecoder::open_with_options(
        ByteCursor::new(&data[..]),
        DecoderOptions::new_lenient()
    )
    .unwrap();
    assert_eq!(frame.decode().unwrap(), [200, 200, 2]);
}

#[test]
fn samples_inside_the_significant_bits_are_still_rejected() {
    // 127 needs no more bits than 100 does
    let data = b"P5 2 1 100\n\x64\x7F";

    let mut frame = FrameDecoder::open(ByteCursor::new(&data[..])).unwrap();
    assert!(matches!(
        frame.decode(),
        Err(PnmDecodeErrors::SampleOutOfRange(127, 100))
    ));

    let options = DecoderOptions::default().set_strict_mode(false);
    let mut frame = FrameDecoder::open_with_options(ByteCursor::new(&data[..]), options).unwrap();
    // never brighter than the maximum itself
    assert_eq!(frame.decode().unwrap(), [200, 200]);
}

#[test]
fn big_endian_output() {
    let options = DecoderOptions::default().set_byte_endian(ByteEndian::BE);
    let mut frame =
        FrameDecoder::open_with_options(ByteCursor::new(b"P5 1 1 65535\n\x12\x34"), options)
            .unwrap();

    assert_eq!(frame.decode().unwrap(), [0x12, 0x34]);
    assert_eq!(frame.into_inner().into_inner(), b"P5 1 1 65535\n\x12\x34");
}
