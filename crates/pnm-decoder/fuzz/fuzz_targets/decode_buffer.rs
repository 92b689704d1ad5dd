#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use pnm_decoder::pnm_core::bytestream::ByteCursor;
    use pnm_decoder::{PnmDecoder, Rect};

    let mut decoder = PnmDecoder::new(ByteCursor::new(data));

    if let Ok(frame) = decoder.frame(0) {
        let (width, height) = frame.size();
        let _ = frame.decode();

        let rect = Rect::new(width / 2, height / 2, width - width / 2, 1);

        if let Some(stride) = frame.pixel_format().min_stride(rect.width) {
            let mut out = vec![0; stride];
            let _ = frame.copy_pixels(Some(rect), stride as u32, &mut out);
        }
    }
});
