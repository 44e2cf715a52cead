use super::*;

use crate::{card::model::OutputFormat, render::compositor::FrameRgba};

fn test_frame() -> FrameRgba {
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&[120, 60, 30, 255]);
    }
    FrameRgba {
        width: 2,
        height: 2,
        data,
    }
}

#[test]
fn png_round_trips_exactly() {
    let frame = test_frame();
    let bytes = encode_frame(&frame, OutputFormat::Png, 90).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 2);
    assert_eq!(decoded.to_rgba8().into_raw(), frame.data);
}

#[test]
fn jpeg_drops_alpha_but_keeps_dimensions() {
    let frame = test_frame();
    let bytes = encode_frame(&frame, OutputFormat::Jpeg, 90).unwrap();
    let format = image::guess_format(&bytes).unwrap();
    assert_eq!(format, image::ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 2);
}

#[test]
fn webp_is_lossless() {
    let frame = test_frame();
    let bytes = encode_frame(&frame, OutputFormat::Webp, 0).unwrap();
    let format = image::guess_format(&bytes).unwrap();
    assert_eq!(format, image::ImageFormat::WebP);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.to_rgba8().into_raw(), frame.data);
}
