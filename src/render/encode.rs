use image::{
    ExtendedColorType, ImageEncoder,
    codecs::{jpeg::JpegEncoder, png::PngEncoder, webp::WebPEncoder},
};

use crate::{
    card::model::OutputFormat,
    foundation::error::{CardError, CardResult},
    render::compositor::FrameRgba,
};

/// Encode a rendered frame to the requested output format.
///
/// `quality` is used by JPEG; PNG and (lossless) WebP ignore it.
pub fn encode_frame(frame: &FrameRgba, format: OutputFormat, quality: u8) -> CardResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        OutputFormat::Png => PngEncoder::new(&mut out)
            .write_image(
                &frame.data,
                frame.width,
                frame.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CardError::encode(format!("png: {e}")))?,
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = rgba_to_rgb(&frame.data);
            JpegEncoder::new_with_quality(&mut out, quality.min(100))
                .write_image(&rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
                .map_err(|e| CardError::encode(format!("jpeg: {e}")))?
        }
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut out)
            .write_image(
                &frame.data,
                frame.width,
                frame.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CardError::encode(format!("webp: {e}")))?,
    }
    Ok(out)
}

fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
