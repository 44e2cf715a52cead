use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::decode::{DecodedImage, unpremultiply_rgba8_in_place},
    assets::fonts::{FontResolver, TextBrush},
    card::model::{RenderRequest, RgbColor},
    foundation::error::{CardError, CardResult},
    layout::geometry::{
        self, CANVAS_HEIGHT, CANVAS_WIDTH, Margins, PhysicalSide, background_placement,
        logo_placement, physical_side,
    },
};

/// A rendered card as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, straight alpha.
    pub data: Vec<u8>,
}

/// Draw one card in fixed z-order: gradient, background image (plus its
/// gradient frame in legacy crop mode), border, logo, text.
///
/// Each step is skipped when its input is absent; an unresolved image or an
/// empty font index degrades to an omitted element rather than an error.
pub(crate) fn compose(
    request: &RenderRequest,
    bg_image: Option<&DecodedImage>,
    logo: Option<&DecodedImage>,
    fonts: &mut FontResolver,
) -> CardResult<FrameRgba> {
    let width = CANVAS_WIDTH as u16;
    let height = CANVAS_HEIGHT as u16;
    let mut ctx = vello_cpu::RenderContext::new(width, height);

    let margins = Margins::new(request.padding, request.border.as_ref(), request.dir);
    let gradient = gradient_image(&request.bg_gradient)?;

    // 1. Background gradient across the full canvas.
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(gradient.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));

    // 2. Background image, then any gradient frame bands over cropped edges.
    if let (Some(bg), Some(desc)) = (bg_image, &request.bg_image) {
        let geom = background_placement(
            &desc.placement,
            f64::from(bg.width),
            f64::from(bg.height),
            request.dir,
        );
        draw_image_into(&mut ctx, bg, geom.dest)?;
        for band in &geom.frame_bands {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(gradient.clone());
            ctx.fill_rect(&rect_to_cpu(*band));
        }
    }

    // 3. Border: a band of thickness 2x the configured width centered on the
    // resolved edge; the outer half falls off the canvas.
    if let Some(border) = &request.border
        && border.width > 0.0
    {
        let w = border.width;
        let band = match physical_side(border.side, request.dir) {
            PhysicalSide::Top => vello_cpu::kurbo::Rect::new(0.0, -w, CANVAS_WIDTH, w),
            PhysicalSide::Bottom => {
                vello_cpu::kurbo::Rect::new(0.0, CANVAS_HEIGHT - w, CANVAS_WIDTH, CANVAS_HEIGHT + w)
            }
            PhysicalSide::Left => vello_cpu::kurbo::Rect::new(-w, 0.0, w, CANVAS_HEIGHT),
            PhysicalSide::Right => {
                vello_cpu::kurbo::Rect::new(CANVAS_WIDTH - w, 0.0, CANVAS_WIDTH + w, CANVAS_HEIGHT)
            }
        };
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            border.color[0],
            border.color[1],
            border.color[2],
            255,
        ));
        ctx.fill_rect(&band);
    }

    // 4. Logo.
    let mut logo_height = 0.0;
    if let (Some(img), Some(desc)) = (logo, &request.logo) {
        let dest = logo_placement(
            f64::from(img.width),
            f64::from(img.height),
            desc.size,
            &margins,
            request.dir,
        );
        logo_height = dest.height();
        draw_image_into(&mut ctx, img, dest)?;
    }

    // 5. Title and description as one paragraph.
    let column_width = geometry::text_column_width(&margins, request.padding);
    if let Some(layout) = fonts.layout_card_text(
        &request.title,
        &request.description,
        &request.font,
        request.padding,
        request.dir,
        column_width,
    ) {
        let left = geometry::text_left(&margins, request.dir, column_width);
        let top = geometry::text_top(
            &margins,
            request.padding,
            logo_height,
            f64::from(layout.height()),
        );
        draw_paragraph(&mut ctx, &layout, left, top);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut data);
    Ok(FrameRgba {
        width: u32::from(width),
        height: u32::from(height),
        data,
    })
}

fn draw_image_into(
    ctx: &mut vello_cpu::RenderContext,
    img: &DecodedImage,
    dest: kurbo::Rect,
) -> CardResult<()> {
    if dest.width() <= 0.0 || dest.height() <= 0.0 {
        return Ok(());
    }
    let natural_w = f64::from(img.width);
    let natural_h = f64::from(img.height);
    if natural_w <= 0.0 || natural_h <= 0.0 {
        return Ok(());
    }
    let paint = image_paint(img)?;
    let transform = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
        * vello_cpu::kurbo::Affine::scale_non_uniform(
            dest.width() / natural_w,
            dest.height() / natural_h,
        );
    ctx.set_transform(transform);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, natural_w, natural_h));
    Ok(())
}

fn draw_paragraph(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrush>,
    left: f64,
    top: f64,
) {
    // Parley and vello_cpu may carry different peniko versions, so run fonts
    // are rewrapped by blob identity instead of passed through.
    let mut font_cache: HashMap<(u64, u32), vello_cpu::peniko::FontData> = HashMap::new();

    ctx.set_transform(vello_cpu::kurbo::Affine::translate((left, top)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let font = run.run().font();
            let key = (font.data.id(), font.index);
            let font_data = font_cache.entry(key).or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.data.as_ref().to_vec()),
                    font.index,
                )
            });
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn image_paint(img: &DecodedImage) -> CardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Generate the vertical multi-stop gradient as a canvas-sized image paint.
/// The same paint fills the base canvas and any legacy-mode frame bands, so
/// bands sample the identical gradient column.
fn gradient_image(stops: &[RgbColor]) -> CardResult<vello_cpu::Image> {
    if stops.is_empty() {
        return Err(CardError::validation(
            "background gradient needs at least one color stop",
        ));
    }
    let w = CANVAS_WIDTH as usize;
    let h = CANVAS_HEIGHT as usize;
    let mut bytes = vec![0u8; w * h * 4];
    for y in 0..h {
        let color = gradient_row_color(stops, y as f64 / (h - 1) as f64);
        let row = &mut bytes[y * w * 4..(y + 1) * w * 4];
        for px in row.chunks_exact_mut(4) {
            px[0] = color[0];
            px[1] = color[1];
            px[2] = color[2];
            px[3] = 255;
        }
    }
    let pixmap = pixmap_from_premul_bytes(&bytes, CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn gradient_row_color(stops: &[RgbColor], t: f64) -> RgbColor {
    if stops.len() == 1 {
        return stops[0];
    }
    let pos = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
    let idx = (pos.floor() as usize).min(stops.len() - 2);
    let frac = pos - idx as f64;
    let a = stops[idx];
    let b = stops[idx + 1];
    let lerp = |x: u8, y: u8| -> u8 {
        (f64::from(x) + (f64::from(y) - f64::from(x)) * frac)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])]
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CardError::validation("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
