use kurbo::Rect;

use crate::card::model::{
    BgFit, BgPlacement, BorderStyle, Direction, LegacySize, LogicalSide, LogoSize,
    PositionKeyword,
};

/// Canvas width in logical units. Every card is exactly this size.
pub const CANVAS_WIDTH: f64 = 1200.0;
/// Canvas height in logical units.
pub const CANVAS_HEIGHT: f64 = 630.0;

/// An absolute canvas side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalSide {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

/// Map a logical side to the physical side it names under `dir`.
pub fn physical_side(side: LogicalSide, dir: Direction) -> PhysicalSide {
    match (side, dir.is_rtl()) {
        (LogicalSide::BlockStart, _) => PhysicalSide::Top,
        (LogicalSide::BlockEnd, _) => PhysicalSide::Bottom,
        (LogicalSide::InlineStart, false) | (LogicalSide::InlineEnd, true) => PhysicalSide::Left,
        (LogicalSide::InlineStart, true) | (LogicalSide::InlineEnd, false) => PhysicalSide::Right,
    }
}

/// Physical margins per canvas side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margins {
    /// All four sides start at `padding`; the physical side named by the
    /// border additionally gains the border width.
    pub fn new(padding: f64, border: Option<&BorderStyle>, dir: Direction) -> Self {
        let padding = padding.max(0.0);
        let mut m = Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        };
        if let Some(border) = border
            && border.width > 0.0
        {
            match physical_side(border.side, dir) {
                PhysicalSide::Top => m.top += border.width,
                PhysicalSide::Right => m.right += border.width,
                PhysicalSide::Bottom => m.bottom += border.width,
                PhysicalSide::Left => m.left += border.width,
            }
        }
        m
    }

    /// Margin of the inline-start side under `dir`.
    pub fn inline_start(&self, dir: Direction) -> f64 {
        if dir.is_rtl() { self.right } else { self.left }
    }

    /// Margin of the inline-end side under `dir`.
    pub fn inline_end(&self, dir: Direction) -> f64 {
        if dir.is_rtl() { self.left } else { self.right }
    }
}

/// Resolved background-image geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BgGeometry {
    /// Destination rectangle for the (scaled) image on the canvas.
    pub dest: Rect,
    /// Margin-band rectangles to re-paint with the background gradient
    /// after the image draws. Empty outside legacy crop mode.
    pub frame_bands: Vec<Rect>,
}

/// Compute where a background image of `natural_w` × `natural_h` lands on
/// the canvas under the given placement semantics.
pub fn background_placement(
    placement: &BgPlacement,
    natural_w: f64,
    natural_h: f64,
    dir: Direction,
) -> BgGeometry {
    match placement {
        BgPlacement::Legacy { size, margin, crop } => {
            legacy_placement(*size, *margin, *crop, natural_w, natural_h)
        }
        BgPlacement::Modern { fit, position } => {
            let (w, h) = match fit {
                BgFit::None => (natural_w, natural_h),
                BgFit::Fill => (CANVAS_WIDTH, CANVAS_HEIGHT),
                BgFit::Cover => scaled(natural_w, natural_h, CANVAS_WIDTH, CANVAS_HEIGHT, true),
                BgFit::Contain => {
                    scaled(natural_w, natural_h, CANVAS_WIDTH, CANVAS_HEIGHT, false)
                }
            };
            let inline = if dir.is_rtl() {
                position.inline.mirrored()
            } else {
                position.inline
            };
            let x = axis_offset(CANVAS_WIDTH - w, inline);
            let y = axis_offset(CANVAS_HEIGHT - h, position.block);
            BgGeometry {
                dest: Rect::new(x, y, x + w, y + h),
                frame_bands: Vec::new(),
            }
        }
    }
}

fn legacy_placement(
    size: Option<LegacySize>,
    margin: [f64; 4],
    crop: bool,
    natural_w: f64,
    natural_h: f64,
) -> BgGeometry {
    let [mt, mr, mb, ml] = margin;
    if !crop {
        // Inset placement: the image scales against the shrunken target and
        // sits at its top-left corner.
        let tw = (CANVAS_WIDTH - ml - mr).max(0.0);
        let th = (CANVAS_HEIGHT - mt - mb).max(0.0);
        let (w, h) = match size {
            Some(LegacySize::Cover) => scaled(natural_w, natural_h, tw, th, true),
            Some(LegacySize::Contain) => scaled(natural_w, natural_h, tw, th, false),
            None => (natural_w, natural_h),
        };
        return BgGeometry {
            dest: Rect::new(ml, mt, ml + w, mt + h),
            frame_bands: Vec::new(),
        };
    }

    // Crop mode: scale against the full canvas, then frame the result by
    // re-painting the margin bands with the gradient.
    let (w, h) = match size {
        Some(LegacySize::Cover) => {
            scaled(natural_w, natural_h, CANVAS_WIDTH, CANVAS_HEIGHT, true)
        }
        Some(LegacySize::Contain) => {
            scaled(natural_w, natural_h, CANVAS_WIDTH, CANVAS_HEIGHT, false)
        }
        None => (CANVAS_WIDTH, CANVAS_HEIGHT),
    };
    let mut frame_bands = Vec::new();
    if mt > 0.0 {
        frame_bands.push(Rect::new(0.0, 0.0, CANVAS_WIDTH, mt));
    }
    if mb > 0.0 {
        frame_bands.push(Rect::new(0.0, CANVAS_HEIGHT - mb, CANVAS_WIDTH, CANVAS_HEIGHT));
    }
    if ml > 0.0 {
        frame_bands.push(Rect::new(0.0, 0.0, ml, CANVAS_HEIGHT));
    }
    if mr > 0.0 {
        frame_bands.push(Rect::new(CANVAS_WIDTH - mr, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));
    }
    BgGeometry {
        dest: Rect::new(0.0, 0.0, w, h),
        frame_bands,
    }
}

/// Uniformly scale `(w, h)` against a target. `cover` picks the larger
/// ratio (fills, may overflow); otherwise the smaller (fits, may letterbox).
fn scaled(w: f64, h: f64, target_w: f64, target_h: f64, cover: bool) -> (f64, f64) {
    if w <= 0.0 || h <= 0.0 {
        return (0.0, 0.0);
    }
    let rx = target_w / w;
    let ry = target_h / h;
    let s = if cover { rx.max(ry) } else { rx.min(ry) };
    (w * s, h * s)
}

fn axis_offset(leftover: f64, keyword: PositionKeyword) -> f64 {
    match keyword {
        PositionKeyword::Start => 0.0,
        PositionKeyword::Center => leftover / 2.0,
        PositionKeyword::End => leftover,
    }
}

/// Destination rectangle for the logo: anchored at the inline-start and
/// block-start margins, mirrored under RTL.
pub fn logo_placement(
    natural_w: f64,
    natural_h: f64,
    size: Option<LogoSize>,
    margins: &Margins,
    dir: Direction,
) -> Rect {
    let (w, h) = match size {
        None => (natural_w, natural_h),
        Some(LogoSize::Width(w)) => {
            let h = if natural_w > 0.0 {
                w / natural_w * natural_h
            } else {
                0.0
            };
            (w, h)
        }
        Some(LogoSize::WidthHeight(w, h)) => (w, h),
    };
    let inline_start = margins.inline_start(dir);
    let x = if dir.is_rtl() {
        CANVAS_WIDTH - inline_start - w
    } else {
        inline_start
    };
    Rect::new(x, margins.top, x + w, margins.top + h)
}

/// Width available to the text column: canvas width minus both inline
/// margins and one extra padding unit of gutter.
pub fn text_column_width(margins: &Margins, padding: f64) -> f64 {
    (CANVAS_WIDTH - margins.left - margins.right - padding).max(0.0)
}

/// Left edge of the text column under `dir`.
pub fn text_left(margins: &Margins, dir: Direction, column_width: f64) -> f64 {
    let inline_start = margins.inline_start(dir);
    if dir.is_rtl() {
        CANVAS_WIDTH - inline_start - column_width
    } else {
        inline_start
    }
}

/// Vertical position of the text block.
///
/// The bottom-anchored natural position is clamped between `min_top`
/// (block-start margin, plus logo height and a padding gap when a logo was
/// drawn) and `min_top` plus one more padding unit of slack.
pub fn text_top(margins: &Margins, padding: f64, logo_height: f64, text_height: f64) -> f64 {
    let gap = if logo_height > 0.0 { padding } else { 0.0 };
    let min_top = margins.top + logo_height + gap;
    let max_top = min_top + gap;
    let natural_top = CANVAS_HEIGHT - margins.bottom - text_height;
    min_top.max(max_top.min(natural_top))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
