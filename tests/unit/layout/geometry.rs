use super::*;

use kurbo::Rect;

use crate::card::model::{
    BgFit, BgPlacement, BgPosition, BorderStyle, Direction, LegacySize, LogicalSide, LogoSize,
    PositionKeyword,
};

#[test]
fn logical_sides_resolve_against_direction() {
    assert_eq!(
        physical_side(LogicalSide::InlineStart, Direction::Ltr),
        PhysicalSide::Left
    );
    assert_eq!(
        physical_side(LogicalSide::InlineStart, Direction::Rtl),
        PhysicalSide::Right
    );
    assert_eq!(
        physical_side(LogicalSide::InlineEnd, Direction::Rtl),
        PhysicalSide::Left
    );
    // Block sides are direction-independent.
    assert_eq!(
        physical_side(LogicalSide::BlockStart, Direction::Rtl),
        PhysicalSide::Top
    );
    assert_eq!(
        physical_side(LogicalSide::BlockEnd, Direction::Ltr),
        PhysicalSide::Bottom
    );
}

#[test]
fn border_width_folds_into_its_side_margin() {
    let border = BorderStyle {
        color: [255, 255, 255],
        width: 25.0,
        side: LogicalSide::InlineStart,
    };
    let ltr = Margins::new(60.0, Some(&border), Direction::Ltr);
    assert_eq!(ltr.left, 85.0);
    assert_eq!(ltr.right, 60.0);

    let rtl = Margins::new(60.0, Some(&border), Direction::Rtl);
    assert_eq!(rtl.right, 85.0);
    assert_eq!(rtl.left, 60.0);
    assert_eq!(rtl.inline_start(Direction::Rtl), 85.0);
}

#[test]
fn zero_width_border_adds_nothing() {
    let border = BorderStyle {
        width: 0.0,
        ..BorderStyle::default()
    };
    let m = Margins::new(40.0, Some(&border), Direction::Ltr);
    assert_eq!(m, Margins::new(40.0, None, Direction::Ltr));
}

#[test]
fn negative_padding_clamps_to_zero() {
    let m = Margins::new(-10.0, None, Direction::Ltr);
    assert_eq!(m.top, 0.0);
    assert_eq!(m.left, 0.0);
}

#[test]
fn cover_fills_and_contain_letterboxes_a_wide_source() {
    // Source aspect 4.0 is wider than the canvas aspect (1200/630).
    let wide = BgPlacement::Modern {
        fit: BgFit::Cover,
        position: BgPosition::default(),
    };
    let geom = background_placement(&wide, 2520.0, 630.0, Direction::Ltr);
    assert_eq!(geom.dest.height(), CANVAS_HEIGHT);
    assert!(geom.dest.width() > CANVAS_WIDTH);

    let contain = BgPlacement::Modern {
        fit: BgFit::Contain,
        position: BgPosition::default(),
    };
    let geom = background_placement(&contain, 2520.0, 630.0, Direction::Ltr);
    assert_eq!(geom.dest.width(), CANVAS_WIDTH);
    assert!(geom.dest.height() < CANVAS_HEIGHT);
    // Centered letterbox: equal bands above and below.
    assert_eq!(geom.dest.y0, (CANVAS_HEIGHT - geom.dest.height()) / 2.0);
}

#[test]
fn fill_stretches_to_canvas_and_none_keeps_natural_size() {
    let fill = BgPlacement::Modern {
        fit: BgFit::Fill,
        position: BgPosition::default(),
    };
    let geom = background_placement(&fill, 10.0, 10.0, Direction::Ltr);
    assert_eq!(geom.dest, Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));

    let none = BgPlacement::Modern {
        fit: BgFit::None,
        position: BgPosition::default(),
    };
    let geom = background_placement(&none, 100.0, 50.0, Direction::Ltr);
    assert_eq!(geom.dest.width(), 100.0);
    assert_eq!(geom.dest.height(), 50.0);
}

#[test]
fn inline_position_mirrors_under_rtl() {
    let placement = BgPlacement::Modern {
        fit: BgFit::None,
        position: BgPosition {
            block: PositionKeyword::Start,
            inline: PositionKeyword::Start,
        },
    };
    let ltr = background_placement(&placement, 200.0, 100.0, Direction::Ltr);
    assert_eq!(ltr.dest.x0, 0.0);

    let rtl = background_placement(&placement, 200.0, 100.0, Direction::Rtl);
    assert_eq!(rtl.dest.x1, CANVAS_WIDTH);
    // The block axis does not mirror.
    assert_eq!(rtl.dest.y0, 0.0);
}

#[test]
fn legacy_non_crop_insets_and_anchors_top_left() {
    let placement = BgPlacement::Legacy {
        size: Some(LegacySize::Contain),
        margin: [10.0, 20.0, 30.0, 40.0],
        crop: false,
    };
    // Target is 1140x590; a square source contains to 590x590 at (40, 10).
    let geom = background_placement(&placement, 500.0, 500.0, Direction::Ltr);
    assert_eq!(geom.dest, Rect::new(40.0, 10.0, 630.0, 600.0));
    assert!(geom.frame_bands.is_empty());
}

#[test]
fn legacy_crop_scales_to_canvas_and_frames_margins() {
    let placement = BgPlacement::Legacy {
        size: None,
        margin: [50.0, 0.0, 0.0, 100.0],
        crop: true,
    };
    let geom = background_placement(&placement, 333.0, 77.0, Direction::Ltr);
    // Unsized crop stretches the image across the whole canvas.
    assert_eq!(geom.dest, Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));
    // Bands only for the non-zero margins.
    assert_eq!(geom.frame_bands.len(), 2);
    assert!(geom
        .frame_bands
        .contains(&Rect::new(0.0, 0.0, CANVAS_WIDTH, 50.0)));
    assert!(geom
        .frame_bands
        .contains(&Rect::new(0.0, 0.0, 100.0, CANVAS_HEIGHT)));
}

#[test]
fn logo_single_width_scales_proportionally() {
    let margins = Margins::new(60.0, None, Direction::Ltr);
    let dest = logo_placement(
        700.0,
        200.0,
        Some(LogoSize::Width(350.0)),
        &margins,
        Direction::Ltr,
    );
    assert_eq!(dest.width(), 350.0);
    assert_eq!(dest.height(), 100.0);
    assert_eq!((dest.x0, dest.y0), (60.0, 60.0));
}

#[test]
fn logo_two_values_stretch_and_rtl_anchors_right() {
    let margins = Margins::new(60.0, None, Direction::Rtl);
    let dest = logo_placement(
        700.0,
        200.0,
        Some(LogoSize::WidthHeight(300.0, 300.0)),
        &margins,
        Direction::Rtl,
    );
    assert_eq!(dest.width(), 300.0);
    assert_eq!(dest.height(), 300.0);
    assert_eq!(dest.x1, CANVAS_WIDTH - 60.0);
}

#[test]
fn text_column_leaves_a_gutter() {
    let margins = Margins::new(60.0, None, Direction::Ltr);
    assert_eq!(text_column_width(&margins, 60.0), 1200.0 - 60.0 - 60.0 - 60.0);

    let ltr_left = text_left(&margins, Direction::Ltr, 1020.0);
    assert_eq!(ltr_left, 60.0);
    let rtl_left = text_left(&margins, Direction::Rtl, 1020.0);
    assert_eq!(rtl_left, CANVAS_WIDTH - 60.0 - 1020.0);
}

#[test]
fn without_logo_text_anchors_at_top_margin() {
    let margins = Margins::new(60.0, None, Direction::Ltr);
    // No logo leaves no slack: the clamp pins the paragraph to the
    // block-start margin no matter how short the text is.
    let top = text_top(&margins, 60.0, 0.0, 100.0);
    assert_eq!(top, 60.0);
}

#[test]
fn tall_text_clamps_below_the_logo() {
    let margins = Margins::new(60.0, None, Direction::Ltr);
    let logo_height = 100.0;
    // Text taller than the remaining band pins to just under the logo.
    let top = text_top(&margins, 60.0, logo_height, 600.0);
    assert_eq!(top, 60.0 + logo_height + 60.0);
}

#[test]
fn text_top_slack_is_one_padding_unit_with_a_logo() {
    let margins = Margins::new(60.0, None, Direction::Ltr);
    // Tiny text would naturally sit far below; the clamp allows at most one
    // extra padding unit past the minimum.
    let top = text_top(&margins, 60.0, 100.0, 10.0);
    let min_top = 60.0 + 100.0 + 60.0;
    assert_eq!(top, min_top + 60.0);
}
