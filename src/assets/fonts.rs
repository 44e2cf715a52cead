use std::{borrow::Cow, collections::HashSet};

use crate::{
    assets::cache::ResolvedAsset,
    card::model::{Direction, FontOverrides, FontStyle, RgbColor},
};

/// RGBA8 brush color attached to Parley text runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrush {
    fn from_rgb(c: RgbColor) -> Self {
        Self {
            r: c[0],
            g: c[1],
            b: c[2],
            a: 255,
        }
    }
}

/// Font-family index over every font resource resolved so far.
///
/// Registration is incremental: a resolve wave that fetched nothing new
/// leaves the underlying collection untouched, so repeated renders with the
/// same font list pay the indexing cost exactly once.
pub struct FontResolver {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    registered: HashSet<String>,
    families: Vec<String>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver {
    /// Construct a resolver with fresh Parley contexts and no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashSet::new(),
            families: Vec::new(),
        }
    }

    /// Register font resources that have not been seen before.
    ///
    /// `ids` and `resolved` are the identifier list and the matching batch
    /// result from [`crate::AssetCache::resolve_batch`]. Returns whether any
    /// font was newly registered.
    pub fn register_new(&mut self, ids: &[String], resolved: &[Option<ResolvedAsset>]) -> bool {
        let mut added = false;
        for (id, asset) in ids.iter().zip(resolved) {
            if self.registered.contains(id) {
                continue;
            }
            self.registered.insert(id.clone());
            let Some(asset) = asset else {
                continue;
            };
            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(asset.bytes.to_vec()), None);
            for (family_id, _) in &families {
                if let Some(name) = self.font_ctx.collection.family_name(*family_id) {
                    let name = name.to_string();
                    if !self.families.contains(&name) {
                        self.families.push(name);
                    }
                }
            }
            added = true;
        }
        if added {
            tracing::debug!(
                count = self.families.len(),
                families = %self.families.join(", "),
                "loaded font families"
            );
        }
        added
    }

    /// Resolved family names contained in the index, for diagnostics.
    pub fn family_names(&self) -> &[String] {
        &self.families
    }

    /// Whether at least one font resource resolved successfully.
    pub fn has_fonts(&self) -> bool {
        !self.families.is_empty()
    }

    /// Discard the index and every registered font.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Shape and lay out the card paragraph: title, a thin gap run, then the
    /// description, wrapped to `max_width`. HTML entities in both blocks are
    /// decoded before shaping, since page front matter routinely carries
    /// `&amp;` and friends.
    ///
    /// Returns `None` when no font resource ever resolved; the caller skips
    /// the text step entirely.
    pub fn layout_card_text(
        &mut self,
        title: &str,
        description: &str,
        font: &FontOverrides,
        padding: f64,
        dir: Direction,
        max_width: f64,
    ) -> Option<parley::Layout<TextBrush>> {
        if !self.has_fonts() {
            return None;
        }

        let (text, gap_range, desc_range) = card_text(title, description);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);

        push_block_style(&mut builder, &font.title, None);
        // The empty line between title and description is a third run with
        // its own compact metrics.
        builder.push(
            parley::style::StyleProperty::FontSize((padding / 3.0) as f32),
            gap_range.clone(),
        );
        builder.push(
            parley::style::StyleProperty::LineHeight(
                parley::style::LineHeight::FontSizeRelative(1.0),
            ),
            gap_range,
        );
        push_block_style(&mut builder, &font.description, Some(desc_range));

        let mut layout: parley::Layout<TextBrush> = builder.build(&text);
        let width = max_width.max(0.0) as f32;
        layout.break_all_lines(Some(width));
        layout.align(
            Some(width),
            paragraph_alignment(dir),
            parley::AlignmentOptions::default(),
        );
        Some(layout)
    }
}

// Physical alignment, not Start/End: parley resolves the logical variants
// against the paragraph's detected base direction, so End on RTL-script
// text would land on the left edge. The requested direction alone decides
// the edge here.
fn paragraph_alignment(dir: Direction) -> parley::Alignment {
    if dir.is_rtl() {
        parley::Alignment::Right
    } else {
        parley::Alignment::Left
    }
}

// Decoded paragraph text plus the byte ranges of the gap run and the
// description block within it.
fn card_text(
    title: &str,
    description: &str,
) -> (String, std::ops::Range<usize>, std::ops::Range<usize>) {
    let title = html_escape::decode_html_entities(title);
    let description = html_escape::decode_html_entities(description);
    let text = format!("{title}\n\n{description}");
    let gap_range = title.len()..title.len() + 2;
    let desc_range = gap_range.end..text.len();
    (text, gap_range, desc_range)
}

fn push_block_style(
    builder: &mut parley::RangedBuilder<'_, TextBrush>,
    style: &FontStyle,
    range: Option<std::ops::Range<usize>>,
) {
    use parley::style::{
        FontFamily, FontStack, FontWeight, LineHeight, StyleProperty,
    };

    let families: Vec<FontFamily<'static>> = style
        .families
        .iter()
        .map(|f| FontFamily::Named(Cow::Owned(f.clone())))
        .collect();
    let props = [
        StyleProperty::FontStack(FontStack::List(Cow::Owned(families))),
        StyleProperty::FontSize(style.size as f32),
        StyleProperty::LineHeight(LineHeight::FontSizeRelative(style.line_height as f32)),
        StyleProperty::FontWeight(FontWeight::new(f32::from(style.weight))),
        StyleProperty::Brush(TextBrush::from_rgb(style.color)),
    ];
    for prop in props {
        match &range {
            Some(r) => builder.push(prop, r.clone()),
            None => builder.push_default(prop),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
