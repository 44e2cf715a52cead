use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};

/// An `[r, g, b]` color triple.
pub type RgbColor = [u8; 3];

/// Font resource fetched when a request does not name its own fonts.
pub const DEFAULT_FONT_URL: &str =
    "https://api.fontsource.org/v1/fonts/noto-sans/latin-400-normal.ttf";

/// Writing direction for the card's text and direction-sensitive layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl Direction {
    /// Whether this is the right-to-left direction.
    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }
}

/// A margin/border side expressed relative to writing direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogicalSide {
    /// Top edge.
    BlockStart,
    /// Bottom edge.
    BlockEnd,
    /// Left edge under LTR, right edge under RTL.
    InlineStart,
    /// Right edge under LTR, left edge under RTL.
    InlineEnd,
}

/// Encoded output format for the rendered card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Portable Network Graphics. `quality` is ignored.
    #[default]
    Png,
    /// JPEG at the requested `quality`.
    Jpeg,
    /// Lossless WebP. `quality` is ignored.
    Webp,
}

impl OutputFormat {
    /// File extension used for cache entries and default slugs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

/// Border highlighting a single logical edge of the card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderStyle {
    /// RGB border color.
    pub color: RgbColor,
    /// Border width in logical units. `0` disables the border.
    pub width: f64,
    /// Logical side to draw the border on.
    pub side: LogicalSide,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            color: [255, 255, 255],
            width: 0.0,
            side: LogicalSide::InlineStart,
        }
    }
}

/// Styling for one text block (title or description).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default = "FontStyle::title_default")]
pub struct FontStyle {
    /// RGB text color.
    pub color: RgbColor,
    /// Font size in logical units.
    pub size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Numeric font weight (400 = normal, 700 = bold).
    pub weight: u16,
    /// Ordered family fallback stack. Families must be provided through the
    /// request's `fonts` list to be resolvable.
    pub families: Vec<String>,
}

impl FontStyle {
    /// Default style for the title block.
    pub fn title_default() -> Self {
        Self {
            color: [255, 255, 255],
            size: 70.0,
            line_height: 1.0,
            weight: 400,
            families: vec!["Noto Sans".to_string()],
        }
    }

    /// Default style for the description block.
    pub fn description_default() -> Self {
        Self {
            size: 40.0,
            line_height: 1.3,
            ..Self::title_default()
        }
    }
}

/// Per-block font styles for the card's two text blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOverrides {
    /// Style for the title block.
    pub title: FontStyle,
    /// Style for the description block.
    pub description: FontStyle,
}

impl Default for FontOverrides {
    fn default() -> Self {
        Self {
            title: FontStyle::title_default(),
            description: FontStyle::description_default(),
        }
    }
}

/// Logo target size.
///
/// Serialized as `[width]` (height scales proportionally) or
/// `[width, height]` (stretched independently).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub enum LogoSize {
    /// Scale to this width, keeping the source aspect ratio.
    Width(f64),
    /// Stretch to this exact width and height.
    WidthHeight(f64, f64),
}

impl TryFrom<Vec<f64>> for LogoSize {
    type Error = String;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [w] => Ok(LogoSize::Width(*w)),
            [w, h] => Ok(LogoSize::WidthHeight(*w, *h)),
            _ => Err("logo size must be [width] or [width, height]".to_string()),
        }
    }
}

impl From<LogoSize> for Vec<f64> {
    fn from(s: LogoSize) -> Self {
        match s {
            LogoSize::Width(w) => vec![w],
            LogoSize::WidthHeight(w, h) => vec![w, h],
        }
    }
}

/// Site logo displayed at the top of the card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    /// Path to the logo image file.
    pub path: String,
    /// Target size. `None` uses the source image dimensions.
    #[serde(default)]
    pub size: Option<LogoSize>,
}

/// Scaling algorithm for fitting the background image into the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BgFit {
    /// Natural image size, no scaling.
    #[default]
    None,
    /// Uniform scale until the smaller relative dimension matches the
    /// canvas; overflow is cropped.
    Cover,
    /// Uniform scale until the larger relative dimension matches the
    /// canvas; the orthogonal axis may letterbox.
    Contain,
    /// Stretch to exactly the canvas size, ignoring aspect ratio.
    Fill,
}

/// Legacy-mode scaling for the background image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacySize {
    /// Scale to fully cover the target rectangle.
    Cover,
    /// Scale to fit inside the target rectangle.
    Contain,
}

/// Per-axis position keyword for modern background placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKeyword {
    /// Anchor at the start of the axis (direction-sensitive on the inline
    /// axis).
    Start,
    /// Center the axis.
    #[default]
    Center,
    /// Anchor at the end of the axis.
    End,
}

impl PositionKeyword {
    /// Mirror start and end, used for the inline axis under RTL.
    pub fn mirrored(self) -> Self {
        match self {
            PositionKeyword::Start => PositionKeyword::End,
            PositionKeyword::Center => PositionKeyword::Center,
            PositionKeyword::End => PositionKeyword::Start,
        }
    }
}

/// Background image position, resolved independently per axis.
///
/// Serialized as a single keyword applied to both axes or a
/// `[block, inline]` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct BgPosition {
    /// Vertical (block-axis) position.
    pub block: PositionKeyword,
    /// Horizontal (inline-axis) position; mirrors under RTL.
    pub inline: PositionKeyword,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPosition {
    One(PositionKeyword),
    Pair(PositionKeyword, PositionKeyword),
}

impl From<RawPosition> for BgPosition {
    fn from(raw: RawPosition) -> Self {
        match raw {
            RawPosition::One(k) => BgPosition {
                block: k,
                inline: k,
            },
            RawPosition::Pair(block, inline) => BgPosition { block, inline },
        }
    }
}

impl From<BgPosition> for RawPosition {
    fn from(p: BgPosition) -> Self {
        if p.block == p.inline {
            RawPosition::One(p.block)
        } else {
            RawPosition::Pair(p.block, p.inline)
        }
    }
}

/// Placement semantics for the background image.
///
/// The two modes are mutually exclusive by construction: a descriptor is
/// either legacy (`size`/`margin`/`crop`) or modern (`fit`/`position`),
/// never a mix.
#[derive(Clone, Debug, PartialEq)]
pub enum BgPlacement {
    /// Margin-inset placement with optional gradient-frame cropping.
    Legacy {
        /// Scaling against the target rectangle. `None` keeps natural size.
        size: Option<LegacySize>,
        /// Inset as `[top, right, bottom, left]`.
        margin: [f64; 4],
        /// When set, the image is scaled against the full canvas and the
        /// margin bands are re-painted with the background gradient.
        crop: bool,
    },
    /// Fit-and-position placement against the full canvas.
    Modern {
        /// Scaling algorithm.
        fit: BgFit,
        /// Per-axis anchor for leftover space.
        position: BgPosition,
    },
}

impl Default for BgPlacement {
    fn default() -> Self {
        BgPlacement::Modern {
            fit: BgFit::default(),
            position: BgPosition::default(),
        }
    }
}

/// Background image descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBackgroundImage", into = "RawBackgroundImage")]
pub struct BackgroundImage {
    /// Path to the background image file.
    pub path: String,
    /// Placement semantics.
    pub placement: BgPlacement,
}

impl BackgroundImage {
    /// Background image in modern fit-and-position mode.
    pub fn modern(path: impl Into<String>, fit: BgFit, position: BgPosition) -> Self {
        Self {
            path: path.into(),
            placement: BgPlacement::Modern { fit, position },
        }
    }

    /// Background image in legacy margin mode. Supplying a margin implies
    /// cropping unless `crop` says otherwise.
    pub fn legacy(
        path: impl Into<String>,
        size: Option<LegacySize>,
        margin: Option<[f64; 4]>,
        crop: Option<bool>,
    ) -> Self {
        let crop = crop.unwrap_or(margin.is_some());
        Self {
            path: path.into(),
            placement: BgPlacement::Legacy {
                size,
                margin: margin.unwrap_or([0.0; 4]),
                crop,
            },
        }
    }
}

/// Wire shape for [`BackgroundImage`]: one flat record whose legacy and
/// modern fields are checked for mutual exclusivity at construction.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawBackgroundImage {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<LegacySize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    margin: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fit: Option<BgFit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<BgPosition>,
}

impl TryFrom<RawBackgroundImage> for BackgroundImage {
    type Error = String;

    fn try_from(raw: RawBackgroundImage) -> Result<Self, Self::Error> {
        let legacy = raw.size.is_some() || raw.margin.is_some() || raw.crop.is_some();
        let modern = raw.fit.is_some() || raw.position.is_some();
        if legacy && modern {
            return Err(
                "background image cannot mix legacy (size/margin/crop) and modern (fit/position) options"
                    .to_string(),
            );
        }
        if legacy {
            Ok(BackgroundImage::legacy(raw.path, raw.size, raw.margin, raw.crop))
        } else {
            Ok(BackgroundImage::modern(
                raw.path,
                raw.fit.unwrap_or_default(),
                raw.position.unwrap_or_default(),
            ))
        }
    }
}

impl From<BackgroundImage> for RawBackgroundImage {
    fn from(bg: BackgroundImage) -> Self {
        match bg.placement {
            BgPlacement::Legacy { size, margin, crop } => RawBackgroundImage {
                path: bg.path,
                size,
                margin: Some(margin),
                crop: Some(crop),
                ..Default::default()
            },
            BgPlacement::Modern { fit, position } => RawBackgroundImage {
                path: bg.path,
                fit: Some(fit),
                position: Some(position),
                ..Default::default()
            },
        }
    }
}

/// Declarative description of one card image.
///
/// Every field participates in the output-cache key except `cache_dir`,
/// which controls caching without affecting rendered pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    /// Page title, the card's primary text block.
    pub title: String,
    /// Short page description drawn below the title.
    pub description: String,
    /// Writing direction.
    pub dir: Direction,
    /// Ordered RGB stops for the vertical background gradient. A single
    /// stop paints a solid color. Must not be empty.
    pub bg_gradient: Vec<RgbColor>,
    /// Optional background image.
    pub bg_image: Option<BackgroundImage>,
    /// Optional border along one logical edge.
    pub border: Option<BorderStyle>,
    /// Padding between the canvas edge and content, in logical units.
    pub padding: f64,
    /// Optional site logo.
    pub logo: Option<Logo>,
    /// Font styles for the title and description blocks.
    pub font: FontOverrides,
    /// Font resources to load, as URLs or local paths.
    pub fonts: Vec<String>,
    /// Output encoding.
    pub format: OutputFormat,
    /// Encode quality, `0`..=`100`. Only used by lossy formats.
    pub quality: u8,
    /// Directory for the content-addressed output cache. `None` disables
    /// output caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            dir: Direction::Ltr,
            bg_gradient: vec![[0, 0, 0]],
            bg_image: None,
            border: None,
            padding: 60.0,
            logo: None,
            font: FontOverrides::default(),
            fonts: vec![DEFAULT_FONT_URL.to_string()],
            format: OutputFormat::Png,
            quality: 90,
            cache_dir: None,
        }
    }
}

impl RenderRequest {
    /// Request with the given title and defaults for everything else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Parse a request from its JSON description.
    pub fn from_json_str(json: &str) -> CardResult<Self> {
        serde_json::from_str(json).map_err(|e| CardError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/model.rs"]
mod tests;
