//! Figure layout.
//!
//! Turns a [`FigureSpec`](crate::figure::FigureSpec) into positioned marks:
//! cards sized from measured text, connector paths produced by the geometry
//! engine, plus the polylines, dots and labels of the chart figures. The
//! output is plain data consumed by the SVG renderer.

use crate::config::LayoutConfig;
use crate::figure::{Card, FigureSpec};
use crate::geometry::{PathDescriptor, Rect};
use crate::text::{measure_text_width, wrap_text};
use crate::theme::Theme;

pub mod process;
pub mod scatter;
pub mod sequence;
pub mod timeseries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Process,
    Sequence,
    TimeSeries,
    ScatterMap,
}

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

/// Wrap and measure a text run at the theme's base font size.
pub fn text_block(text: &str, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    scaled_text_block(text, 1.0, theme, config)
}

pub(crate) fn scaled_text_block(
    text: &str,
    font_scale: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> TextBlock {
    let font_size = theme.font_size * font_scale;
    let lines = wrap_text(text, config.max_label_width_chars);
    let width = lines
        .iter()
        .map(|line| measure_text_width(line, font_size, &theme.font_family))
        .fold(0.0f32, f32::max);
    let height = lines.len() as f32 * font_size * config.label_line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

#[derive(Debug, Clone)]
pub struct CardLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: TextBlock,
    pub detail: Option<TextBlock>,
}

impl CardLayout {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Size a card from its measured title and optional detail line.
pub(crate) fn measure_card(card: &Card, theme: &Theme, config: &LayoutConfig) -> CardLayout {
    let title = text_block(&card.title, theme, config);
    let detail = card
        .detail
        .as_deref()
        .map(|detail| scaled_text_block(detail, 0.85, theme, config));
    let text_width = detail
        .as_ref()
        .map(|block| block.width)
        .unwrap_or(0.0)
        .max(title.width);
    let text_height = title.height + detail.as_ref().map(|block| block.height).unwrap_or(0.0);
    CardLayout {
        id: card.id.clone(),
        x: 0.0,
        y: 0.0,
        width: (text_width + 2.0 * config.card_padding_x).max(config.card_min_width),
        height: text_height + 2.0 * config.card_padding_y,
        title,
        detail,
    }
}

#[derive(Debug, Clone)]
pub struct ConnectorLayout {
    pub path: PathDescriptor,
    pub arrow: bool,
    pub label: Option<TextBlock>,
    pub label_anchor: Option<(f32, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAlign {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone)]
pub struct LabelLayout {
    pub x: f32,
    pub y: f32,
    pub text: TextBlock,
    pub align: LabelAlign,
    pub muted: bool,
    pub font_scale: f32,
}

/// Stroked polyline; `series` of `None` draws in the grid color.
#[derive(Debug, Clone)]
pub struct PolylineLayout {
    pub points: Vec<(f32, f32)>,
    pub series: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct DotLayout {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub series: usize,
}

#[derive(Debug, Clone)]
pub struct FigureLayout {
    pub kind: FigureKind,
    pub width: f32,
    pub height: f32,
    pub frames: Vec<Rect>,
    pub cards: Vec<CardLayout>,
    pub connectors: Vec<ConnectorLayout>,
    pub polylines: Vec<PolylineLayout>,
    pub dots: Vec<DotLayout>,
    pub labels: Vec<LabelLayout>,
}

impl FigureLayout {
    pub(crate) fn new(kind: FigureKind) -> Self {
        Self {
            kind,
            width: 0.0,
            height: 0.0,
            frames: Vec::new(),
            cards: Vec::new(),
            connectors: Vec::new(),
            polylines: Vec::new(),
            dots: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Place the figure title and return the y where content starts.
pub(crate) fn place_title(
    layout: &mut FigureLayout,
    title: Option<&str>,
    theme: &Theme,
    config: &LayoutConfig,
) -> f32 {
    let top = config.figure_padding;
    let Some(title) = title else {
        return top;
    };
    let text = scaled_text_block(title, 1.15, theme, config);
    layout.labels.push(LabelLayout {
        x: config.figure_padding,
        y: top + text.height / 2.0,
        text,
        align: LabelAlign::Start,
        muted: false,
        font_scale: 1.15,
    });
    top + config.title_gap
}

pub fn compute_layout(spec: &FigureSpec, theme: &Theme, config: &LayoutConfig) -> FigureLayout {
    match spec {
        FigureSpec::Process(spec) => process::compute(spec, theme, config),
        FigureSpec::Sequence(spec) => sequence::compute(spec, theme, config),
        FigureSpec::TimeSeries(spec) => timeseries::compute(spec, theme, config),
        FigureSpec::ScatterMap(spec) => scatter::compute(spec, theme, config),
    }
}
