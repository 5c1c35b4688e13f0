//! Figure input model.
//!
//! Plain data describing what a figure shows; all positioning, measurement
//! and routing happens later in the layout pass.

/// One visual card: a titled box whose size comes from its measured text.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub detail: Option<String>,
}

impl Card {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(id: &str, title: &str, detail: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            detail: Some(detail.to_string()),
        }
    }
}

/// Card-to-card flow in a process figure. A label routes the connector
/// around a floating mid-path caption.
#[derive(Debug, Clone)]
pub struct Flow {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    /// Vertical bias for stacked parallel flows between the same columns.
    pub offset: f32,
}

impl Flow {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            label: None,
            offset: 0.0,
        }
    }

    pub fn labelled(from: &str, to: &str, label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::new(from, to)
        }
    }
}

/// Fan-in group: every source converges on one merge point before a single
/// shared segment enters the target.
#[derive(Debug, Clone)]
pub struct MergeGroup {
    pub sources: Vec<String>,
    pub target: String,
    /// Requested clearance between the merge point and the target edge;
    /// the solver floors this at its own minimum.
    pub gap: f32,
}

/// Process figure: columns of cards joined by flows and merge groups.
#[derive(Debug, Clone, Default)]
pub struct ProcessSpec {
    pub title: Option<String>,
    pub columns: Vec<Vec<Card>>,
    pub flows: Vec<Flow>,
    pub merges: Vec<MergeGroup>,
}

/// One step of a sequence figure; `x_fraction` places the card across the
/// figure width (0 = left edge, 1 = right edge).
#[derive(Debug, Clone)]
pub struct SequenceStep {
    pub card: Card,
    pub x_fraction: f32,
}

/// Sequence figure: steps stacked top-to-bottom, each joined to the next
/// with a vertical connector.
#[derive(Debug, Clone, Default)]
pub struct SequenceSpec {
    pub title: Option<String>,
    pub steps: Vec<SequenceStep>,
}

/// Named series of (x, value) samples.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f32, f32)>,
}

/// Time-series chart: one axis frame, one polyline per series.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesSpec {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub series: Vec<Series>,
}

/// One plotted station on the scatter map.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub lon: f32,
    pub lat: f32,
    /// Relative weight; scales the dot radius.
    pub weight: f32,
}

/// Geographic scatter map with an optional called-out station.
#[derive(Debug, Clone, Default)]
pub struct ScatterMapSpec {
    pub title: Option<String>,
    pub stations: Vec<Station>,
    pub highlight: Option<String>,
}

/// Any renderable figure.
#[derive(Debug, Clone)]
pub enum FigureSpec {
    Process(ProcessSpec),
    Sequence(SequenceSpec),
    TimeSeries(TimeSeriesSpec),
    ScatterMap(ScatterMapSpec),
}

impl FigureSpec {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Process(spec) => spec.title.as_deref(),
            Self::Sequence(spec) => spec.title.as_deref(),
            Self::TimeSeries(spec) => spec.title.as_deref(),
            Self::ScatterMap(spec) => spec.title.as_deref(),
        }
    }
}
