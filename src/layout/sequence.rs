//! Sequence figure: steps stacked top-to-bottom, joined by vertical
//! connectors that bend into an S when consecutive steps sit in
//! different lanes.

use crate::config::LayoutConfig;
use crate::figure::SequenceSpec;
use crate::geometry::{PathOptions, vertical_connector};
use crate::measure::{MeasureSource, StaticMeasures};
use crate::theme::Theme;

use super::{ConnectorLayout, FigureKind, FigureLayout, measure_card, place_title};

pub(crate) fn compute(spec: &SequenceSpec, theme: &Theme, config: &LayoutConfig) -> FigureLayout {
    let mut layout = FigureLayout::new(FigureKind::Sequence);
    let top = place_title(&mut layout, spec.title.as_deref(), theme, config);

    let lane_span = config.sequence.lane_width;
    let mut cards = Vec::with_capacity(spec.steps.len());
    let mut y = top;
    for step in &spec.steps {
        let mut card = measure_card(&step.card, theme, config);
        let fraction = step.x_fraction.clamp(0.0, 1.0);
        card.x = config.figure_padding + fraction * (lane_span - card.width).max(0.0);
        card.y = y;
        y += card.height + config.sequence.row_gap;
        cards.push(card);
    }

    let mut measures = StaticMeasures::new();
    for card in &cards {
        measures.insert(&card.id, card.rect());
    }

    for pair in spec.steps.windows(2) {
        let from = measures.measure(&pair[0].card.id);
        let to = measures.measure(&pair[1].card.id);
        layout.connectors.push(ConnectorLayout {
            path: vertical_connector(from, to, &PathOptions::default()),
            arrow: true,
            label: None,
            label_anchor: None,
        });
    }

    let right = cards
        .iter()
        .map(|card| card.x + card.width)
        .fold(config.figure_padding + lane_span, f32::max);
    layout.width = right + config.figure_padding;
    layout.height = cards
        .iter()
        .map(|card| card.y + card.height)
        .fold(top, f32::max)
        + config.figure_padding;
    layout.cards = cards;
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Card, SequenceStep};

    fn step(id: &str, title: &str, x_fraction: f32) -> SequenceStep {
        SequenceStep {
            card: Card::new(id, title),
            x_fraction,
        }
    }

    #[test]
    fn consecutive_steps_are_joined_in_order() {
        let spec = SequenceSpec {
            title: Some("Handshake".to_string()),
            steps: vec![
                step("req", "Request", 0.0),
                step("ack", "Acknowledge", 1.0),
                step("done", "Complete", 0.5),
            ],
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert_eq!(layout.connectors.len(), 2);
        for (idx, connector) in layout.connectors.iter().enumerate() {
            let target = &layout.cards[idx + 1];
            let end = connector.path.end_point().expect("routed connector");
            assert_eq!(end.1, target.y, "connector lands on the top edge");
        }
    }

    #[test]
    fn single_step_produces_no_connectors() {
        let spec = SequenceSpec {
            title: None,
            steps: vec![step("only", "Only", 0.5)],
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert!(layout.connectors.is_empty());
        assert_eq!(layout.cards.len(), 1);
    }
}
