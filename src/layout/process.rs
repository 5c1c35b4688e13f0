//! Process figure: columns of cards joined by curved flows, labelled
//! flows, and merge groups.

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::figure::ProcessSpec;
use crate::geometry::{
    PathOptions, Side, curved_connector, labelled_connector, merge_connector, merge_point,
};
use crate::measure::{MeasureSource, StaticMeasures};
use crate::theme::Theme;

use super::{ConnectorLayout, FigureKind, FigureLayout, measure_card, place_title, text_block};

pub(crate) fn compute(spec: &ProcessSpec, theme: &Theme, config: &LayoutConfig) -> FigureLayout {
    let mut layout = FigureLayout::new(FigureKind::Process);
    let top = place_title(&mut layout, spec.title.as_deref(), theme, config);

    // Measure every card first, then place columns left to right with each
    // column's stack centered on the tallest one.
    let mut columns: Vec<Vec<super::CardLayout>> = spec
        .columns
        .iter()
        .map(|column| {
            column
                .iter()
                .map(|card| measure_card(card, theme, config))
                .collect()
        })
        .collect();

    let row_gap = config.process.row_gap;
    let stack_height = |cards: &[super::CardLayout]| -> f32 {
        let gaps = cards.len().saturating_sub(1) as f32 * row_gap;
        cards.iter().map(|card| card.height).sum::<f32>() + gaps
    };
    let tallest = columns
        .iter()
        .map(|cards| stack_height(cards))
        .fold(0.0f32, f32::max);

    let mut x = config.figure_padding;
    for cards in &mut columns {
        let column_width = cards.iter().map(|card| card.width).fold(0.0f32, f32::max);
        let mut y = top + (tallest - stack_height(cards)) / 2.0;
        for card in cards.iter_mut() {
            card.x = x + (column_width - card.width) / 2.0;
            card.y = y;
            y += card.height + row_gap;
        }
        x += column_width + config.process.column_gap;
    }

    // Routing reads card boxes back through the measurement contract, the
    // same way a live host would.
    let mut measures = StaticMeasures::new();
    for cards in &columns {
        for card in cards {
            measures.insert(&card.id, card.rect());
        }
    }

    // Repeated flows between the same pair of cards fan apart vertically so
    // their strokes stay distinguishable.
    let mut pair_seen: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for flow in &spec.flows {
        let from = measures.measure(&flow.from);
        let to = measures.measure(&flow.to);
        let seen = pair_seen
            .entry((flow.from.as_str(), flow.to.as_str()))
            .or_insert(0);
        let fan = *seen as f32 * config.process.flow_offset_step;
        *seen += 1;
        let options = PathOptions {
            offset: flow.offset + fan,
            arc_lift: config.process.arc_lift,
            ..PathOptions::default()
        };
        match flow.label.as_deref() {
            Some(label) => {
                let text = text_block(label, theme, config);
                let routed = labelled_connector(from, to, text.width, &options);
                layout.connectors.push(ConnectorLayout {
                    path: routed.path,
                    arrow: true,
                    label: Some(text),
                    label_anchor: routed.label_anchor,
                });
            }
            None => {
                layout.connectors.push(ConnectorLayout {
                    path: curved_connector(from, to, &options),
                    arrow: true,
                    label: None,
                    label_anchor: None,
                });
            }
        }
    }

    for group in &spec.merges {
        let sources: Vec<_> = group
            .sources
            .iter()
            .map(|id| measures.measure(id))
            .collect();
        let target = measures.measure(&group.target);
        let gap = if group.gap > 0.0 {
            group.gap
        } else {
            config.process.merge_gap
        };
        // Solved before anything is emitted, so no frame can ever show the
        // convergence at the origin.
        let Some(point) = merge_point(&sources, target, gap, Side::Left) else {
            continue;
        };
        for source in &sources {
            layout.connectors.push(ConnectorLayout {
                path: merge_connector(*source, target, point, false, &PathOptions::default()),
                arrow: false,
                label: None,
                label_anchor: None,
            });
        }
        let collector_options = PathOptions {
            // The merge point sits close to the target; the default run
            // floor would balloon the shared segment.
            min_dx: 32.0,
            ..PathOptions::default()
        };
        layout.connectors.push(ConnectorLayout {
            path: merge_connector(None, target, point, true, &collector_options),
            arrow: true,
            label: None,
            label_anchor: None,
        });
    }

    let right = columns
        .iter()
        .flatten()
        .map(|card| card.x + card.width)
        .fold(0.0f32, f32::max);
    let bottom = columns
        .iter()
        .flatten()
        .map(|card| card.y + card.height)
        .fold(top + tallest, f32::max);
    layout.width = right + config.figure_padding;
    layout.height = bottom + config.figure_padding;
    layout.cards = columns.into_iter().flatten().collect();
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Card, Flow, MergeGroup};
    use crate::geometry::MERGE_MIN_GAP;

    fn two_into_one() -> ProcessSpec {
        ProcessSpec {
            title: Some("Fan-in".to_string()),
            columns: vec![
                vec![Card::new("a", "Alpha"), Card::new("b", "Beta")],
                vec![Card::new("c", "Gamma")],
            ],
            flows: Vec::new(),
            merges: vec![MergeGroup {
                sources: vec!["a".to_string(), "b".to_string()],
                target: "c".to_string(),
                gap: 10.0,
            }],
        }
    }

    #[test]
    fn merge_produces_one_connector_per_source_plus_collector() {
        let layout = compute(&two_into_one(), &Theme::modern(), &LayoutConfig::default());
        assert_eq!(layout.connectors.len(), 3);
        let arrows = layout
            .connectors
            .iter()
            .filter(|connector| connector.arrow)
            .count();
        assert_eq!(arrows, 1, "only the collector carries the arrowhead");
    }

    #[test]
    fn feeders_and_collector_meet_at_the_solved_point() {
        let layout = compute(&two_into_one(), &Theme::modern(), &LayoutConfig::default());
        let target = layout
            .cards
            .iter()
            .find(|card| card.id == "c")
            .expect("target card");
        let expected_x = target.x - MERGE_MIN_GAP;
        let expected_y = target.y + target.height / 2.0;
        for feeder in &layout.connectors[..2] {
            assert_eq!(feeder.path.end_point(), Some((expected_x, expected_y)));
        }
    }

    #[test]
    fn flows_between_existing_cards_are_routed() {
        let spec = ProcessSpec {
            title: None,
            columns: vec![vec![Card::new("a", "Alpha")], vec![Card::new("b", "Beta")]],
            flows: vec![Flow::labelled("a", "b", "feeds")],
            merges: Vec::new(),
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert_eq!(layout.connectors.len(), 1);
        assert!(!layout.connectors[0].path.is_empty());
        assert!(layout.connectors[0].label_anchor.is_some());
    }

    #[test]
    fn flows_to_missing_cards_stay_empty_without_panicking() {
        let spec = ProcessSpec {
            title: None,
            columns: vec![vec![Card::new("a", "Alpha")]],
            flows: vec![Flow::new("a", "ghost")],
            merges: Vec::new(),
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert!(layout.connectors[0].path.is_empty());
    }
}
