//! Geographic scatter map: stations projected into the plot frame, with a
//! curved callout connector from a name card to the highlighted station.

use crate::config::LayoutConfig;
use crate::figure::ScatterMapSpec;
use crate::geometry::{PathOptions, Rect, curved_connector};
use crate::measure::{MeasureSource, StaticMeasures};
use crate::theme::Theme;

use super::{
    ConnectorLayout, DotLayout, FigureKind, FigureLayout, LabelAlign, LabelLayout, measure_card,
    place_title, scaled_text_block,
};

pub(crate) fn compute(spec: &ScatterMapSpec, theme: &Theme, config: &LayoutConfig) -> FigureLayout {
    let mut layout = FigureLayout::new(FigureKind::ScatterMap);
    let top = place_title(&mut layout, spec.title.as_deref(), theme, config);

    let chart = &config.chart;
    let frame = Rect::new(
        config.figure_padding + 42.0,
        top,
        chart.plot_width,
        chart.plot_height,
    );
    layout.frames.push(frame);

    let mut highlight_dot: Option<(String, f32, f32, f32)> = None;
    if !spec.stations.is_empty() {
        let min_lon = spec.stations.iter().map(|s| s.lon).fold(f32::INFINITY, f32::min);
        let max_lon = spec.stations.iter().map(|s| s.lon).fold(f32::NEG_INFINITY, f32::max);
        let min_lat = spec.stations.iter().map(|s| s.lat).fold(f32::INFINITY, f32::min);
        let max_lat = spec.stations.iter().map(|s| s.lat).fold(f32::NEG_INFINITY, f32::max);
        let span_lon = (max_lon - min_lon).max(1e-3);
        let span_lat = (max_lat - min_lat).max(1e-3);
        // Inset so edge stations keep their full dot inside the frame.
        let inset = 18.0;

        for station in &spec.stations {
            let x = frame.left
                + inset
                + (station.lon - min_lon) / span_lon * (frame.width - 2.0 * inset);
            let y = frame.bottom()
                - inset
                - (station.lat - min_lat) / span_lat * (frame.height - 2.0 * inset);
            let radius = chart.dot_radius + station.weight.max(0.0) * chart.dot_radius_step;
            layout.dots.push(DotLayout {
                x,
                y,
                radius,
                series: 0,
            });
            if spec.highlight.as_deref() == Some(station.id.as_str()) {
                highlight_dot = Some((station.name.clone(), x, y, radius));
            }
        }

        // Corner graticule labels for the lon/lat extents.
        let corners = [
            (frame.left, frame.bottom() + 14.0, format!("{min_lon:.1}°")),
            (frame.right(), frame.bottom() + 14.0, format!("{max_lon:.1}°")),
            (frame.left - 8.0, frame.bottom(), format!("{min_lat:.1}°")),
            (frame.left - 8.0, frame.top, format!("{max_lat:.1}°")),
        ];
        for (idx, (x, y, text)) in corners.into_iter().enumerate() {
            layout.labels.push(LabelLayout {
                x,
                y,
                text: scaled_text_block(&text, 0.8, theme, config),
                align: if idx < 2 {
                    LabelAlign::Middle
                } else {
                    LabelAlign::End
                },
                muted: true,
                font_scale: 0.8,
            });
        }
    }

    // Callout: a name card to the right of the frame, routed back to the
    // highlighted dot with the ordinary curved connector.
    if let Some((name, x, y, radius)) = highlight_dot {
        let card_spec = crate::figure::Card::new("callout", &name);
        let mut card = measure_card(&card_spec, theme, config);
        card.x = frame.right() + 36.0;
        card.y = (y - card.height / 2.0).max(frame.top);

        let mut measures = StaticMeasures::new();
        measures.insert(&card.id, card.rect());
        measures.insert(
            "highlight",
            Rect::new(x - radius, y - radius, radius * 2.0, radius * 2.0),
        );
        let options = PathOptions {
            min_dx: 36.0,
            ..PathOptions::default()
        };
        layout.connectors.push(ConnectorLayout {
            path: curved_connector(
                measures.measure("callout"),
                measures.measure("highlight"),
                &options,
            ),
            arrow: true,
            label: None,
            label_anchor: None,
        });
        layout.cards.push(card);
    }

    let right = layout
        .cards
        .iter()
        .map(|card| card.x + card.width)
        .fold(frame.right(), f32::max);
    layout.width = right + config.figure_padding;
    layout.height = frame.bottom() + theme.font_size * 2.0 + config.figure_padding;
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Station;

    fn stations() -> Vec<Station> {
        vec![
            Station {
                id: "hel".to_string(),
                name: "Helsinki".to_string(),
                lon: 24.9,
                lat: 60.2,
                weight: 1.0,
            },
            Station {
                id: "tll".to_string(),
                name: "Tallinn".to_string(),
                lon: 24.7,
                lat: 59.4,
                weight: 0.4,
            },
            Station {
                id: "sto".to_string(),
                name: "Stockholm".to_string(),
                lon: 18.1,
                lat: 59.3,
                weight: 2.0,
            },
        ]
    }

    #[test]
    fn every_station_lands_inside_the_frame() {
        let spec = ScatterMapSpec {
            title: Some("Stations".to_string()),
            stations: stations(),
            highlight: None,
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        let frame = layout.frames[0];
        assert_eq!(layout.dots.len(), 3);
        for dot in &layout.dots {
            assert!(dot.x - dot.radius >= frame.left);
            assert!(dot.x + dot.radius <= frame.right());
            assert!(dot.y - dot.radius >= frame.top);
            assert!(dot.y + dot.radius <= frame.bottom());
        }
    }

    #[test]
    fn highlight_gets_a_card_and_a_routed_callout() {
        let spec = ScatterMapSpec {
            title: None,
            stations: stations(),
            highlight: Some("sto".to_string()),
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert_eq!(layout.cards.len(), 1);
        assert_eq!(layout.connectors.len(), 1);
        let path = &layout.connectors[0].path;
        assert!(!path.is_empty());
        // The callout card sits right of the frame, so the connector must
        // approach the dot from its right side.
        let frame = layout.frames[0];
        let end = path.end_point().unwrap();
        assert!(end.0 < frame.right());
    }

    #[test]
    fn unknown_highlight_is_ignored() {
        let spec = ScatterMapSpec {
            title: None,
            stations: stations(),
            highlight: Some("missing".to_string()),
        };
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert!(layout.cards.is_empty());
        assert!(layout.connectors.is_empty());
    }
}
