//! Time-series chart: axis frame, horizontal gridlines, one polyline per
//! series and a dot-plus-name legend row.

use crate::config::LayoutConfig;
use crate::figure::TimeSeriesSpec;
use crate::geometry::Rect;
use crate::theme::Theme;

use super::{
    DotLayout, FigureKind, FigureLayout, LabelAlign, LabelLayout, PolylineLayout, place_title,
    scaled_text_block,
};

struct Extents {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

fn data_extents(spec: &TimeSeriesSpec) -> Option<Extents> {
    let mut extents: Option<Extents> = None;
    for series in &spec.series {
        for &(x, y) in &series.points {
            let extents = extents.get_or_insert(Extents {
                min_x: x,
                max_x: x,
                min_y: y,
                max_y: y,
            });
            extents.min_x = extents.min_x.min(x);
            extents.max_x = extents.max_x.max(x);
            extents.min_y = extents.min_y.min(y);
            extents.max_y = extents.max_y.max(y);
        }
    }
    extents
}

fn tick_label(value: f32) -> String {
    if value.abs() >= 100.0 || value.fract().abs() < 1e-3 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub(crate) fn compute(spec: &TimeSeriesSpec, theme: &Theme, config: &LayoutConfig) -> FigureLayout {
    let mut layout = FigureLayout::new(FigureKind::TimeSeries);
    let top = place_title(&mut layout, spec.title.as_deref(), theme, config);

    let chart = &config.chart;
    let frame = Rect::new(
        config.figure_padding + 42.0,
        top,
        chart.plot_width,
        chart.plot_height,
    );
    layout.frames.push(frame);

    if let Some(extents) = data_extents(spec) {
        let span_x = (extents.max_x - extents.min_x).max(1e-3);
        let span_y = (extents.max_y - extents.min_y).max(1e-3);
        let project = |x: f32, y: f32| -> (f32, f32) {
            (
                frame.left + (x - extents.min_x) / span_x * frame.width,
                frame.bottom() - (y - extents.min_y) / span_y * frame.height,
            )
        };

        let ticks = chart.tick_count.max(2);
        for tick in 0..=ticks {
            let t = tick as f32 / ticks as f32;

            // Horizontal gridline plus its value label on the left.
            let value = extents.min_y + t * span_y;
            let y = frame.bottom() - t * frame.height;
            layout.polylines.push(PolylineLayout {
                points: vec![(frame.left, y), (frame.right(), y)],
                series: None,
            });
            layout.labels.push(LabelLayout {
                x: frame.left - 8.0,
                y,
                text: scaled_text_block(&tick_label(value), 0.85, theme, config),
                align: LabelAlign::End,
                muted: true,
                font_scale: 0.85,
            });

            // X tick below the frame.
            let tick_x = extents.min_x + t * span_x;
            let x = frame.left + t * frame.width;
            layout.polylines.push(PolylineLayout {
                points: vec![(x, frame.bottom()), (x, frame.bottom() + chart.tick_length)],
                series: None,
            });
            layout.labels.push(LabelLayout {
                x,
                y: frame.bottom() + chart.tick_length + theme.font_size * 0.8,
                text: scaled_text_block(&tick_label(tick_x), 0.85, theme, config),
                align: LabelAlign::Middle,
                muted: true,
                font_scale: 0.85,
            });
        }

        for (idx, series) in spec.series.iter().enumerate() {
            let points: Vec<(f32, f32)> = series
                .points
                .iter()
                .map(|&(x, y)| project(x, y))
                .collect();
            layout.polylines.push(PolylineLayout {
                points,
                series: Some(idx),
            });
        }

        // Legend: colored dot plus series name, right-aligned above the frame.
        let mut legend_x = frame.right();
        for (idx, series) in spec.series.iter().enumerate().rev() {
            let text = scaled_text_block(&series.name, 0.85, theme, config);
            legend_x -= text.width + 14.0;
            let legend_y = frame.top - 12.0;
            layout.dots.push(DotLayout {
                x: legend_x,
                y: legend_y,
                radius: 4.0,
                series: idx,
            });
            layout.labels.push(LabelLayout {
                x: legend_x + 8.0,
                y: legend_y,
                text,
                align: LabelAlign::Start,
                muted: false,
                font_scale: 0.85,
            });
            legend_x -= 18.0;
        }
    }

    if let Some(x_label) = spec.x_label.as_deref() {
        layout.labels.push(LabelLayout {
            x: frame.left + frame.width / 2.0,
            y: frame.bottom() + chart.tick_length + theme.font_size * 2.2,
            text: scaled_text_block(x_label, 0.9, theme, config),
            align: LabelAlign::Middle,
            muted: false,
            font_scale: 0.9,
        });
    }
    if let Some(y_label) = spec.y_label.as_deref() {
        layout.labels.push(LabelLayout {
            x: config.figure_padding,
            y: frame.top - 12.0,
            text: scaled_text_block(y_label, 0.9, theme, config),
            align: LabelAlign::Start,
            muted: false,
            font_scale: 0.9,
        });
    }

    layout.width = frame.right() + config.figure_padding;
    layout.height = frame.bottom() + theme.font_size * 3.0 + config.figure_padding;
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Series;

    fn latency_spec() -> TimeSeriesSpec {
        TimeSeriesSpec {
            title: Some("Latency".to_string()),
            x_label: Some("minute".to_string()),
            y_label: Some("ms".to_string()),
            series: vec![
                Series {
                    name: "north".to_string(),
                    points: vec![(0.0, 12.0), (1.0, 15.0), (2.0, 11.0)],
                },
                Series {
                    name: "south".to_string(),
                    points: vec![(0.0, 22.0), (1.0, 19.0), (2.0, 25.0)],
                },
            ],
        }
    }

    #[test]
    fn series_polylines_stay_inside_the_frame() {
        let layout = compute(&latency_spec(), &Theme::modern(), &LayoutConfig::default());
        let frame = layout.frames[0];
        let series_lines: Vec<_> = layout
            .polylines
            .iter()
            .filter(|line| line.series.is_some())
            .collect();
        assert_eq!(series_lines.len(), 2);
        for line in series_lines {
            for &(x, y) in &line.points {
                assert!(x >= frame.left - 1e-3 && x <= frame.right() + 1e-3);
                assert!(y >= frame.top - 1e-3 && y <= frame.bottom() + 1e-3);
            }
        }
    }

    #[test]
    fn extreme_samples_land_on_the_frame_edges() {
        let layout = compute(&latency_spec(), &Theme::modern(), &LayoutConfig::default());
        let frame = layout.frames[0];
        let south = layout
            .polylines
            .iter()
            .find(|line| line.series == Some(1))
            .unwrap();
        // 25 ms is the global maximum; it must touch the frame top.
        let min_y = south
            .points
            .iter()
            .map(|point| point.1)
            .fold(f32::INFINITY, f32::min);
        assert!((min_y - frame.top).abs() < 1e-3);
    }

    #[test]
    fn empty_series_still_produce_a_frame() {
        let spec = TimeSeriesSpec::default();
        let layout = compute(&spec, &Theme::modern(), &LayoutConfig::default());
        assert_eq!(layout.frames.len(), 1);
        assert!(layout.polylines.is_empty());
    }
}
