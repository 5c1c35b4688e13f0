use crate::config::LayoutConfig;
use crate::layout::{FigureLayout, LabelAlign, LabelLayout, TextBlock};
use crate::theme::Theme;

pub fn render_svg(layout: &FigureLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(120.0);

    // Explicit size attributes plus viewBox: the document must stay
    // self-describing once detached from any styling context.
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    // refX sits on the tip so the straight stub computed by the geometry
    // engine ends exactly at the target anchor.
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    for frame in &layout.frames {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            frame.left,
            frame.top,
            frame.width,
            frame.height,
            theme.axis_color
        ));
    }

    for polyline in &layout.polylines {
        if polyline.points.len() < 2 {
            continue;
        }
        let mut d = String::new();
        d.push_str(&format!(
            "M {:.2} {:.2}",
            polyline.points[0].0, polyline.points[0].1
        ));
        for point in polyline.points.iter().skip(1) {
            d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
        }
        let (stroke, stroke_width) = match polyline.series {
            Some(idx) => (series_color(theme, idx), "1.6"),
            None => (theme.grid_color.as_str(), "1"),
        };
        svg.push_str(&format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>"
        ));
    }

    for connector in &layout.connectors {
        if connector.path.is_empty() {
            continue;
        }
        let marker = if connector.arrow {
            " marker-end=\"url(#arrow)\""
        } else {
            ""
        };
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"{}/>",
            connector.path, theme.line_color, marker
        ));

        if let (Some(label), Some((x, y))) = (&connector.label, connector.label_anchor) {
            let rect_x = x - label.width / 2.0 - 6.0;
            let rect_y = y - label.height / 2.0 - 3.0;
            svg.push_str(&format!(
                "<rect x=\"{rect_x:.2}\" y=\"{rect_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\"/>",
                label.width + 12.0,
                label.height + 6.0,
                theme.label_background
            ));
            svg.push_str(&text_svg(x, y, label, "middle", &theme.text_color, 1.0, theme, config));
        }
    }

    for dot in &layout.dots {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" fill-opacity=\"0.85\"/>",
            dot.x,
            dot.y,
            dot.radius,
            series_color(theme, dot.series)
        ));
    }

    for card in &layout.cards {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            card.x,
            card.y,
            card.width,
            card.height,
            theme.card_fill,
            theme.card_border
        ));
        let center_x = card.x + card.width / 2.0;
        let detail_height = card.detail.as_ref().map(|block| block.height).unwrap_or(0.0);
        let title_y = card.y + (card.height - detail_height) / 2.0;
        svg.push_str(&text_svg(
            center_x,
            title_y,
            &card.title,
            "middle",
            &theme.text_color,
            1.0,
            theme,
            config,
        ));
        if let Some(detail) = &card.detail {
            let detail_y = title_y + card.title.height / 2.0 + detail.height / 2.0;
            svg.push_str(&text_svg(
                center_x,
                detail_y,
                detail,
                "middle",
                &theme.muted_text_color,
                0.85,
                theme,
                config,
            ));
        }
    }

    for label in &layout.labels {
        svg.push_str(&label_svg(label, theme, config));
    }

    svg.push_str("</svg>");
    svg
}

fn series_color(theme: &Theme, idx: usize) -> &str {
    if theme.series_colors.is_empty() {
        return &theme.line_color;
    }
    &theme.series_colors[idx % theme.series_colors.len()]
}

fn label_svg(label: &LabelLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let anchor = match label.align {
        LabelAlign::Start => "start",
        LabelAlign::Middle => "middle",
        LabelAlign::End => "end",
    };
    let fill = if label.muted {
        &theme.muted_text_color
    } else {
        &theme.text_color
    };
    text_svg(
        label.x,
        label.y,
        &label.text,
        anchor,
        fill,
        label.font_scale,
        theme,
        config,
    )
}

#[allow(clippy::too_many_arguments)]
fn text_svg(
    x: f32,
    y: f32,
    block: &TextBlock,
    anchor: &str,
    fill: &str,
    font_scale: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let font_size = theme.font_size * font_scale;
    let line_height = font_size * config.label_line_height;
    // `y` is the block's vertical center; the first baseline sits a bit
    // above one line height down from the block top.
    let start_y = y - block.height / 2.0 + font_size;
    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{fill}\">",
        theme.font_family
    ));
    for (idx, line) in block.lines.iter().enumerate() {
        let dy = if idx == 0 {
            "0".to_string()
        } else {
            format!("{line_height:.2}")
        };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
