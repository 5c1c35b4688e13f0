use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Requested clearance between a merge point and its target edge; the
    /// solver still enforces its own floor.
    pub merge_gap: f32,
    /// Extra curvature on labelled flows.
    pub arc_lift: f32,
    /// Vertical spread between stacked parallel flows.
    pub flow_offset_step: f32,
    pub column_gap: f32,
    pub row_gap: f32,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            merge_gap: 48.0,
            arc_lift: 10.0,
            flow_offset_step: 10.0,
            column_gap: 150.0,
            row_gap: 28.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub row_gap: f32,
    pub lane_width: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            row_gap: 64.0,
            lane_width: 520.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub plot_width: f32,
    pub plot_height: f32,
    pub tick_count: usize,
    pub tick_length: f32,
    pub dot_radius: f32,
    pub dot_radius_step: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            plot_width: 560.0,
            plot_height: 320.0,
            tick_count: 5,
            tick_length: 5.0,
            dot_radius: 3.5,
            dot_radius_step: 2.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub card_padding_x: f32,
    pub card_padding_y: f32,
    pub card_min_width: f32,
    pub label_line_height: f32,
    pub max_label_width_chars: usize,
    pub figure_padding: f32,
    pub title_gap: f32,
    pub process: ProcessConfig,
    pub sequence: SequenceConfig,
    pub chart: ChartConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_padding_x: 16.0,
            card_padding_y: 10.0,
            card_min_width: 96.0,
            label_line_height: 1.4,
            max_label_width_chars: 22,
            figure_padding: 24.0,
            title_gap: 34.0,
            process: ProcessConfig::default(),
            sequence: SequenceConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub background: String,
    /// Substitute family used when the PDF backend cannot resolve a font
    /// named by the theme.
    pub pdf_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            pdf_font_family: "Arial".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    card_fill: Option<String>,
    card_border: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    axis_color: Option<String>,
    background: Option<String>,
    series_colors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfig>,
    render: Option<RenderConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "print" {
            config.theme = Theme::print();
        } else if theme_name == "modern" || theme_name == "default" {
            config.theme = Theme::modern();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(val) = vars.font_family {
            config.theme.font_family = val;
        }
        if let Some(val) = vars.font_size {
            config.theme.font_size = val;
        }
        if let Some(val) = vars.card_fill {
            config.theme.card_fill = val;
        }
        if let Some(val) = vars.card_border {
            config.theme.card_border = val;
        }
        if let Some(val) = vars.text_color {
            config.theme.text_color = val;
        }
        if let Some(val) = vars.line_color {
            config.theme.line_color = val;
        }
        if let Some(val) = vars.axis_color {
            config.theme.axis_color = val;
        }
        if let Some(val) = vars.background {
            config.theme.background = val.clone();
            config.render.background = val;
        }
        if let Some(val) = vars.series_colors
            && !val.is_empty()
        {
            config.theme.series_colors = val;
        }
    }

    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }

    Ok(config)
}
