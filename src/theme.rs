use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub card_fill: String,
    pub card_border: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub line_color: String,
    pub axis_color: String,
    pub grid_color: String,
    pub label_background: String,
    pub background: String,
    pub series_colors: Vec<String>,
}

impl Theme {
    pub fn print() -> Self {
        Self {
            font_family: "Georgia, \"Times New Roman\", serif".to_string(),
            font_size: 13.0,
            card_fill: "#FFFFFF".to_string(),
            card_border: "#444444".to_string(),
            text_color: "#1A1A1A".to_string(),
            muted_text_color: "#5B5B5B".to_string(),
            line_color: "#333333".to_string(),
            axis_color: "#333333".to_string(),
            grid_color: "#DDDDDD".to_string(),
            label_background: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
            series_colors: vec![
                "#1B6CA8".to_string(),
                "#C0392B".to_string(),
                "#1E8449".to_string(),
                "#7D3C98".to_string(),
                "#B7950B".to_string(),
            ],
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            card_fill: "#F8FAFF".to_string(),
            card_border: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#5F6B7C".to_string(),
            line_color: "#7A8AA6".to_string(),
            axis_color: "#3E4C61".to_string(),
            grid_color: "#E3E9F3".to_string(),
            label_background: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
            series_colors: vec![
                "#4C79D0".to_string(),
                "#DD7A4F".to_string(),
                "#53A567".to_string(),
                "#9368C8".to_string(),
                "#C8A435".to_string(),
            ],
        }
    }
}
