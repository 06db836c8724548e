use serde::{Deserialize, Serialize};

const CLASSIC_PIE_COLORS: [&str; 7] = [
    "#98abc5", "#8a89a6", "#7b6888", "#6b486b", "#a05d56", "#d0743c", "#ff8c00",
];

const MODERN_PIE_COLORS: [&str; 12] = [
    "#4C78A8", "#F58518", "#54A24B", "#E45756", "#72B7B2", "#EECA3B", "#B279A2", "#FF9DA6",
    "#9D755D", "#BAB0AC", "#6C8EBF", "#8CD17D",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub title_font_size: f64,
    pub text_color: String,
    pub line_color: String,
    pub slice_stroke: String,
    pub background: String,
    pub pie_colors: Vec<String>,
}

impl Theme {
    /// d3 category palette with large label type.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 24.0,
            title_font_size: 28.0,
            text_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            slice_stroke: "none".to_string(),
            background: "#FFFFFF".to_string(),
            pie_colors: CLASSIC_PIE_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 16.0,
            title_font_size: 20.0,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            slice_stroke: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
            pie_colors: MODERN_PIE_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" | "d3" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
