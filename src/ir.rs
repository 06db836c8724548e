use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A parsed pie chart: slices in source order plus presentation flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartSource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub show_data: bool,
    #[serde(default)]
    pub slices: Vec<PieSlice>,
}

impl PieChartSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slices(slices: Vec<PieSlice>) -> Self {
        Self {
            slices,
            ..Self::default()
        }
    }

    /// Sum of the slice values, negative values counting as zero.
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|slice| slice.value.max(0.0)).sum()
    }
}
