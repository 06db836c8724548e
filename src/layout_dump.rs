use crate::layout::{LabelLayout, PieLayout, Side};
use crate::overlap::Strategy;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub strategy: Strategy,
    pub width: f64,
    pub height: f64,
    pub center: [f64; 2],
    pub radius: f64,
    pub slices: Vec<SliceDump>,
    pub labels: Vec<LabelDump>,
    pub dropped: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceDump {
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: String,
    pub label_visible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub slice: usize,
    pub text: String,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// `[lower, upper, weight]` as handed to the resolver.
    pub interval: [f64; 3],
}

impl LabelDump {
    fn from_label(label: &LabelLayout) -> Self {
        LabelDump {
            slice: label.slice,
            text: label.text.clone(),
            side: label.side,
            x: label.x,
            y: label.y,
            width: label.width,
            interval: [
                label.interval.lower,
                label.interval.upper,
                label.interval.weight,
            ],
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &PieLayout, strategy: Strategy) -> Self {
        let slices = layout
            .slices
            .iter()
            .map(|slice| SliceDump {
                index: slice.index,
                label: slice.label.clone(),
                value: slice.value,
                start_angle: slice.start_angle,
                end_angle: slice.end_angle,
                color: slice.color.clone(),
                label_visible: layout.is_label_visible(slice.index),
            })
            .collect();

        LayoutDump {
            strategy,
            width: layout.width,
            height: layout.height,
            center: [layout.center.0, layout.center.1],
            radius: layout.radius,
            slices,
            labels: layout.labels.iter().map(LabelDump::from_label).collect(),
            dropped: layout.dropped.iter().map(LabelDump::from_label).collect(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &PieLayout, strategy: Strategy) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, strategy);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ir::{PieChartSource, PieSlice};
    use crate::layout::compute_layout;

    #[test]
    fn dump_lists_visible_and_dropped_labels() {
        let mut config = Config::default();
        config.pie.measure_text = false;
        let source = PieChartSource::from_slices(vec![
            PieSlice::new("big", 100.0),
            PieSlice::new("tiny1", 1.0),
            PieSlice::new("tiny2", 1.0),
            PieSlice::new("tiny3", 1.0),
        ]);
        let layout = compute_layout(&source, &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        write_layout_dump(&path, &layout, Strategy::Greedy).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["strategy"], "greedy");
        assert_eq!(value["slices"].as_array().unwrap().len(), 4);
        let shown = value["labels"].as_array().unwrap().len();
        let dropped = value["dropped"].as_array().unwrap().len();
        assert_eq!(shown + dropped, 4);
        assert!(dropped > 0);
        assert_eq!(value["slices"][0]["labelVisible"], true);
        assert_eq!(value["labels"][0]["interval"].as_array().unwrap().len(), 3);
    }
}
