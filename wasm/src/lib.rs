use pie_labels::config::Config;
use pie_labels::overlap::Strategy;
use pie_labels::theme::Theme;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    strategy: Option<Strategy>,
}

fn build_config(options: PieRenderOptions) -> Config {
    let mut config = Config::default();
    // No system fonts inside the browser sandbox.
    config.pie.measure_text = false;

    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        config.pie.width = width;
    }
    if let Some(height) = options.height {
        config.pie.height = height;
    }
    if let Some(strategy) = options.strategy {
        config.resolver.strategy = strategy;
    }
    config
}

/// Fill `output` with the keep mask for the packed `(lower, upper, weight)`
/// triples in `inputs`. Non-zero cells are kept.
#[wasm_bindgen]
pub fn remove_overlapping(inputs: &[f64], output: &mut [u8]) -> Result<(), JsValue> {
    pie_labels::resolve(inputs, output).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_pie_svg(source: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<PieRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        PieRenderOptions::default()
    };

    pie_labels::render_with_config(source, build_config(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
