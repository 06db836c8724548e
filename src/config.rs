use crate::overlap::Strategy;
use crate::theme::Theme;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieConfig {
    pub width: f64,
    pub height: f64,
    pub min_size: f64,
    pub radius_margin: f64,
    pub inner_ratio: f64,
    pub outer_ratio: f64,
    pub label_ratio: f64,
    pub line_ratio: f64,
    /// Vertical extent reserved for one label, starting at its anchor.
    pub label_height: f64,
    pub label_padding: f64,
    pub title_margin: f64,
    /// Measure label widths against system fonts; estimate them otherwise.
    pub measure_text: bool,
}

impl Default for PieConfig {
    fn default() -> Self {
        Self {
            width: 380.0,
            height: 250.0,
            min_size: 100.0,
            radius_margin: 20.0,
            inner_ratio: 0.4,
            outer_ratio: 0.8,
            label_ratio: 0.9,
            line_ratio: 0.95,
            label_height: 36.0,
            label_padding: 8.0,
            title_margin: 12.0,
            measure_text: true,
        }
    }
}

impl PieConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let lengths = [
            ("width", self.width),
            ("height", self.height),
            ("minSize", self.min_size),
            ("radiusMargin", self.radius_margin),
            ("labelHeight", self.label_height),
            ("labelPadding", self.label_padding),
            ("titleMargin", self.title_margin),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                bail!("pie.{name} must be a finite non-negative number, got {value}");
            }
        }
        let ratios = [
            ("innerRatio", self.inner_ratio),
            ("outerRatio", self.outer_ratio),
            ("labelRatio", self.label_ratio),
            ("lineRatio", self.line_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value < 0.0 {
                bail!("pie.{name} must be a finite non-negative ratio, got {value}");
            }
        }
        if self.inner_ratio > self.outer_ratio {
            bail!(
                "pie.innerRatio ({}) exceeds pie.outerRatio ({})",
                self.inner_ratio,
                self.outer_ratio
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub strategy: Strategy,
}

/// Fallback canvas for rasterising.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub pie: PieConfig,
    pub render: RenderConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    title_font_size: Option<f64>,
    text_color: Option<String>,
    line_color: Option<String>,
    slice_stroke: Option<String>,
    background: Option<String>,
    // pie1 .. pie12
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PieConfigFile {
    width: Option<f64>,
    height: Option<f64>,
    min_size: Option<f64>,
    radius_margin: Option<f64>,
    inner_ratio: Option<f64>,
    outer_ratio: Option<f64>,
    label_ratio: Option<f64>,
    line_ratio: Option<f64>,
    label_height: Option<f64>,
    label_padding: Option<f64>,
    title_margin: Option<f64>,
    measure_text: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ResolverConfigFile {
    strategy: Option<Strategy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    pie: Option<PieConfigFile>,
    resolver: Option<ResolverConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let parsed: ConfigFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    config.apply(parsed)?;
    Ok(config)
}

impl Config {
    /// Merge an `%%{init: ...}%%` directive taken from the chart source.
    pub fn merge_init(&mut self, init: &serde_json::Value) -> anyhow::Result<()> {
        let parsed: ConfigFile =
            serde_json::from_value(init.clone()).context("invalid init directive")?;
        self.apply(parsed)
    }

    fn apply(&mut self, parsed: ConfigFile) -> anyhow::Result<()> {
        if let Some(theme_name) = parsed.theme.as_deref() {
            match Theme::by_name(theme_name) {
                Some(theme) => self.theme = theme,
                None => log::warn!("unknown theme {theme_name:?}, keeping current theme"),
            }
        }

        if let Some(vars) = parsed.theme_variables {
            apply_theme_variables(&mut self.theme, vars);
        }

        if let Some(pie) = parsed.pie {
            let cfg = &mut self.pie;
            if let Some(v) = pie.width {
                cfg.width = v;
            }
            if let Some(v) = pie.height {
                cfg.height = v;
            }
            if let Some(v) = pie.min_size {
                cfg.min_size = v;
            }
            if let Some(v) = pie.radius_margin {
                cfg.radius_margin = v;
            }
            if let Some(v) = pie.inner_ratio {
                cfg.inner_ratio = v;
            }
            if let Some(v) = pie.outer_ratio {
                cfg.outer_ratio = v;
            }
            if let Some(v) = pie.label_ratio {
                cfg.label_ratio = v;
            }
            if let Some(v) = pie.line_ratio {
                cfg.line_ratio = v;
            }
            if let Some(v) = pie.label_height {
                cfg.label_height = v;
            }
            if let Some(v) = pie.label_padding {
                cfg.label_padding = v;
            }
            if let Some(v) = pie.title_margin {
                cfg.title_margin = v;
            }
            if let Some(v) = pie.measure_text {
                cfg.measure_text = v;
            }
        }

        if let Some(strategy) = parsed.resolver.and_then(|r| r.strategy) {
            self.resolver.strategy = strategy;
        }

        self.pie.validate()
    }
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    if let Some(v) = vars.title_font_size {
        theme.title_font_size = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(v) = vars.slice_stroke {
        theme.slice_stroke = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }

    let mut overrides: Vec<(usize, String)> = vars
        .extra
        .iter()
        .filter_map(|(key, value)| {
            let idx = key.strip_prefix("pie")?.parse::<usize>().ok()?;
            let color = value.as_str()?;
            (1..=12).contains(&idx).then(|| (idx - 1, color.to_string()))
        })
        .collect();
    overrides.sort();
    for (idx, color) in overrides {
        if idx >= theme.pie_colors.len() {
            let filler = theme.pie_colors.last().cloned().unwrap_or(color.clone());
            theme.pie_colors.resize(idx + 1, filler);
        }
        theme.pie_colors[idx] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_matches_classic_chart() {
        let config = Config::default();
        assert_eq!(config.pie.width, 380.0);
        assert_eq!(config.pie.height, 250.0);
        assert_eq!(config.pie.label_height, 36.0);
        assert_eq!(config.resolver.strategy, Strategy::Greedy);
        assert!(config.pie.validate().is_ok());
    }

    #[test]
    fn load_without_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.theme.font_size, 24.0);
    }

    #[test]
    fn load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{
                "theme": "modern",
                "themeVariables": {{ "fontSize": 18, "pie2": "#123456" }},
                "pie": {{ "labelHeight": 24, "width": 600 }},
                "resolver": {{ "strategy": "optimal" }}
            }}"##
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.theme.font_size, 18.0);
        assert_eq!(config.theme.pie_colors[1], "#123456");
        assert_eq!(config.pie.label_height, 24.0);
        assert_eq!(config.pie.width, 600.0);
        assert_eq!(config.pie.height, 250.0);
        assert_eq!(config.resolver.strategy, Strategy::Optimal);
    }

    #[test]
    fn rejects_negative_label_height() {
        let mut config = Config::default();
        let init = serde_json::json!({ "pie": { "labelHeight": -1.0 } });
        assert!(config.merge_init(&init).is_err());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let mut config = Config::default();
        let init = serde_json::json!({ "resolver": { "strategy": "random" } });
        assert!(config.merge_init(&init).is_err());
    }

    #[test]
    fn pie_color_overrides_extend_palette() {
        let mut config = Config::default();
        let init = serde_json::json!({ "themeVariables": { "pie10": "#abcdef" } });
        config.merge_init(&init).unwrap();
        assert_eq!(config.theme.pie_colors.len(), 10);
        assert_eq!(config.theme.pie_colors[9], "#abcdef");
    }
}
