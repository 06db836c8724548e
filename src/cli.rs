use crate::config::{Config, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::overlap::{Strategy, resolve_with};
use crate::parser::parse_chart;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "pielabels",
    version,
    about = "Pie chart renderer that drops overlapping slice labels"
)]
pub struct Args {
    /// Input file (.mmd or .json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, pie, resolver)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Chart width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Chart height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Overlap resolution strategy (overrides the config file)
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Write the computed layout, including dropped labels, as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Read a packed interval buffer as JSON and print its keep mask
    #[arg(long = "mask")]
    pub mask: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Greedy,
    Optimal,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => Strategy::Greedy,
            StrategyArg::Optimal => Strategy::Optimal,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        config.resolver.strategy = strategy.into();
    }

    let input = read_input(args.input.as_deref())?;

    if args.mask {
        let mask = mask_from_json(&input, config.resolver.strategy)?;
        let json = serde_json::to_string(&mask)?;
        return match args.output.as_deref() {
            Some(path) => std::fs::write(path, json)
                .with_context(|| format!("writing mask to {}", path.display())),
            None => {
                println!("{json}");
                Ok(())
            }
        };
    }

    let parsed = parse_chart(&input)?;
    if let Some(init_cfg) = parsed.init_config.as_ref() {
        config.merge_init(init_cfg)?;
    }
    apply_size(&mut config, args.width, args.height);

    let layout = compute_layout(&parsed.chart, &config)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout, config.resolver.strategy)?;
    }

    let svg = render_svg(&layout, &config.theme);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
    }
    Ok(())
}

fn apply_size(config: &mut Config, width: Option<f64>, height: Option<f64>) {
    if let Some(width) = width {
        config.pie.width = width;
        config.render.width = width as f32;
    }
    if let Some(height) = height {
        config.pie.height = height;
        config.render.height = height as f32;
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskInput {
    Flat(Vec<f64>),
    Triples(Vec<[f64; 3]>),
}

/// Resolve a packed buffer given as a flat JSON array or as an array of
/// `[lower, upper, weight]` triples.
fn mask_from_json(input: &str, strategy: Strategy) -> Result<Vec<u8>> {
    let parsed: MaskInput =
        serde_json::from_str(input.trim()).context("mask input must be a JSON array")?;
    let buffer = match parsed {
        MaskInput::Flat(slots) => slots,
        MaskInput::Triples(triples) => triples.into_iter().flatten().collect(),
    };
    let mut mask = vec![0u8; buffer.len() / crate::overlap::STRIDE];
    resolve_with(&buffer, &mut mask, strategy)?;
    Ok(mask)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading input {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::KEEP;

    #[test]
    fn mask_from_flat_buffer() {
        let mask = mask_from_json("[0,10,50, 5,15,30, 20,30,10]", Strategy::Greedy).unwrap();
        assert_eq!(mask, vec![KEEP, 0, KEEP]);
    }

    #[test]
    fn mask_from_triples() {
        let mask =
            mask_from_json("[[0,10,5],[8,12,6],[11,20,5]]", Strategy::Optimal).unwrap();
        assert_eq!(mask, vec![KEEP, 0, KEEP]);
    }

    #[test]
    fn mask_rejects_ragged_buffer() {
        let err = mask_from_json("[0, 10]", Strategy::Greedy).unwrap_err();
        assert!(err.to_string().contains("multiple of 3"));
    }

    #[test]
    fn empty_mask_input() {
        assert!(mask_from_json("[]", Strategy::Greedy).unwrap().is_empty());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "pielabels",
            "-i",
            "chart.mmd",
            "-w",
            "640",
            "--strategy",
            "optimal",
            "--dumpLayout",
            "layout.json",
        ])
        .unwrap();
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.strategy, Some(StrategyArg::Optimal));
        assert_eq!(args.dump_layout, Some(PathBuf::from("layout.json")));
        assert!(!args.mask);
    }

    #[test]
    fn size_flags_override_config() {
        let mut config = Config::default();
        apply_size(&mut config, Some(500.0), None);
        assert_eq!(config.pie.width, 500.0);
        assert_eq!(config.pie.height, 250.0);
        assert_eq!(config.render.width, 500.0);
    }
}
