use crate::ir::{PieChartSource, PieSlice};
use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^pie(?P<show>\s+showdata)?(?:\s+title(?:\s+(?P<title>.*))?)?\s*$").unwrap()
});
static SLICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^:]+?))\s*:\s*(?P<value>\S+)$"#)
        .unwrap()
});

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub chart: PieChartSource,
    pub init_config: Option<serde_json::Value>,
}

/// Parse either JSON chart data or Mermaid-style `pie` text.
pub fn parse_chart(input: &str) -> Result<ParseOutput> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        parse_json_chart(trimmed)
    } else {
        parse_pie(input)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonChart {
    Slices(Vec<PieSlice>),
    Chart(PieChartSource),
}

pub fn parse_json_chart(input: &str) -> Result<ParseOutput> {
    let parsed: JsonChart = serde_json::from_str(input).context("invalid chart JSON")?;
    let chart = match parsed {
        JsonChart::Slices(slices) => PieChartSource::from_slices(slices),
        JsonChart::Chart(chart) => chart,
    };
    Ok(ParseOutput {
        chart,
        init_config: None,
    })
}

pub fn parse_pie(input: &str) -> Result<ParseOutput> {
    let mut chart = PieChartSource::new();
    let (lines, init_config) = preprocess_input(input);

    for (line_no, line) in lines {
        if let Some(caps) = HEADER_RE.captures(&line) {
            if caps.name("show").is_some() {
                chart.show_data = true;
            }
            if let Some(title) = caps.name("title") {
                set_title(&mut chart, title.as_str());
            }
            continue;
        }
        let lower = line.to_ascii_lowercase();
        if lower == "showdata" {
            chart.show_data = true;
            continue;
        }
        if is_title_directive(&lower) {
            set_title(&mut chart, line.get(5..).unwrap_or(""));
            continue;
        }
        match parse_slice_line(&line) {
            Some(slice) => chart.slices.push(slice),
            None => warn!("line {line_no}: skipping unrecognised pie entry {line:?}"),
        }
    }

    Ok(ParseOutput { chart, init_config })
}

/// `title` on its own or followed by whitespace; `titles : 3` is a slice.
fn is_title_directive(lower: &str) -> bool {
    lower
        .strip_prefix("title")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn set_title(chart: &mut PieChartSource, raw: &str) {
    let title = raw.trim();
    if !title.is_empty() {
        chart.title = Some(title.to_string());
    }
}

fn parse_slice_line(line: &str) -> Option<PieSlice> {
    let caps = SLICE_RE.captures(line)?;
    let label = caps
        .name("dq")
        .or_else(|| caps.name("sq"))
        .or_else(|| caps.name("bare"))?
        .as_str()
        .trim();
    if label.is_empty() {
        return None;
    }
    let value: f64 = caps.name("value")?.as_str().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(PieSlice::new(label, value))
}

type NumberedLines = Vec<(usize, String)>;

fn preprocess_input(input: &str) -> (NumberedLines, Option<serde_json::Value>) {
    let mut init_config: Option<serde_json::Value> = None;
    let mut lines = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let trimmed_line = raw_line.trim();
        if trimmed_line.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(trimmed_line) {
            if let Some(json_str) = caps.get(1).map(|m| m.as_str()) {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
                    init_config = Some(value);
                } else if let Ok(value) = json5::from_str::<serde_json::Value>(json_str) {
                    init_config = Some(value);
                } else {
                    warn!("line {}: ignoring unparseable init directive", idx + 1);
                }
            }
            continue;
        }
        if trimmed_line.starts_with("%%") {
            continue;
        }
        let without_comment = strip_trailing_comment(trimmed_line);
        if without_comment.is_empty() {
            continue;
        }
        lines.push((idx + 1, without_comment));
    }

    (lines, init_config)
}

fn strip_trailing_comment(line: &str) -> String {
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();
    let mut out = String::new();
    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            out.push(ch);
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            out.push(ch);
            continue;
        }
        if ch == '%' && chars.peek() == Some(&'%') {
            break;
        }
        out.push(ch);
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pie_text() {
        let input = r#"
%%{init: {"pie": {"labelHeight": 30}}}%%
pie showData title Pets adopted
    "Dogs" : 386
    "Cats" : 85.5 %% rounded
    Rats : 15
"#;
        let parsed = parse_chart(input).unwrap();
        let chart = parsed.chart;
        assert!(chart.show_data);
        assert_eq!(chart.title.as_deref(), Some("Pets adopted"));
        assert_eq!(
            chart.slices,
            vec![
                PieSlice::new("Dogs", 386.0),
                PieSlice::new("Cats", 85.5),
                PieSlice::new("Rats", 15.0),
            ]
        );
        let init = parsed.init_config.unwrap();
        assert_eq!(init["pie"]["labelHeight"].as_f64(), Some(30.0));
    }

    #[test]
    fn title_on_its_own_line() {
        let parsed = parse_pie("pie\ntitle  Budget \n\"Rent\": 1200").unwrap();
        assert_eq!(parsed.chart.title.as_deref(), Some("Budget"));
        assert_eq!(parsed.chart.slices.len(), 1);
    }

    #[test]
    fn slice_labels_starting_with_title_are_slices() {
        let parsed = parse_pie("pie\ntitles : 3\ntitle\tQuarterly\n\"b\" : 1").unwrap();
        assert_eq!(parsed.chart.title.as_deref(), Some("Quarterly"));
        assert_eq!(
            parsed.chart.slices,
            vec![PieSlice::new("titles", 3.0), PieSlice::new("b", 1.0)]
        );
    }

    #[test]
    fn init_directive_accepts_json5() {
        let parsed = parse_pie("%%{init: {pie: {labelHeight: 20,}}}%%\npie").unwrap();
        let init = parsed.init_config.unwrap();
        assert_eq!(init["pie"]["labelHeight"].as_f64(), Some(20.0));
    }

    #[test]
    fn skips_malformed_slices() {
        let parsed = parse_pie("pie\n\"a\" : lots\n\"b\" : NaN\n\"c\" : 2").unwrap();
        assert_eq!(parsed.chart.slices, vec![PieSlice::new("c", 2.0)]);
    }

    #[test]
    fn keeps_percent_inside_quotes() {
        let parsed = parse_pie("pie\n\"100%% real\" : 4").unwrap();
        assert_eq!(parsed.chart.slices[0].label, "100%% real");
    }

    #[test]
    fn parses_json_slices_and_chart() {
        let parsed = parse_chart(r#"[{"label": "ray", "value": 3}]"#).unwrap();
        assert_eq!(parsed.chart.slices, vec![PieSlice::new("ray", 3.0)]);

        let parsed =
            parse_chart(r#"{"title": "T", "showData": true, "slices": [{"label": "a", "value": 1.5}]}"#)
                .unwrap();
        assert_eq!(parsed.chart.title.as_deref(), Some("T"));
        assert!(parsed.chart.show_data);
    }

    #[test]
    fn rejects_broken_json() {
        assert!(parse_chart("[{\"label\": }]").is_err());
    }
}
