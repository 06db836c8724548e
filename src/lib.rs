#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod overlap;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Config;
pub use error::ResolveError;
pub use layout::{PieChart, PieLayout, compute_layout};
pub use overlap::{LabelRemover, Strategy, resolve, resolve_with};

/// Parse `source`, merge any init directive into `config` and render SVG.
pub fn render_with_config(source: &str, mut config: Config) -> anyhow::Result<String> {
    let parsed = parser::parse_chart(source)?;
    if let Some(init) = parsed.init_config.as_ref() {
        config.merge_init(init)?;
    }
    let layout = compute_layout(&parsed.chart, &config)?;
    Ok(render::render_svg(&layout, &config.theme))
}
