mod chart;
mod pie;
pub(crate) mod types;
pub use chart::PieChart;
pub use pie::compute_pie_layout;
pub(crate) use pie::polar;
pub use types::*;

use crate::config::Config;
use crate::error::ResolveError;
use crate::ir::PieChartSource;

/// One-shot layout of a chart with the given configuration.
pub fn compute_layout(chart: &PieChartSource, config: &Config) -> Result<PieLayout, ResolveError> {
    compute_pie_layout(chart, config)
}
