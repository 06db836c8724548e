use log::warn;

use crate::config::Config;
use crate::error::ResolveError;
use crate::ir::PieChartSource;

use super::{PieLayout, compute_pie_layout};

/// A chart that is re-laid out on every frame.
///
/// Each [`PieChart::frame`] resolves label overlaps from scratch for the
/// current data and size. A frame that fails leaves the last good layout in
/// place, so the host can keep showing it.
#[derive(Debug, Clone)]
pub struct PieChart {
    source: PieChartSource,
    config: Config,
    current: Option<PieLayout>,
}

impl PieChart {
    pub fn new(source: PieChartSource, config: Config) -> Self {
        Self {
            source,
            config,
            current: None,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.config.pie.width, self.config.pie.height)
    }

    /// Change the drawing area. Sizes below the configured minimum are raised
    /// to it.
    pub fn resize(&mut self, width: f64, height: f64) -> &mut Self {
        let min = self.config.pie.min_size;
        self.config.pie.width = width.max(min);
        self.config.pie.height = height.max(min);
        self
    }

    pub fn set_data(&mut self, source: PieChartSource) -> &mut Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> &PieChartSource {
        &self.source
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame(&mut self) -> Result<&PieLayout, ResolveError> {
        match compute_pie_layout(&self.source, &self.config) {
            Ok(layout) => Ok(self.current.insert(layout)),
            Err(err) => {
                warn!("skipping frame, keeping previous layout: {err}");
                Err(err)
            }
        }
    }

    /// Layout of the last successful frame.
    pub fn current(&self) -> Option<&PieLayout> {
        self.current.as_ref()
    }
}
