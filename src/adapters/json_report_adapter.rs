//! JSON report adapter: writes a [`ChartBundle`] to a file or stdout.

use crate::domain::bundle::ChartBundle;
use crate::domain::error::TradelensError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub struct JsonReportAdapter {
    output: Option<PathBuf>,
    pretty: bool,
}

impl JsonReportAdapter {
    /// `None` writes to stdout.
    pub fn new(output: Option<PathBuf>, pretty: bool) -> Self {
        Self { output, pretty }
    }

    fn target_name(&self) -> String {
        match &self.output {
            Some(p) => p.display().to_string(),
            None => "<stdout>".to_string(),
        }
    }

    pub fn render(&self, bundle: &ChartBundle) -> Result<String, TradelensError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(bundle)
        } else {
            serde_json::to_string(bundle)
        };
        rendered.map_err(|e| TradelensError::ReportWrite {
            target: self.target_name(),
            reason: e.to_string(),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, bundle: &ChartBundle) -> Result<(), TradelensError> {
        let json = self.render(bundle)?;
        let result = match &self.output {
            Some(path) => fs::write(path, json + "\n"),
            None => writeln!(std::io::stdout().lock(), "{}", json),
        };
        result.map_err(|e| TradelensError::ReportWrite {
            target: self.target_name(),
            reason: e.to_string(),
        })?;
        tracing::info!(output = %self.target_name(), "bundle written");
        Ok(())
    }
}
