//! JSON report adapter implementing ReportPort.

use std::fs;

use crate::domain::error::ReviewError;
use crate::domain::report::Report;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter {
    pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &Report, output_path: &str) -> Result<(), ReviewError> {
        let mut content = self.render(report)?;
        content.push('\n');
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, report: &Report) -> Result<String, ReviewError> {
        let out = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(out)
    }
}
