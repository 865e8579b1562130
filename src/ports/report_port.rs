//! Report output port trait.

use crate::domain::error::ReviewError;
use crate::domain::report::Report;

/// Port for writing review reports.
pub trait ReportPort {
    fn write(&self, report: &Report, output_path: &str) -> Result<(), ReviewError>;

    /// Render without touching the filesystem.
    fn render(&self, report: &Report) -> Result<String, ReviewError>;
}
