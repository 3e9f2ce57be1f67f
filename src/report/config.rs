//! Paths the report generator reads from and writes to.

use std::path::{Path, PathBuf};

use crate::fonts::DEFAULT_FONT_PATH;

/// Where the report is written unless configured otherwise, relative to the
/// working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "download/SynchroPM_Architecture_Documentation.pdf";

/// Input font and output file of a report run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    pub font_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn font_path(&self) -> &Path {
        &self.font_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_fixed_locations() {
        let config = ReportConfig::default();
        assert_eq!(
            config.output_path(),
            Path::new("download/SynchroPM_Architecture_Documentation.pdf")
        );
        assert_eq!(
            config.font_path(),
            Path::new("/usr/share/fonts/truetype/english/Times-New-Roman.ttf")
        );
    }

    #[test]
    fn overrides_replace_single_paths() {
        let config = ReportConfig::new().with_output_path("/tmp/out.pdf");
        assert_eq!(config.output_path(), Path::new("/tmp/out.pdf"));
        assert_eq!(config.font_path(), ReportConfig::default().font_path());
    }
}
