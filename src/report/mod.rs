//! The Synchro PM architecture report.
//!
//! [`architecture_report`] assembles the fixed content; [`build_report`] loads
//! the font, renders the document and writes it to the configured path.

mod config;
mod content;
pub mod styles;

use std::path::PathBuf;

use log::info;

pub use config::{ReportConfig, DEFAULT_OUTPUT_PATH};
pub use content::{
    architecture_report, document_info, DOCUMENT_AUTHOR, DOCUMENT_CREATOR, DOCUMENT_SUBJECT,
    DOCUMENT_TITLE,
};

use crate::builder::{PdfBuildError, PdfBuilder};
use crate::fonts::{self, DEFAULT_FONT_FAMILY_NAME};

/// Outcome of a successful report run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSummary {
    pub output_path: PathBuf,
    pub page_count: usize,
    pub byte_len: usize,
    pub table_count: usize,
    pub outline_entries: usize,
}

/// Builds the report and writes it to `config.output_path`.
///
/// The font is loaded before any content is assembled.  The output file is
/// written once, after rendering succeeded, replacing any existing file.
pub fn build_report(config: &ReportConfig) -> Result<ReportSummary, PdfBuildError> {
    let font = fonts::load_font_family(config.font_path(), DEFAULT_FONT_FAMILY_NAME)
        .map_err(PdfBuildError::FontLoad)?;

    let document = architecture_report(font.name());
    let table_count = document.tables().count();
    info!(
        "Assembled report with {} blocks and {} tables",
        document.blocks.len(),
        table_count
    );

    let rendered = PdfBuilder::from_document(font, document).render()?;
    rendered.write_to(config.output_path())?;

    Ok(ReportSummary {
        output_path: config.output_path().to_path_buf(),
        page_count: rendered.page_count,
        byte_len: rendered.bytes.len(),
        table_count,
        outline_entries: rendered.outline_entries,
    })
}
