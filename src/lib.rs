//! Generator for the Synchro PM architecture documentation PDF.
//!
//! The [`report`] module holds the fixed document content.  The remaining
//! modules form a small report builder on top of `genpdf`, with `lopdf` used
//! to paint table backgrounds and add document metadata and the heading
//! outline after rendering.

pub mod bookmarks;
pub mod builder;
pub mod decorations;
pub mod elements;
pub mod fonts;
pub mod metadata;
pub mod model;
pub mod report;
pub mod richtext;

pub use builder::{PdfBuildError, PdfBuilder, RenderedPdf};
pub use report::{build_report, ReportConfig, ReportSummary};
