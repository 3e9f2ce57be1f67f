//! Document construction for the report renderer.
//!
//! [`PdfBuilder`] collects a stylesheet and an ordered list of blocks, checks
//! them, maps every block onto a `genpdf` element and renders the document in
//! one pass.  The rendered bytes are then reopened with `lopdf` to paint the
//! table backgrounds and grid, and to add the document information entries
//! and the heading outline.

use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::style;
use genpdf::{self, Margins, PageDecorator, Size};
use log::{debug, info};

use crate::bookmarks::{self, BookmarkError, HeadingMark};
use crate::decorations;
use crate::elements::{mm_from_f64, GridCell, GridTable, PageTracker, Spacer, TextBlock, Tracked};
use crate::fonts::LoadedFont;
use crate::metadata;
use crate::model::{
    inch, pt_to_mm, Block, DocumentInfo, PageSetup, ReportDocument, StyleSheet, TableBlock,
    TableError, TextStyle,
};

/// Errors raised while assembling or rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum PdfBuildError {
    /// The font file could not be loaded.
    #[error("failed to load font")]
    FontLoad(#[source] Error),
    /// A block refers to a style the stylesheet does not define.
    #[error("unknown style '{name}'")]
    UnknownStyle { name: String },
    /// A style selects a font family that was not loaded.
    #[error("style '{style}' uses font family '{family}' which is not loaded")]
    FontFamilyMismatch { style: String, family: String },
    /// A table violates its structural invariants.
    #[error("table {index} is invalid")]
    InvalidTable {
        index: usize,
        #[source]
        reason: TableError,
    },
    /// `genpdf` failed to lay out or write the document.
    #[error("failed to render document")]
    Render(#[source] Error),
    /// The rendered bytes could not be reopened or rewritten.
    #[error("failed to post-process rendered PDF")]
    PostProcess(#[from] lopdf::Error),
    /// The post-processed document could not be serialized.
    #[error("failed to serialize post-processed PDF")]
    Serialize(#[source] io::Error),
    /// The heading outline could not be attached.
    #[error("failed to attach document outline")]
    Outline(#[from] BookmarkError),
    /// The output file could not be written.
    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A finished document.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// Complete PDF file contents.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Every heading with the page it landed on.
    pub headings: Vec<HeadingMark>,
    /// Number of entries written to the outline.
    pub outline_entries: usize,
    /// Number of pages carrying table backgrounds or grid rules.
    pub decorated_pages: usize,
}

impl RenderedPdf {
    /// Writes the document to `path` in a single call, replacing any existing
    /// file.  The parent directory must exist.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), PdfBuildError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|source| PdfBuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

/// Builder for rendered report documents.
pub struct PdfBuilder {
    font: LoadedFont,
    info: DocumentInfo,
    page: PageSetup,
    styles: StyleSheet,
    blocks: Vec<Block>,
}

impl PdfBuilder {
    /// Creates an empty US Letter document typeset in `font`.
    pub fn new(font: LoadedFont) -> Self {
        Self {
            font,
            info: DocumentInfo::default(),
            page: PageSetup::default(),
            styles: StyleSheet::default(),
            blocks: Vec::new(),
        }
    }

    /// Creates a builder holding everything `document` describes.
    pub fn from_document(font: LoadedFont, document: ReportDocument) -> Self {
        Self {
            font,
            info: document.info,
            page: document.page,
            styles: document.styles,
            blocks: document.blocks,
        }
    }

    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.styles = styles;
        self
    }

    /// Appends a block after every block added so far.
    pub fn add_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    fn style(&self, name: &str) -> Result<&TextStyle, PdfBuildError> {
        let style = self
            .styles
            .get(name)
            .ok_or_else(|| PdfBuildError::UnknownStyle {
                name: name.to_owned(),
            })?;
        if style.font_family() != self.font.name() {
            return Err(PdfBuildError::FontFamilyMismatch {
                style: style.name().to_owned(),
                family: style.font_family().to_owned(),
            });
        }
        Ok(style)
    }

    /// Checks that every referenced style exists and every table is well formed.
    pub fn validate(&self) -> Result<(), PdfBuildError> {
        let mut table_index = 0;
        for block in &self.blocks {
            match block {
                Block::Paragraph(paragraph) => {
                    self.style(paragraph.style())?;
                }
                Block::Table(table) => {
                    table
                        .validate()
                        .map_err(|reason| PdfBuildError::InvalidTable {
                            index: table_index,
                            reason,
                        })?;
                    for cell in table.rows().iter().flatten() {
                        self.style(cell.style())?;
                    }
                    table_index += 1;
                }
                Block::Spacer(_) | Block::PageBreak => {}
            }
        }
        Ok(())
    }

    fn grid_table(&self, table: &TableBlock, tracker: &PageTracker) -> Result<GridTable, PdfBuildError> {
        let widths = table.column_widths().iter().map(|w| inch(*w)).collect();
        let mut grid = GridTable::new(widths, tracker.clone());
        grid.set_grid(table.grid());
        grid.set_padding(table.padding());
        for (row, background) in table.rows().iter().zip(table.row_backgrounds()) {
            let cells = row
                .iter()
                .map(|cell| Ok(GridCell::new(cell.spans().to_vec(), self.style(cell.style())?.clone())))
                .collect::<Result<Vec<_>, PdfBuildError>>()?;
            grid.push_row(cells, Some(*background));
        }
        Ok(grid)
    }

    fn create_document(&self, tracker: &PageTracker) -> genpdf::Document {
        let mut document = genpdf::Document::new(self.font.clone().into_family());
        document.set_title(self.info.title.clone());
        document.set_minimal_conformance();
        document.set_paper_size(Size::new(
            mm_from_f64(pt_to_mm(self.page.width)),
            mm_from_f64(pt_to_mm(self.page.height)),
        ));
        document.set_page_decorator(TrackingPageDecorator::new(
            Margins::trbl(
                mm_from_f64(pt_to_mm(self.page.margin_top)),
                mm_from_f64(pt_to_mm(self.page.margin_right)),
                mm_from_f64(pt_to_mm(self.page.margin_bottom)),
                mm_from_f64(pt_to_mm(self.page.margin_left)),
            ),
            tracker.clone(),
        ));
        document
    }

    /// Renders the document and post-processes it with `lopdf`.
    pub fn render(self) -> Result<RenderedPdf, PdfBuildError> {
        self.validate()?;

        let tracker = PageTracker::new();
        let mut document = self.create_document(&tracker);
        let mut headings = Vec::new();

        for (index, block) in self.blocks.iter().enumerate() {
            match block {
                Block::Spacer(points) => {
                    debug!("Block {}: spacer {}pt", index, points);
                    document.push(Tracked::new(Spacer::new(*points), tracker.clone()));
                }
                Block::Paragraph(paragraph) => {
                    debug!("Block {}: paragraph '{}'", index, paragraph.style());
                    let style = self.style(paragraph.style())?.clone();
                    let mut element =
                        TextBlock::new(paragraph.spans().to_vec(), style, tracker.clone());
                    if let Some(level) = paragraph.outline_level() {
                        let anchor = tracker.anchor();
                        headings.push((anchor.slot(), paragraph.plain_text(), level));
                        element = element.with_anchor(anchor);
                    }
                    document.push(Tracked::new(element, tracker.clone()));
                }
                Block::Table(table) => {
                    debug!(
                        "Block {}: table with {} columns and {} rows",
                        index,
                        table.column_count(),
                        table.row_count()
                    );
                    let grid = self.grid_table(table, &tracker)?;
                    document.push(Tracked::new(grid, tracker.clone()));
                }
                Block::PageBreak => {
                    debug!("Block {}: page break", index);
                    document.push(Tracked::new(
                        genpdf::elements::PageBreak::new(),
                        tracker.clone(),
                    ));
                }
            }
        }

        let mut raw = Vec::new();
        document.render(&mut raw).map_err(PdfBuildError::Render)?;
        info!(
            "Rendered {} pages ({} bytes) with font '{}'",
            tracker.current_page(),
            raw.len(),
            self.font.name()
        );

        let pages = tracker.marked_pages();
        let headings: Vec<HeadingMark> = headings
            .into_iter()
            .map(|(slot, title, level)| {
                HeadingMark::new(title, level, pages.get(slot).copied().flatten())
            })
            .collect();

        let mut pdf = lopdf::Document::load_mem(&raw)?;
        let shapes = tracker.decorations();
        let decorated_pages = decorations::apply_decorations(&mut pdf, &shapes, &self.page)?;
        debug!("Painted {} table shapes on {} pages", shapes.len(), decorated_pages);
        metadata::apply_document_info(&mut pdf, &self.info)?;
        let outline = bookmarks::plan_outline(&headings)?;
        let outline_entries = bookmarks::apply_outline(&mut pdf, &outline)?;
        debug!("Attached {} outline entries", outline_entries);

        let page_count = pdf.get_pages().len();
        let mut bytes = Vec::with_capacity(raw.len());
        pdf.save_to(&mut bytes).map_err(PdfBuildError::Serialize)?;

        Ok(RenderedPdf {
            bytes,
            page_count,
            headings,
            outline_entries,
            decorated_pages,
        })
    }
}

/// Page decorator applying the page margins and counting pages for the
/// heading anchors.
struct TrackingPageDecorator {
    margins: Margins,
    tracker: PageTracker,
}

impl TrackingPageDecorator {
    fn new(margins: Margins, tracker: PageTracker) -> Self {
        Self { margins, tracker }
    }
}

impl PageDecorator for TrackingPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.tracker.start_page();
        debug!("Starting page {}", page);
        area.add_margins(self.margins);
        Ok(area)
    }
}
