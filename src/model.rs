//! Data structures describing the logical content of the report.
//!
//! A report is an ordered list of [`Block`]s plus a [`StyleSheet`] of named
//! [`TextStyle`]s.  Blocks never embed a style directly; paragraphs and table
//! cells refer to styles by name so that every block sharing a style renders
//! identically.  Lengths are expressed in points (1/72 inch) and table column
//! widths in inches, which keeps the literal layout values readable next to
//! the content they describe.

use genpdf::style::Color;
use thiserror::Error;

use crate::richtext::Span;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per point.
pub const MM_PER_POINT: f64 = 25.4 / POINTS_PER_INCH;

/// Converts a length in points to millimetres.
pub fn pt_to_mm(points: f64) -> f64 {
    points * MM_PER_POINT
}

/// Converts a length in millimetres to points.
pub fn mm_to_pt(millimetres: f64) -> f64 {
    millimetres / MM_PER_POINT
}

/// Converts a length in inches to points.
pub fn inch(value: f64) -> f64 {
    value * POINTS_PER_INCH
}

/// Horizontal alignment of text inside its block or table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Both edges flush; the last line of a paragraph stays left aligned.
    Justified,
}

/// A named bundle of typographic attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    name: String,
    font_family: String,
    font_size: f64,
    leading: f64,
    alignment: HorizontalAlignment,
    color: Color,
    space_before: f64,
    space_after: f64,
}

impl TextStyle {
    /// Creates a left aligned black style; `leading` defaults to 1.2 times the size.
    pub fn new(name: impl Into<String>, font_family: impl Into<String>, font_size: f64) -> Self {
        Self {
            name: name.into(),
            font_family: font_family.into(),
            font_size,
            leading: font_size * 1.2,
            alignment: HorizontalAlignment::Left,
            color: Color::Rgb(0, 0, 0),
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in points.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Distance between consecutive baselines in points.
    pub fn leading(&self) -> f64 {
        self.leading
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Vertical space inserted above the block, in points.
    pub fn space_before(&self) -> f64 {
        self.space_before
    }

    /// Vertical space inserted below the block, in points.
    pub fn space_after(&self) -> f64 {
        self.space_after
    }

    pub fn with_leading(mut self, leading: f64) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_space_before(mut self, points: f64) -> Self {
        self.space_before = points;
        self
    }

    pub fn with_space_after(mut self, points: f64) -> Self {
        self.space_after = points;
        self
    }
}

/// Ordered collection of the styles available to a report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
    styles: Vec<TextStyle>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a style, replacing any previous style with the same name.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.insert(style);
        self
    }

    /// Registers a style, replacing any previous style with the same name.
    pub fn insert(&mut self, style: TextStyle) {
        match self.styles.iter_mut().find(|existing| existing.name == style.name) {
            Some(existing) => *existing = style,
            None => self.styles.push(style),
        }
    }

    /// Looks up a style by name.
    pub fn get(&self, name: &str) -> Option<&TextStyle> {
        self.styles.iter().find(|style| style.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextStyle> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Rich text paragraph rendered with a named style.
///
/// Paragraphs with an outline level are section headings: the renderer
/// records the page they land on and lists them in the document outline.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    style: String,
    spans: Vec<Span>,
    outline_level: Option<u8>,
}

impl Paragraph {
    pub fn new(style: impl Into<String>, spans: impl Into<Vec<Span>>) -> Self {
        Self {
            style: style.into(),
            spans: spans.into(),
            outline_level: None,
        }
    }

    /// Name of the style the paragraph is rendered with.
    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Outline nesting level (1 = top level), if the paragraph is a heading.
    pub fn outline_level(&self) -> Option<u8> {
        self.outline_level
    }

    /// Marks the paragraph as a heading at the given outline level.
    pub fn with_outline_level(mut self, level: u8) -> Self {
        self.outline_level = Some(level);
        self
    }

    /// The paragraph text without inline decorations.
    pub fn plain_text(&self) -> String {
        crate::richtext::plain_text(&self.spans)
    }
}

/// A single table cell: inline text paired with the style it is rendered in.
#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    style: String,
    spans: Vec<Span>,
}

impl TableCell {
    pub fn new(style: impl Into<String>, spans: impl Into<Vec<Span>>) -> Self {
        Self {
            style: style.into(),
            spans: spans.into(),
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn plain_text(&self) -> String {
        crate::richtext::plain_text(&self.spans)
    }
}

/// Inner cell padding in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl CellPadding {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same padding on the left/right and top/bottom edges.
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl Default for CellPadding {
    fn default() -> Self {
        Self::symmetric(3.0, 6.0)
    }
}

/// Grid lines drawn around every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLines {
    /// Stroke width in points.
    pub width: f64,
    pub color: Color,
}

impl Default for GridLines {
    fn default() -> Self {
        Self {
            width: 0.5,
            color: Color::Greyscale(128),
        }
    }
}

/// Reasons a [`TableBlock`] can be rejected before rendering.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table declares no columns.
    #[error("table has no columns")]
    NoColumns,
    /// The table holds no rows.
    #[error("table has no rows")]
    NoRows,
    /// A row has a different number of cells than the table has columns.
    #[error("row {row} has {cells} cells but the table has {columns} columns")]
    RaggedRow {
        row: usize,
        cells: usize,
        columns: usize,
    },
    /// The background list does not cover exactly one entry per row.
    #[error("table has {rows} rows but {backgrounds} row background colors")]
    BackgroundMismatch { rows: usize, backgrounds: usize },
    /// More header rows were declared than rows exist.
    #[error("{header_rows} header rows declared for {rows} rows")]
    HeaderRowsExceedRows { header_rows: usize, rows: usize },
}

/// A table with fixed column widths, header rows and per-row backgrounds.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    column_widths: Vec<f64>,
    rows: Vec<Vec<TableCell>>,
    header_rows: usize,
    row_backgrounds: Vec<Color>,
    grid: GridLines,
    padding: CellPadding,
}

impl TableBlock {
    /// Creates an empty table; `column_widths` are given in inches.
    pub fn new(column_widths: impl Into<Vec<f64>>) -> Self {
        Self {
            column_widths: column_widths.into(),
            rows: Vec::new(),
            header_rows: 0,
            row_backgrounds: Vec::new(),
            grid: GridLines::default(),
            padding: CellPadding::default(),
        }
    }

    /// Column widths in inches.
    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn rows(&self) -> &[Vec<TableCell>] {
        &self.rows
    }

    /// Total number of rows, header rows included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    /// Number of rows below the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(self.header_rows)
    }

    pub fn row_backgrounds(&self) -> &[Color] {
        &self.row_backgrounds
    }

    pub fn grid(&self) -> GridLines {
        self.grid
    }

    pub fn padding(&self) -> CellPadding {
        self.padding
    }

    /// Appends a header row.  Header rows must come before any data row.
    pub fn with_header(mut self, cells: impl Into<Vec<TableCell>>) -> Self {
        self.rows.insert(self.header_rows, cells.into());
        self.header_rows += 1;
        self
    }

    /// Appends a data row.
    pub fn with_row(mut self, cells: impl Into<Vec<TableCell>>) -> Self {
        self.rows.push(cells.into());
        self
    }

    /// Assigns one background per row: `header` for header rows, then `even`
    /// and `odd` alternating by data row parity starting with `even`.
    ///
    /// Rows added after this call have no background entry and fail
    /// [`TableBlock::validate`].
    pub fn striped(mut self, header: Color, even: Color, odd: Color) -> Self {
        self.row_backgrounds = (0..self.rows.len())
            .map(|index| {
                if index < self.header_rows {
                    header
                } else if (index - self.header_rows) % 2 == 0 {
                    even
                } else {
                    odd
                }
            })
            .collect();
        self
    }

    pub fn with_grid(mut self, grid: GridLines) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_padding(mut self, padding: CellPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Checks the structural invariants the renderer relies on.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.column_widths.is_empty() {
            return Err(TableError::NoColumns);
        }
        if self.rows.is_empty() {
            return Err(TableError::NoRows);
        }
        if self.header_rows > self.rows.len() {
            return Err(TableError::HeaderRowsExceedRows {
                header_rows: self.header_rows,
                rows: self.rows.len(),
            });
        }
        if let Some((row, cells)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != self.column_widths.len())
        {
            return Err(TableError::RaggedRow {
                row,
                cells: cells.len(),
                columns: self.column_widths.len(),
            });
        }
        if self.row_backgrounds.len() != self.rows.len() {
            return Err(TableError::BackgroundMismatch {
                rows: self.rows.len(),
                backgrounds: self.row_backgrounds.len(),
            });
        }
        Ok(())
    }
}

/// Individual content blocks that make up the document.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Fixed vertical gap, in points.
    Spacer(f64),
    /// Styled paragraph content.
    Paragraph(Paragraph),
    /// Grid table.
    Table(TableBlock),
    /// Explicit page break request.
    PageBreak,
}

impl Block {
    pub fn spacer(points: f64) -> Self {
        Self::Spacer(points)
    }

    pub fn paragraph(style: impl Into<String>, spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(Paragraph::new(style, spans))
    }

    /// A paragraph marked as a heading at `level` in the document outline.
    pub fn heading(style: impl Into<String>, level: u8, spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(Paragraph::new(style, spans).with_outline_level(level))
    }

    pub fn table(table: TableBlock) -> Self {
        Self::Table(table)
    }

    pub fn page_break() -> Self {
        Self::PageBreak
    }
}

/// Document information dictionary values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub creator: String,
    pub subject: String,
}

/// Paper size and margins, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl PageSetup {
    /// US Letter with one inch margins on every side.
    pub fn letter() -> Self {
        Self {
            width: inch(8.5),
            height: inch(11.0),
            margin_top: inch(1.0),
            margin_right: inch(1.0),
            margin_bottom: inch(1.0),
            margin_left: inch(1.0),
        }
    }

    /// Width available to content between the side margins, in points.
    pub fn frame_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::letter()
    }
}

/// A complete, not yet rendered document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportDocument {
    pub info: DocumentInfo,
    pub page: PageSetup,
    pub styles: StyleSheet,
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    /// Iterates over the tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Iterates over the heading paragraphs in document order.
    pub fn headings(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) if paragraph.outline_level().is_some() => Some(paragraph),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::Rgb(255, 255, 255);
    const GREY: Color = Color::Rgb(0xF5, 0xF5, 0xF5);
    const NAVY: Color = Color::Rgb(0x1F, 0x4E, 0x79);

    fn cells(texts: &[&str]) -> Vec<TableCell> {
        texts
            .iter()
            .map(|text| TableCell::new("cell", vec![Span::new(*text)]))
            .collect()
    }

    fn sample_table() -> TableBlock {
        TableBlock::new(vec![1.0, 2.0])
            .with_header(cells(&["Role", "Use Case"]))
            .with_row(cells(&["OWNER", "Organization founder"]))
            .with_row(cells(&["ADMIN", "Team administrator"]))
            .with_row(cells(&["GUEST", "External stakeholder"]))
    }

    #[test]
    fn striped_alternates_by_data_row_parity() {
        let table = sample_table().striped(NAVY, WHITE, GREY);
        assert_eq!(table.row_backgrounds(), &[NAVY, WHITE, GREY, WHITE]);
        assert_eq!(table.data_row_count(), 3);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn rows_added_after_striping_break_the_background_invariant() {
        let table = sample_table()
            .striped(NAVY, WHITE, GREY)
            .with_row(cells(&["MEMBER", "Team member"]));
        assert_eq!(
            table.validate(),
            Err(TableError::BackgroundMismatch {
                rows: 5,
                backgrounds: 4
            })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let table = TableBlock::new(vec![1.0, 2.0])
            .with_header(cells(&["Variable", "Required"]))
            .with_row(cells(&["DATABASE_URL"]))
            .striped(NAVY, WHITE, GREY);
        assert_eq!(
            table.validate(),
            Err(TableError::RaggedRow {
                row: 1,
                cells: 1,
                columns: 2
            })
        );
    }

    #[test]
    fn header_rows_stay_ahead_of_data_rows() {
        let table = TableBlock::new(vec![1.0])
            .with_row(cells(&["data"]))
            .with_header(cells(&["header"]));
        assert_eq!(table.rows()[0][0].plain_text(), "header");
        assert_eq!(table.header_rows(), 1);
    }

    #[test]
    fn empty_tables_are_rejected() {
        assert_eq!(TableBlock::new(Vec::new()).validate(), Err(TableError::NoColumns));
        assert_eq!(TableBlock::new(vec![1.0]).validate(), Err(TableError::NoRows));
    }

    #[test]
    fn stylesheet_replaces_styles_by_name() {
        let sheet = StyleSheet::new()
            .with_style(TextStyle::new("Body", "Serif", 10.0))
            .with_style(TextStyle::new("Body", "Serif", 12.0));
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.get("Body").map(TextStyle::font_size), Some(12.0));
        assert!(sheet.get("Missing").is_none());
    }

    #[test]
    fn letter_frame_is_six_and_a_half_inches() {
        assert!((PageSetup::letter().frame_width() - inch(6.5)).abs() < f64::EPSILON);
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-9);
    }
}
