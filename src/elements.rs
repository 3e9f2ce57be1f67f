//! Extended element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` ships left/center/right paragraphs and a plain table layout.  The
//! report needs a few things it lacks: fixed-height spacers, justified text
//! with explicit leading and paragraph spacing, tables with padded cells,
//! row backgrounds and a grid, and a way to learn which page a heading ended
//! up on.  The elements below provide those by measuring text with the
//! document font cache and placing single-line [`Text`] elements themselves.
//!
//! Row backgrounds and grid rules are not drawn here.  Tables record them as
//! [`Decoration`]s on the [`PageTracker`], which also follows the vertical
//! position of every top-level element wrapped in [`Tracked`].

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

use genpdf::elements::Text;
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};
use log::warn;

use crate::decorations::Decoration;
use crate::model::{pt_to_mm, CellPadding, GridLines, HorizontalAlignment, TextStyle};
use crate::richtext::Span;

/// Slack for floating point comparisons, in millimetres.
const EPSILON_MM: f64 = 1e-6;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// `genpdf` only supports whole point sizes.
pub fn font_size_points(size: f64) -> u8 {
    size.round().clamp(1.0, f64::from(u8::MAX)) as u8
}

/// Converts a report style into the `genpdf` style used for its text.
pub fn base_style(style: &TextStyle) -> Style {
    Style::new()
        .with_font_size(font_size_points(style.font_size()))
        .with_color(style.color())
}

/// Shared layout state connecting the page decorator with the elements.
///
/// The decorator calls [`PageTracker::start_page`] for every new page and
/// [`Tracked`] elements advance the vertical cursor by the height they used.
/// Elements holding an [`Anchor`] record the current page when they first draw
/// something, which gives the builder the page of every heading once
/// rendering has finished.
#[derive(Clone, Debug, Default)]
pub struct PageTracker {
    current: Rc<Cell<usize>>,
    cursor: Rc<Cell<f64>>,
    marks: Rc<RefCell<Vec<Option<usize>>>>,
    decorations: Rc<RefCell<Vec<Decoration>>>,
}

impl PageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next page and returns its 1-based number.
    pub fn start_page(&self) -> usize {
        let page = self.current.get() + 1;
        self.current.set(page);
        self.cursor.set(0.0);
        page
    }

    /// The page currently being rendered, 0 before the first page starts.
    pub fn current_page(&self) -> usize {
        self.current.get()
    }

    /// Millimetres of the current page already used by earlier elements.
    pub fn cursor(&self) -> f64 {
        self.cursor.get()
    }

    /// Whether nothing has been placed on the current page yet.
    pub fn at_page_top(&self) -> bool {
        self.cursor.get() <= EPSILON_MM
    }

    pub fn advance(&self, height: f64) {
        self.cursor.set(self.cursor.get() + height);
    }

    /// Queues a shape to paint once the document has been rendered.
    pub fn decorate(&self, decoration: Decoration) {
        self.decorations.borrow_mut().push(decoration);
    }

    /// Every queued shape, in recording order.
    pub fn decorations(&self) -> Vec<Decoration> {
        self.decorations.borrow().clone()
    }

    /// Reserves a new anchor slot.
    pub fn anchor(&self) -> Anchor {
        let mut marks = self.marks.borrow_mut();
        marks.push(None);
        Anchor {
            tracker: self.clone(),
            slot: marks.len() - 1,
        }
    }

    /// Recorded page per anchor slot, in reservation order.
    pub fn marked_pages(&self) -> Vec<Option<usize>> {
        self.marks.borrow().clone()
    }
}

/// Records the page on which its owner first rendered.
#[derive(Clone, Debug)]
pub struct Anchor {
    tracker: PageTracker,
    slot: usize,
}

impl Anchor {
    pub fn slot(&self) -> usize {
        self.slot
    }

    fn mark(&self) {
        let page = self.tracker.current_page();
        if let Some(entry) = self.tracker.marks.borrow_mut().get_mut(self.slot) {
            entry.get_or_insert(page);
        }
    }
}

/// Top-level element that reports the height it used to the [`PageTracker`].
pub struct Tracked<E> {
    inner: E,
    tracker: PageTracker,
}

impl<E: Element> Tracked<E> {
    pub fn new(inner: E, tracker: PageTracker) -> Self {
        Self { inner, tracker }
    }
}

impl<E: Element> Element for Tracked<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let result = self.inner.render(context, area, style)?;
        self.tracker.advance(mm_to_f64(result.size.height));
        Ok(result)
    }
}

/// Fixed vertical gap.  At the bottom of a page the gap is cut short instead
/// of being carried over.
pub struct Spacer {
    height: f64,
}

impl Spacer {
    /// Creates a spacer of `points` height.
    pub fn new(points: f64) -> Self {
        Self {
            height: pt_to_mm(points.max(0.0)),
        }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = mm_to_f64(area.size().height);
        let mut result = RenderResult::default();
        result.size = Size::new(0, mm_from_f64(self.height.min(available.max(0.0))));
        Ok(result)
    }
}

/// Splits spans into unbreakable words.
///
/// Whitespace separates words; a span boundary without whitespace keeps both
/// pieces in the same word, each with its own style.
pub(crate) fn split_words(spans: &[Span], base: Style) -> Vec<Vec<(String, Style)>> {
    let mut words = Vec::new();
    let mut current: Vec<(String, Style)> = Vec::new();
    let mut fragment = String::new();
    let mut pending_break = false;

    for span in spans {
        let style = span.apply_to(base);
        for ch in span.text().chars() {
            if ch.is_whitespace() {
                pending_break = true;
                continue;
            }
            if pending_break {
                if !fragment.is_empty() {
                    current.push((std::mem::take(&mut fragment), style));
                }
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                pending_break = false;
            }
            fragment.push(ch);
        }
        if !fragment.is_empty() {
            current.push((std::mem::take(&mut fragment), style));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Greedy line breaking over `(word width, trailing space width)` pairs.
///
/// Returns the word range of every line.  A word wider than `max_width` gets a
/// line of its own.
pub(crate) fn break_lines(words: &[(f64, f64)], max_width: f64) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut line_width = 0.0;

    for (index, (width, _)) in words.iter().enumerate() {
        if index == start {
            line_width = *width;
            continue;
        }
        let candidate = line_width + words[index - 1].1 + width;
        if candidate > max_width + EPSILON_MM {
            lines.push(start..index);
            start = index;
            line_width = *width;
        } else {
            line_width = candidate;
        }
    }
    if start < words.len() {
        lines.push(start..words.len());
    }
    lines
}

/// Horizontal offset of every word on one line.
///
/// Justified lines spread the remaining width over the gaps between words;
/// the last line of a paragraph and single-word lines stay left aligned.
pub(crate) fn word_offsets(
    words: &[(f64, f64)],
    max_width: f64,
    alignment: HorizontalAlignment,
    last_line: bool,
) -> Vec<f64> {
    if words.is_empty() {
        return Vec::new();
    }
    let gaps: f64 = words[..words.len() - 1].iter().map(|(_, space)| space).sum();
    let natural: f64 = words.iter().map(|(width, _)| width).sum::<f64>() + gaps;
    let slack = (max_width - natural).max(0.0);

    let (start, extra_gap) = match alignment {
        HorizontalAlignment::Left => (0.0, 0.0),
        HorizontalAlignment::Center => (slack / 2.0, 0.0),
        HorizontalAlignment::Right => (slack, 0.0),
        HorizontalAlignment::Justified if last_line || words.len() < 2 => (0.0, 0.0),
        HorizontalAlignment::Justified => (0.0, slack / (words.len() - 1) as f64),
    };

    let mut offsets = Vec::with_capacity(words.len());
    let mut x = start;
    for (width, space) in words {
        offsets.push(x);
        x += width + space + extra_gap;
    }
    offsets
}

/// A word ready to draw: its styled fragments with their widths.
#[derive(Clone, Debug)]
struct PlacedWord {
    x: f64,
    fragments: Vec<(StyledString, f64)>,
}

/// Text wrapped to a fixed width, measured with the document fonts.
#[derive(Clone, Debug)]
struct TextLayout {
    lines: Vec<Vec<PlacedWord>>,
    line_height: f64,
}

impl TextLayout {
    fn new(
        spans: &[Span],
        style: &TextStyle,
        context: &genpdf::Context,
        max_width: f64,
    ) -> Self {
        let font_cache = &context.font_cache;
        let base = base_style(style);
        let natural_height = mm_to_f64(base.line_height(font_cache));
        let line_height = pt_to_mm(style.leading()).max(natural_height);

        let words: Vec<Vec<(StyledString, f64)>> = split_words(spans, base)
            .into_iter()
            .map(|word| {
                word.into_iter()
                    .map(|(text, style)| {
                        let string = StyledString::new(text, style);
                        let width = mm_to_f64(string.width(font_cache));
                        (string, width)
                    })
                    .collect()
            })
            .collect();

        let metrics: Vec<(f64, f64)> = words
            .iter()
            .map(|fragments| {
                let width: f64 = fragments.iter().map(|(_, width)| width).sum();
                let space_style = fragments
                    .last()
                    .map(|(string, _)| string.style)
                    .unwrap_or(base);
                let space = mm_to_f64(StyledString::new(" ", space_style).width(font_cache));
                (width, space)
            })
            .collect();

        let ranges = break_lines(&metrics, max_width);
        let line_count = ranges.len();
        let lines = ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                let offsets = word_offsets(
                    &metrics[range.clone()],
                    max_width,
                    style.alignment(),
                    index + 1 == line_count,
                );
                range
                    .zip(offsets)
                    .map(|(word, x)| PlacedWord {
                        x,
                        fragments: words[word].clone(),
                    })
                    .collect()
            })
            .collect();

        Self { lines, line_height }
    }

    fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }

    /// Draws one line with its top edge `y` below the top of `area`.
    ///
    /// Returns `false` if `genpdf` refused to place the text.
    fn draw_line(
        &self,
        index: usize,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        origin: (f64, f64),
        style: Style,
    ) -> Result<bool, Error> {
        let Some(line) = self.lines.get(index) else {
            return Ok(true);
        };
        let (x0, y) = origin;
        for word in line {
            let mut x = x0 + word.x;
            for (string, width) in &word.fragments {
                let mut fragment_area = area.clone();
                fragment_area.add_offset(Position::new(mm_from_f64(x), mm_from_f64(y)));
                let result = Text::new(string.clone()).render(context, fragment_area, style)?;
                if result.has_more {
                    return Ok(false);
                }
                x += width;
            }
        }
        Ok(true)
    }
}

/// A paragraph rendered with a [`TextStyle`]: explicit leading, spacing
/// before and after, and left/center/right or justified alignment.
///
/// The paragraph breaks across pages between lines.  Space before is dropped
/// when the paragraph starts at the top of a page.
pub struct TextBlock {
    spans: Vec<Span>,
    style: TextStyle,
    tracker: PageTracker,
    anchor: Option<Anchor>,
    layout: Option<TextLayout>,
    next_line: usize,
    started: bool,
}

impl TextBlock {
    pub fn new(spans: impl Into<Vec<Span>>, style: TextStyle, tracker: PageTracker) -> Self {
        Self {
            spans: spans.into(),
            style,
            tracker,
            anchor: None,
            layout: None,
            next_line: 0,
            started: false,
        }
    }

    /// Records the page of the first rendered line in `anchor`.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

impl Element for TextBlock {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let available_width = mm_to_f64(area.size().width);
        let available_height = mm_to_f64(area.size().height);
        let layout = match self.layout.take() {
            Some(layout) => layout,
            None => TextLayout::new(&self.spans, &self.style, context, available_width),
        };

        let mut result = RenderResult::default();
        let mut cursor = 0.0;
        if !self.started && !self.tracker.at_page_top() {
            cursor += pt_to_mm(self.style.space_before()).min(available_height.max(0.0));
        }

        let first_line = self.next_line;
        while self.next_line < layout.lines.len() {
            if cursor + layout.line_height > available_height + EPSILON_MM {
                result.has_more = true;
                break;
            }
            if !layout.draw_line(self.next_line, context, &area, (0.0, cursor), style)? {
                result.has_more = true;
                break;
            }
            if let Some(anchor) = &self.anchor {
                anchor.mark();
            }
            cursor += layout.line_height;
            self.next_line += 1;
        }
        let drew = self.next_line > first_line;
        self.started |= drew;

        if !result.has_more {
            let remaining = (available_height - cursor).max(0.0);
            cursor += pt_to_mm(self.style.space_after()).min(remaining);
        }

        self.layout = Some(layout);
        // A zero size with more to come lets genpdf report an oversized line
        // instead of adding pages forever.
        let width = if drew { area.size().width } else { mm_from_f64(0.0) };
        result.size = Size::new(width, mm_from_f64(cursor));
        Ok(result)
    }
}

/// Content of one [`GridTable`] cell.
#[derive(Clone, Debug)]
pub struct GridCell {
    spans: Vec<Span>,
    style: TextStyle,
}

impl GridCell {
    pub fn new(spans: impl Into<Vec<Span>>, style: TextStyle) -> Self {
        Self {
            spans: spans.into(),
            style,
        }
    }
}

#[derive(Clone, Debug)]
struct RowLayout {
    height: f64,
    cells: Vec<TextLayout>,
}

#[derive(Clone, Debug)]
struct GridGeometry {
    /// Left edge of every column plus the right edge of the last one.
    edges: Vec<f64>,
    rows: Vec<RowLayout>,
}

/// Table with fixed column widths, padded cells, one background color per row
/// and grid lines around every cell.
///
/// Columns wider than the frame in total are scaled down proportionally;
/// narrower tables are centred.  Cell text is vertically centred in its row.
/// The table breaks across pages between rows.  Backgrounds and grid rules
/// are queued on the tracker rather than drawn.
pub struct GridTable {
    tracker: PageTracker,
    column_widths: Vec<f64>,
    rows: Vec<Vec<GridCell>>,
    backgrounds: Vec<Color>,
    grid: GridLines,
    padding: CellPadding,
    geometry: Option<GridGeometry>,
    next_row: usize,
}

impl GridTable {
    /// Creates a table; `column_widths` are given in points.
    pub fn new(column_widths: Vec<f64>, tracker: PageTracker) -> Self {
        Self {
            tracker,
            column_widths,
            rows: Vec::new(),
            backgrounds: Vec::new(),
            grid: GridLines::default(),
            padding: CellPadding::default(),
            geometry: None,
            next_row: 0,
        }
    }

    /// Appends a row with an optional background color.
    pub fn push_row(&mut self, cells: Vec<GridCell>, background: Option<Color>) {
        self.rows.push(cells);
        if let Some(color) = background {
            self.backgrounds.resize(self.rows.len() - 1, Color::Rgb(255, 255, 255));
            self.backgrounds.push(color);
        }
    }

    pub fn set_grid(&mut self, grid: GridLines) {
        self.grid = grid;
    }

    pub fn set_padding(&mut self, padding: CellPadding) {
        self.padding = padding;
    }

    fn layout(&self, context: &genpdf::Context, available_width: f64) -> GridGeometry {
        let natural: Vec<f64> = self.column_widths.iter().map(|w| pt_to_mm(*w)).collect();
        let total: f64 = natural.iter().sum();
        let scale = if total > available_width + EPSILON_MM && total > 0.0 {
            warn!(
                "Table is {:.1}mm wide but the frame only has {:.1}mm; scaling columns down",
                total, available_width
            );
            available_width / total
        } else {
            1.0
        };
        let widths: Vec<f64> = natural.iter().map(|w| w * scale).collect();
        let table_width: f64 = widths.iter().sum();

        let mut edges = Vec::with_capacity(widths.len() + 1);
        let mut x = ((available_width - table_width) / 2.0).max(0.0);
        edges.push(x);
        for width in &widths {
            x += width;
            edges.push(x);
        }

        let pad_x = pt_to_mm(self.padding.left + self.padding.right);
        let pad_y = pt_to_mm(self.padding.top + self.padding.bottom);
        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let cells: Vec<TextLayout> = cells
                    .iter()
                    .zip(&widths)
                    .map(|(cell, width)| {
                        TextLayout::new(&cell.spans, &cell.style, context, (width - pad_x).max(0.0))
                    })
                    .collect();
                let content = cells.iter().map(TextLayout::height).fold(0.0, f64::max);
                RowLayout {
                    height: content + pad_y,
                    cells,
                }
            })
            .collect();

        GridGeometry { edges, rows }
    }

    /// Queues the background and the grid rules of one row whose top edge is
    /// `top` millimetres below the top of the page frame.
    fn record_row(&self, edges: &[f64], top: f64, height: f64, background: Option<Color>) {
        let (Some(&left), Some(&right)) = (edges.first(), edges.last()) else {
            return;
        };
        let page = self.tracker.current_page();
        if let Some(color) = background {
            self.tracker
                .decorate(Decoration::fill(page, color, left, top, right - left, height));
        }

        let bottom = top + height;
        let GridLines { width, color } = self.grid;
        for y in [top, bottom] {
            self.tracker
                .decorate(Decoration::rule(page, color, (left, y), (right, y), width));
        }
        for &x in edges {
            self.tracker
                .decorate(Decoration::rule(page, color, (x, top), (x, bottom), width));
        }
    }
}

impl Element for GridTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let available_width = mm_to_f64(area.size().width);
        let available_height = mm_to_f64(area.size().height);
        let geometry = match self.geometry.take() {
            Some(geometry) => geometry,
            None => self.layout(context, available_width),
        };

        let pad_top = pt_to_mm(self.padding.top);
        let pad_bottom = pt_to_mm(self.padding.bottom);
        let pad_left = pt_to_mm(self.padding.left);

        let frame_top = self.tracker.cursor();
        let mut result = RenderResult::default();
        let mut cursor = 0.0;
        while self.next_row < geometry.rows.len() {
            let row = &geometry.rows[self.next_row];
            if cursor + row.height > available_height + EPSILON_MM {
                result.has_more = true;
                break;
            }

            let content_height = row.height - pad_top - pad_bottom;
            for (column, cell) in row.cells.iter().enumerate() {
                let x = geometry.edges[column] + pad_left;
                let y = cursor + pad_top + (content_height - cell.height()) / 2.0;
                for line in 0..cell.lines.len() {
                    let top = y + line as f64 * cell.line_height;
                    if !cell.draw_line(line, context, &area, (x, top), style)? {
                        return Err(Error::new(
                            format!(
                                "Text of table row {} column {} does not fit its cell",
                                self.next_row, column
                            ),
                            ErrorKind::PageSizeExceeded,
                        ));
                    }
                }
            }

            let background = self.backgrounds.get(self.next_row).copied();
            self.record_row(&geometry.edges, frame_top + cursor, row.height, background);
            cursor += row.height;
            self.next_row += 1;
        }

        self.geometry = Some(geometry);
        let width = if cursor > 0.0 { area.size().width } else { mm_from_f64(0.0) };
        result.size = Size::new(width, mm_from_f64(cursor));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(words: &[Vec<(String, Style)>]) -> Vec<String> {
        words
            .iter()
            .map(|fragments| fragments.iter().map(|(text, _)| text.as_str()).collect())
            .collect()
    }

    #[test]
    fn split_words_breaks_on_whitespace_only() {
        let spans = vec![
            Span::new("Table 1.").bold(),
            Span::new(" Technology  Stack"),
            Span::new("Overview"),
        ];
        let words = split_words(&spans, Style::new());
        assert_eq!(texts(&words), ["Table", "1.", "Technology", "StackOverview"]);
        assert!(words[0][0].1.is_bold());
        assert!(!words[2][0].1.is_bold());
        assert_eq!(words[3].len(), 2, "span boundary keeps both fragments");
    }

    #[test]
    fn split_words_ignores_surrounding_whitespace() {
        let words = split_words(&[Span::new("  GET, POST  ")], Style::new());
        assert_eq!(texts(&words), ["GET,", "POST"]);
        assert!(split_words(&[Span::new("   ")], Style::new()).is_empty());
    }

    #[test]
    fn break_lines_is_greedy() {
        let words = [(10.0, 2.0), (10.0, 2.0), (10.0, 2.0), (10.0, 2.0)];
        assert_eq!(break_lines(&words, 33.0), vec![0..2, 2..4]);
        assert_eq!(break_lines(&words, 100.0), vec![0..4]);
        assert_eq!(break_lines(&words, 22.0), vec![0..2, 2..4]);
    }

    #[test]
    fn oversized_words_get_their_own_line() {
        let words = [(5.0, 1.0), (50.0, 1.0), (5.0, 1.0)];
        assert_eq!(break_lines(&words, 20.0), vec![0..1, 1..2, 2..3]);
        assert!(break_lines(&[], 20.0).is_empty());
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let words = [(10.0, 2.0), (10.0, 2.0), (10.0, 2.0)];
        let offsets = word_offsets(&words, 40.0, HorizontalAlignment::Justified, false);
        assert_eq!(offsets, vec![0.0, 15.0, 30.0]);
        assert!((offsets[2] + 10.0 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn last_justified_line_stays_left_aligned() {
        let words = [(10.0, 2.0), (10.0, 2.0)];
        let offsets = word_offsets(&words, 40.0, HorizontalAlignment::Justified, true);
        assert_eq!(offsets, vec![0.0, 12.0]);
    }

    #[test]
    fn centered_and_right_lines_shift_by_slack() {
        let words = [(10.0, 2.0), (10.0, 2.0)];
        assert_eq!(
            word_offsets(&words, 40.0, HorizontalAlignment::Center, false),
            vec![9.0, 21.0]
        );
        assert_eq!(
            word_offsets(&words, 40.0, HorizontalAlignment::Right, false),
            vec![18.0, 30.0]
        );
    }

    #[test]
    fn overfull_lines_never_shift_left() {
        let words = [(30.0, 2.0), (30.0, 2.0)];
        assert_eq!(
            word_offsets(&words, 40.0, HorizontalAlignment::Right, false),
            vec![0.0, 32.0]
        );
    }

    #[test]
    fn anchors_keep_the_first_page_they_see() {
        let tracker = PageTracker::new();
        let first = tracker.anchor();
        let second = tracker.anchor();

        tracker.start_page();
        first.mark();
        tracker.start_page();
        first.mark();
        second.mark();

        assert_eq!(tracker.marked_pages(), vec![Some(1), Some(2)]);
        assert_eq!(second.slot(), 1);
    }

    #[test]
    fn new_pages_reset_the_cursor() {
        let tracker = PageTracker::new();
        tracker.start_page();
        assert!(tracker.at_page_top());
        tracker.advance(12.5);
        assert!(!tracker.at_page_top());
        assert_eq!(tracker.cursor(), 12.5);

        assert_eq!(tracker.start_page(), 2);
        assert!(tracker.at_page_top());
    }

    #[test]
    fn rows_queue_a_background_and_their_grid() {
        let tracker = PageTracker::new();
        tracker.start_page();
        tracker.start_page();
        let mut table = GridTable::new(vec![72.0, 144.0], tracker.clone());
        table.set_grid(GridLines {
            width: 0.5,
            color: Color::Greyscale(128),
        });
        let navy = Color::Rgb(0x1F, 0x4E, 0x79);

        table.record_row(&[0.0, 25.4, 76.2], 10.0, 8.0, Some(navy));
        let decorations = tracker.decorations();
        assert_eq!(decorations.len(), 1 + 2 + 3);
        assert!(decorations.iter().all(|decoration| decoration.page == 2));
        assert_eq!(
            decorations[0],
            Decoration::fill(2, navy, 0.0, 10.0, 76.2, 8.0)
        );
        assert_eq!(
            decorations[2],
            Decoration::rule(2, Color::Greyscale(128), (0.0, 18.0), (76.2, 18.0), 0.5)
        );

        table.record_row(&[0.0, 25.4, 76.2], 18.0, 8.0, None);
        assert_eq!(tracker.decorations().len(), 6 + 5, "no fill without a background");
    }

    fn test_context() -> Option<genpdf::Context> {
        let path = [
            std::env::var("SYNCHRO_PM_TEST_FONT").ok(),
            Some(crate::fonts::DEFAULT_FONT_PATH.to_string()),
            Some("/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf".to_string()),
            Some("/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf".to_string()),
        ]
        .into_iter()
        .flatten()
        .find(|path| crate::fonts::font_available(path))?;
        let font = crate::fonts::load_font_family(path, "Serif").ok()?;
        Some(genpdf::Context {
            font_cache: genpdf::fonts::FontCache::new(font.into_family()),
        })
    }

    fn cell(text: &str) -> GridCell {
        GridCell::new(vec![Span::new(text)], TextStyle::new("Cell", "Serif", 10.0))
    }

    #[test]
    fn rows_that_do_not_fit_stay_pending() {
        let Some(mut context) = test_context() else {
            eprintln!("skipping test: no usable font found");
            return;
        };
        let renderer = render::Renderer::new(Size::new(120, 120), "rows").expect("renderer");
        context.font_cache.load_pdf_fonts(&renderer).expect("load fonts");
        let area = renderer.first_page().first_layer().area();

        let tracker = PageTracker::new();
        tracker.start_page();
        let mut table = GridTable::new(vec![100.0, 100.0], tracker.clone());
        table.set_padding(CellPadding::symmetric(6.0, 8.0));
        table.push_row(vec![cell("Layer"), cell("Purpose")], Some(Color::Rgb(0x1F, 0x4E, 0x79)));
        table.push_row(vec![cell("ORM"), cell("Prisma")], Some(Color::Rgb(255, 255, 255)));

        let mut short = area.clone();
        short.set_height(mm_from_f64(5.0));
        let result = table.render(&context, short, Style::new()).expect("render short area");
        assert!(result.has_more);
        assert_eq!(result.size, Size::new(0, 0));
        assert!(tracker.decorations().is_empty(), "nothing recorded for pending rows");

        let result = table.render(&context, area, Style::new()).expect("render full area");
        assert!(!result.has_more);
        let fills = tracker
            .decorations()
            .iter()
            .filter(|decoration| matches!(decoration.shape, crate::decorations::Shape::Fill { .. }))
            .count();
        assert_eq!(fills, 2, "both rows drawn once");
    }

    #[test]
    fn space_before_only_applies_below_other_content() {
        let Some(mut context) = test_context() else {
            eprintln!("skipping test: no usable font found");
            return;
        };
        let renderer = render::Renderer::new(Size::new(120, 120), "spacing").expect("renderer");
        context.font_cache.load_pdf_fonts(&renderer).expect("load fonts");
        let area = renderer.first_page().first_layer().area();

        let tracker = PageTracker::new();
        tracker.start_page();
        let style = TextStyle::new("Heading", "Serif", 12.0).with_space_before(20.0);

        let mut at_top = TextBlock::new(vec![Span::new("Overview")], style.clone(), tracker.clone());
        let top = at_top.render(&context, area.clone(), Style::new()).expect("render at top");

        tracker.advance(10.0);
        let mut below = TextBlock::new(vec![Span::new("Overview")], style, tracker.clone());
        let lower = below.render(&context, area, Style::new()).expect("render below content");

        let gap = mm_to_f64(lower.size.height) - mm_to_f64(top.size.height);
        assert!((gap - pt_to_mm(20.0)).abs() < 1e-6, "gap was {gap}mm");
    }

    #[test]
    fn font_sizes_round_to_whole_points() {
        assert_eq!(font_size_points(10.5), 11);
        assert_eq!(font_size_points(42.0), 42);
        assert_eq!(font_size_points(0.1), 1);
    }
}
