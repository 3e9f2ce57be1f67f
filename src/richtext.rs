//! Inline text fragments carrying a bold attribute.
//!
//! Paragraphs and table cells in the report are made of [`Span`]s.  A span only
//! stores the inline decoration; font size, line height and color come from
//! the named [`TextStyle`](crate::model::TextStyle) the surrounding block
//! refers to.  The two are merged with [`Span::apply_to`] right before the
//! text is measured or drawn.

use genpdf::style::Style;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Layers the span decorations on top of `base`.
    pub fn apply_to(&self, base: Style) -> Style {
        let mut style = base;
        if self.bold {
            style.set_bold();
        }
        style
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Span::new(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Span::new(text)
    }
}

/// Concatenates the raw text of `spans`, dropping all decorations.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}
