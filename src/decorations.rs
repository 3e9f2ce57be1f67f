//! Table backgrounds and rules painted after rendering.
//!
//! `genpdf` can only stroke lines at the default width and has no filled
//! shapes.  Tables therefore record their row rectangles and grid rules while
//! they are laid out, and the builder paints them with `lopdf` once the
//! document has been written.  The paint operations go into a content stream
//! placed in front of the page's own content, so text always ends up on top.

use genpdf::style::Color;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::model::{mm_to_pt, PageSetup};

/// Geometry of a [`Decoration`], in millimetres from the top-left corner of
/// the content frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Filled rectangle with its top edge at `y`.
    Fill {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Straight rule stroked `width` points wide.
    Rule {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
    },
}

/// A shape to paint on one page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// 1-based page number.
    pub page: usize,
    pub color: Color,
    pub shape: Shape,
}

impl Decoration {
    pub fn fill(page: usize, color: Color, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            page,
            color,
            shape: Shape::Fill {
                x,
                y,
                width,
                height,
            },
        }
    }

    pub fn rule(page: usize, color: Color, from: (f64, f64), to: (f64, f64), width: f64) -> Self {
        Self {
            page,
            color,
            shape: Shape::Rule { from, to, width },
        }
    }

    fn is_fill(&self) -> bool {
        matches!(self.shape, Shape::Fill { .. })
    }
}

/// Operator and operands selecting `color` for filling or stroking.
fn color_operation(color: Color, stroke: bool) -> Operation {
    let channel = |value: u8| Object::Real(f32::from(value) / 255.0);
    let (operator, operands) = match color {
        Color::Rgb(r, g, b) => ("rg", vec![channel(r), channel(g), channel(b)]),
        Color::Cmyk(c, m, y, k) => ("k", vec![channel(c), channel(m), channel(y), channel(k)]),
        Color::Greyscale(value) => ("g", vec![channel(value)]),
    };
    if stroke {
        Operation::new(&operator.to_uppercase(), operands)
    } else {
        Operation::new(operator, operands)
    }
}

/// Converts frame coordinates into PDF user space on a page of `setup`.
fn to_user_space(setup: &PageSetup, (x, y): (f64, f64)) -> (f64, f64) {
    (
        setup.margin_left + mm_to_pt(x),
        setup.height - setup.margin_top - mm_to_pt(y),
    )
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Paint operations for `decorations`, fills first so rules stay visible.
pub fn paint_operations<'a>(
    decorations: impl IntoIterator<Item = &'a Decoration>,
    setup: &PageSetup,
) -> Vec<Operation> {
    let mut decorations: Vec<&Decoration> = decorations.into_iter().collect();
    decorations.sort_by_key(|decoration| !decoration.is_fill());

    let mut operations = vec![Operation::new("q", vec![])];
    for decoration in decorations {
        match decoration.shape {
            Shape::Fill {
                x,
                y,
                width,
                height,
            } => {
                let (left, top) = to_user_space(setup, (x, y));
                let height = mm_to_pt(height);
                operations.push(color_operation(decoration.color, false));
                operations.push(Operation::new(
                    "re",
                    vec![real(left), real(top - height), real(mm_to_pt(width)), real(height)],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            Shape::Rule { from, to, width } => {
                let (x1, y1) = to_user_space(setup, from);
                let (x2, y2) = to_user_space(setup, to);
                operations.push(color_operation(decoration.color, true));
                operations.push(Operation::new("w", vec![real(width)]));
                operations.push(Operation::new("m", vec![real(x1), real(y1)]));
                operations.push(Operation::new("l", vec![real(x2), real(y2)]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    operations.push(Operation::new("Q", vec![]));
    operations
}

/// Inserts `content` as the first content stream of the page.
fn prepend_content(document: &mut Document, page_id: ObjectId, content: Vec<u8>) -> lopdf::Result<()> {
    let stream_id = document.add_object(Stream::new(Dictionary::new(), content));
    let page = document.get_dictionary_mut(page_id)?;
    let mut contents = vec![Object::Reference(stream_id)];
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => contents.push(Object::Reference(*id)),
        Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
        _ => {}
    }
    page.set("Contents", contents);
    Ok(())
}

/// Paints every decoration beneath the content of its page and returns the
/// number of pages that received paint.
pub fn apply_decorations(
    document: &mut Document,
    decorations: &[Decoration],
    setup: &PageSetup,
) -> lopdf::Result<usize> {
    let mut painted = 0;
    for (number, page_id) in document.get_pages() {
        let on_page: Vec<&Decoration> = decorations
            .iter()
            .filter(|decoration| decoration.page == number as usize)
            .collect();
        if on_page.is_empty() {
            continue;
        }
        let content = Content {
            operations: paint_operations(on_page, setup),
        }
        .encode()?;
        prepend_content(document, page_id, content)?;
        painted += 1;
    }
    Ok(painted)
}
