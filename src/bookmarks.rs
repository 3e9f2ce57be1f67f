//! Bookmark management utilities built on top of `lopdf`.
//!
//! Headings record the page they land on while the document renders.  Once
//! the bytes exist, [`plan_outline`] turns those marks into a tree and
//! [`apply_outline`] writes it into the catalog as an `/Outlines` dictionary.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use log::debug;
use thiserror::Error;

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// A required catalog entry was missing from the document trailer.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A heading used an outline level below 1.
    #[error("heading '{title}' has invalid outline level {level}")]
    InvalidLevel { title: String, level: u8 },
    /// A referenced page number did not exist in the rendered document.
    #[error("heading '{title}' refers to missing page {page_number}")]
    MissingPage { title: String, page_number: usize },
}

/// A heading together with the page its first line was rendered on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingMark {
    pub title: String,
    /// Outline level, 1 being the top level.
    pub level: u8,
    /// 1-based page number, `None` if the heading never rendered.
    pub page: Option<usize>,
}

impl HeadingMark {
    pub fn new(title: impl Into<String>, level: u8, page: Option<usize>) -> Self {
        Self {
            title: title.into(),
            level,
            page,
        }
    }
}

/// One entry of the outline tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: String,
    pub page: usize,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn new(title: String, page: usize) -> Self {
        Self {
            title,
            page,
            children: Vec::new(),
        }
    }

    /// Number of entries below this node, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

fn insert_node(siblings: &mut Vec<OutlineNode>, node: OutlineNode, depth: u8) {
    if depth > 1 {
        if let Some(parent) = siblings.last_mut() {
            insert_node(&mut parent.children, node, depth - 1);
            return;
        }
    }
    siblings.push(node);
}

/// Builds the outline tree from headings in document order.
///
/// A heading nests under the closest preceding heading of a lower level.  A
/// heading without such a parent is promoted to the deepest available level.
/// Headings that never rendered are skipped.
pub fn plan_outline(marks: &[HeadingMark]) -> Result<Vec<OutlineNode>, BookmarkError> {
    let mut roots = Vec::new();
    for mark in marks {
        if mark.level == 0 {
            return Err(BookmarkError::InvalidLevel {
                title: mark.title.clone(),
                level: mark.level,
            });
        }
        let Some(page) = mark.page else {
            debug!("Skipping outline entry for unrendered heading '{}'", mark.title);
            continue;
        };
        insert_node(&mut roots, OutlineNode::new(mark.title.clone(), page), mark.level);
    }
    Ok(roots)
}

fn catalog_id(document: &Document) -> Result<ObjectId, BookmarkError> {
    document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)
}

fn page_reference(
    pages: &BTreeMap<u32, ObjectId>,
    node: &OutlineNode,
) -> Result<ObjectId, BookmarkError> {
    u32::try_from(node.page)
        .ok()
        .and_then(|page| pages.get(&page).copied())
        .ok_or_else(|| BookmarkError::MissingPage {
            title: node.title.clone(),
            page_number: node.page,
        })
}

/// Writes one level of siblings below `parent_id` and returns the first and
/// last object ids of that level.
fn write_siblings(
    document: &mut Document,
    pages: &BTreeMap<u32, ObjectId>,
    parent_id: ObjectId,
    nodes: &[OutlineNode],
) -> Result<Option<(ObjectId, ObjectId)>, BookmarkError> {
    let ids: Vec<ObjectId> = nodes.iter().map(|_| document.new_object_id()).collect();

    for (index, node) in nodes.iter().enumerate() {
        let page_ref = page_reference(pages, node)?;
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(node.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![Object::Reference(page_ref), Object::Name("Fit".into())]),
        );
        dictionary.set("Parent", Object::Reference(parent_id));
        if index > 0 {
            dictionary.set("Prev", Object::Reference(ids[index - 1]));
        }
        if index + 1 < ids.len() {
            dictionary.set("Next", Object::Reference(ids[index + 1]));
        }
        if let Some((first, last)) = write_siblings(document, pages, ids[index], &node.children)? {
            dictionary.set("First", Object::Reference(first));
            dictionary.set("Last", Object::Reference(last));
            dictionary.set("Count", Object::Integer(node.descendant_count() as i64));
        }

        debug!("Outline entry '{}' -> page {}", node.title, node.page);
        document
            .objects
            .insert(ids[index], Object::Dictionary(dictionary));
    }

    Ok(ids.first().copied().zip(ids.last().copied()))
}

/// Injects `nodes` as the document outline.  Returns the total number of
/// entries written; an empty tree leaves the document untouched.
pub fn apply_outline(document: &mut Document, nodes: &[OutlineNode]) -> Result<usize, BookmarkError> {
    if nodes.is_empty() {
        return Ok(0);
    }

    let catalog_id = catalog_id(document)?;
    if document.get_dictionary(catalog_id).is_err() {
        return Err(BookmarkError::InvalidCatalog);
    }

    let pages = document.get_pages();
    let outlines_id = document.new_object_id();
    let Some((first, last)) = write_siblings(document, &pages, outlines_id, nodes)? else {
        return Ok(0);
    };
    let total: usize = nodes.iter().map(|node| 1 + node.descendant_count()).sum();

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(total as i64));
    dictionary.set("First", Object::Reference(first));
    dictionary.set("Last", Object::Reference(last));
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .get_dictionary_mut(catalog_id)
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    Ok(total)
}

/// Lists the outline of a parsed document as `(depth, title)` pairs in
/// reading order, depth 1 being the top level.
pub fn read_outline(document: &Document) -> Result<Vec<(usize, String)>, lopdf::Error> {
    let catalog = document.catalog()?;
    let Ok(outlines) = catalog.get(b"Outlines").and_then(Object::as_reference) else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    let mut pending: Vec<(usize, ObjectId)> = Vec::new();
    if let Ok(first) = document
        .get_dictionary(outlines)?
        .get(b"First")
        .and_then(Object::as_reference)
    {
        pending.push((1, first));
    }

    while let Some((depth, id)) = pending.pop() {
        let dictionary = document.get_dictionary(id)?;
        let title = dictionary
            .get(b"Title")
            .and_then(Object::as_string)
            .map(|title| title.into_owned())
            .unwrap_or_default();
        entries.push((depth, title));

        if let Ok(next) = dictionary.get(b"Next").and_then(Object::as_reference) {
            pending.push((depth, next));
        }
        if let Ok(child) = dictionary.get(b"First").and_then(Object::as_reference) {
            pending.push((depth + 1, child));
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn document_with_pages(count: usize) -> Document {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let kids: Vec<Object> = (0..count)
            .map(|_| {
                document
                    .add_object(dictionary! {
                        "Type" => "Page",
                        "Parent" => pages_id,
                        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                    })
                    .into()
            })
            .collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document
    }

    fn marks() -> Vec<HeadingMark> {
        vec![
            HeadingMark::new("1. Executive Summary", 1, Some(2)),
            HeadingMark::new("3. Multi-Tenant Architecture", 1, Some(2)),
            HeadingMark::new("3.1 Data Isolation Model", 2, Some(3)),
            HeadingMark::new("3.2 Role-Based Access Control", 2, Some(3)),
            HeadingMark::new("4. Database Schema", 1, Some(3)),
        ]
    }

    #[test]
    fn second_level_headings_nest_under_the_previous_top_level() {
        let outline = plan_outline(&marks()).expect("plan outline");
        assert_eq!(outline.len(), 3);
        let titles: Vec<&str> = outline[1]
            .children
            .iter()
            .map(|node| node.title.as_str())
            .collect();
        assert_eq!(
            titles,
            ["3.1 Data Isolation Model", "3.2 Role-Based Access Control"]
        );
        assert_eq!(outline[1].descendant_count(), 2);
    }

    #[test]
    fn orphaned_and_unrendered_headings() {
        let outline = plan_outline(&[
            HeadingMark::new("Preface", 2, Some(1)),
            HeadingMark::new("Never shown", 1, None),
        ])
        .expect("plan outline");
        assert_eq!(outline, vec![OutlineNode::new("Preface".into(), 1)]);

        let err = plan_outline(&[HeadingMark::new("Zero", 0, Some(1))]).expect_err("level 0");
        assert!(matches!(err, BookmarkError::InvalidLevel { level: 0, .. }));
    }

    #[test]
    fn outline_is_written_into_the_catalog() {
        let mut document = document_with_pages(3);
        let outline = plan_outline(&marks()).expect("plan outline");

        let written = apply_outline(&mut document, &outline).expect("apply outline");
        assert_eq!(written, 5);

        let entries = read_outline(&document).expect("read outline");
        assert_eq!(
            entries,
            vec![
                (1, "1. Executive Summary".to_string()),
                (1, "3. Multi-Tenant Architecture".to_string()),
                (2, "3.1 Data Isolation Model".to_string()),
                (2, "3.2 Role-Based Access Control".to_string()),
                (1, "4. Database Schema".to_string()),
            ]
        );
    }

    #[test]
    fn missing_pages_are_reported() {
        let mut document = document_with_pages(1);
        let outline = plan_outline(&marks()).expect("plan outline");
        let err = apply_outline(&mut document, &outline).expect_err("page 2 is missing");
        assert!(matches!(err, BookmarkError::MissingPage { page_number: 2, .. }));
    }

    #[test]
    fn empty_outline_leaves_the_catalog_alone() {
        let mut document = document_with_pages(1);
        assert_eq!(apply_outline(&mut document, &[]).expect("apply outline"), 0);
        assert!(read_outline(&document).expect("read outline").is_empty());
    }
}
