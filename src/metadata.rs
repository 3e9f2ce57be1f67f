//! Document information dictionary handling built on top of `lopdf`.
//!
//! `genpdf` only writes a title into `/Info`.  Author, creator and subject are
//! added after rendering by editing the parsed document.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::model::DocumentInfo;

fn info_dictionary_id(document: &mut Document) -> ObjectId {
    if let Ok(id) = document.trailer.get(b"Info").and_then(Object::as_reference) {
        if document.get_dictionary(id).is_ok() {
            return id;
        }
    }

    let id = document.add_object(Dictionary::new());
    document.trailer.set("Info", Object::Reference(id));
    id
}

/// Writes `Title`, `Author`, `Creator` and `Subject` into the trailer's
/// `/Info` dictionary, creating the dictionary if the document has none.
///
/// Other entries (creation date, producer, ...) are left untouched.
pub fn apply_document_info(document: &mut Document, info: &DocumentInfo) -> Result<(), lopdf::Error> {
    let id = info_dictionary_id(document);
    let dictionary = document.get_dictionary_mut(id)?;
    for (key, value) in [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Creator", &info.creator),
        ("Subject", &info.subject),
    ] {
        dictionary.set(key, Object::string_literal(value.as_str()));
    }
    Ok(())
}

fn text_entry(dictionary: &Dictionary, key: &[u8]) -> String {
    dictionary
        .get(key)
        .and_then(Object::as_string)
        .map(|value| value.into_owned())
        .unwrap_or_default()
}

/// Reads the document information of a parsed document.  Missing entries come
/// back as empty strings.
pub fn document_info(document: &Document) -> Result<DocumentInfo, lopdf::Error> {
    let info = document.trailer.get(b"Info")?;
    let dictionary = match info {
        Object::Reference(id) => document.get_dictionary(*id)?,
        other => other.as_dict()?,
    };

    Ok(DocumentInfo {
        title: text_entry(dictionary, b"Title"),
        author: text_entry(dictionary, b"Author"),
        creator: text_entry(dictionary, b"Creator"),
        subject: text_entry(dictionary, b"Subject"),
    })
}

/// Parses `pdf_bytes` and reads their document information.
pub fn read_document_info(pdf_bytes: &[u8]) -> Result<DocumentInfo, lopdf::Error> {
    let document = Document::load_mem(pdf_bytes)?;
    document_info(&document)
}
