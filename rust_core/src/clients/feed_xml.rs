//! Reader for the BTMC `<DataList>` document.
//!
//! Only the `<Data>` children of the root are collected; their attributes
//! become a [`FeedRow`]. Anything nested deeper is skipped.

use super::error::FeedParseError;
use crate::models::{FeedRow, OneOrMany};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const ROOT_ELEMENT: &str = "DataList";
pub const ROW_ELEMENT: &str = "Data";

/// Read every `<Data>` row under the `<DataList>` root.
///
/// A document with zero, one or many rows yields a (possibly empty) list.
pub fn read_data_rows(xml: &str) -> Result<Vec<FeedRow>, FeedParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Names of the currently open elements, root first
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut rows: Option<OneOrMany<FeedRow>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = element_name(&element);
                visit(&element, &name, open.len(), &mut seen_root, &mut rows)?;
                open.push(name);
            }
            Event::Empty(element) => {
                let name = element_name(&element);
                visit(&element, &name, open.len(), &mut seen_root, &mut rows)?;
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(_) | Event::CData(_) if open.is_empty() => {
                return Err(FeedParseError::ContentOutsideRoot);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(FeedParseError::UnexpectedEof(unclosed));
    }
    if !seen_root {
        return Err(FeedParseError::MissingRoot);
    }

    Ok(rows.map(OneOrMany::into_vec).unwrap_or_default())
}

fn visit(
    element: &BytesStart<'_>,
    name: &str,
    depth: usize,
    seen_root: &mut bool,
    rows: &mut Option<OneOrMany<FeedRow>>,
) -> Result<(), FeedParseError> {
    match depth {
        0 => {
            if *seen_root {
                return Err(FeedParseError::ContentOutsideRoot);
            }
            *seen_root = true;
            if name != ROOT_ELEMENT {
                return Err(FeedParseError::UnexpectedRoot(name.to_string()));
            }
        }
        1 if name == ROW_ELEMENT => {
            let row = read_row(element)?;
            *rows = Some(match rows.take() {
                Some(existing) => existing.push(row),
                None => OneOrMany::One(row),
            });
        }
        _ => {}
    }
    Ok(())
}

fn read_row(element: &BytesStart<'_>) -> Result<FeedRow, FeedParseError> {
    let mut row = FeedRow::new();
    for attr in element.attributes() {
        let attr = attr?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?;
        row.insert(name, value.into_owned());
    }
    Ok(row)
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}
