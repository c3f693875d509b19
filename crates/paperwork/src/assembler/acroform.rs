//! AcroForm field discovery and value writing over a parsed [`lopdf::Document`].
//!
//! Field names are fully qualified (`parent.child`) as ISO 32000 defines
//! them. Only text fields and checkboxes are writable; every other widget kind
//! is reported so the assembler can reject values aimed at it.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use thiserror::Error;

/// `Ff` bit marking a button field as a radio group.
const FF_RADIO: i64 = 1 << 15;
/// `Ff` bit marking a button field as a pushbutton.
const FF_PUSHBUTTON: i64 = 1 << 16;

/// Field trees deeper than this are treated as corrupt (or cyclic).
const MAX_FIELD_DEPTH: usize = 32;

/// Errors from AcroForm traversal.
#[derive(Debug, Error)]
pub enum AcroFormError {
    #[error("document has no interactive form")]
    MissingAcroForm,

    #[error("malformed form structure: {0}")]
    Malformed(String),
}

/// The widget type of a terminal form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    /// Radio groups, pushbuttons, choice lists, signatures.
    Unsupported(&'static str),
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Unsupported(kind) => *kind,
        }
    }
}

/// One terminal field of the template.
#[derive(Debug, Clone)]
pub struct TemplateField {
    pub kind: FieldKind,
    /// The field dictionary that holds `/V`.
    pub field_id: ObjectId,
    /// Widget annotations that render the field; may be `field_id` itself.
    pub widgets: Vec<ObjectId>,
}

/// Enumerate every terminal field, keyed by fully qualified name.
///
/// # Errors
///
/// Returns [`AcroFormError::MissingAcroForm`] if the catalog has no
/// `/AcroForm`, or [`AcroFormError::Malformed`] for broken references.
pub fn enumerate_fields(doc: &Document) -> Result<BTreeMap<String, TemplateField>, AcroFormError> {
    let acroform = acroform_dict(doc)?;
    let roots: Vec<ObjectId> = match acroform.get(b"Fields") {
        Ok(obj) => references(doc, obj)?,
        Err(_) => Vec::new(),
    };

    let mut out = BTreeMap::new();
    for id in roots {
        walk(doc, id, None, None, 0, 0, &mut out)?;
    }
    Ok(out)
}

/// Write a text value and drop stale appearance streams.
pub fn set_text(doc: &mut Document, field: &TemplateField, value: &str) -> Result<(), AcroFormError> {
    dict_mut(doc, field.field_id)?.set("V", encode_text_string(value));
    for widget in &field.widgets {
        dict_mut(doc, *widget)?.remove(b"AP");
    }
    Ok(())
}

/// Check or uncheck a checkbox, using its own on-state name.
pub fn set_checkbox(
    doc: &mut Document,
    field: &TemplateField,
    checked: bool,
) -> Result<(), AcroFormError> {
    let state = if checked {
        on_state(doc, field)
    } else {
        b"Off".to_vec()
    };
    dict_mut(doc, field.field_id)?.set("V", Object::Name(state.clone()));
    for widget in &field.widgets {
        dict_mut(doc, *widget)?.set("AS", Object::Name(state.clone()));
    }
    Ok(())
}

/// Ask viewers to regenerate appearances for the values just written.
pub fn mark_need_appearances(doc: &mut Document) -> Result<(), AcroFormError> {
    let root_id = root_id(doc)?;
    let acroform_ref = dict(doc, root_id)?
        .get(b"AcroForm")
        .map_err(|_| AcroFormError::MissingAcroForm)?
        .as_reference()
        .ok();

    let acroform = match acroform_ref {
        Some(id) => dict_mut(doc, id)?,
        None => dict_mut(doc, root_id)?
            .get_mut(b"AcroForm")
            .and_then(Object::as_dict_mut)
            .map_err(|_| AcroFormError::Malformed("AcroForm is not a dictionary".into()))?,
    };
    acroform.set("NeedAppearances", true);
    Ok(())
}

fn walk(
    doc: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_ft: Option<&[u8]>,
    inherited_ff: i64,
    depth: usize,
    out: &mut BTreeMap<String, TemplateField>,
) -> Result<(), AcroFormError> {
    if depth > MAX_FIELD_DEPTH {
        return Err(AcroFormError::Malformed("field tree too deep".into()));
    }
    let node = dict(doc, id)?;

    let partial = node
        .get(b"T")
        .and_then(Object::as_str)
        .ok()
        .map(decode_text_string);
    let name = match (parent_name, partial) {
        (Some(parent), Some(t)) => Some(format!("{parent}.{t}")),
        (None, Some(t)) => Some(t),
        (parent, None) => parent.map(str::to_owned),
    };
    let ft = node
        .get(b"FT")
        .and_then(Object::as_name)
        .ok()
        .or(inherited_ft);
    let ff = node
        .get(b"Ff")
        .and_then(Object::as_i64)
        .unwrap_or(inherited_ff);

    let kids = match node.get(b"Kids") {
        Ok(obj) => references(doc, obj)?,
        Err(_) => Vec::new(),
    };
    // Kids carrying a partial name are child fields; the rest are widgets.
    let (children, widgets): (Vec<ObjectId>, Vec<ObjectId>) = kids
        .into_iter()
        .partition(|kid| dict(doc, *kid).map(|d| d.has(b"T")).unwrap_or(false));

    for child in &children {
        walk(doc, *child, name.as_deref(), ft, ff, depth + 1, out)?;
    }

    if children.is_empty() {
        if let Some(name) = name {
            let widgets = if widgets.is_empty() { vec![id] } else { widgets };
            out.insert(
                name,
                TemplateField {
                    kind: classify(ft, ff),
                    field_id: id,
                    widgets,
                },
            );
        }
    }
    Ok(())
}

fn classify(ft: Option<&[u8]>, ff: i64) -> FieldKind {
    match ft {
        Some(b"Tx") => FieldKind::Text,
        Some(b"Btn") if ff & FF_PUSHBUTTON != 0 => FieldKind::Unsupported("pushbutton"),
        Some(b"Btn") if ff & FF_RADIO != 0 => FieldKind::Unsupported("radio"),
        Some(b"Btn") => FieldKind::Checkbox,
        Some(b"Ch") => FieldKind::Unsupported("choice"),
        Some(b"Sig") => FieldKind::Unsupported("signature"),
        _ => FieldKind::Unsupported("unknown"),
    }
}

/// The checkbox's "on" appearance name, read from the first widget that has one.
fn on_state(doc: &Document, field: &TemplateField) -> Vec<u8> {
    field
        .widgets
        .iter()
        .filter_map(|w| dict(doc, *w).ok())
        .filter_map(|w| w.get(b"AP").ok())
        .filter_map(|ap| resolve(doc, ap).ok()?.as_dict().ok())
        .filter_map(|ap| resolve(doc, ap.get(b"N").ok()?).ok()?.as_dict().ok())
        .flat_map(|normal| normal.iter().map(|(k, _)| k.clone()))
        .find(|k| k.as_slice() != b"Off")
        .unwrap_or_else(|| b"Yes".to_vec())
}

fn acroform_dict(doc: &Document) -> Result<&Dictionary, AcroFormError> {
    let catalog = dict(doc, root_id(doc)?)?;
    let obj = catalog
        .get(b"AcroForm")
        .map_err(|_| AcroFormError::MissingAcroForm)?;
    resolve(doc, obj)?
        .as_dict()
        .map_err(|_| AcroFormError::Malformed("AcroForm is not a dictionary".into()))
}

fn root_id(doc: &Document) -> Result<ObjectId, AcroFormError> {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| AcroFormError::Malformed("missing document catalog".into()))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, AcroFormError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|_| AcroFormError::Malformed(format!("dangling reference {} {}", id.0, id.1))),
        other => Ok(other),
    }
}

fn references(doc: &Document, obj: &Object) -> Result<Vec<ObjectId>, AcroFormError> {
    resolve(doc, obj)?
        .as_array()
        .map_err(|_| AcroFormError::Malformed("expected an array of fields".into()))?
        .iter()
        .map(|o| {
            o.as_reference()
                .map_err(|_| AcroFormError::Malformed("field is not an indirect object".into()))
        })
        .collect()
}

fn dict(doc: &Document, id: ObjectId) -> Result<&Dictionary, AcroFormError> {
    doc.get_dictionary(id)
        .map_err(|_| AcroFormError::Malformed(format!("object {} {} is not a dictionary", id.0, id.1)))
}

fn dict_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary, AcroFormError> {
    doc.get_dictionary_mut(id)
        .map_err(|_| AcroFormError::Malformed(format!("object {} {} is not a dictionary", id.0, id.1)))
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise PDFDocEncoding
/// (treated as Latin-1).
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => char::decode_utf16(
            rest.chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
        )
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect(),
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Encode a text string: plain ASCII as a literal, anything else as UTF-16BE.
pub fn encode_text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
