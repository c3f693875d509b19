//! [`PdfFieldValues`]: the output record of a form mapper.

use std::collections::BTreeMap;

use serde::Serialize;

/// A value destined for one AcroForm field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PdfValue {
    /// Text widget contents.
    Text(String),
    /// Checkbox state.
    Checkbox(bool),
}

impl PdfValue {
    /// Short name of the value's type, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            PdfValue::Text(_) => "text",
            PdfValue::Checkbox(_) => "checkbox",
        }
    }
}

/// PDF field name → value, exactly as the template names its fields.
///
/// Ordered so that filling and serialising are deterministic. Absent keys
/// are left untouched on the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PdfFieldValues(BTreeMap<String, PdfValue>);

impl PdfFieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a text field.
    pub fn text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.to_owned(), PdfValue::Text(value.into()));
        self
    }

    /// Copy an answer verbatim into one or more text fields.
    ///
    /// An absent answer emits nothing.
    pub fn passthrough(&mut self, names: &[&str], value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            for name in names {
                self.text(name, v);
            }
        }
        self
    }

    /// Set a checkbox field.
    pub fn checkbox(&mut self, name: &str, checked: bool) -> &mut Self {
        self.0.insert(name.to_owned(), PdfValue::Checkbox(checked));
        self
    }

    /// Translate a yes/no answer into the `<base>True` / `<base>False` checkbox pair.
    ///
    /// Both boxes are always emitted. An unanswered question leaves both
    /// unchecked: `<base>False` is only ticked for an explicit `false`, never
    /// inferred from a missing answer.
    pub fn yes_no(&mut self, base: &str, answer: Option<bool>) -> &mut Self {
        self.checkbox(&format!("{base}True"), answer == Some(true));
        self.checkbox(&format!("{base}False"), answer == Some(false));
        self
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&PdfValue> {
        self.0.get(name)
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PdfValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
