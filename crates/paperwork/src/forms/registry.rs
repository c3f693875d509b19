//! Static registry of [`FormDefinition`]s, keyed by form ID.

use std::collections::BTreeMap;

use common::protocol::FormSummary;
use thiserror::Error;

use super::{answers::Answers, ma, values::PdfFieldValues};

/// Pure mapping from answers to template field values.
pub type Mapper = fn(&Answers) -> PdfFieldValues;

/// Errors from the form registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No form is registered under the requested ID.
    #[error("unknown form: {0}")]
    UnknownForm(String),

    /// Two definitions share the same ID.
    #[error("duplicate form id: {0}")]
    DuplicateForm(&'static str),
}

/// A named, jurisdiction-specific form and the mapper that fills it.
#[derive(Debug, Clone, Copy)]
pub struct FormDefinition {
    /// Opaque ID, `"<jurisdiction>/<code>-<slug>"`.
    pub id: &'static str,
    pub title: &'static str,
    /// Court form code as printed on the form, e.g. `"CJP 27"`.
    pub code: &'static str,
    pub jurisdiction: &'static str,
    /// Template asset path, relative to the template source root.
    pub pdf_template_ref: &'static str,
    pub mapper: Mapper,
}

impl FormDefinition {
    /// Run the mapper.
    pub fn map(&self, answers: &Answers) -> PdfFieldValues {
        (self.mapper)(answers)
    }

    pub fn summary(&self) -> FormSummary {
        FormSummary {
            id: self.id.to_owned(),
            title: self.title.to_owned(),
            code: self.code.to_owned(),
            jurisdiction: self.jurisdiction.to_owned(),
        }
    }
}

/// Lookup table of every supported form.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: BTreeMap<&'static str, FormDefinition>,
}

impl FormRegistry {
    /// Build a registry from `definitions`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateForm`] if two definitions share an ID.
    pub fn new(
        definitions: impl IntoIterator<Item = FormDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut forms = BTreeMap::new();
        for def in definitions {
            if forms.insert(def.id, def).is_some() {
                return Err(RegistryError::DuplicateForm(def.id));
            }
        }
        Ok(Self { forms })
    }

    /// Every form shipped with this build.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateForm`] if two shipped forms collide.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(ma::FORMS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Every definition, in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &FormDefinition> {
        self.forms.values()
    }

    /// Look up a form by ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownForm`] if `id` is not registered.
    pub fn get(&self, id: &str) -> Result<&FormDefinition, RegistryError> {
        self.forms
            .get(id)
            .ok_or_else(|| RegistryError::UnknownForm(id.to_owned()))
    }

    /// Look up a form by jurisdiction and printed code.
    ///
    /// Codes compare case-insensitively and ignore whitespace, so `"cjp27"`
    /// finds `"CJP 27"`.
    pub fn find(&self, jurisdiction: &str, code: &str) -> Option<&FormDefinition> {
        let wanted = normalise_code(code);
        self.forms
            .values()
            .find(|f| f.jurisdiction == jurisdiction && normalise_code(f.code) == wanted)
    }

    /// Summaries of every form, in ID order.
    pub fn list(&self) -> Vec<FormSummary> {
        self.iter().map(FormDefinition::summary).collect()
    }
}

fn normalise_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
