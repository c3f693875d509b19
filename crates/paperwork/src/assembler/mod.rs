//! Document assembly: load a template, apply a form's mapped values, serialise.
//!
//! # Responsibilities
//!
//! - Load the template named by a [`FormDefinition`] from a [`TemplateSource`],
//!   bounded by a timeout and a [`CancellationToken`].
//! - Parse a private copy, enumerate its AcroForm fields, and write every
//!   mapped value into the matching widget.
//! - Serialise the filled form. Fields stay editable (no flattening).
//!
//! # Module invariants
//!
//! - A mapped field missing from the template is fatal. Drift between a
//!   mapper and its template must never produce a silently incomplete form.
//! - All values are checked against the template before any is written.
//! - Errors carry form IDs and field names, never answer values.

pub mod acroform;
pub mod template;

#[cfg(test)]
pub(crate) mod fixtures;

pub use template::{DirTemplateSource, TemplateSource};
#[cfg(test)]
pub use template::MemoryTemplateSource;

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use lopdf::Document;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::forms::{Answers, FormDefinition, PdfFieldValues, PdfValue};
use acroform::FieldKind;

/// Errors produced while assembling a document.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The template is missing, unreadable, timed out, or not a fillable PDF.
    #[error("template for form {form_id} could not be loaded: {reason}")]
    TemplateLoadFailed { form_id: String, reason: String },

    /// The mapper emitted a field the template does not have.
    #[error("form {form_id} maps field {field:?}, which its template does not contain")]
    FieldNotFound { form_id: String, field: String },

    /// The mapped value's type does not match the target widget.
    #[error("form {form_id} maps a {found} value to field {field:?}, which is a {expected} field")]
    UnsupportedFieldType {
        form_id: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The caller cancelled the request while the template was loading.
    #[error("assembly of form {form_id} was cancelled")]
    Cancelled { form_id: String },

    /// The filled document could not be written back out.
    #[error("filled form {form_id} could not be serialised: {reason}")]
    SerializeFailed { form_id: String, reason: String },
}

/// Fills form templates. Stateless apart from its template source, so one
/// instance serves any number of concurrent calls.
#[derive(Clone)]
pub struct DocumentAssembler {
    templates: Arc<dyn TemplateSource>,
    load_timeout: Duration,
}

impl DocumentAssembler {
    pub fn new(templates: Arc<dyn TemplateSource>, load_timeout: Duration) -> Self {
        Self {
            templates,
            load_timeout,
        }
    }

    /// Produce the filled PDF for `form` from `answers`.
    ///
    /// # Errors
    ///
    /// See [`AssemblyError`]; every variant blocks the document.
    pub async fn fill_pdf(
        &self,
        form: &FormDefinition,
        answers: &Answers,
        cancel: &CancellationToken,
    ) -> Result<Bytes, AssemblyError> {
        let template = self.load_template(form, cancel).await?;
        let values = form.map(answers);
        let filled = fill_template(form.id, &template, &values).inspect_err(|e| {
            warn!(form_id = form.id, error = %e, "document assembly failed");
        })?;
        info!(
            form_id = form.id,
            fields = values.len(),
            bytes = filled.len(),
            "document assembled"
        );
        Ok(filled)
    }

    async fn load_template(
        &self,
        form: &FormDefinition,
        cancel: &CancellationToken,
    ) -> Result<Bytes, AssemblyError> {
        let load = tokio::time::timeout(
            self.load_timeout,
            self.templates.load(form.pdf_template_ref),
        );
        let failed = |reason: String| AssemblyError::TemplateLoadFailed {
            form_id: form.id.to_owned(),
            reason,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AssemblyError::Cancelled {
                form_id: form.id.to_owned(),
            }),
            res = load => match res {
                Ok(Ok(bytes)) => Ok(bytes),
                Ok(Err(e)) => Err(failed(e.to_string())),
                Err(_) => Err(failed(format!("timed out after {:?}", self.load_timeout))),
            },
        }
    }
}

/// Apply `values` to a fresh parse of `template` and serialise the result.
///
/// `template` itself is never modified.
///
/// # Errors
///
/// See [`AssemblyError`]. Value types are matched strictly: a checkbox value
/// aimed at a text widget, or text aimed at a checkbox, is
/// [`AssemblyError::UnsupportedFieldType`] and is never coerced.
pub fn fill_template(
    form_id: &str,
    template: &[u8],
    values: &PdfFieldValues,
) -> Result<Bytes, AssemblyError> {
    let load_failed = |reason: String| AssemblyError::TemplateLoadFailed {
        form_id: form_id.to_owned(),
        reason,
    };
    let mut doc = Document::load_mem(template).map_err(|e| load_failed(e.to_string()))?;
    let fields = acroform::enumerate_fields(&doc).map_err(|e| load_failed(e.to_string()))?;

    let mut plan = Vec::with_capacity(values.len());
    for (name, value) in values.iter() {
        let field = fields.get(name).ok_or_else(|| AssemblyError::FieldNotFound {
            form_id: form_id.to_owned(),
            field: name.to_owned(),
        })?;
        match (field.kind, value) {
            (FieldKind::Text, PdfValue::Text(_)) | (FieldKind::Checkbox, PdfValue::Checkbox(_)) => {
                plan.push((field, value));
            }
            (kind, value) => {
                return Err(AssemblyError::UnsupportedFieldType {
                    form_id: form_id.to_owned(),
                    field: name.to_owned(),
                    expected: kind.describe(),
                    found: value.kind(),
                });
            }
        }
    }

    for (field, value) in plan {
        let written = match value {
            PdfValue::Text(text) => acroform::set_text(&mut doc, field, text),
            PdfValue::Checkbox(checked) => acroform::set_checkbox(&mut doc, field, *checked),
        };
        written.map_err(|e| load_failed(e.to_string()))?;
    }
    acroform::mark_need_appearances(&mut doc).map_err(|e| load_failed(e.to_string()))?;

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| AssemblyError::SerializeFailed {
            form_id: form_id.to_owned(),
            reason: e.to_string(),
        })?;
    Ok(Bytes::from(out))
}
