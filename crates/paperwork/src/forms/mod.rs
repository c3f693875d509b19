//! Form definitions: pure mappings from [`Answers`] to PDF field values.
//!
//! # Responsibilities
//!
//! - Describe each supported court form (title, code, jurisdiction, template).
//! - Translate a partially filled [`Answers`] record into the exact AcroForm
//!   field names and values its template expects.
//!
//! # Module invariants
//!
//! - **No crypto or PDF dependencies.** Mappers see decrypted answers only and
//!   never touch a template.
//! - Mappers are total and deterministic: no panics on missing answers, no
//!   clock, no randomness, no shared state.

pub mod answers;
pub mod join;
pub mod ma;
pub mod registry;
pub mod values;

pub use answers::Answers;
pub use registry::{FormDefinition, FormRegistry, RegistryError};
pub use values::{PdfFieldValues, PdfValue};
