//! Massachusetts Probate and Family Court name-change forms.

pub mod cjp27;
pub mod cjp34;

use super::registry::FormDefinition;

/// Jurisdiction key shared by every form in this module.
pub const JURISDICTION: &str = "ma";

/// Every Massachusetts form, registered by [`super::FormRegistry::builtin`].
pub const FORMS: &[FormDefinition] = &[cjp27::DEFINITION, cjp34::DEFINITION];
