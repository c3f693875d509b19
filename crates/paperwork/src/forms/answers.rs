//! The typed answers record consumed by every form mapper.

use serde::{Deserialize, Serialize};

/// Everything the questionnaire can collect. Every field is optional: a
/// mapper must produce output for any subset, including none at all.
///
/// Serialised names are camelCase and double as the answer store's `field`
/// identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answers {
    pub old_first_name: Option<String>,
    pub old_middle_name: Option<String>,
    pub old_last_name: Option<String>,
    pub new_first_name: Option<String>,
    pub new_middle_name: Option<String>,
    pub new_last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub mothers_maiden_name: Option<String>,
    pub other_names_or_aliases: Option<String>,

    pub pronouns: Option<Vec<String>>,
    pub other_pronouns: Option<String>,

    pub residence_street_address: Option<String>,
    pub residence_city: Option<String>,
    pub residence_state: Option<String>,
    pub residence_zip_code: Option<String>,
    pub is_mailing_address_different_from_residence: Option<bool>,
    pub mailing_street_address: Option<String>,
    pub mailing_city: Option<String>,
    pub mailing_state: Option<String>,
    pub mailing_zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,

    pub has_previous_name_change: Option<bool>,
    pub previous_name_from: Option<String>,
    pub previous_name_to: Option<String>,
    pub previous_name_reason: Option<String>,
    pub reason_for_changing_name: Option<String>,

    pub is_interpreter_needed: Option<bool>,
    pub language: Option<String>,
}

impl Answers {
    /// Every serialised field name, in declaration order.
    pub const FIELDS: &'static [&'static str] = &[
        "oldFirstName",
        "oldMiddleName",
        "oldLastName",
        "newFirstName",
        "newMiddleName",
        "newLastName",
        "dateOfBirth",
        "mothersMaidenName",
        "otherNamesOrAliases",
        "pronouns",
        "otherPronouns",
        "residenceStreetAddress",
        "residenceCity",
        "residenceState",
        "residenceZipCode",
        "isMailingAddressDifferentFromResidence",
        "mailingStreetAddress",
        "mailingCity",
        "mailingState",
        "mailingZipCode",
        "phoneNumber",
        "email",
        "hasPreviousNameChange",
        "previousNameFrom",
        "previousNameTo",
        "previousNameReason",
        "reasonForChangingName",
        "isInterpreterNeeded",
        "language",
    ];

    /// Returns `true` if `field` names an answer in this record.
    pub fn is_known_field(field: &str) -> bool {
        Self::FIELDS.contains(&field)
    }

    /// Returns `true` if `value` has the right shape for `field`.
    ///
    /// `null` is accepted for every field.
    pub fn accepts(field: &str, value: &serde_json::Value) -> bool {
        if !Self::is_known_field(field) {
            return false;
        }
        let mut single = serde_json::Map::new();
        single.insert(field.to_owned(), value.clone());
        serde_json::from_value::<Answers>(serde_json::Value::Object(single)).is_ok()
    }
}
