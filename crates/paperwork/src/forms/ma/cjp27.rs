//! CJP 27: Petition to Change Name of Adult.

use crate::forms::{
    answers::Answers,
    join::{join_names, join_pronouns},
    registry::FormDefinition,
    values::PdfFieldValues,
};

pub const DEFINITION: FormDefinition = FormDefinition {
    id: "ma/cjp27-petition-to-change-name-of-adult",
    title: "Petition to Change Name of Adult",
    code: "CJP 27",
    jurisdiction: super::JURISDICTION,
    pdf_template_ref: "ma/cjp27-petition-to-change-name-of-adult.pdf",
    mapper: map,
};

/// Court division printed in the form header.
///
/// Not yet derived from the residence address; every petition is filed in
/// Middlesex until county selection is added to the questionnaire.
pub const COUNTY: &str = "Middlesex";

const MAILING_FIELDS: [&str; 4] = [
    "mailingStreetAddress",
    "mailingCity",
    "mailingState",
    "mailingZipCode",
];

pub fn map(a: &Answers) -> PdfFieldValues {
    let mut out = PdfFieldValues::new();

    out.text("county", COUNTY);

    // Section 1: petitioner. The current name also appears in the signature block.
    let old_name = join_names(
        a.old_first_name.as_deref(),
        a.old_middle_name.as_deref(),
        a.old_last_name.as_deref(),
    );
    out.text("oldName", old_name.as_str())
        .text("signatureName", old_name);
    out.text(
        "newName",
        join_names(
            a.new_first_name.as_deref(),
            a.new_middle_name.as_deref(),
            a.new_last_name.as_deref(),
        ),
    );
    out.passthrough(&["dateOfBirth"], a.date_of_birth.as_deref())
        .passthrough(&["residenceStreetAddress"], a.residence_street_address.as_deref())
        .passthrough(&["residenceCity"], a.residence_city.as_deref())
        .passthrough(&["residenceState"], a.residence_state.as_deref())
        .passthrough(&["residenceZipCode"], a.residence_zip_code.as_deref())
        .passthrough(&["phoneNumber"], a.phone_number.as_deref())
        .passthrough(&["email"], a.email.as_deref());
    out.text(
        "pronouns",
        join_pronouns(a.pronouns.as_deref(), a.other_pronouns.as_deref()),
    );

    if a.is_mailing_address_different_from_residence == Some(true) {
        let mailing = [
            &a.mailing_street_address,
            &a.mailing_city,
            &a.mailing_state,
            &a.mailing_zip_code,
        ];
        for (name, value) in MAILING_FIELDS.iter().zip(mailing) {
            out.text(name, value.as_deref().unwrap_or_default());
        }
    }

    // Section 2: prior name changes.
    out.yes_no("hasPreviousNameChange", a.has_previous_name_change);
    if a.has_previous_name_change == Some(true) {
        out.passthrough(&["previousNameFrom"], a.previous_name_from.as_deref())
            .passthrough(&["previousNameTo"], a.previous_name_to.as_deref())
            .passthrough(&["previousNameReason"], a.previous_name_reason.as_deref());
    }

    // Section 3: reason.
    out.passthrough(&["reasonForChangingName"], a.reason_for_changing_name.as_deref());

    // Section 4: interpreter.
    out.yes_no("isInterpreterNeeded", a.is_interpreter_needed);
    if a.is_interpreter_needed == Some(true) {
        out.text("language", a.language.as_deref().unwrap_or_default());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::values::PdfValue;

    fn text(s: &str) -> PdfValue {
        PdfValue::Text(s.into())
    }

    #[test]
    fn empty_answers_do_not_panic() {
        let out = map(&Answers::default());
        assert_eq!(out.get("oldName"), Some(&text("")));
        assert_eq!(out.get("county"), Some(&text(COUNTY)));
        assert!(!out.contains("dateOfBirth"));
    }

    #[test]
    fn mailing_group_omitted_when_same_as_residence() {
        let a = Answers {
            is_mailing_address_different_from_residence: Some(false),
            mailing_city: Some("Boston".into()),
            ..Default::default()
        };
        let out = map(&a);
        for name in MAILING_FIELDS {
            assert!(!out.contains(name), "{name} should be omitted");
        }
    }

    #[test]
    fn mailing_group_included_when_different() {
        let a = Answers {
            is_mailing_address_different_from_residence: Some(true),
            mailing_street_address: Some("1 Main St".into()),
            mailing_city: Some("Boston".into()),
            mailing_state: Some("MA".into()),
            mailing_zip_code: Some("02108".into()),
            ..Default::default()
        };
        let out = map(&a);
        assert_eq!(out.get("mailingStreetAddress"), Some(&text("1 Main St")));
        assert_eq!(out.get("mailingCity"), Some(&text("Boston")));
        assert_eq!(out.get("mailingState"), Some(&text("MA")));
        assert_eq!(out.get("mailingZipCode"), Some(&text("02108")));
    }

    #[test]
    fn previous_name_change_sets_both_checkboxes() {
        let a = Answers {
            has_previous_name_change: Some(true),
            previous_name_from: Some("A".into()),
            ..Default::default()
        };
        let out = map(&a);
        assert_eq!(
            out.get("hasPreviousNameChangeTrue"),
            Some(&PdfValue::Checkbox(true))
        );
        assert_eq!(
            out.get("hasPreviousNameChangeFalse"),
            Some(&PdfValue::Checkbox(false))
        );
        assert_eq!(out.get("previousNameFrom"), Some(&text("A")));
    }

    #[test]
    fn previous_name_details_omitted_when_no() {
        let a = Answers {
            has_previous_name_change: Some(false),
            previous_name_from: Some("A".into()),
            ..Default::default()
        };
        assert!(!map(&a).contains("previousNameFrom"));
    }

    #[test]
    fn interpreter_language_only_when_requested() {
        let mut a = Answers {
            is_interpreter_needed: Some(false),
            language: Some("Portuguese".into()),
            ..Default::default()
        };
        assert!(!map(&a).contains("language"));

        a.is_interpreter_needed = Some(true);
        assert_eq!(map(&a).get("language"), Some(&text("Portuguese")));
    }

    #[test]
    fn old_name_fills_two_sections() {
        let a = Answers {
            old_first_name: Some("John".into()),
            old_last_name: Some("Doe".into()),
            pronouns: Some(vec!["they/them".into()]),
            other_pronouns: Some("ze/zir".into()),
            ..Default::default()
        };
        let out = map(&a);
        assert_eq!(out.get("oldName"), Some(&text("John Doe")));
        assert_eq!(out.get("signatureName"), Some(&text("John Doe")));
        assert_eq!(out.get("pronouns"), Some(&text("they/them, ze/zir")));
    }
}
