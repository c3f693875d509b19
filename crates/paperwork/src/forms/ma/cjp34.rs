//! CJP 34: Request for CORI and Wanted Persons Check.

use crate::forms::{
    answers::Answers, join::join_names, registry::FormDefinition, values::PdfFieldValues,
};

pub const DEFINITION: FormDefinition = FormDefinition {
    id: "ma/cjp34-cori-and-wanted-persons-request",
    title: "Request for CORI and Wanted Persons Check",
    code: "CJP 34",
    jurisdiction: super::JURISDICTION,
    pdf_template_ref: "ma/cjp34-cori-and-wanted-persons-request.pdf",
    mapper: map,
};

pub fn map(a: &Answers) -> PdfFieldValues {
    let mut out = PdfFieldValues::new();
    out.text(
        "oldName",
        join_names(
            a.old_first_name.as_deref(),
            a.old_middle_name.as_deref(),
            a.old_last_name.as_deref(),
        ),
    )
    .text(
        "newName",
        join_names(
            a.new_first_name.as_deref(),
            a.new_middle_name.as_deref(),
            a.new_last_name.as_deref(),
        ),
    )
    .passthrough(&["dateOfBirth"], a.date_of_birth.as_deref())
    .passthrough(&["mothersMaidenName"], a.mothers_maiden_name.as_deref())
    .passthrough(&["otherNamesOrAliases"], a.other_names_or_aliases.as_deref())
    // This request is only ever filed alongside a name-change petition.
    .checkbox("isChangeOfNameProceeding", true);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::values::PdfValue;

    #[test]
    fn maps_minimal_answers() {
        let a = Answers {
            old_first_name: Some("Old".into()),
            old_last_name: Some("Name".into()),
            date_of_birth: Some("1990-01-01".into()),
            ..Default::default()
        };
        let out = map(&a);
        assert_eq!(out.get("oldName"), Some(&PdfValue::Text("Old Name".into())));
        assert_eq!(
            out.get("dateOfBirth"),
            Some(&PdfValue::Text("1990-01-01".into()))
        );
        assert_eq!(
            out.get("isChangeOfNameProceeding"),
            Some(&PdfValue::Checkbox(true))
        );
        assert!(!out.contains("mothersMaidenName"));
        assert!(!out.contains("otherNamesOrAliases"));
    }

    #[test]
    fn optional_passthroughs_present_when_answered() {
        let a = Answers {
            mothers_maiden_name: Some("Smith".into()),
            other_names_or_aliases: Some("J. Doe".into()),
            ..Default::default()
        };
        let out = map(&a);
        assert_eq!(out.get("mothersMaidenName"), Some(&PdfValue::Text("Smith".into())));
        assert_eq!(out.get("otherNamesOrAliases"), Some(&PdfValue::Text("J. Doe".into())));
    }

    #[test]
    fn empty_answers_do_not_panic() {
        let out = map(&Answers::default());
        assert_eq!(out.get("oldName"), Some(&PdfValue::Text(String::new())));
        assert!(!out.contains("dateOfBirth"));
    }
}
