//! Helpers for composite PDF values built from several answers.

/// Join name parts with single spaces, skipping absent or blank parts.
///
/// Never produces leading, trailing or doubled spaces:
/// `join_names(Some("John"), None, Some("Doe")) == "John Doe"`.
pub fn join_names(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> String {
    [first, middle, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join selected pronoun sets and a free-text "other" entry with `", "`,
/// skipping absent or blank entries.
pub fn join_pronouns(selected: Option<&[String]>, other: Option<&str>) -> String {
    selected
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .chain(other)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_skip_missing_middle() {
        assert_eq!(join_names(Some("John"), None, Some("Doe")), "John Doe");
    }

    #[test]
    fn names_all_missing_is_empty() {
        assert_eq!(join_names(None, None, None), "");
    }

    #[test]
    fn names_never_double_space() {
        assert_eq!(join_names(Some(" Ana "), Some(""), Some("Lee")), "Ana Lee");
        assert_eq!(join_names(None, Some("Q"), None), "Q");
        assert_eq!(join_names(Some("A"), Some("B"), Some("C")), "A B C");
    }

    #[test]
    fn pronouns_join_selected_and_other() {
        let selected = vec!["they/them".to_string()];
        assert_eq!(
            join_pronouns(Some(selected.as_slice()), Some("ze/zir")),
            "they/them, ze/zir"
        );
    }

    #[test]
    fn pronouns_empty_inputs() {
        assert_eq!(join_pronouns(None, None), "");
        assert_eq!(join_pronouns(Some(&[][..]), None), "");
        assert_eq!(join_pronouns(Some(&["".to_string()][..]), Some("  ")), "");
    }

    #[test]
    fn pronouns_other_only() {
        assert_eq!(join_pronouns(None, Some("xe/xem")), "xe/xem");
    }
}
