//! Delimited list fields (`Chain Vest;Chain Vest`, `2;4;6`)

/// Split a list field into trimmed, non-empty parts
///
/// An empty value yields no parts, and so do doubled or trailing delimiters
/// between real values (`a;;b` is `[a, b]`).
pub fn parse_list<'a>(value: &'a str, delimiter: &str) -> Vec<&'a str> {
    if value.is_empty() || delimiter.is_empty() {
        let trimmed = value.trim();
        return if trimmed.is_empty() { Vec::new() } else { vec![trimmed] };
    }

    value
        .split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Join parts back with the delimiter, skipping empties
pub fn join_list<S: AsRef<str>>(parts: &[S], delimiter: &str) -> String {
    let kept: Vec<&str> = parts
        .iter()
        .map(|p| AsRef::<str>::as_ref(p))
        .filter(|p| !p.is_empty())
        .collect();
    kept.join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("2;4;6", ";"), vec!["2", "4", "6"]);
        assert_eq!(parse_list(" a ; ;b;", ";"), vec!["a", "b"]);
        assert!(parse_list("", ";").is_empty());
        assert!(parse_list(" ", ";").is_empty());
    }

    #[test]
    fn test_parse_list_single_value() {
        assert_eq!(parse_list("Bandit's Blade", ";"), vec!["Bandit's Blade"]);
    }

    #[test]
    fn test_join_list_skips_empty() {
        assert_eq!(join_list(&["Chain Vest", ""], ";"), "Chain Vest");
        assert_eq!(join_list(&["a", "b"], "|"), "a|b");
        assert_eq!(join_list::<&str>(&[], ";"), "");
    }
}
