/// Strips invisible marks and collapses runs of whitespace, keeping case.
pub(crate) fn clean_input(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lookup key for the suffix, directional and state tables.
pub(crate) fn normalize_token(value: &str) -> String {
    clean_input(value).trim_end_matches('.').to_ascii_lowercase()
}

/// Removes the punctuation people commonly attach to address tokens.
pub(crate) fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, '.' | ';' | ':' | '#' | '"' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_input_removes_markers_and_whitespace() {
        let source = "\u{feff}123   Main\tSt ,  Springfield";
        assert_eq!(clean_input(source), "123 Main St , Springfield");
    }

    #[test]
    fn normalize_token_lowercases_and_drops_period() {
        assert_eq!(normalize_token("Ave."), "ave");
        assert_eq!(normalize_token("  New   York "), "new york");
    }
}
