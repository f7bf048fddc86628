//! Lexical tokenization shared by the ranker and the tagger tests.

/// Normalize text into a sequence of lowercase alphanumeric tokens.
///
/// Lowercases the input, replaces every character outside `[a-z0-9]` and
/// whitespace with a space, splits on whitespace runs, and drops empty
/// tokens. Pure and deterministic; empty input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(tokenize("Hello, World! 123"), vec!["hello", "world", "123"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn punctuation_only_yields_no_tokens() {
        assert_eq!(tokenize("!!! --- ???"), Vec::<String>::new());
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(tokenize("  prep\t\tlist\n\nyield "), vec!["prep", "list", "yield"]);
    }

    #[test]
    fn non_ascii_becomes_separator() {
        assert_eq!(tokenize("café menu"), vec!["caf", "menu"]);
    }
}
