//! Utility functions shared across generators.

/// String utilities
pub mod string {
    /// Check if a string is a valid bare identifier.
    ///
    /// Anything that fails this test must be quoted (and escaped) before it
    /// can appear as a field name in generated output.
    ///
    /// # Arguments
    /// * `s` - String to check
    ///
    /// # Returns
    /// * `bool` - True if valid identifier
    pub fn is_valid_identifier(s: &str) -> bool {
        if s.is_empty() {
            return false;
        }

        let first = s.chars().next().unwrap();
        if !first.is_alphabetic() && first != '_' && first != '$' {
            return false;
        }

        s.chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    }

    /// Wrap a string in double quotes, escaping `\` and `"`.
    pub fn quote_escaped(s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::string::*;

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("name"));
        assert!(is_valid_identifier("_id"));
        assert!(is_valid_identifier("$ref"));
        assert!(is_valid_identifier("camelCase2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("123abc"));
        assert!(!is_valid_identifier("order-items"));
        assert!(!is_valid_identifier("a.b"));
        assert!(!is_valid_identifier("say\"hi\""));
        assert!(!is_valid_identifier("back\\slash"));
        assert!(!is_valid_identifier("items[0]"));
    }

    #[test]
    fn test_quote_escaped() {
        assert_eq!(quote_escaped("plain"), "\"plain\"");
        assert_eq!(quote_escaped("say\"hi\""), "\"say\\\"hi\\\"\"");
        assert_eq!(quote_escaped("a\\b"), "\"a\\\\b\"");
    }
}
