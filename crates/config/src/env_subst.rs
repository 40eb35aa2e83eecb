/// Replace `${ENV_VAR}` placeholders in raw config text.
///
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`], resolving names through `lookup`.
pub fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next(); // '{'

        let mut name = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            name.push(c);
        }

        match (closed, name.is_empty()) {
            (true, false) => match lookup(&name) {
                Some(val) => result.push_str(&val),
                None => {
                    result.push_str("${");
                    result.push_str(&name);
                    result.push('}');
                },
            },
            (true, true) => result.push_str("${}"),
            // Unterminated: emit literal.
            (false, _) => {
                result.push_str("${");
                result.push_str(&name);
            },
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        (name == "CMDS_DIR").then(|| "/srv/bot/commands".to_string())
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_with(r#"path = "${CMDS_DIR}""#, lookup),
            r#"path = "/srv/bot/commands""#
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_with("${CMDLOAD_NONEXISTENT_XYZ}", lookup),
            "${CMDLOAD_NONEXISTENT_XYZ}"
        );
    }

    #[test]
    fn unterminated_is_literal() {
        assert_eq!(substitute_with("a ${CMDS_DIR", lookup), "a ${CMDS_DIR");
    }

    #[test]
    fn glob_braces_untouched() {
        assert_eq!(
            substitute_with("**/*.{ts,js}", lookup),
            "**/*.{ts,js}"
        );
    }
}
