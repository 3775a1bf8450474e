// src/exec/placeholders.rs

//! Positional `$N` substitution in command strings and target globs.

use std::sync::LazyLock;

use regex::{Captures, Regex};

// `$1`, `$12`, `${3}`. Group 1 swallows `$$`, `\\` and `\$` first so the
// shell still sees its pid variable and escaped dollars. Other `$` uses are
// left for the shell.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$\$|\\\\|\\\$)|\$(?:\{(\d+)\}|(\d+))").expect("placeholder regex is valid")
});

/// Replace `$N` / `${N}` with `args[N - 1]`.
///
/// Tokens without a matching argument (including `$0`) become the empty
/// string; this never fails. `$$1` and `\$1` are not placeholders.
pub fn substitute_placeholders(template: &str, args: &[String]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if let Some(literal) = caps.get(1) {
                return literal.as_str().to_string();
            }
            caps.get(2)
                .or_else(|| caps.get(3))
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

/// Apply [`substitute_placeholders`] to every entry of a list.
pub fn substitute_all(list: &[String], args: &[String]) -> Vec<String> {
    list.iter()
        .map(|item| substitute_placeholders(item, args))
        .collect()
}
