// tests/placeholders.rs

use sizzle::exec::{substitute_all, substitute_placeholders};

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn positional_arguments_are_substituted() {
    let a = args(&["foo", "bar"]);

    assert_eq!(substitute_placeholders("echo $1 $2", &a), "echo foo bar");
    assert_eq!(substitute_placeholders("echo ${2}x", &a), "echo barx");
    assert_eq!(substitute_placeholders("$1$1", &a), "foofoo");
}

#[test]
fn missing_arguments_become_empty() {
    let a = args(&["only"]);

    assert_eq!(substitute_placeholders("run $1 $2 $3", &a), "run only  ");
    assert_eq!(substitute_placeholders("zero $0", &a), "zero ");
    assert_eq!(substitute_placeholders("echo $1", &[]), "echo ");
}

#[test]
fn other_dollar_uses_are_left_alone() {
    let a = args(&["x"]);

    assert_eq!(substitute_placeholders("echo $HOME $CHANGED", &a), "echo $HOME $CHANGED");
    assert_eq!(substitute_placeholders("cost $ 5", &a), "cost $ 5");
    assert_eq!(substitute_placeholders("${PATH}", &a), "${PATH}");
}

#[test]
fn multi_digit_indices() {
    let a: Vec<String> = (1..=12).map(|i| format!("a{i}")).collect();
    assert_eq!(substitute_placeholders("$12 $1", &a), "a12 a1");
}

#[test]
fn lists_are_substituted_element_wise() {
    let globs = args(&["src/$1/**/*.rs", "tests/$1.rs"]);
    assert_eq!(
        substitute_all(&globs, &args(&["net"])),
        args(&["src/net/**/*.rs", "tests/net.rs"])
    );
}

#[test]
fn shell_escapes_are_not_placeholders() {
    let a = args(&["x"]);

    assert_eq!(substitute_placeholders("echo $$1", &a), "echo $$1");
    assert_eq!(substitute_placeholders(r"echo \$1", &a), r"echo \$1");
    assert_eq!(substitute_placeholders("kill $$", &a), "kill $$");
    assert_eq!(substitute_placeholders("echo $$$1", &a), "echo $$x");
    assert_eq!(substitute_placeholders(r"echo \\$1", &a), r"echo \\x");
}
