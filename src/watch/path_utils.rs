// src/watch/path_utils.rs

//! Path and pattern normalisation shared by the selector and the watcher.

use std::path::{Path, PathBuf};

/// Suffixes editors append to temporary files during a save.
///
/// JetBrains IDEs write `name___jb_tmp___` and rename it over `name`; the
/// event for the temp file stands in for the real one.
pub const EDITOR_TEMP_SUFFIXES: &[&str] = &["___jb_tmp___", "___jb_old___", ".swp"];

/// Characters that make a pattern segment non-literal.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// Render a path with forward slashes, the form glob patterns are matched in.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Map an event path back to the file the editor is actually saving.
pub fn strip_editor_suffix(path: &Path) -> PathBuf {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return path.to_path_buf();
    };

    for suffix in EDITOR_TEMP_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return path.with_file_name(stripped);
            }
        }
    }

    path.to_path_buf()
}

/// True if the pattern is already rooted (`/...` or a drive root like `C:/`).
pub fn is_absolute_pattern(pattern: &str) -> bool {
    if pattern.starts_with('/') || pattern.starts_with('\\') {
        return true;
    }
    let bytes = pattern.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// True if the segment contains no glob syntax.
pub fn is_literal_segment(segment: &str) -> bool {
    !segment.contains(GLOB_META)
}

/// Escape glob syntax in a literal path so it matches only itself.
pub fn escape_glob(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        match c {
            '*' | '?' | '[' | ']' | '{' | '}' => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Turn a user pattern into an absolute pattern rooted at `dir`.
///
/// Trailing separators are dropped (`a/` and `a` are the same entry) and
/// `.` / `..` segments are resolved lexically as long as the segment they
/// cancel is literal.
pub fn absolutize_pattern(dir: &Path, pattern: &str) -> String {
    let pattern = to_slash(Path::new(pattern.trim()));

    let joined = if is_absolute_pattern(&pattern) {
        pattern
    } else {
        let base = escape_glob(&to_slash(dir));
        format!("{}/{}", base.trim_end_matches('/'), pattern)
    };

    clean_pattern(&joined)
}

fn clean_pattern(pattern: &str) -> String {
    let rooted = pattern.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in pattern.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(prev) if *prev != ".." && is_literal_segment(prev) && !prev.ends_with(':') => {
                    segments.pop();
                }
                _ => segments.push(segment),
            },
            _ => segments.push(segment),
        }
    }

    let body = segments.join("/");
    if rooted {
        format!("/{body}")
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

/// Resolve a working directory to an absolute path.
///
/// Relative directories are taken relative to the current directory; the
/// result is canonicalized when it exists so event paths reported by the OS
/// line up with the patterns.
pub fn resolve_working_dir(dir: Option<&Path>) -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let dir = match dir {
        Some(d) if d.is_absolute() => d.to_path_buf(),
        Some(d) => cwd.join(d),
        None => cwd,
    };
    Ok(dir.canonicalize().unwrap_or(dir))
}
