// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::errors::{Result, SizzleError};
use crate::watch::path_utils::{absolutize_pattern, to_slash};

/// Include pattern used when none are given: everything below the working dir.
pub const DEFAULT_INCLUDE: &str = "**/*";

/// Exclude pattern used when none are given: hidden files and directories.
pub const DEFAULT_EXCLUDE: &str = "**/.*";

/// Ordered list of absolute patterns compiled into a single matcher.
///
/// A path matches if it is string-equal to one of the patterns or if any
/// glob matches it. The first rule lets literal entries work even when they
/// contain characters the glob syntax would interpret.
#[derive(Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    pub fn compile(patterns: Vec<String>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in &patterns {
            builder.add(build_glob(pat)?);
        }
        let set = builder.build().map_err(|source| SizzleError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { patterns, set })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `path` must already be absolute and slash-separated.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p == path) || self.set.is_match(path)
    }
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.patterns).finish()
    }
}

/// Build one pattern with path-aware semantics: `*` and `?` never cross a
/// `/`, only `**` does.
fn build_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| SizzleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

pub(crate) fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Ok(build_glob(pattern)?.compile_matcher())
}

/// Compiled include/exclude selection rules for one watch session.
///
/// All patterns are absolute: relative ones are rooted at the working
/// directory at compile time. Every exclude pattern also excludes everything
/// below whatever it matches, so excluding a directory hides its contents.
#[derive(Clone)]
pub struct Selector {
    working_dir: PathBuf,
    includes: PatternSet,
    include_matchers: Vec<GlobMatcher>,
    excludes: PatternSet,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("working_dir", &self.working_dir)
            .field("includes", &self.includes)
            .field("excludes", &self.excludes)
            .finish_non_exhaustive()
    }
}

impl Selector {
    /// Compile include and exclude lists relative to `working_dir`.
    ///
    /// Empty lists fall back to [`DEFAULT_INCLUDE`] / [`DEFAULT_EXCLUDE`].
    /// `working_dir` should be absolute; a relative one is resolved against
    /// the current directory.
    pub fn compile(
        working_dir: impl Into<PathBuf>,
        includes: &[String],
        excludes: &[String],
    ) -> Result<Self> {
        let mut working_dir = working_dir.into();
        if working_dir.is_relative() {
            working_dir = std::env::current_dir()?.join(working_dir);
        }

        let includes = normalize_globs(&working_dir, includes, DEFAULT_INCLUDE);
        let excludes = with_descendants(normalize_globs(&working_dir, excludes, DEFAULT_EXCLUDE));

        let include_matchers = includes
            .iter()
            .map(|p| compile_glob(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            working_dir,
            includes: PatternSet::compile(includes)?,
            include_matchers,
            excludes: PatternSet::compile(excludes)?,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Effective absolute include patterns.
    pub fn include_patterns(&self) -> &[String] {
        self.includes.patterns()
    }

    /// Effective absolute exclude patterns, including the `/**` variants.
    pub fn exclude_patterns(&self) -> &[String] {
        self.excludes.patterns()
    }

    pub(crate) fn include_matchers(&self) -> impl Iterator<Item = (&str, &GlobMatcher)> {
        self.includes
            .patterns()
            .iter()
            .map(String::as_str)
            .zip(self.include_matchers.iter())
    }

    /// True iff `path` matches an include pattern and no exclude pattern.
    ///
    /// Relative paths are taken relative to the working directory.
    pub fn is_selected(&self, path: &Path) -> bool {
        let path = self.rooted(path);
        self.includes.matches(&path) && !self.excludes.matches(&path)
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excludes.matches(&self.rooted(path))
    }

    fn rooted(&self, path: &Path) -> String {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };
        // Re-collecting drops trailing separators and `.` segments.
        to_slash(&joined.components().collect::<PathBuf>())
    }
}

fn normalize_globs(dir: &Path, globs: &[String], default: &str) -> Vec<String> {
    let globs: Vec<&str> = globs
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();

    if globs.is_empty() {
        return vec![absolutize_pattern(dir, default)];
    }

    globs.into_iter().map(|g| absolutize_pattern(dir, g)).collect()
}

/// Append a `/**` variant of every pattern that doesn't already end in one.
fn with_descendants(mut globs: Vec<String>) -> Vec<String> {
    let extra: Vec<String> = globs
        .iter()
        .filter(|g| !g.ends_with("/**"))
        .map(|g| {
            if g.ends_with('/') {
                format!("{g}**")
            } else {
                format!("{g}/**")
            }
        })
        .collect();
    globs.extend(extra);
    globs
}
