// src/watch/expand.rs

//! Reduce glob intent to concrete directories on the current filesystem.
//!
//! OS notification APIs subscribe to directories, not patterns, so before
//! watching we walk the filesystem as it is *now* and find where matches
//! live. Directories created later are not picked up.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::GlobMatcher;
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::path_utils::{is_literal_segment, to_slash};
use crate::watch::patterns::Selector;

impl Selector {
    /// Minimal set of existing directories covering every include match.
    ///
    /// Each match contributes itself (directories) or its parent (files);
    /// excluded directories are dropped; a directory nested inside another
    /// returned directory is dropped too, since subscriptions are recursive.
    /// Patterns with no current matches contribute nothing.
    pub fn base_directories(&self, fs: &dyn FileSystem) -> Result<Vec<PathBuf>> {
        let mut found = BTreeSet::new();

        for (pattern, matcher) in self.include_matchers() {
            self.expand_include(fs, pattern, matcher, &mut found)?;
        }

        let dirs = collapse_nested(found);
        debug!(?dirs, "computed base directories");
        Ok(dirs)
    }

    /// Every existing file below the base directories that is selected,
    /// sorted.
    pub fn matching_files(&self, fs: &dyn FileSystem) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        let mut stack = self.base_directories(fs)?;

        while let Some(dir) = stack.pop() {
            let entries = match fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(?dir, error = %err, "skipping unreadable directory");
                    continue;
                }
            };
            for path in entries {
                if fs.is_dir(&path) {
                    if !self.is_excluded(&path) {
                        stack.push(path);
                    }
                } else if fs.is_file(&path) && self.is_selected(&path) {
                    files.insert(path);
                }
            }
        }

        Ok(files.into_iter().collect())
    }

    fn expand_include(
        &self,
        fs: &dyn FileSystem,
        pattern: &str,
        matcher: &GlobMatcher,
        found: &mut BTreeSet<PathBuf>,
    ) -> Result<()> {
        let (prefix, depth) = static_prefix(pattern);
        if !fs.exists(&prefix) {
            debug!(pattern, ?prefix, "pattern matches nothing on disk");
            return Ok(());
        }

        self.consider(fs, &prefix, pattern, matcher, found);

        if depth == Some(0) || !fs.is_dir(&prefix) {
            return Ok(());
        }

        let mut stack = vec![(prefix.clone(), 1usize)];
        while let Some((dir, level)) = stack.pop() {
            let entries = match fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) if dir == prefix => return Err(err.into()),
                Err(err) => {
                    debug!(?dir, error = %err, "skipping unreadable directory");
                    continue;
                }
            };

            for path in entries {
                let is_dir = fs.is_dir(&path);
                if is_dir && self.is_excluded(&path) {
                    continue;
                }

                self.consider(fs, &path, pattern, matcher, found);

                let descend = match depth {
                    Some(max) => level < max,
                    None => true,
                };
                if is_dir && descend {
                    stack.push((path, level + 1));
                }
            }
        }

        Ok(())
    }

    fn consider(
        &self,
        fs: &dyn FileSystem,
        path: &Path,
        pattern: &str,
        matcher: &GlobMatcher,
        found: &mut BTreeSet<PathBuf>,
    ) {
        let path_str = to_slash(path);
        if path_str != pattern && !matcher.is_match(&path_str) {
            return;
        }

        let dir = if fs.is_dir(path) {
            path.to_path_buf()
        } else {
            match path.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return,
            }
        };

        if !self.is_excluded(&dir) {
            found.insert(dir);
        }
    }
}

/// Split an absolute pattern into its longest literal directory prefix and
/// how many more levels a match can lie below it (`None` when a `**` makes
/// the depth unbounded).
pub fn static_prefix(pattern: &str) -> (PathBuf, Option<usize>) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal_len = segments
        .iter()
        .position(|s| !is_literal_segment(s))
        .unwrap_or(segments.len());

    let rest = &segments[literal_len..];
    let depth = if rest.iter().any(|s| s.contains("**")) {
        None
    } else {
        Some(rest.len())
    };

    let prefix = segments[..literal_len].join("/");
    let prefix = if prefix.is_empty() {
        PathBuf::from("/")
    } else if prefix.ends_with(':') {
        PathBuf::from(format!("{prefix}/"))
    } else {
        PathBuf::from(prefix)
    };

    (prefix, depth)
}

/// Drop every directory that lies inside another directory of the set.
pub fn collapse_nested(dirs: BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::new();
    // BTreeSet orders paths component-wise, so ancestors come first.
    for dir in dirs {
        if kept.iter().any(|k| dir.starts_with(k)) {
            continue;
        }
        kept.push(dir);
    }
    kept
}
