// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling include / exclude glob patterns into a [`Selector`].
//! - Reducing those patterns to a minimal set of base directories on the
//!   current filesystem.
//! - Wiring up a cross-platform filesystem watcher (`notify`), stripping
//!   editor temp suffixes, and debouncing bursts per path.
//!
//! It does **not** run commands; it only turns filesystem changes into
//! `RuntimeEvent::FileChanged` values for the orchestrator.

pub mod debounce;
pub mod expand;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use expand::{collapse_nested, static_prefix};
pub use path_utils::{strip_editor_suffix, EDITOR_TEMP_SUFFIXES};
pub use patterns::{PatternSet, Selector, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
pub use watcher::{is_content_change, spawn_watcher, EventFilter, WatchOptions, WatcherHandle};
