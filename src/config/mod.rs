// src/config/mod.rs

//! Sizzlefile model, discovery, validation and target resolution.

pub mod init;
pub mod loader;
pub mod model;
pub mod session;
pub mod target;
pub mod validate;

pub use init::{render_sizzlefile, run_init, Prompter};
pub use loader::{find_sizzlefile, load_and_validate, parse_and_validate, SEARCH_ORDER};
pub use model::{RawSizzlefile, Sizzlefile, TargetConfig};
pub use session::SessionSpec;
pub use target::{select_target, DEFAULT_TARGET};
