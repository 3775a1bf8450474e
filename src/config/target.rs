// src/config/target.rs

use tracing::debug;

use crate::config::model::{Sizzlefile, TargetConfig};
use crate::errors::{Result, SizzleError};

/// Name used when the caller does not ask for a specific target.
pub const DEFAULT_TARGET: &str = "default";

/// Pick the target to run.
///
/// The requested name (or [`DEFAULT_TARGET`]) is looked up first. If the
/// default target was asked for and none is defined, the first target by
/// name is used instead. Any other unknown name is an error.
pub fn select_target<'a>(
    file: &'a Sizzlefile,
    requested: Option<&str>,
) -> Result<(&'a str, &'a TargetConfig)> {
    let name = requested.unwrap_or(DEFAULT_TARGET);

    if let Some((key, target)) = file.targets().get_key_value(name) {
        return Ok((key.as_str(), target));
    }

    if name == DEFAULT_TARGET {
        if let Some((key, target)) = file.targets().iter().next() {
            debug!(target_name = %key, "no `default` target; using the first one");
            return Ok((key.as_str(), target));
        }
    }

    Err(SizzleError::TargetNotFound(name.to_string()))
}
