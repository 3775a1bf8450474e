// src/config/validate.rs

use crate::config::model::{RawSizzlefile, Sizzlefile, TargetConfig};
use crate::errors::{Result, SizzleError};
use crate::exec::substitute_placeholders;
use crate::watch::path_utils::to_slash;
use crate::watch::PatternSet;

impl TryFrom<RawSizzlefile> for Sizzlefile {
    type Error = SizzleError;

    fn try_from(raw: RawSizzlefile) -> std::result::Result<Self, Self::Error> {
        validate_raw_sizzlefile(&raw)?;
        Ok(Sizzlefile::new_unchecked(raw.target))
    }
}

fn validate_raw_sizzlefile(cfg: &RawSizzlefile) -> Result<()> {
    ensure_has_targets(cfg)?;
    for (name, target) in cfg.target.iter() {
        validate_target(name, target)?;
    }
    Ok(())
}

fn ensure_has_targets(cfg: &RawSizzlefile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(SizzleError::Config(
            "Sizzlefile must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_target(name: &str, target: &TargetConfig) -> Result<()> {
    if is_blank(&target.watch) {
        return Err(SizzleError::Config(format!(
            "target '{name}' must have at least one `watch` pattern"
        )));
    }
    if is_blank(&target.command) {
        return Err(SizzleError::Config(format!(
            "target '{name}' must have at least one `command`"
        )));
    }
    if let Some(shell) = &target.shell {
        if shell.trim().is_empty() {
            return Err(SizzleError::Config(format!(
                "target '{name}' has an empty `shell`"
            )));
        }
    }
    if let Some(dir) = &target.dir {
        if to_slash(dir).trim().is_empty() {
            return Err(SizzleError::Config(format!(
                "target '{name}' has an empty `dir`"
            )));
        }
    }

    // Placeholders are only filled in at resolution time; check the syntax
    // with them blanked out so a broken glob fails before any watching.
    for pattern in target.watch.iter().chain(target.exclude.iter()) {
        let blanked = substitute_placeholders(pattern, &[]);
        PatternSet::compile(vec![blanked]).map_err(|err| match err {
            SizzleError::InvalidPattern { source, .. } => SizzleError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            },
            other => other,
        })?;
    }
    Ok(())
}

fn is_blank(list: &[String]) -> bool {
    list.iter().all(|s| s.trim().is_empty())
}
