// src/config/init.rs

//! `sizzle init`: build a Sizzlefile by asking questions on the terminal.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::loader::SEARCH_ORDER;
use crate::config::model::{RawSizzlefile, Sizzlefile, TargetConfig};
use crate::config::target::DEFAULT_TARGET;
use crate::errors::{Result, SizzleError};
use crate::watch::DEFAULT_INCLUDE;

/// Line-oriented question/answer helper over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for one value; an empty answer yields `default`.
    pub fn string(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{default}]: ")?;
        }
        self.output.flush()?;

        let answer = self.line()?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Ask for a list, one entry at a time. `default` only applies to the
    /// first entry; an empty answer ends the list unless `require_one` and
    /// nothing was entered yet.
    pub fn list(&mut self, label: &str, default: &str, require_one: bool) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        loop {
            let default = if entries.is_empty() { default } else { "" };
            let entry = self.string(label, default)?;

            if entry.is_empty() {
                if require_one && entries.is_empty() {
                    self.say("At least one value is required")?;
                    continue;
                }
                break;
            }

            entries.push(entry);
            if !self.yes_no("↪ Another list entry?", false)? {
                break;
            }
        }
        Ok(entries)
    }

    pub fn yes_no(&mut self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Yn" } else { "yN" };
        write!(self.output, "{label} [{hint}]: ")?;
        self.output.flush()?;

        let answer = self.line()?;
        if answer.is_empty() {
            return Ok(default);
        }
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn line(&mut self) -> Result<String> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(SizzleError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input ended before the Sizzlefile was complete",
            )));
        }
        Ok(buf.trim().to_string())
    }
}

/// Ask for targets until the user declines another one.
pub fn ask_targets<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<RawSizzlefile> {
    let mut targets: BTreeMap<String, TargetConfig> = BTreeMap::new();

    loop {
        let name = loop {
            let name = p.string("Target name", DEFAULT_TARGET)?;
            if targets.contains_key(&name) {
                p.say("Already entered this target name. Enter a different name.")?;
                continue;
            }
            break name;
        };

        let dir = p.string("Working directory for patterns and commands", "")?;
        let watch = p.list("Watch file pattern list", DEFAULT_INCLUDE, true)?;
        let command = p.list("Command list to run when files change", "", true)?;
        let pass = p.list("Execute list when the commands pass", "", false)?;
        let fail = p.list("Execute list when the commands fail", "", false)?;

        targets.insert(
            name,
            TargetConfig {
                dir: (!dir.is_empty()).then(|| PathBuf::from(dir)),
                watch,
                command,
                pass,
                fail,
                ..TargetConfig::default()
            },
        );

        if !p.yes_no("Create another target?", false)? {
            break;
        }
    }

    Ok(RawSizzlefile {
        version: None,
        target: targets,
    })
}

/// Validate and serialise a Sizzlefile to TOML.
pub fn render_sizzlefile(raw: &RawSizzlefile) -> Result<String> {
    Sizzlefile::try_from(raw.clone())?;
    Ok(toml::to_string(raw)?)
}

/// Full interactive flow: targets, optional preview, destination, write.
///
/// Relative destinations are resolved against `cwd`. Returns the written
/// path, or `None` when the user declined to write.
pub fn run_init<R: BufRead, W: Write>(input: R, output: W, cwd: &Path) -> Result<Option<PathBuf>> {
    let mut p = Prompter::new(input, output);

    let raw = ask_targets(&mut p)?;
    let text = render_sizzlefile(&raw)?;

    if p.yes_no("View Sizzlefile preview?", false)? {
        p.say(text.trim_end())?;
    }

    let dest = PathBuf::from(p.string("Sizzlefile path", SEARCH_ORDER[0])?);
    let dest = if dest.is_absolute() { dest } else { cwd.join(dest) };

    if !p.yes_no(&format!("Write Sizzlefile to {}?", dest.display()), true)? {
        return Ok(None);
    }

    std::fs::write(&dest, text)?;
    info!(path = %dest.display(), "wrote Sizzlefile");
    Ok(Some(dest))
}
