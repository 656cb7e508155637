// SPDX-License-Identifier: MIT
//! Shell-command remediation text for filename findings.
//!
//! A remediation is a leaf artifact: text a human (or a script) can run to
//! fix a flagged filename. Nothing here touches the filesystem.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("regex: space runs"));

/// The same fix in two spellings: one for scripts, one a human would type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellCmds {
    pub machine_optimized: String,
    pub human_friendly: String,
}

/// A suggested rename, with the command text to perform it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRemediation {
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Rerunning the move after it succeeded fails, so this fix is not
    /// idempotent.
    pub idempotent: bool,
    pub commands: ShellCmds,
}

impl RenameRemediation {
    pub fn human_instructions(&self) -> String {
        format!(
            "Run this in a Linux/bash CLI: {}",
            self.commands.human_friendly
        )
    }
}

/// Trim, replace runs of spaces with a single hyphen, and lowercase.
pub fn format_file_name(name: &str) -> String {
    SPACE_RUNS
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Suggest renaming `src` to a "nice" form of its filename: no spaces,
/// lowercase only. The suggested destination stays in the same directory.
pub fn suggest_filename_remediation(src: &Path) -> RenameRemediation {
    let dir = src.parent().unwrap_or_else(|| Path::new(""));
    let orig_name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suggested = format_file_name(&orig_name);
    let dest = dir.join(&suggested);

    let machine_optimized = format!("mv \"{}\" \"{}\"", src.display(), dest.display());
    let dir_text = dir.to_string_lossy();
    let human_friendly = if dir_text.is_empty() || dir_text == "." {
        machine_optimized.clone()
    } else {
        format!("(cd \"{dir_text}\"; mv \"{orig_name}\" \"{suggested}\")")
    };

    RenameRemediation {
        src: src.to_path_buf(),
        dest,
        idempotent: false,
        commands: ShellCmds {
            machine_optimized,
            human_friendly,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatter_hyphenates_and_lowercases() {
        assert_eq!(format_file_name("Has  Spaces.TXT"), "has-spaces.txt");
        assert_eq!(format_file_name("  padded name  "), "padded-name");
        assert_eq!(format_file_name("already-fine.md"), "already-fine.md");
    }

    #[test]
    fn remediation_keeps_directory_and_builds_commands() {
        let remediation =
            suggest_filename_remediation(Path::new("project files/Has Spaces.txt"));
        assert_eq!(
            remediation.dest,
            Path::new("project files/has-spaces.txt")
        );
        assert!(!remediation.idempotent);
        assert_eq!(
            remediation.commands.machine_optimized,
            "mv \"project files/Has Spaces.txt\" \"project files/has-spaces.txt\""
        );
        assert_eq!(
            remediation.commands.human_friendly,
            "(cd \"project files\"; mv \"Has Spaces.txt\" \"has-spaces.txt\")"
        );
        assert!(remediation
            .human_instructions()
            .starts_with("Run this in a Linux/bash CLI: (cd "));
    }

    #[test]
    fn bare_filename_uses_machine_command_for_humans_too() {
        let remediation = suggest_filename_remediation(Path::new("My File.txt"));
        assert_eq!(
            remediation.commands.human_friendly,
            remediation.commands.machine_optimized
        );
    }
}
