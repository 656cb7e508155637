// SPDX-License-Identifier: MIT
//! Project asset (filename) inspectors.
//!
//! Both checks look only at the final path component. Remediation command
//! text for a flagged name comes from
//! [`suggest_filename_remediation`](crate::inspectors::remediation::suggest_filename_remediation).

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;
use crate::pipeline::Inspector;
use crate::sink::DiagnosticsSink;

/// A file belonging to the project under inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAsset {
    pub path: PathBuf,
}

impl ProjectAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The final path component, lossily decoded.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Flags filenames containing spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameSpaces;

#[async_trait]
impl Inspector<ProjectAsset> for FileNameSpaces {
    fn name(&self) -> &str {
        "filename-spaces"
    }

    async fn inspect(
        &self,
        outcome: Outcome<ProjectAsset>,
        _sink: Option<&dyn DiagnosticsSink<ProjectAsset>>,
    ) -> Result<Outcome<ProjectAsset>> {
        if outcome.subject().file_name().contains(' ') {
            return Ok(outcome.issue(
                "should be renamed because it has spaces (replace all spaces with hyphens '-')",
            ));
        }
        Ok(outcome)
    }
}

/// Flags filenames containing uppercase letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameCase;

#[async_trait]
impl Inspector<ProjectAsset> for FileNameCase {
    fn name(&self) -> &str {
        "filename-case"
    }

    async fn inspect(
        &self,
        outcome: Outcome<ProjectAsset>,
        _sink: Option<&dyn DiagnosticsSink<ProjectAsset>>,
    ) -> Result<Outcome<ProjectAsset>> {
        let file_name = outcome.subject().file_name();
        if file_name != file_name.to_lowercase() {
            return Ok(outcome.issue(
                "should be renamed because it has mixed case letters (all text should be lowercase only)",
            ));
        }
        Ok(outcome)
    }
}
