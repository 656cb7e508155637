// SPDX-License-Identifier: MIT
//! Ready-made leaf inspectors.
//!
//! These are ordinary [`Inspector`](crate::Inspector) implementations with
//! no interesting internal state — the engine consumes them purely through
//! the inspector contract. They double as reference implementations for
//! writing custom checks.

pub mod asset;
pub mod remediation;
pub mod text;
pub mod url;

pub use asset::{FileNameCase, FileNameSpaces, ProjectAsset};
pub use remediation::{suggest_filename_remediation, RenameRemediation, ShellCmds};
pub use text::WordCountRange;
pub use url::{UrlInspectError, UrlReachability};
