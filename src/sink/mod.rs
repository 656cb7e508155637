// SPDX-License-Identifier: MIT
//! Diagnostics sinks — where a pipeline run reports its findings.
//!
//! A [`DiagnosticsSink`] receives every issue and exception a pipeline
//! discovers and owns the continuation policy: after each finding the
//! executor asks the sink whether to run the next inspector.
//!
//! # Implementations
//! - [`Recorder`] — terminal sink storing findings in one ordered history
//! - [`ScopeSink`] — re-addresses nested findings onto a parent subject and
//!   delegates to the parent's sink
//! - [`LoggingSink`] — forwards to a wrapped sink, optionally echoing each
//!   finding to an injected log port

pub mod logging;
pub mod recorder;
pub mod scope;

use async_trait::async_trait;

use crate::outcome::{InspectError, Issue, Outcome};

// Convenience re-exports.
pub use logging::LoggingSink;
pub use recorder::{RecordedIssue, Recorder};
pub use scope::ScopeSink;

/// The interface a pipeline reports to. All operations may suspend.
///
/// The default [`should_continue`](DiagnosticsSink::should_continue) policy
/// stops at the first unrecoverable issue or exception: explicitly
/// recoverable findings continue, everything else continues only while the
/// outcome is successful.
#[async_trait]
pub trait DiagnosticsSink<T: Send + Sync>: Send + Sync {
    /// Given the latest outcome, decide whether the pipeline should execute
    /// the next inspector.
    async fn should_continue(&self, outcome: &Outcome<T>) -> bool {
        if outcome.is_recoverable() {
            return true;
        }
        outcome.is_successful()
    }

    /// Record the issue and return it, possibly decorated.
    async fn on_issue(&self, issue: Issue<T>) -> Issue<T>;

    /// Build an exception outcome from `outcome` and `error`, record it
    /// alongside ordinary issues, and return it.
    async fn on_exception(&self, outcome: Outcome<T>, error: InspectError) -> Outcome<T>;
}

#[async_trait]
impl<T, S> DiagnosticsSink<T> for std::sync::Arc<S>
where
    T: Send + Sync + 'static,
    S: DiagnosticsSink<T> + ?Sized,
{
    async fn should_continue(&self, outcome: &Outcome<T>) -> bool {
        (**self).should_continue(outcome).await
    }

    async fn on_issue(&self, issue: Issue<T>) -> Issue<T> {
        (**self).on_issue(issue).await
    }

    async fn on_exception(&self, outcome: Outcome<T>, error: InspectError) -> Outcome<T> {
        (**self).on_exception(outcome, error).await
    }
}
