// SPDX-License-Identifier: MIT
//! Logging decorator for diagnostics sinks.

use async_trait::async_trait;

use crate::outcome::{InspectError, Issue, Outcome};
use crate::sink::DiagnosticsSink;

/// Side channel the decorator writes diagnostics to. Injected at
/// construction so callers control where echoes go; the default port logs
/// through `tracing`.
pub type LogPort = Box<dyn Fn(&str) + Send + Sync>;

/// Forwards to a wrapped sink, optionally echoing each finding's most
/// recent diagnostic (or the causing error) to a side channel first. The
/// continuation policy is delegated unchanged.
pub struct LoggingSink<T> {
    inner: Box<dyn DiagnosticsSink<T>>,
    verbose: bool,
    port: LogPort,
}

impl<T: Send + Sync> LoggingSink<T> {
    pub fn new(inner: impl DiagnosticsSink<T> + 'static, verbose: bool) -> Self {
        Self {
            inner: Box::new(inner),
            verbose,
            port: Box::new(|message| tracing::error!(target: "scrutiny::diagnostics", "{message}")),
        }
    }

    /// Replace the side channel the decorator echoes to.
    pub fn with_port(mut self, port: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.port = Box::new(port);
        self
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> DiagnosticsSink<T> for LoggingSink<T> {
    async fn should_continue(&self, outcome: &Outcome<T>) -> bool {
        self.inner.should_continue(outcome).await
    }

    async fn on_issue(&self, issue: Issue<T>) -> Issue<T> {
        if self.verbose {
            if let Some(message) = issue.most_recent_diagnostic() {
                (self.port)(message);
            }
        }
        self.inner.on_issue(issue).await
    }

    async fn on_exception(&self, outcome: Outcome<T>, error: InspectError) -> Outcome<T> {
        if self.verbose {
            (self.port)(&error.to_string());
        }
        self.inner.on_exception(outcome, error).await
    }
}
