// SPDX-License-Identifier: MIT
//! Terminal diagnostics sink that stores findings.
//!
//! Exceptions and issues share one ordered history, preserving discovery
//! order. The history is only mutated by sequential `on_issue` /
//! `on_exception` calls from a single active run; sharing one recorder
//! across concurrent pipeline invocations is a misuse, not a supported mode
//! — callers that want that must serialize access themselves.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::outcome::{InspectError, Issue, Outcome};
use crate::sink::DiagnosticsSink;

/// One recorded finding plus the moment it was recorded.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RecordedIssue<T> {
    pub issue: Issue<T>,
    pub recorded_at: DateTime<Utc>,
}

/// Stores every reported finding in one ordered, append-only list and uses
/// the default continuation policy.
#[derive(Debug)]
pub struct Recorder<T> {
    history: Mutex<Vec<RecordedIssue<T>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, issue: Issue<T>) {
        let mut history = match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        history.push(RecordedIssue {
            issue,
            recorded_at: Utc::now(),
        });
    }

    fn with_history<R>(&self, f: impl FnOnce(&[RecordedIssue<T>]) -> R) -> R {
        let history = match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&history)
    }

    pub fn len(&self) -> usize {
        self.with_history(|h| h.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with_history(|h| h.is_empty())
    }
}

impl<T: Clone> Recorder<T> {
    /// The recorded findings, in discovery order.
    pub fn issues(&self) -> Vec<Issue<T>> {
        self.with_history(|h| h.iter().map(|entry| entry.issue.clone()).collect())
    }

    /// The recorded findings with their recording timestamps.
    pub fn entries(&self) -> Vec<RecordedIssue<T>> {
        self.with_history(|h| h.to_vec())
    }
}

#[async_trait]
impl<T> DiagnosticsSink<T> for Recorder<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn on_issue(&self, issue: Issue<T>) -> Issue<T> {
        self.record(issue.clone());
        issue
    }

    async fn on_exception(&self, outcome: Outcome<T>, error: InspectError) -> Outcome<T> {
        // An outcome that already carries a diagnostic keeps it as-is; only
        // a finding-free outcome borrows the error's message, so the
        // exception honors the at-least-one-diagnostic invariant without
        // inventing messages the inspector never emitted.
        let exception = match outcome {
            Outcome::Issue(issue) | Outcome::Exception(issue) => {
                Outcome::Exception(issue.with_error(error))
            }
            other => {
                let message = error.to_string();
                other.exception(error, message)
            }
        };
        if let Outcome::Exception(issue) = &exception {
            self.record(issue.clone());
        }
        exception
    }
}
