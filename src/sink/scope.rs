// SPDX-License-Identifier: MIT
//! Scope adapter: lets a nested inspection report into a parent's sink.
//!
//! A component inspecting a sub-value (one paragraph inside a document, say)
//! runs its own pipeline over the child subject but passes a [`ScopeSink`]
//! built from the *parent* subject and the parent's sink. Every finding is
//! re-addressed onto the parent subject before delegation, with the original
//! child finding kept reachable through
//! [`Issue::nested`](crate::outcome::Issue::nested), so the top-level caller
//! recovers the document while the per-paragraph detail survives.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::outcome::{InspectError, Issue, IssueCollection, Outcome};
use crate::sink::DiagnosticsSink;

/// Wraps a parent sink so inspections of a child subject type `C` report
/// into it re-addressed to the parent subject `P`.
pub struct ScopeSink<C, P> {
    parent_subject: P,
    parent: Arc<dyn DiagnosticsSink<P>>,
    _child: PhantomData<fn() -> C>,
}

impl<C, P> ScopeSink<C, P>
where
    C: fmt::Debug + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    pub fn new(parent_subject: P, parent: Arc<dyn DiagnosticsSink<P>>) -> Self {
        Self {
            parent_subject,
            parent,
            _child: PhantomData,
        }
    }

    /// Re-address a child issue onto the parent subject, keeping the child
    /// finding as the back-reference.
    fn wrap_issue(&self, issue: &Issue<C>) -> Issue<P> {
        Issue {
            subject: self.parent_subject.clone(),
            diagnostics: issue.diagnostics.clone(),
            recoverable: issue.recoverable,
            error: issue.error.clone(),
            provenance: issue.provenance.clone(),
            encountered_by: None,
            nested: Some(Arc::new(issue.clone())),
        }
    }

    /// Re-address a whole child outcome onto the parent subject.
    fn wrap_outcome(&self, outcome: &Outcome<C>) -> Outcome<P> {
        match outcome {
            Outcome::Subject(_) | Outcome::Clean(_) => {
                Outcome::Clean(self.parent_subject.clone())
            }
            Outcome::NoInspectors(_) => Outcome::NoInspectors(self.parent_subject.clone()),
            Outcome::Issue(issue) => Outcome::Issue(self.wrap_issue(issue)),
            Outcome::Exception(issue) => Outcome::Exception(self.wrap_issue(issue)),
            Outcome::Collection(collection) => {
                let issues = collection.issues().iter().map(|i| self.wrap_issue(i)).collect();
                Outcome::Collection(IssueCollection::new(self.parent_subject.clone(), issues))
            }
        }
    }
}

#[async_trait]
impl<C, P> DiagnosticsSink<C> for ScopeSink<C, P>
where
    C: fmt::Debug + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    async fn should_continue(&self, outcome: &Outcome<C>) -> bool {
        let wrapped = self.wrap_outcome(outcome);
        self.parent.should_continue(&wrapped).await
    }

    async fn on_issue(&self, issue: Issue<C>) -> Issue<C> {
        let wrapped = self.wrap_issue(&issue);
        self.parent.on_issue(wrapped).await;
        issue
    }

    async fn on_exception(&self, outcome: Outcome<C>, error: InspectError) -> Outcome<C> {
        let wrapped = self.wrap_outcome(&outcome);
        self.parent.on_exception(wrapped, error).await;
        outcome
    }
}
