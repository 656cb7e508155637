// SPDX-License-Identifier: MIT
//! Outcome model for inspection pipelines.
//!
//! An [`Outcome`] is either the bare subject under inspection or a wrapper
//! carrying findings about it. The wrapper is a closed sum: a clean result,
//! the distinguished "no inspectors configured" result, a single [`Issue`],
//! an exception (an issue caused by an inspector failure), or a collection of
//! issues accumulated across nested inspections.
//!
//! Findings are append-only: diagnostics can be added to an existing issue
//! but never removed, and no value is ever upgraded in place — conversions
//! construct a new variant from the old one's fields.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Cheaply clonable wrapper around the error that caused an exception
/// outcome. Findings holding the same cause share one allocation.
#[derive(Debug, Clone)]
pub struct InspectError(Arc<anyhow::Error>);

impl InspectError {
    pub fn new(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }

    /// Build an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(anyhow::anyhow!(message.into()))
    }

    /// The underlying cause.
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<anyhow::Error> for InspectError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(error)
    }
}

impl Serialize for InspectError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Opaque token identifying one pipeline invocation.
///
/// Minted fresh by [`Pipeline::run`](crate::Pipeline::run) and never reused:
/// the same logical issue seen in two separate runs is reported twice, by
/// design. The token only protects against double-counting within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which inspector produced a finding: its name plus its position in the
/// pipeline's inspector list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub inspector: String,
    pub position: usize,
}

impl Provenance {
    pub fn new(inspector: impl Into<String>, position: usize) -> Self {
        Self {
            inspector: inspector.into(),
            position,
        }
    }
}

/// Type-erased view of a finding captured in a nested inspection.
///
/// When a scope adapter re-addresses a child finding onto a parent subject,
/// the original child issue stays reachable through this trait. Use
/// [`as_any`](NestedFinding::as_any) to downcast to the concrete
/// `Issue<Child>` when the child subject type is known.
pub trait NestedFinding: fmt::Debug + Send + Sync {
    fn diagnostics(&self) -> &[String];
    fn most_recent_diagnostic(&self) -> Option<&str>;
    fn is_exception(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T> NestedFinding for Issue<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    fn most_recent_diagnostic(&self) -> Option<&str> {
        self.diagnostics.last().map(String::as_str)
    }

    fn is_exception(&self) -> bool {
        self.error.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A finding about a subject: one or more diagnostic messages, an optional
/// causing error (which makes the issue an exception), and metadata the
/// executor attaches while routing it.
#[derive(Debug, Clone, Serialize)]
pub struct Issue<T> {
    pub(crate) subject: T,
    pub(crate) diagnostics: Vec<String>,
    pub(crate) recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<InspectError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provenance: Option<Provenance>,
    #[serde(skip)]
    pub(crate) encountered_by: Option<RunId>,
    #[serde(skip)]
    pub(crate) nested: Option<Arc<dyn NestedFinding>>,
}

impl<T> Issue<T> {
    /// Create an issue with a single diagnostic. Issues always carry at
    /// least one message.
    pub fn new(subject: T, message: impl Into<String>) -> Self {
        Self {
            subject,
            diagnostics: vec![message.into()],
            recoverable: false,
            error: None,
            provenance: None,
            encountered_by: None,
            nested: None,
        }
    }

    pub fn subject(&self) -> &T {
        &self.subject
    }

    pub fn into_subject(self) -> T {
        self.subject
    }

    /// Ordered, append-only diagnostic messages. Never empty.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn most_recent_diagnostic(&self) -> Option<&str> {
        self.diagnostics.last().map(String::as_str)
    }

    /// Append one more diagnostic message.
    pub fn push_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    /// Whether the pipeline may continue past this issue under the default
    /// continuation policy.
    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    /// The causing error, if this issue is an exception.
    pub fn error(&self) -> Option<&InspectError> {
        self.error.as_ref()
    }

    pub fn with_error(mut self, error: InspectError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    pub(crate) fn set_provenance(&mut self, provenance: Provenance) {
        self.provenance = Some(provenance);
    }

    /// The run that already routed this issue to a sink, if any.
    pub fn encountered_by(&self) -> Option<RunId> {
        self.encountered_by
    }

    pub(crate) fn mark_encountered(&mut self, run: RunId) {
        self.encountered_by = Some(run);
    }

    /// Back-reference to the original child finding, when this issue was
    /// re-addressed onto a parent subject by a scope adapter.
    pub fn nested(&self) -> Option<&dyn NestedFinding> {
        self.nested.as_deref()
    }

    pub fn with_nested(mut self, nested: Arc<dyn NestedFinding>) -> Self {
        self.nested = Some(nested);
        self
    }
}

/// Ordered issues accumulated in one outcome, typically by a nested or
/// merged inspection that collects findings instead of short-circuiting.
#[derive(Debug, Clone, Serialize)]
pub struct IssueCollection<T> {
    pub(crate) subject: T,
    pub(crate) issues: Vec<Issue<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provenance: Option<Provenance>,
}

impl<T> IssueCollection<T> {
    pub fn new(subject: T, issues: Vec<Issue<T>>) -> Self {
        Self {
            subject,
            issues,
            provenance: None,
        }
    }

    pub fn subject(&self) -> &T {
        &self.subject
    }

    pub fn issues(&self) -> &[Issue<T>] {
        &self.issues
    }

    pub(crate) fn issues_mut(&mut self) -> &mut [Issue<T>] {
        &mut self.issues
    }

    pub fn push(&mut self, issue: Issue<T>) {
        self.issues.push(issue);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// The evolving value threaded through a pipeline: the bare subject, or a
/// result wrapper carrying findings about it.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// Bare subject — nothing to report yet.
    Subject(T),
    /// Wrapped subject, no findings.
    Clean(T),
    /// Distinguished clean result returned when a pipeline was built with
    /// zero inspectors, so callers can detect the misconfiguration.
    NoInspectors(T),
    /// A single finding.
    Issue(Issue<T>),
    /// A finding caused by an unexpected inspector failure. The issue
    /// always carries its causing error.
    Exception(Issue<T>),
    /// Several findings gathered in one outcome.
    Collection(IssueCollection<T>),
}

impl<T> Outcome<T> {
    pub fn subject_value(subject: T) -> Self {
        Outcome::Subject(subject)
    }

    pub fn clean(subject: T) -> Self {
        Outcome::Clean(subject)
    }

    /// The subject under inspection, whichever variant carries it.
    pub fn subject(&self) -> &T {
        match self {
            Outcome::Subject(s) | Outcome::Clean(s) | Outcome::NoInspectors(s) => s,
            Outcome::Issue(issue) | Outcome::Exception(issue) => &issue.subject,
            Outcome::Collection(collection) => &collection.subject,
        }
    }

    pub fn into_subject(self) -> T {
        match self {
            Outcome::Subject(s) | Outcome::Clean(s) | Outcome::NoInspectors(s) => s,
            Outcome::Issue(issue) | Outcome::Exception(issue) => issue.subject,
            Outcome::Collection(collection) => collection.subject,
        }
    }

    /// Record a finding against this outcome.
    ///
    /// Accumulation is idempotent in shape: if the outcome already is an
    /// issue or exception the message is appended to it, never nested into
    /// an issue-of-issue. A collection gains a fresh issue on its subject.
    pub fn issue(self, message: impl Into<String>) -> Self
    where
        T: Clone,
    {
        match self {
            Outcome::Issue(mut issue) => {
                issue.push_diagnostic(message);
                Outcome::Issue(issue)
            }
            Outcome::Exception(mut issue) => {
                issue.push_diagnostic(message);
                Outcome::Exception(issue)
            }
            Outcome::Collection(mut collection) => {
                let issue = Issue::new(collection.subject.clone(), message);
                collection.push(issue);
                Outcome::Collection(collection)
            }
            Outcome::Subject(s) | Outcome::Clean(s) | Outcome::NoInspectors(s) => {
                Outcome::Issue(Issue::new(s, message))
            }
        }
    }

    /// Record a finding caused by an unexpected error. Like [`issue`]
    /// (appends to an existing issue) but additionally sets the causing
    /// error and yields an exception outcome.
    ///
    /// [`issue`]: Outcome::issue
    pub fn exception(self, error: impl Into<InspectError>, message: impl Into<String>) -> Self
    where
        T: Clone,
    {
        let error = error.into();
        match self {
            Outcome::Issue(mut issue) | Outcome::Exception(mut issue) => {
                issue.push_diagnostic(message);
                issue.error = Some(error);
                Outcome::Exception(issue)
            }
            Outcome::Collection(mut collection) => {
                let issue = Issue::new(collection.subject.clone(), message).with_error(error);
                collection.push(issue);
                Outcome::Collection(collection)
            }
            Outcome::Subject(s) | Outcome::Clean(s) | Outcome::NoInspectors(s) => {
                Outcome::Exception(Issue::new(s, message).with_error(error))
            }
        }
    }

    /// `true` when the outcome carries no findings.
    pub fn is_successful(&self) -> bool {
        !self.is_issue()
    }

    /// `true` for issues, exceptions, and collections.
    pub fn is_issue(&self) -> bool {
        matches!(
            self,
            Outcome::Issue(_) | Outcome::Exception(_) | Outcome::Collection(_)
        )
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Outcome::Exception(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Outcome::Collection(_))
    }

    pub fn is_no_inspectors(&self) -> bool {
        matches!(self, Outcome::NoInspectors(_))
    }

    /// Whether the default continuation policy may proceed past this
    /// outcome. A collection is recoverable only when every issue in it is.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Outcome::Issue(issue) | Outcome::Exception(issue) => issue.recoverable,
            Outcome::Collection(collection) => {
                !collection.is_empty() && collection.issues.iter().all(|i| i.recoverable)
            }
            _ => false,
        }
    }

    /// The causing error of an exception outcome.
    pub fn error(&self) -> Option<&InspectError> {
        match self {
            Outcome::Issue(issue) | Outcome::Exception(issue) => issue.error.as_ref(),
            _ => None,
        }
    }

    /// Diagnostics of a single-issue outcome; empty for other variants.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            Outcome::Issue(issue) | Outcome::Exception(issue) => &issue.diagnostics,
            _ => &[],
        }
    }

    /// All issues carried by the outcome, in discovery order.
    pub fn issues(&self) -> &[Issue<T>] {
        match self {
            Outcome::Issue(issue) | Outcome::Exception(issue) => std::slice::from_ref(issue),
            Outcome::Collection(collection) => &collection.issues,
            _ => &[],
        }
    }

    /// Merge accumulated issues into this outcome, preserving order: the
    /// outcome's own issues (if any) first, then `issues`.
    ///
    /// An empty `issues` list leaves the outcome untouched. A collection
    /// target is appended to in place; a bare subject gains a fresh
    /// collection wrapper.
    pub fn merge_issues(self, issues: Vec<Issue<T>>) -> Self
    where
        T: Clone,
    {
        if issues.is_empty() {
            return self;
        }
        match self {
            Outcome::Collection(mut collection) => {
                collection.issues.extend(issues);
                Outcome::Collection(collection)
            }
            Outcome::Issue(own) | Outcome::Exception(own) => {
                let subject = own.subject.clone();
                let mut merged = Vec::with_capacity(issues.len() + 1);
                merged.push(own);
                merged.extend(issues);
                Outcome::Collection(IssueCollection::new(subject, merged))
            }
            Outcome::Subject(s) | Outcome::Clean(s) | Outcome::NoInspectors(s) => {
                Outcome::Collection(IssueCollection::new(s, issues))
            }
        }
    }

    /// Attach provenance to the finding-carrying variants. Bare subjects and
    /// clean results are left untouched: provenance is metadata on findings,
    /// not on the domain value.
    pub fn with_provenance(mut self, provenance: &Provenance) -> Self {
        match &mut self {
            Outcome::Issue(issue) | Outcome::Exception(issue) => {
                issue.provenance = Some(provenance.clone());
            }
            Outcome::Collection(collection) => {
                collection.provenance = Some(provenance.clone());
            }
            _ => {}
        }
        self
    }
}
