// SPDX-License-Identifier: MIT
//! scrutiny — composable asynchronous inspection pipelines.
//!
//! A [`Pipeline`] runs an ordered sequence of [`Inspector`]s over an
//! evolving value, accumulating findings into the returned [`Outcome`] and
//! reporting each issue or exception sideways into a [`DiagnosticsSink`] as
//! it is discovered. Sinks own the continuation policy; the default one
//! stops at the first unrecoverable finding. A [`ScopeSink`] lets a nested
//! inspection roll its findings up into a parent's sink without
//! double-recording, and a [`LoggingSink`] echoes findings to a side
//! channel on the way through.
//!
//! ```no_run
//! use futures_util::FutureExt;
//! use scrutiny::{FnInspector, Outcome, Pipeline, Recorder};
//!
//! # async fn demo() {
//! let pipeline = Pipeline::new().with_inspector(FnInspector::new(
//!     "not-empty",
//!     |outcome: Outcome<String>| {
//!         async move {
//!             if outcome.subject().is_empty() {
//!                 Ok(outcome.issue("text must not be empty"))
//!             } else {
//!                 Ok(outcome)
//!             }
//!         }
//!         .boxed()
//!     },
//! ));
//!
//! let recorder = Recorder::new();
//! let outcome = pipeline.run(String::new(), Some(&recorder)).await;
//! assert!(outcome.is_issue());
//! assert_eq!(recorder.len(), 1);
//! # }
//! ```

pub mod inspectors;
pub mod outcome;
pub mod pipeline;
pub mod sink;

// Convenience re-exports.
pub use outcome::{
    InspectError, Issue, IssueCollection, NestedFinding, Outcome, Provenance, RunId,
};
pub use pipeline::{FnInspector, Inspector, Pipeline};
pub use sink::{DiagnosticsSink, LoggingSink, RecordedIssue, Recorder, ScopeSink};
