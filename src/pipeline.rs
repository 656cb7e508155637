// SPDX-License-Identifier: MIT
//! Pipeline executor — runs inspectors in order over an evolving outcome.
//!
//! Inspectors execute strictly sequentially; each one fully completes
//! (including any suspension) before the next begins. Every issue or
//! exception flows sideways into the diagnostics sink as it is discovered,
//! and the sink's continuation policy decides whether the run proceeds.
//! There is no built-in cancellation or timeout — callers wanting one wrap
//! the inspector itself.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::debug;

use crate::outcome::{InspectError, Outcome, Provenance, RunId};
use crate::sink::DiagnosticsSink;

/// An asynchronous check over an evolving outcome.
///
/// An inspector receives the current outcome (bare subject or result
/// wrapper) and returns a new one. It must not mutate the outcome except
/// via the documented append operations, must not retain the sink beyond
/// the call, and must treat an absent sink as "no reporting wanted — just
/// compute and return". An `Err` return is treated by the executor as an
/// unexpected failure and converted into an exception outcome; inspectors
/// never unwind a pipeline.
#[async_trait]
pub trait Inspector<T: Send + Sync>: Send + Sync {
    /// Stable name used for provenance tagging and logs.
    fn name(&self) -> &str;

    async fn inspect(
        &self,
        outcome: Outcome<T>,
        sink: Option<&dyn DiagnosticsSink<T>>,
    ) -> Result<Outcome<T>>;
}

/// Adapter turning an async closure into an [`Inspector`], for leaf checks
/// that do not need the sink.
///
/// ```no_run
/// use futures_util::FutureExt;
/// use scrutiny::{FnInspector, Outcome};
///
/// let not_empty = FnInspector::new("not-empty", |outcome: Outcome<String>| {
///     async move {
///         if outcome.subject().is_empty() {
///             Ok(outcome.issue("text must not be empty"))
///         } else {
///             Ok(outcome)
///         }
///     }
///     .boxed()
/// });
/// ```
pub struct FnInspector<T> {
    name: String,
    #[allow(clippy::type_complexity)]
    f: Box<dyn Fn(Outcome<T>) -> BoxFuture<'static, Result<Outcome<T>>> + Send + Sync>,
}

impl<T> FnInspector<T> {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Outcome<T>) -> BoxFuture<'static, Result<Outcome<T>>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Inspector<T> for FnInspector<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn inspect(
        &self,
        outcome: Outcome<T>,
        _sink: Option<&dyn DiagnosticsSink<T>>,
    ) -> Result<Outcome<T>> {
        (self.f)(outcome).await
    }
}

/// An ordered sequence of inspectors runnable over a subject.
///
/// Built in the same builder style as other aggregators in this crate:
///
/// ```no_run
/// use scrutiny::{Pipeline, Recorder};
/// # use futures_util::FutureExt;
/// # use scrutiny::{FnInspector, Outcome};
/// # let check = FnInspector::new("noop", |o: Outcome<String>| async move { Ok(o) }.boxed());
///
/// # async fn demo(check: FnInspector<String>) {
/// let pipeline = Pipeline::new().with_inspector(check);
/// let recorder = Recorder::new();
/// let outcome = pipeline.run("subject".to_string(), Some(&recorder)).await;
/// # }
/// ```
pub struct Pipeline<T> {
    inspectors: Vec<Arc<dyn Inspector<T>>>,
}

impl<T> Pipeline<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inspectors: Vec::new(),
        }
    }

    /// Append an inspector. Inspectors run in registration order.
    pub fn with_inspector(mut self, inspector: impl Inspector<T> + 'static) -> Self {
        self.inspectors.push(Arc::new(inspector));
        self
    }

    /// Append a shared inspector (useful when the concrete type is erased).
    pub fn with_boxed_inspector(mut self, inspector: Arc<dyn Inspector<T>>) -> Self {
        self.inspectors.push(inspector);
        self
    }

    pub fn len(&self) -> usize {
        self.inspectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inspectors.is_empty()
    }

    /// Run every inspector in order over `subject`.
    ///
    /// A pipeline with zero inspectors returns the distinguished
    /// [`Outcome::NoInspectors`] immediately, with no sink interaction.
    /// Otherwise each inspector's outcome is classified and routed:
    /// exceptions and issues go to the sink as they are discovered, each
    /// tagged with the producing inspector's provenance, and the sink's
    /// continuation policy is consulted before moving on. Issues inside a
    /// collection are reported at most once per run — an element already
    /// bearing this run's encounter marker is skipped even when later
    /// inspectors pass the same collection forward untouched.
    ///
    /// Without a sink, issues keep flowing onward in-band while an
    /// exception stops the run; either way the findings remain in the
    /// returned outcome — nothing is swallowed.
    pub async fn run(&self, subject: T, sink: Option<&dyn DiagnosticsSink<T>>) -> Outcome<T> {
        if self.inspectors.is_empty() {
            debug!("pipeline has no inspectors; returning immediately");
            return Outcome::NoInspectors(subject);
        }

        let run = RunId::new();
        debug!(inspectors = self.inspectors.len(), "inspection run starting");
        let mut result = Outcome::Subject(subject);

        for (position, inspector) in self.inspectors.iter().enumerate() {
            let provenance = Provenance::new(inspector.name(), position);
            let prior = result.clone();

            match inspector.inspect(result, sink).await {
                Ok(outcome) => result = outcome.with_provenance(&provenance),
                Err(error) => {
                    // An inspector error never unwinds the run; it becomes
                    // an exception against the value the inspector was given.
                    let error = InspectError::from(error);
                    result = match sink {
                        Some(sink) => sink.on_exception(prior, error).await,
                        None => prior,
                    };
                    let keep_going = match sink {
                        Some(sink) => sink.should_continue(&result).await,
                        None => false,
                    };
                    if keep_going {
                        continue;
                    }
                    debug!(
                        inspector = inspector.name(),
                        "inspection run stopped by inspector error"
                    );
                    return result;
                }
            }

            if result.is_exception() {
                if let Some(sink) = sink {
                    let error = result
                        .error()
                        .cloned()
                        .unwrap_or_else(|| InspectError::msg("exception with no recorded cause"));
                    result = sink.on_exception(result, error).await;
                    if sink.should_continue(&result).await {
                        continue;
                    }
                }
                debug!(inspector = inspector.name(), "inspection run stopped on exception");
                return result;
            } else if result.is_collection() {
                if let Some(sink) = sink {
                    // Issues collected in the outcome may have been reported
                    // already; route only the ones this run has not yet
                    // encountered, writing the sink's return value back into
                    // the same position.
                    if let Outcome::Collection(collection) = &mut result {
                        for slot in collection.issues_mut() {
                            if slot.encountered_by() == Some(run) {
                                continue;
                            }
                            let mut issue = slot.clone();
                            issue.mark_encountered(run);
                            if issue.provenance().is_none() {
                                issue.set_provenance(provenance.clone());
                            }
                            *slot = sink.on_issue(issue).await;
                        }
                    }
                    if !sink.should_continue(&result).await {
                        debug!(
                            inspector = inspector.name(),
                            "inspection run stopped on collected issues"
                        );
                        return result;
                    }
                }
            } else if result.is_issue() {
                if let Some(sink) = sink {
                    if let Outcome::Issue(issue) = result {
                        result = Outcome::Issue(sink.on_issue(issue).await);
                    }
                    if !sink.should_continue(&result).await {
                        debug!(inspector = inspector.name(), "inspection run stopped on issue");
                        return result;
                    }
                }
            }
            // Clean outcomes and bare subjects pass through with no sink
            // interaction.
        }

        debug!("inspection run completed");
        result
    }
}

impl<T> Default for Pipeline<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
