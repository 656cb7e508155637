// SPDX-License-Identifier: MIT
//! Integration tests for the pipeline executor and the recorder sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::FutureExt;
use scrutiny::{FnInspector, Issue, IssueCollection, Outcome, Pipeline, Recorder};

/// Inspector that records an issue with the given message.
fn issue_inspector(name: &'static str, message: &'static str) -> FnInspector<String> {
    FnInspector::new(name, move |outcome: Outcome<String>| {
        async move { Ok(outcome.issue(message)) }.boxed()
    })
}

/// Inspector that returns its input untouched and counts invocations.
fn counting_inspector(name: &'static str, calls: Arc<AtomicUsize>) -> FnInspector<String> {
    FnInspector::new(name, move |outcome: Outcome<String>| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(outcome)
        }
        .boxed()
    })
}

#[tokio::test]
async fn empty_pipeline_returns_distinguished_outcome() {
    let pipeline: Pipeline<String> = Pipeline::new();
    let recorder = Recorder::new();

    let outcome = pipeline.run("unchanged".to_string(), Some(&recorder)).await;

    assert!(outcome.is_no_inspectors());
    assert!(outcome.is_successful());
    assert_eq!(outcome.subject(), "unchanged");
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn default_policy_stops_at_first_unrecoverable_issue() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::new()
        .with_inspector(issue_inspector("flags", "bad subject"))
        .with_inspector(counting_inspector("never-called", Arc::clone(&calls)));
    let recorder = Recorder::new();

    let outcome = pipeline.run("doc".to_string(), Some(&recorder)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.diagnostics(), &["bad subject"]);
    assert_eq!(recorder.len(), 1);
    assert_eq!(recorder.issues()[0].diagnostics(), &["bad subject"]);
}

#[tokio::test]
async fn recoverable_issue_continues_under_default_policy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::new()
        .with_inspector(FnInspector::new("flags", |outcome: Outcome<String>| {
            async move {
                let subject = outcome.subject().clone();
                Ok(Outcome::Issue(
                    Issue::new(subject, "minor").with_recoverable(true),
                ))
            }
            .boxed()
        }))
        .with_inspector(counting_inspector("still-called", Arc::clone(&calls)));
    let recorder = Recorder::new();

    let outcome = pipeline.run("doc".to_string(), Some(&recorder)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(outcome.is_issue());
    // The second inspector passed the plain issue through, so it was routed
    // to the sink again: the encounter marker protects collections only.
    assert_eq!(recorder.len(), 2);
}

#[tokio::test]
async fn collection_issues_are_reported_once_per_run() {
    let second_calls = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::new()
        .with_inspector(FnInspector::new("collects", |outcome: Outcome<String>| {
            async move {
                let subject = outcome.subject().clone();
                let issues = vec![
                    Issue::new(subject.clone(), "a").with_recoverable(true),
                    Issue::new(subject.clone(), "b").with_recoverable(true),
                    Issue::new(subject.clone(), "c").with_recoverable(true),
                ];
                Ok(Outcome::Collection(IssueCollection::new(subject, issues)))
            }
            .boxed()
        }))
        .with_inspector(counting_inspector(
            "passes-through",
            Arc::clone(&second_calls),
        ));
    let recorder = Recorder::new();

    let outcome = pipeline.run("doc".to_string(), Some(&recorder)).await;

    // The second inspector ran and passed the collection forward untouched,
    // yet each issue reached the sink exactly once.
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert!(outcome.is_collection());
    assert_eq!(outcome.issues().len(), 3);
    assert_eq!(recorder.len(), 3);

    let recorded = recorder.issues();
    let diags: Vec<_> = recorded.iter().map(|i| i.diagnostics()[0].clone()).collect();
    assert_eq!(diags, ["a", "b", "c"]);
    for issue in &recorded {
        let provenance = issue.provenance().expect("tagged with provenance");
        assert_eq!(provenance.inspector, "collects");
        assert_eq!(provenance.position, 0);
    }
}

#[tokio::test]
async fn inspector_error_becomes_exception_with_single_history_entry() {
    let pipeline = Pipeline::new().with_inspector(FnInspector::new(
        "explodes",
        |_outcome: Outcome<String>| async move { Err(anyhow::anyhow!("boom")) }.boxed(),
    ));
    let recorder = Recorder::new();

    let outcome = pipeline.run("x".to_string(), Some(&recorder)).await;

    assert!(outcome.is_exception());
    assert_eq!(outcome.subject(), "x");
    assert_eq!(
        outcome.error().map(ToString::to_string).as_deref(),
        Some("boom")
    );
    assert_eq!(recorder.len(), 1);

    let recorded = &recorder.issues()[0];
    assert_eq!(recorded.subject(), "x");
    assert_eq!(recorded.diagnostics(), outcome.diagnostics());
    assert_eq!(
        recorded.error().map(ToString::to_string).as_deref(),
        Some("boom")
    );
}

#[tokio::test]
async fn diagnosed_exception_keeps_its_own_message() {
    // An inspector that already described its failure must not have the
    // error's message appended as a second diagnostic on the way through
    // the recorder.
    let pipeline = Pipeline::new().with_inspector(FnInspector::new(
        "fails",
        |outcome: Outcome<String>| {
            async move {
                Ok(outcome.exception(
                    scrutiny::InspectError::msg("io failure"),
                    "could not read subject",
                ))
            }
            .boxed()
        },
    ));
    let recorder = Recorder::new();

    let outcome = pipeline.run("doc".to_string(), Some(&recorder)).await;

    assert!(outcome.is_exception());
    assert_eq!(outcome.diagnostics(), &["could not read subject"]);
    assert_eq!(recorder.len(), 1);

    let recorded = &recorder.issues()[0];
    assert_eq!(recorded.diagnostics(), &["could not read subject"]);
    assert_eq!(
        recorded.error().map(ToString::to_string).as_deref(),
        Some("io failure")
    );
}

#[tokio::test]
async fn exception_outcome_stops_pipeline_even_without_sink() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::new()
        .with_inspector(FnInspector::new("fails", |outcome: Outcome<String>| {
            async move {
                Ok(outcome.exception(
                    scrutiny::InspectError::msg("io failure"),
                    "could not read subject",
                ))
            }
            .boxed()
        }))
        .with_inspector(counting_inspector("never-called", Arc::clone(&calls)));

    let outcome = pipeline.run("doc".to_string(), None).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(outcome.is_exception());
    assert_eq!(outcome.diagnostics(), &["could not read subject"]);
}

#[tokio::test]
async fn issues_flow_onward_in_band_without_sink() {
    let pipeline = Pipeline::new()
        .with_inspector(issue_inspector("first", "first finding"))
        .with_inspector(issue_inspector("second", "second finding"));

    let outcome = pipeline.run("doc".to_string(), None).await;

    // No sink: nothing recorded anywhere, but both findings accumulated on
    // the single issue the pipeline threads through.
    assert!(outcome.is_issue());
    assert!(!outcome.is_exception());
    assert_eq!(outcome.diagnostics(), &["first finding", "second finding"]);
}

#[tokio::test]
async fn issue_outcome_is_tagged_with_producing_inspector() {
    let pipeline = Pipeline::new()
        .with_inspector(FnInspector::new(
            "noop",
            |outcome: Outcome<String>| async move { Ok(outcome) }.boxed(),
        ))
        .with_inspector(issue_inspector("flags", "bad"));
    let recorder = Recorder::new();

    let outcome = pipeline.run("doc".to_string(), Some(&recorder)).await;

    match outcome {
        Outcome::Issue(issue) => {
            let provenance = issue.provenance().expect("tagged");
            assert_eq!(provenance.inspector, "flags");
            assert_eq!(provenance.position, 1);
        }
        other => panic!("expected issue, got {other:?}"),
    }
}

#[tokio::test]
async fn run_tokens_do_not_carry_across_invocations() {
    // The same recorder reused for two sequential runs records the issue
    // twice: dedup is within-run protection, not cross-run caching.
    let recorder = Recorder::new();
    let pipeline = Pipeline::new().with_inspector(FnInspector::new(
        "collects",
        |outcome: Outcome<String>| {
            async move {
                let subject = outcome.subject().clone();
                let issues = vec![Issue::new(subject.clone(), "a").with_recoverable(true)];
                Ok(Outcome::Collection(IssueCollection::new(subject, issues)))
            }
            .boxed()
        },
    ));

    pipeline.run("doc".to_string(), Some(&recorder)).await;
    pipeline.run("doc".to_string(), Some(&recorder)).await;

    assert_eq!(recorder.len(), 2);
}
