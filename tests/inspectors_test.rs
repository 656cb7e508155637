// SPDX-License-Identifier: MIT
//! Integration tests for the ready-made leaf inspectors.

use scrutiny::inspectors::{
    FileNameCase, FileNameSpaces, ProjectAsset, UrlReachability, WordCountRange,
};
use scrutiny::{Pipeline, Recorder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const GOOD_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor.";

const LONG_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim \
ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut \
aliquip ex ea commodo consequat. Duis aute irure dolor in \
reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla \
pariatur. Excepteur sint occaecat cupidatat non proident, sunt in \
culpa qui officia deserunt mollit anim id est laborum.";

const SHORT_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing";

#[tokio::test]
async fn word_count_in_range_passes() {
    let pipeline = Pipeline::new().with_inspector(WordCountRange::default());
    let recorder = Recorder::new();

    let outcome = pipeline.run(GOOD_TEXT.to_string(), Some(&recorder)).await;

    assert!(outcome.is_successful());
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn word_count_out_of_range_is_an_issue() {
    let pipeline = Pipeline::new().with_inspector(WordCountRange::default());
    let recorder = Recorder::new();

    let long = pipeline.run(LONG_TEXT.to_string(), Some(&recorder)).await;
    assert_eq!(
        long.diagnostics(),
        &["Word count should be between 10-15 (not 69)"]
    );

    let short = pipeline.run(SHORT_TEXT.to_string(), Some(&recorder)).await;
    assert_eq!(
        short.diagnostics(),
        &["Word count should be between 10-15 (not 7)"]
    );

    assert_eq!(recorder.len(), 2);
}

#[tokio::test]
async fn empty_text_passes_word_count_untouched() {
    let pipeline = Pipeline::new().with_inspector(WordCountRange::default());

    let outcome = pipeline.run(String::new(), None).await;

    assert!(outcome.is_successful());
}

/// Serve one canned HTTP response on a random local port and return the URL.
async fn serve_once(response: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn reachable_url_passes() {
    let url = serve_once(
        "HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    let pipeline = Pipeline::new().with_inspector(UrlReachability::new().expect("client"));

    let outcome = pipeline.run(url, None).await;

    assert!(outcome.is_successful());
}

#[tokio::test]
async fn non_200_status_is_an_issue() {
    let url = serve_once(
        "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    let pipeline = Pipeline::new().with_inspector(UrlReachability::new().expect("client"));

    let outcome = pipeline.run(url.clone(), None).await;

    assert!(outcome.is_issue());
    let diagnostic = &outcome.diagnostics()[0];
    assert!(diagnostic.starts_with(&url));
    assert!(diagnostic.contains("did not return valid status: Not Found"));
}

#[tokio::test]
async fn unsupported_scheme_is_an_issue_not_an_exception() {
    let pipeline = Pipeline::new().with_inspector(UrlReachability::new().expect("client"));

    let outcome = pipeline
        .run("htps://bad.example/url".to_string(), None)
        .await;

    assert!(outcome.is_issue());
    assert!(!outcome.is_exception());
    assert!(outcome.diagnostics()[0]
        .starts_with("Exception while trying to fetch htps://bad.example/url"));
}

#[tokio::test]
async fn filename_with_spaces_and_mixed_case_accumulates_both_findings() {
    let pipeline = Pipeline::new()
        .with_inspector(FileNameSpaces)
        .with_inspector(FileNameCase);

    let outcome = pipeline
        .run(ProjectAsset::new("docs/My File.txt"), None)
        .await;

    assert!(outcome.is_issue());
    assert_eq!(
        outcome.diagnostics(),
        &[
            "should be renamed because it has spaces (replace all spaces with hyphens '-')",
            "should be renamed because it has mixed case letters (all text should be lowercase only)",
        ]
    );
}

#[tokio::test]
async fn clean_filename_passes_both_checks() {
    let pipeline = Pipeline::new()
        .with_inspector(FileNameSpaces)
        .with_inspector(FileNameCase);
    let recorder = Recorder::new();

    let outcome = pipeline
        .run(ProjectAsset::new("docs/readme.md"), Some(&recorder))
        .await;

    assert!(outcome.is_successful());
    assert!(recorder.is_empty());
}
