//! End-to-end commit flow: real git repository, mock inference server.

mod common;

use std::future::pending;

use common::{TestRepo, ndjson_body};
use diny::commit::CommitMessage;
use diny::config::{InferenceSettings, StyleConfig};
use diny::error::{AbortCause, InferenceError};
use diny::flow::{AbortReason, CommitFlow, Confirmer, FlowState, Notice};
use diny::git::{GitCommitter, GitDiffSource};
use diny::inference::InferenceClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Answer(bool);

impl Confirmer for Answer {
    fn confirm(&self, _message: &CommitMessage) -> bool {
        self.0
    }
}

async fn mock_backend(body: String, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> InferenceClient {
    InferenceClient::new(InferenceSettings::default().with_endpoint(server.uri())).unwrap()
}

#[tokio::test]
async fn test_confirmed_message_is_committed() {
    let repo = TestRepo::new();
    repo.stage("src/lib.rs", b"pub fn greet() -> &'static str {\n    \"hi\"\n}\n");

    let server = mock_backend(ndjson_body(&["feat: ", "add greet"], true), 1).await;
    let client = client_for(&server);
    let source = GitDiffSource::in_dir(repo.path());
    let committer = GitCommitter::in_dir(repo.path());
    let mut notices: Vec<Notice> = Vec::new();
    let mut rendered = Vec::new();

    let outcome = CommitFlow::new(&source, &client, &mut notices)
        .run(
            &StyleConfig::default(),
            &mut rendered,
            pending(),
            &Answer(true),
            &committer,
        )
        .await
        .unwrap();

    assert_eq!(outcome.state, FlowState::Committed);
    assert_eq!(repo.head_message().as_deref(), Some("feat: add greet"));
    assert_eq!(rendered, b"feat: add greet");
    assert!(
        notices
            .iter()
            .any(|n| matches!(n, Notice::DiffSizes { raw, cleaned } if cleaned <= raw))
    );
}

#[tokio::test]
async fn test_declined_message_leaves_history_untouched() {
    let repo = TestRepo::new();
    repo.stage("README.md", b"# demo\n");
    repo.commit_staged("initial");
    repo.stage("README.md", b"# demo\n\nUsage notes.\n");

    let server = mock_backend(ndjson_body(&["docs: ", "add usage notes"], true), 1).await;
    let client = client_for(&server);
    let source = GitDiffSource::in_dir(repo.path());
    let committer = GitCommitter::in_dir(repo.path());

    let outcome = CommitFlow::new(&source, &client, &mut Vec::<Notice>::new())
        .run(
            &StyleConfig::default(),
            &mut tokio::io::sink(),
            pending(),
            &Answer(false),
            &committer,
        )
        .await
        .unwrap();

    assert_eq!(outcome.state, FlowState::Cancelled);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(repo.commit_count(), 1);
    assert_eq!(repo.head_message().as_deref(), Some("initial"));
}

#[tokio::test]
async fn test_nothing_staged_never_contacts_backend() {
    let repo = TestRepo::new();
    repo.stage("a.txt", b"a\n");
    repo.commit_staged("initial");

    let server = mock_backend(ndjson_body(&["unused"], true), 0).await;
    let client = client_for(&server);
    let source = GitDiffSource::in_dir(repo.path());
    let committer = GitCommitter::in_dir(repo.path());

    let outcome = CommitFlow::new(&source, &client, &mut Vec::<Notice>::new())
        .run(
            &StyleConfig::default(),
            &mut tokio::io::sink(),
            pending(),
            &Answer(true),
            &committer,
        )
        .await
        .unwrap();

    assert_eq!(outcome.state, FlowState::Aborted(AbortReason::NoStagedChanges));
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn test_only_lockfile_changes_have_no_meaningful_content() {
    let repo = TestRepo::new();
    repo.stage("README.md", b"# demo\n");
    repo.commit_staged("initial");
    // Excluded by the pathspecs, so git reports nothing at all.
    repo.stage("Cargo.lock", b"version = 4\n");

    let server = mock_backend(ndjson_body(&["unused"], true), 0).await;
    let client = client_for(&server);
    let source = GitDiffSource::in_dir(repo.path());
    let committer = GitCommitter::in_dir(repo.path());

    let outcome = CommitFlow::new(&source, &client, &mut Vec::<Notice>::new())
        .run(
            &StyleConfig::default(),
            &mut tokio::io::sink(),
            pending(),
            &Answer(true),
            &committer,
        )
        .await
        .unwrap();

    assert!(matches!(
        outcome.state,
        FlowState::Aborted(AbortReason::NoStagedChanges | AbortReason::NoMeaningfulContent)
    ));
    assert_eq!(repo.commit_count(), 1);
}

#[tokio::test]
async fn test_truncated_stream_aborts_before_confirmation() {
    let repo = TestRepo::new();
    repo.stage("main.go", b"package main\n");

    let server = mock_backend(ndjson_body(&["feat: ", "add ma"], false), 1).await;
    let client = client_for(&server);
    let source = GitDiffSource::in_dir(repo.path());
    let committer = GitCommitter::in_dir(repo.path());

    let outcome = CommitFlow::new(&source, &client, &mut Vec::<Notice>::new())
        .run(
            &StyleConfig::default(),
            &mut tokio::io::sink(),
            pending(),
            &Answer(true),
            &committer,
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.state,
        FlowState::Aborted(AbortReason::InferenceFailure)
    );
    assert!(matches!(
        outcome.cause,
        Some(AbortCause::Inference(InferenceError::Truncated))
    ));
    assert!(outcome.message.is_none());
    assert_eq!(repo.commit_count(), 0);
}

#[tokio::test]
async fn test_message_mode_stops_at_confirmation() {
    let repo = TestRepo::new();
    repo.stage("notes.txt", b"remember the milk\n");

    let server = mock_backend(ndjson_body(&["chore: add notes"], true), 1).await;
    let client = client_for(&server);
    let source = GitDiffSource::in_dir(repo.path());

    let mut notices: Vec<Notice> = Vec::new();
    let mut flow = CommitFlow::new(&source, &client, &mut notices);
    let outcome = flow
        .generate(&StyleConfig::default(), &mut tokio::io::sink(), pending())
        .await
        .unwrap();

    assert_eq!(outcome.state, FlowState::AwaitingConfirmation);
    assert_eq!(outcome.message.unwrap().as_str(), "chore: add notes");
    assert_eq!(repo.commit_count(), 0);
}
