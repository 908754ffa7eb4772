#![cfg(unix)]
//! The `bd` wrapper against a scripted binary: argument shapes and parsing.

mod test_utils;

use lazybeads::beads::{Client, IssueUpdate, Mutation, NewIssue};
use lazybeads::data::{IssueType, Status};
use pretty_assertions::assert_eq;
use test_utils::FakeBd;

const ONE_ISSUE: &str = r#"[{"id": "bd-1", "title": "First", "status": "open", "priority": 1}]"#;

#[tokio::test]
async fn test_fetch_all_reads_list_and_ready() {
    let fake = FakeBd::new();
    fake.respond("list", ONE_ISSUE);
    fake.respond("ready", ONE_ISSUE);

    let snapshot = Client::new(fake.program()).fetch_all().await.unwrap();
    assert_eq!(snapshot.issues.len(), 1);
    assert!(snapshot.ready_ids.contains("bd-1"));
    assert_eq!(
        fake.calls(),
        vec!["list --json --all --limit=0", "ready --json"]
    );
}

#[tokio::test]
async fn test_failing_ready_degrades_to_empty_set() {
    let fake = FakeBd::new();
    fake.respond("list", ONE_ISSUE);
    fake.fail("ready", "no database");

    let snapshot = Client::new(fake.program()).fetch_all().await.unwrap();
    assert_eq!(snapshot.issues.len(), 1);
    assert!(snapshot.ready_ids.is_empty());
}

#[tokio::test]
async fn test_create_passes_fields_and_returns_issue() {
    let fake = FakeBd::new();
    fake.respond(
        "create",
        r#"{"id": "bd-9", "title": "New thing", "status": "open", "priority": 0, "issue_type": "bug"}"#,
    );

    let issue = Client::new(fake.program())
        .create(&NewIssue {
            title: "New thing".to_string(),
            description: "Steps".to_string(),
            issue_type: IssueType::Bug,
            priority: 0,
        })
        .await
        .unwrap();

    assert_eq!(issue.id, "bd-9");
    assert_eq!(
        fake.calls(),
        vec!["create --title New thing --json --type bug --priority 0 -d Steps"]
    );
}

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let fake = FakeBd::new();
    let client = Client::new(fake.program());

    client
        .update(
            "bd-1",
            &IssueUpdate {
                status: Some(Status::InProgress),
                priority: Some(3),
                ..IssueUpdate::default()
            },
        )
        .await
        .unwrap();
    client.update("bd-1", &IssueUpdate::default()).await.unwrap();

    assert_eq!(fake.calls(), vec!["update bd-1 --status in_progress --priority 3"]);
}

#[tokio::test]
async fn test_close_delete_and_dependencies() {
    let fake = FakeBd::new();
    let client = Client::new(fake.program());

    client.close("bd-1").await.unwrap();
    client.delete("bd-2").await.unwrap();
    client.add_blocker("bd-1", "bd-3").await.unwrap();
    client.remove_blocker("bd-1", "bd-3").await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![
            "close bd-1",
            "delete bd-2 --force",
            "dep add bd-1 bd-3",
            "dep rm bd-1 bd-3",
        ]
    );
}

#[tokio::test]
async fn test_comments_round_trip() {
    let fake = FakeBd::new();
    fake.respond(
        "comments",
        r#"[{"id": 1, "issue_id": "bd-1", "author": "sam", "text": "Looks good", "created_at": "2025-01-02T03:04:05Z"}]"#,
    );
    let client = Client::new(fake.program());

    let comments = client.comments("bd-1").await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "sam");
    assert_eq!(comments[0].text, "Looks good");

    client.add_comment("bd-1", "Ship it").await.unwrap();
    assert_eq!(
        fake.calls(),
        vec!["comments bd-1 --json", "comments add bd-1 Ship it"]
    );
}

#[tokio::test]
async fn test_failed_mutation_reports_stderr() {
    let fake = FakeBd::new();
    fake.fail("close", "issue bd-1 not found");

    let err = Client::new(fake.program())
        .apply(&Mutation::Close {
            id: "bd-1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("issue bd-1 not found"));
}
