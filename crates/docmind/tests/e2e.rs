// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete conversation core.
//!
//! Each test creates an isolated TestHarness with mock gateway, mock
//! backend, and notice capture. Tests are independent and
//! order-insensitive.

use docmind_chat::{IgnoreReason, SendOutcome, SendRequest, FALLBACK_REPLY};
use docmind_core::{ChatModel, MessageRole, NoticeKind};
use docmind_test_utils::TestHarness;

// ---- Session creation and listing ----

#[tokio::test]
async fn create_session_from_empty_state() {
    let mut harness = TestHarness::builder().with_user("u1").build().await.unwrap();
    assert!(harness.store.sessions().is_empty());

    let session = harness.open_session().await.unwrap();
    assert_eq!(session.title, "New Chat");
    assert_eq!(harness.store.current().unwrap().id, session.id);
    assert_eq!(harness.store.sessions().len(), 1);
    assert_eq!(harness.gateway.stored_sessions("u1").len(), 1);
}

// ---- The send protocol ----

#[tokio::test]
async fn successful_send_produces_exactly_two_messages() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["It depends.".to_string()])
        .build()
        .await
        .unwrap();
    let session = harness.open_session().await.unwrap();

    let outcome = harness.send_message("What is X?").await.unwrap();
    assert_eq!(outcome, SendOutcome::Sent);

    let messages = harness.gateway.stored_messages(&session.id);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "What is X?");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "It depends.");
    assert!(messages[0].created_at < messages[1].created_at);
}

#[tokio::test]
async fn empty_input_makes_no_network_calls() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    let session = harness.open_session().await.unwrap();

    let outcome = harness.send_message("   ").await.unwrap();
    assert_eq!(outcome, SendOutcome::Ignored(IgnoreReason::EmptyInput));

    assert!(harness.gateway.stored_messages(&session.id).is_empty());
    assert_eq!(harness.gateway.insert_message_calls(), 0);
    assert!(harness.backend.turns().is_empty());
    assert!(harness.notifier.notices().is_empty());
}

#[tokio::test]
async fn second_send_while_first_in_flight_gains_no_messages() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["slow answer".to_string()])
        .build()
        .await
        .unwrap();
    let session = harness.open_session().await.unwrap();
    harness.backend.hold();

    let orchestrator = harness.orchestrator.clone();
    let session_bg = session.clone();
    let model_bg = harness.registry.selected().unwrap().clone();
    let first = tokio::spawn(async move {
        orchestrator
            .send(SendRequest {
                text: "first",
                session: Some(&session_bg),
                model: Some(&model_bg),
                use_web: false,
            })
            .await
            .unwrap()
    });

    // Wait until the first send holds at the backend (user turn durable).
    while harness.backend.turns().is_empty() {
        tokio::task::yield_now().await;
    }

    let outcome = harness.send_message("second").await.unwrap();
    assert_eq!(outcome, SendOutcome::Ignored(IgnoreReason::AlreadySending));
    assert_eq!(harness.gateway.stored_messages(&session.id).len(), 1);

    harness.backend.release();
    assert_eq!(first.await.unwrap(), SendOutcome::Sent);
    assert_eq!(harness.gateway.stored_messages(&session.id).len(), 2);
}

#[tokio::test]
async fn inference_failure_leaves_lone_user_turn() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    let session = harness.open_session().await.unwrap();
    harness.backend.fail_chat(true);

    let err = harness.send_message("anyone?").await.unwrap_err();
    assert!(err.to_string().contains("inference"));

    let messages = harness.gateway.stored_messages(&session.id);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);

    // The failure was surfaced, and the session is usable again.
    assert_eq!(harness.notifier.of_kind(NoticeKind::Error).len(), 1);
    harness.backend.fail_chat(false);
    harness.backend.add_reply("recovered");
    assert_eq!(harness.send_message("again?").await.unwrap(), SendOutcome::Sent);
}

#[tokio::test]
async fn blank_backend_reply_is_replaced_by_fallback() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["  ".to_string()])
        .build()
        .await
        .unwrap();
    let session = harness.open_session().await.unwrap();

    harness.send_message("hello").await.unwrap();
    let messages = harness.gateway.stored_messages(&session.id);
    assert_eq!(messages[1].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn web_flag_reaches_the_backend() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    harness.open_session().await.unwrap();

    harness.send_message_with_web("search this", true).await.unwrap();
    harness.send_message_with_web("local only", false).await.unwrap();

    let turns = harness.backend.turns();
    assert_eq!(turns.len(), 2);
    assert!(turns[0].use_web);
    assert!(!turns[1].use_web);
}

#[tokio::test]
async fn turn_carries_session_user_and_pinned_model() {
    let mut harness = TestHarness::builder().with_user("u42").build().await.unwrap();
    let session = harness.open_session().await.unwrap();

    harness.send_message("who am I?").await.unwrap();
    let turns = harness.backend.turns();
    assert_eq!(turns[0].session_id, session.id);
    assert_eq!(turns[0].user_id, "u42");
    assert_eq!(turns[0].model_name, "mock-model-v1");
}

// ---- Session deletion ----

#[tokio::test]
async fn deleting_current_session_clears_sequence_and_promotes_next() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["a1".to_string(), "b1".to_string()])
        .build()
        .await
        .unwrap();

    let first = harness.open_session().await.unwrap();
    harness.send_message("in first").await.unwrap();
    let second = harness.open_session().await.unwrap();
    harness.send_message("in second").await.unwrap();

    // Delete the current (second) session: the first becomes current and
    // its history is reloaded.
    let deletion = harness
        .store
        .delete(harness.gateway.as_ref(), &second.id)
        .await
        .unwrap();
    match deletion {
        docmind_chat::Deletion::RemovedCurrent { replacement } => {
            let next = replacement.expect("first session should remain");
            assert_eq!(next.id, first.id);
            harness.orchestrator.activate(&next).await.unwrap();
        }
        other => panic!("expected RemovedCurrent, got {other:?}"),
    }

    assert_eq!(harness.store.sessions().len(), 1);
    let (current_id, entries) = harness.orchestrator.snapshot().unwrap();
    assert_eq!(current_id, first.id);
    assert_eq!(entries.len(), 2);
    // The deleted session's rows are gone from the store (cascade).
    assert!(harness.gateway.stored_messages(&second.id).is_empty());
}

#[tokio::test]
async fn deleting_non_current_session_leaves_sequence_unchanged() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["a1".to_string(), "b1".to_string()])
        .build()
        .await
        .unwrap();

    let first = harness.open_session().await.unwrap();
    harness.send_message("in first").await.unwrap();
    let second = harness.open_session().await.unwrap();
    harness.send_message("in second").await.unwrap();

    let deletion = harness
        .store
        .delete(harness.gateway.as_ref(), &first.id)
        .await
        .unwrap();
    assert_eq!(deletion, docmind_chat::Deletion::Removed);

    let (current_id, entries) = harness.orchestrator.snapshot().unwrap();
    assert_eq!(current_id, second.id);
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn deleting_last_session_empties_everything() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    let only = harness.open_session().await.unwrap();

    let deletion = harness
        .store
        .delete(harness.gateway.as_ref(), &only.id)
        .await
        .unwrap();
    assert_eq!(
        deletion,
        docmind_chat::Deletion::RemovedCurrent { replacement: None }
    );
    harness.orchestrator.clear();

    assert!(harness.store.sessions().is_empty());
    assert!(harness.orchestrator.snapshot().is_none());

    // With no session, a send degrades to a silent no-op.
    let outcome = harness.send_message("into the void").await.unwrap();
    assert_eq!(outcome, SendOutcome::Ignored(IgnoreReason::NoSession));
}

// ---- Model selection ----

#[tokio::test]
async fn inactive_models_are_never_selectable() {
    let harness = TestHarness::builder()
        .with_models(vec![
            ChatModel {
                id: "off".into(),
                display_name: "Retired".into(),
                api_model_name: "retired-v0".into(),
                is_active: false,
            },
            ChatModel {
                id: "on".into(),
                display_name: "Live".into(),
                api_model_name: "live-v1".into(),
                is_active: true,
            },
        ])
        .build()
        .await
        .unwrap();

    assert_eq!(harness.registry.models().len(), 1);
    assert_eq!(harness.registry.selected().unwrap().id, "on");
}

#[tokio::test]
async fn empty_active_set_makes_send_a_noop() {
    let mut harness = TestHarness::builder().with_models(Vec::new()).build().await.unwrap();
    let session = harness.open_session().await.unwrap();

    assert!(harness.registry.selected().is_none());
    let outcome = harness.send_message("hello?").await.unwrap();
    assert_eq!(outcome, SendOutcome::Ignored(IgnoreReason::NoModel));
    assert!(harness.gateway.stored_messages(&session.id).is_empty());
}

// ---- Uploads ----

#[tokio::test]
async fn upload_succeeds_alongside_in_flight_send() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["busy".to_string()])
        .build()
        .await
        .unwrap();
    let session = harness.open_session().await.unwrap();
    harness.backend.hold();

    let orchestrator = harness.orchestrator.clone();
    let session_bg = session.clone();
    let model_bg = harness.registry.selected().unwrap().clone();
    let send = tokio::spawn(async move {
        orchestrator
            .send(SendRequest {
                text: "long question",
                session: Some(&session_bg),
                model: Some(&model_bg),
                use_web: false,
            })
            .await
            .unwrap()
    });

    while harness.backend.turns().is_empty() {
        tokio::task::yield_now().await;
    }

    // The upload side channel is not serialized behind the send lock.
    let ack = harness
        .uploader
        .upload(docmind_core::UploadJob {
            file_name: "paper.pdf".into(),
            data: b"%PDF-1.7".to_vec(),
            user_id: "test-user".into(),
            session_id: Some(session.id.clone()),
        })
        .await
        .unwrap();
    assert_eq!(ack.message, "Successfully processed paper.pdf");

    harness.backend.release();
    assert_eq!(send.await.unwrap(), SendOutcome::Sent);
}

#[tokio::test]
async fn upload_failure_surfaces_backend_detail() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.backend.fail_uploads("Typesense API Key not found.");

    let err = harness
        .uploader
        .upload(docmind_core::UploadJob {
            file_name: "paper.pdf".into(),
            data: b"%PDF-1.7".to_vec(),
            user_id: "test-user".into(),
            session_id: None,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Typesense API Key not found."));

    let errors = harness.notifier.of_kind(NoticeKind::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].detail.contains("Typesense API Key not found."));
}

// ---- Transcript consistency across switches ----

#[tokio::test]
async fn switching_sessions_reloads_history_and_isolates_in_flight_send() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["first answer".to_string(), "late answer".to_string()])
        .build()
        .await
        .unwrap();

    let first = harness.open_session().await.unwrap();
    harness.send_message("hello first").await.unwrap();

    let second = harness.open_session().await.unwrap();
    harness.backend.hold();

    let orchestrator = harness.orchestrator.clone();
    let second_bg = second.clone();
    let model_bg = harness.registry.selected().unwrap().clone();
    let slow = tokio::spawn(async move {
        orchestrator
            .send(SendRequest {
                text: "slow question",
                session: Some(&second_bg),
                model: Some(&model_bg),
                use_web: false,
            })
            .await
            .unwrap()
    });
    while harness.backend.turns().len() < 2 {
        tokio::task::yield_now().await;
    }

    // Switch back to the first session while the send is in flight.
    match harness.store.select(&first.id) {
        docmind_chat::Selection::Switched(session) => {
            harness.orchestrator.activate(&session).await.unwrap();
        }
        other => panic!("expected Switched, got {other:?}"),
    }

    harness.backend.release();
    assert_eq!(slow.await.unwrap(), SendOutcome::Sent);

    // The displayed transcript is the first session's, untouched by the
    // late completion ...
    let (current_id, entries) = harness.orchestrator.snapshot().unwrap();
    assert_eq!(current_id, first.id);
    assert_eq!(entries.len(), 2);
    // ... while both turns of the slow send are durable in the second.
    let stored = harness.gateway.stored_messages(&second.id);
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].content, "late answer");
}
