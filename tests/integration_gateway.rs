#![allow(clippy::unwrap_used, clippy::panic, clippy::todo, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::cast_precision_loss, clippy::clone_on_ref_ptr, clippy::match_same_arms, clippy::items_after_statements, unreachable_pub, clippy::print_stdout, clippy::print_stderr, clippy::similar_names)]
use serde_json::json;
use std::time::Duration;
mod common;

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let Some(app) = common::TestApp::spawn().await else { return };

    let result = tokio_tungstenite::connect_async(format!("{}?token=garbage", app.ws_url)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_new_message_is_pushed_to_receiver() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let mut bob_ws = app.connect_ws(&bob.token).await;

    let sent = app.send_message(&alice, json!({ "receiverId": bob.id, "content": "Bed available at 6" })).await;
    assert_eq!(sent.status(), reqwest::StatusCode::CREATED);

    let frame = common::receive_frame(&mut bob_ws, Duration::from_secs(5)).await.expect("no frame received");
    assert_eq!(frame["type"], "message.created");
    assert_eq!(frame["message"]["content"], "Bed available at 6");
    assert_eq!(frame["message"]["senderId"], alice.id);
}

#[tokio::test]
async fn test_read_receipt_is_pushed_to_sender() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let sent: serde_json::Value =
        app.send_message(&alice, json!({ "receiverId": bob.id, "content": "ping" })).await.json().await.unwrap();

    let mut alice_ws = app.connect_ws(&alice.token).await;
    let resp = app
        .client
        .patch(app.url(&format!("/messages/{}/read", sent["id"])))
        .bearer_auth(&bob.token)
        .json(&json!({ "isRead": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let frame = common::receive_frame(&mut alice_ws, Duration::from_secs(5)).await.expect("no frame received");
    assert_eq!(frame["type"], "message.read");
    assert_eq!(frame["message"]["id"], sent["id"]);
    assert_eq!(frame["message"]["isRead"], true);
}

#[tokio::test]
async fn test_unrelated_users_receive_nothing() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let carol = app.register("Carol").await;
    let mut carol_ws = app.connect_ws(&carol.token).await;

    app.send_message(&alice, json!({ "receiverId": bob.id, "content": "private" })).await;

    assert!(common::receive_frame(&mut carol_ws, Duration::from_millis(300)).await.is_none());
}

#[tokio::test]
async fn test_shutdown_closes_sockets() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let alice = app.register("Alice").await;
    let mut ws = app.connect_ws(&alice.token).await;

    app.shutdown_tx.send(true).unwrap();

    assert!(common::receive_frame(&mut ws, Duration::from_secs(5)).await.is_none());
}
