#![allow(clippy::unwrap_used, clippy::panic, clippy::todo, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::cast_precision_loss, clippy::clone_on_ref_ptr, clippy::match_same_arms, clippy::items_after_statements, unreachable_pub, clippy::print_stdout, clippy::print_stderr, clippy::similar_names)]
use reqwest::StatusCode;
use serde_json::{Value, json};
mod common;

async fn upload(app: &common::TestApp, owner: &common::TestUser) -> Value {
    let resp = app
        .client
        .post(app.url("/documents"))
        .bearer_auth(&owner.token)
        .json(&json!({
            "title": "State ID",
            "documentType": "identification",
            "fileUrl": "https://files.example.org/id.pdf",
            "mimeType": "application/pdf",
            "sizeBytes": 20480,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_documents_are_private_to_owner() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let owner = app.register("Amina").await;
    let stranger = app.register("Mallory").await;
    let doc = upload(&app, &owner).await;
    assert_eq!(doc["isVerified"], false);
    assert_eq!(doc["userId"], owner.id);

    let url = app.url(&format!("/documents/{}", doc["id"]));
    let peek = app.client.get(&url).bearer_auth(&stranger.token).send().await.unwrap();
    assert_eq!(peek.status(), StatusCode::FORBIDDEN);

    let remove = app.client.delete(&url).bearer_auth(&stranger.token).send().await.unwrap();
    assert_eq!(remove.status(), StatusCode::FORBIDDEN);

    let listed = app.get_json(&owner, "/documents").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert!(app.get_json(&stranger, "/documents").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_staff_verify_documents() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let owner = app.register("Amina").await;
    let admin = app.register_with_role("Admin", "admin").await;
    let doc = upload(&app, &owner).await;
    let url = app.url(&format!("/documents/{}", doc["id"]));

    let self_verify = app.client.patch(&url).bearer_auth(&owner.token).json(&json!({ "isVerified": true }));
    assert_eq!(self_verify.send().await.unwrap().status(), StatusCode::FORBIDDEN);

    let renamed = app.client.patch(&url).bearer_auth(&owner.token).json(&json!({ "title": "Driver license" }));
    let renamed: Value = renamed.send().await.unwrap().json().await.unwrap();
    assert_eq!(renamed["title"], "Driver license");

    let verified = app.client.patch(&url).bearer_auth(&admin.token).json(&json!({ "isVerified": true }));
    let verified: Value = verified.send().await.unwrap().json().await.unwrap();
    assert_eq!(verified["isVerified"], true);
}

#[tokio::test]
async fn test_create_rejects_client_verification_flag() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let owner = app.register("Amina").await;

    let resp = app
        .client
        .post(app.url("/documents"))
        .bearer_auth(&owner.token)
        .json(&json!({
            "title": "Lease",
            "documentType": "housing",
            "fileUrl": "https://files.example.org/lease.pdf",
            "isVerified": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
