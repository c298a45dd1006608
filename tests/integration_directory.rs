#![allow(clippy::unwrap_used, clippy::panic, clippy::todo, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::cast_precision_loss, clippy::clone_on_ref_ptr, clippy::match_same_arms, clippy::items_after_statements, unreachable_pub, clippy::print_stdout, clippy::print_stderr, clippy::similar_names)]
use reqwest::StatusCode;
use serde_json::{Value, json};
mod common;

async fn create_service(app: &common::TestApp, staff: &common::TestUser, total: i32) -> Value {
    let resp = app
        .client
        .post(app.url("/services"))
        .bearer_auth(&staff.token)
        .json(&json!({
            "name": "Harbor Shelter",
            "category": "shelter",
            "address": "1 Pier St",
            "totalCapacity": total,
            "amenities": ["showers", "lockers"],
            "operatingHours": { "monday": { "open": "08:00", "close": "20:00" } },
            "requirements": { "minimumAge": 18, "documentsRequired": ["photo id"] },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_only_staff_manage_services() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let user = app.register("Amina").await;

    let resp = app
        .client
        .post(app.url("/services"))
        .bearer_auth(&user.token)
        .json(&json!({ "name": "x", "category": "food", "address": "y" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_service_round_trip_keeps_typed_json() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let staff = app.register_with_role("Dana", "case_worker").await;
    let user = app.register("Amina").await;
    let service = create_service(&app, &staff, 10).await;

    let fetched = app.get_json(&user, &format!("/services/{}", service["id"])).await;
    assert_eq!(fetched["operatingHours"]["monday"]["open"], "08:00");
    assert_eq!(fetched["requirements"]["minimumAge"], 18);
    assert_eq!(fetched["requirements"]["referralRequired"], false);
    assert_eq!(fetched["hasVacancy"], true);

    let listed = app.get_json(&user, "/services?category=shelter&active=true").await;
    assert!(listed.as_array().unwrap().iter().any(|s| s["id"] == service["id"]));

    let bad_hours = app
        .client
        .patch(app.url(&format!("/services/{}", service["id"])))
        .bearer_auth(&staff.token)
        .json(&json!({ "operatingHours": { "monday": { "open": "20:00", "close": "08:00" } } }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_hours.status(), StatusCode::BAD_REQUEST);

    let bad_requirements = app
        .client
        .patch(app.url(&format!("/services/{}", service["id"])))
        .bearer_auth(&staff.token)
        .json(&json!({ "requirements": { "minAge": 18 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_requirements.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_capacity_adjustment_is_bounded() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let staff = app.register_with_role("Dana", "case_worker").await;
    let service = create_service(&app, &staff, 2).await;
    let id = service["id"].as_i64().unwrap();

    let adjust = |delta: i32, target: i64| {
        app.client
            .post(app.url(&format!("/services/{target}/capacity")))
            .bearer_auth(&staff.token)
            .json(&json!({ "delta": delta }))
            .send()
    };

    let up: Value = adjust(2, id).await.unwrap().json().await.unwrap();
    assert_eq!(up["currentCapacity"], 2);
    assert_eq!(up["hasVacancy"], false);

    assert_eq!(adjust(1, id).await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(adjust(-3, id).await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(adjust(1, i64::MAX).await.unwrap().status(), StatusCode::NOT_FOUND);

    let down: Value = adjust(-1, id).await.unwrap().json().await.unwrap();
    assert_eq!(down["currentCapacity"], 1);
}

#[tokio::test]
async fn test_capacity_overflow_is_a_conflict() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let staff = app.register_with_role("Dana", "case_worker").await;

    let created = app
        .client
        .post(app.url("/services"))
        .bearer_auth(&staff.token)
        .json(&json!({
            "name": "Open Door Drop-in",
            "category": "food",
            "address": "9 Elm St",
            "currentCapacity": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let service: Value = created.json().await.unwrap();
    assert!(service["totalCapacity"].is_null());
    let url = app.url(&format!("/services/{}/capacity", service["id"]));

    let adjust = |delta: i32| app.client.post(&url).bearer_auth(&staff.token).json(&json!({ "delta": delta })).send();

    assert_eq!(adjust(i32::MAX).await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(adjust(i32::MIN).await.unwrap().status(), StatusCode::CONFLICT);

    let fetched = app.get_json(&staff, &format!("/services/{}", service["id"])).await;
    assert_eq!(fetched["currentCapacity"], 5);

    let grown: Value = adjust(i32::MAX - 5).await.unwrap().json().await.unwrap();
    assert_eq!(grown["currentCapacity"], i32::MAX);
}

#[tokio::test]
async fn test_concurrent_capacity_adjustments_never_overshoot() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let staff = app.register_with_role("Dana", "case_worker").await;
    let service = create_service(&app, &staff, 5).await;
    let url = app.url(&format!("/services/{}/capacity", service["id"]));

    let requests = (0..10).map(|_| {
        app.client.post(&url).bearer_auth(&staff.token).json(&json!({ "delta": 1 })).send()
    });
    let results = futures::future::join_all(requests).await;

    let accepted = results.iter().filter(|r| r.as_ref().unwrap().status() == StatusCode::OK).count();
    assert_eq!(accepted, 5);

    let fetched = app.get_json(&staff, &format!("/services/{}", service["id"])).await;
    assert_eq!(fetched["currentCapacity"], 5);
}

#[tokio::test]
async fn test_jobs_are_owned_by_their_poster() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let poster = app.register_with_role("Dana", "case_worker").await;
    let other_staff = app.register_with_role("Eli", "case_worker").await;
    let admin = app.register_with_role("Admin", "admin").await;

    let created = app
        .client
        .post(app.url("/jobs"))
        .bearer_auth(&poster.token)
        .json(&json!({
            "title": "Line cook",
            "employer": "Harbor Diner",
            "location": "Main St",
            "jobType": "part_time",
            "salaryMin": 15,
            "salaryMax": 18,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let job: Value = created.json().await.unwrap();
    assert_eq!(job["postedById"], poster.id);
    let url = app.url(&format!("/jobs/{}", job["id"]));

    let by_other = app.client.patch(&url).bearer_auth(&other_staff.token).json(&json!({ "isActive": false }));
    assert_eq!(by_other.send().await.unwrap().status(), StatusCode::FORBIDDEN);

    let inverted = app.client.patch(&url).bearer_auth(&poster.token).json(&json!({ "salaryMin": 30 }));
    assert_eq!(inverted.send().await.unwrap().status(), StatusCode::BAD_REQUEST);

    let by_admin = app.client.patch(&url).bearer_auth(&admin.token).json(&json!({ "isActive": false }));
    let updated: Value = by_admin.send().await.unwrap().json().await.unwrap();
    assert_eq!(updated["isActive"], false);

    let deleted = app.client.delete(&url).bearer_auth(&poster.token).send().await.unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_caseload_adjustment() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let admin = app.register_with_role("Admin", "admin").await;
    let cw = app.create_case_worker(&admin, None, None).await;

    let adjust = |delta: i32| {
        app.client
            .post(app.url(&format!("/case-workers/{cw}/caseload")))
            .bearer_auth(&admin.token)
            .json(&json!({ "delta": delta }))
            .send()
    };

    let first: Value = adjust(2).await.unwrap().json().await.unwrap();
    assert_eq!(first["currentCaseload"], 2);
    assert_eq!(adjust(1).await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(adjust(i32::MAX).await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(adjust(i32::MIN).await.unwrap().status(), StatusCode::CONFLICT);

    let unchanged = app.get_json(&admin, &format!("/case-workers/{cw}")).await;
    assert_eq!(unchanged["currentCaseload"], 2);

    let available = app.get_json(&admin, "/case-workers?available=true").await;
    assert!(available.as_array().unwrap().iter().any(|w| w["id"] == cw));
}
