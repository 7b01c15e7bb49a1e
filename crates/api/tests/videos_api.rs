//! Integration tests for the `/api/v1/videos` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use ecomvideo_core::video::VideoStatus;
use ecomvideo_db::repositories::VideoRepo;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

fn create_body(user_id: Uuid) -> Value {
    json!({
        "user_id": user_id,
        "title": "Summer sneaker drop",
        "description": "Launch teaser",
        "text_prompt": "White sneakers on a sunlit concrete plinth",
        "resolution": "hd_720p",
        "aspect_ratio": "16:9",
        "duration": 8
    })
}

async fn create(pool: &PgPool, body: Value) -> Value {
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_pending_projection(pool: PgPool) {
    let data = create(&pool, create_body(Uuid::new_v4())).await;

    assert_eq!(data["status"], "Pending");
    assert_eq!(data["progress"], 10);
    assert_eq!(data["message"], "Preparing your video...");
    assert_eq!(data["resolution"], "hd_720p");
    assert_eq!(data["aspect_ratio"], "16:9");
    assert_eq!(data["width"], 1280);
    assert_eq!(data["height"], 720);
    assert_eq!(data["duration"], 8);
    assert!(data["video_url"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let data = create(
        &pool,
        json!({
            "user_id": Uuid::new_v4(),
            "title": "Mug",
            "text_prompt": "A stoneware mug steaming on a desk"
        }),
    )
    .await;

    assert_eq!(data["resolution"], "sd_480p");
    assert_eq!(data["aspect_ratio"], "9:16");
    assert_eq!(data["duration"], 5);
    assert_eq!(data["description"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_does_not_start_generation(pool: PgPool) {
    let data = create(&pool, create_body(Uuid::new_v4())).await;
    let id: Uuid = data["id"].as_str().unwrap().parse().unwrap();

    let stored = VideoRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status(), Some(VideoStatus::Pending));
    assert!(stored.image_task_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_prompt_is_rejected(pool: PgPool) {
    let mut body = create_body(Uuid::new_v4());
    body["text_prompt"] = json!("shoes");

    let response = post_json(common::build_test_app(pool), "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn nil_user_is_rejected(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/videos",
        create_body(Uuid::nil()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_resolution_is_rejected(pool: PgPool) {
    let mut body = create_body(Uuid::new_v4());
    body["resolution"] = json!("4k");

    let response = post_json(common::build_test_app(pool), "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlong_duration_is_rejected(pool: PgPool) {
    let mut body = create_body(Uuid::new_v4());
    body["duration"] = json!(31);

    let response = post_json(common::build_test_app(pool), "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quick_create_forces_preset(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/videos/quick",
        create_body(Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["resolution"], "sd_480p");
    assert_eq!(data["duration"], 3);
    assert_eq!(data["height"], 480);
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_reflects_pipeline_progress(pool: PgPool) {
    let data = create(&pool, create_body(Uuid::new_v4())).await;
    let id: Uuid = data["id"].as_str().unwrap().parse().unwrap();

    let mut stored = VideoRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    stored.status_id = VideoStatus::GeneratingVideo.id();
    stored.image_task_id = Some("img-1".into());
    stored.image_url = Some("https://cdn.example/img-1.png".into());
    stored.video_task_id = Some("vid-1".into());
    assert!(VideoRepo::update(&pool, &stored).await.unwrap());

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/videos/{id}/status"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({
            "id": id,
            "status": "GeneratingVideo",
            "progress": 60,
            "message": "Generating video from image..."
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_of_unknown_video_is_404(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/videos/{}/status", Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_video_returns_full_projection(pool: PgPool) {
    let data = create(&pool, create_body(Uuid::new_v4())).await;
    let id = data["id"].as_str().unwrap().to_string();

    let response = get(common::build_test_app(pool), &format!("/api/v1/videos/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["title"], "Summer sneaker drop");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_listing_is_paged_newest_first(pool: PgPool) {
    let user = Uuid::new_v4();
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(create(&pool, create_body(user)).await["id"].clone());
    }
    create(&pool, create_body(Uuid::new_v4())).await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/videos/user/{user}?page=1&page_size=2"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total"], 3);
    assert_eq!(data["page"], 1);
    assert_eq!(data["page_size"], 2);
    let items = data["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], ids[2]);
    assert_eq!(items[1]["id"], ids[1]);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/videos/user/{user}?page=2&page_size=2"),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    let items = data["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], ids[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_page_is_rejected(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/videos/user/{}?page=0", Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn huge_page_returns_empty_listing(pool: PgPool) {
    let user = Uuid::new_v4();
    create(&pool, create_body(user)).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/videos/user/{user}?page={}", i64::MAX),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total"], 1);
    assert!(data["items"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn red_shoe_submission_starts_pending(pool: PgPool) {
    let data = create(
        &pool,
        json!({
            "user_id": Uuid::new_v4(),
            "title": "Red shoe",
            "text_prompt": "a red shoe on white background",
            "resolution": "sd_480p",
            "duration": 4
        }),
    )
    .await;

    assert_eq!(data["status"], "Pending");
    assert_eq!(data["progress"], 10);
    assert_eq!(data["resolution"], "sd_480p");
    assert_eq!(data["duration"], 4);
}
