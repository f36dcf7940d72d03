//! HTTP-level integration tests for pet listings.
//!
//! Verifies the grouped wire shape (pet + owner fields + `children`),
//! search, ownership checks and the photo limit.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete_auth, get, get_auth, multipart_auth, register_and_login, Part};
use serde_json::{json, Value};
use sqlx::PgPool;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

async fn create_pet(app: axum::Router, token: &str, name: &str, category: &str) -> i64 {
    let parts = [
        Part::Text("name", name),
        Part::Text("category", category),
        Part::Text("gender", "female"),
        Part::Text("age", "2"),
        Part::Text("color", "calico"),
        Part::Text("location", "Bandung"),
        Part::Text("publishDate", "2024-05-17"),
        Part::Text("description", "Friendly and vaccinated"),
        Part::File("main_photo", "main.png", PNG),
    ];
    let response = multipart_auth(app, Method::POST, "/api/pets", &parts, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["message"].is_string());
    json["petId"].as_i64().expect("petId must be returned")
}

async fn add_photos(app: axum::Router, token: &str, pet_id: i64, count: usize) -> StatusCode {
    let names: Vec<String> = (0..count).map(|i| format!("extra{i}.jpg")).collect();
    let parts: Vec<Part<'_>> = names
        .iter()
        .map(|name| Part::File("photos", name.as_str(), PNG))
        .collect();
    let uri = format!("/api/pets/{pet_id}/photos");
    multipart_auth(app, Method::POST, &uri, &parts, token)
        .await
        .status()
}

fn ids(json: &Value) -> Vec<i64> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|pet| pet["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Listing shape
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn pet_without_photos_has_empty_children(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "o@test.com").await;
    let pet_id = create_pet(app.clone(), &token, "Luna", "Cat").await;

    let response = get(app, &format!("/api/pets/{pet_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], pet_id);
    assert_eq!(json["name"], "Luna");
    assert_eq!(json["age"], 2);
    assert_eq!(json["publishDate"], "2024-05-17");
    assert_eq!(json["ownerName"], "Test Account");
    assert_eq!(json["ownerLocation"], "Jl. Kenanga 5, Bandung");
    assert_eq!(json["ownerPhone"], "081234567890");
    assert!(json.get("ownerPhotoUrl").is_none());
    assert!(json["primaryPhotoUrl"]
        .as_str()
        .unwrap()
        .starts_with("memory://pets/main_"));
    assert_eq!(json["children"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn photos_are_nested_in_upload_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "p@test.com").await;
    let first = create_pet(app.clone(), &token, "Milo", "Cat").await;
    let second = create_pet(app.clone(), &token, "Rex", "Dog").await;

    assert_eq!(add_photos(app.clone(), &token, first, 2).await, StatusCode::CREATED);
    assert_eq!(add_photos(app.clone(), &token, first, 1).await, StatusCode::CREATED);

    let json = body_json(get(app, "/api/pets").await).await;
    assert_eq!(ids(&json), vec![first, second]);

    let children = json[0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 3);
    let photo_ids: Vec<i64> = children
        .iter()
        .map(|c| c["photoId"].as_i64().unwrap())
        .collect();
    let mut sorted = photo_ids.clone();
    sorted.sort_unstable();
    assert_eq!(photo_ids, sorted);
    assert!(children[0]["photoUrl"].is_string());
    assert!(children[0]["photoRef"].is_string());

    assert_eq!(json[1]["children"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_pet_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/pets/424242").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_listing_is_empty_array(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/pets").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

// ---------------------------------------------------------------------------
// Search and ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn search_matches_category_substring_case_insensitively(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "s@test.com").await;
    let cat = create_pet(app.clone(), &token, "Mochi", "Persian Cat").await;
    create_pet(app.clone(), &token, "Bolt", "Dog").await;

    let json = body_json(get(app.clone(), "/api/pets/search?category=cat").await).await;
    assert_eq!(ids(&json), vec![cat]);

    let response = get(app.clone(), "/api/pets/search?category=hamster").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    // Wildcards are matched literally.
    let json = body_json(get(app.clone(), "/api/pets/search?category=%25").await).await;
    assert_eq!(json, json!([]));

    let response = get(app, "/api/pets/search").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mine_returns_only_callers_pets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (alice, _) = register_and_login(app.clone(), "adopters", "alice@test.com").await;
    let (bob, _) = register_and_login(app.clone(), "adopters", "bob@test.com").await;
    let alices = create_pet(app.clone(), &alice, "Kiki", "Bird").await;
    create_pet(app.clone(), &bob, "Tom", "Cat").await;

    let json = body_json(get_auth(app.clone(), "/api/pets/mine", &alice).await).await;
    assert_eq!(ids(&json), vec![alices]);

    let response = get(app, "/api/pets/mine").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn doctors_cannot_list_pets_for_adoption(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (doctor, _) = register_and_login(app.clone(), "doctors", "vet@test.com").await;

    let parts = [
        Part::Text("name", "Ghost"),
        Part::Text("category", "Cat"),
        Part::Text("gender", "male"),
        Part::File("main_photo", "ghost.png", PNG),
    ];
    let response = multipart_auth(app, Method::POST, "/api/pets", &parts, &doctor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Create validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_without_main_photo_is_400(pool: PgPool) {
    let (app, images) = common::build_test_app_with_host(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "np@test.com").await;

    let parts = [
        Part::Text("name", "Nophoto"),
        Part::Text("category", "Cat"),
        Part::Text("gender", "male"),
    ];
    let response = multipart_auth(app, Method::POST, "/api/pets", &parts, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(images.is_empty().await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_missing_fields_does_not_upload(pool: PgPool) {
    let (app, images) = common::build_test_app_with_host(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "mf@test.com").await;

    let parts = [
        Part::Text("name", "Nameless"),
        Part::File("main_photo", "main.png", PNG),
    ];
    let response = multipart_auth(app, Method::POST, "/api/pets", &parts, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(images.is_empty().await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_bad_publish_date_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "bd@test.com").await;

    let parts = [
        Part::Text("name", "Datey"),
        Part::Text("category", "Cat"),
        Part::Text("gender", "male"),
        Part::Text("publishDate", "17/05/2024"),
        Part::File("main_photo", "main.png", PNG),
    ];
    let response = multipart_auth(app, Method::POST, "/api/pets", &parts, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Extra photos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn at_most_five_extra_photos(pool: PgPool) {
    let (app, images) = common::build_test_app_with_host(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "five@test.com").await;
    let pet_id = create_pet(app.clone(), &token, "Max", "Dog").await;

    assert_eq!(add_photos(app.clone(), &token, pet_id, 4).await, StatusCode::CREATED);
    assert_eq!(
        add_photos(app.clone(), &token, pet_id, 2).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(add_photos(app.clone(), &token, pet_id, 1).await, StatusCode::CREATED);

    // Main photo plus five extras; the rejected batch was never uploaded.
    assert_eq!(images.len().await, 6);

    let json = body_json(get(app, &format!("/api/pets/{pet_id}")).await).await;
    assert_eq!(json["children"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_photo_upload_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "empty@test.com").await;
    let pet_id = create_pet(app.clone(), &token, "Max", "Dog").await;

    assert_eq!(add_photos(app, &token, pet_id, 0).await, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_owner_may_add_photos(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = register_and_login(app.clone(), "adopters", "own@test.com").await;
    let (other, _) = register_and_login(app.clone(), "adopters", "oth@test.com").await;
    let pet_id = create_pet(app.clone(), &owner, "Max", "Dog").await;

    assert_eq!(add_photos(app, &other, pet_id, 1).await, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_delete_removes_pet_and_hosted_photos(pool: PgPool) {
    let (app, images) = common::build_test_app_with_host(pool);
    let (owner, _) = register_and_login(app.clone(), "adopters", "del@test.com").await;
    let (other, _) = register_and_login(app.clone(), "adopters", "nope@test.com").await;
    let pet_id = create_pet(app.clone(), &owner, "Max", "Dog").await;
    add_photos(app.clone(), &owner, pet_id, 2).await;
    assert_eq!(images.len().await, 3);

    let uri = format!("/api/pets/{pet_id}");
    let response = delete_auth(app.clone(), &uri, &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(images.is_empty().await);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
