//! HTTP-level integration tests for doctor accounts and the public
//! doctor directory.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, delete_auth, get, get_auth, post_json, put_json_auth, register,
    register_and_login, with_cookie, PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn register_with_professional_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "name": "drh. Rina",
        "phone": "0813",
        "email": "rina@vet.test",
        "password": PASSWORD,
        "confirmPassword": PASSWORD,
        "specialty": "Feline medicine",
        "education": "IPB University",
        "experienceYears": 7,
    });
    let response = post_json(app.clone(), "/api/doctors/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json!({ "email": "rina@vet.test", "password": PASSWORD });
    let response = post_json(app.clone(), "/api/doctors/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string();

    let json = body_json(get_auth(app, "/api/doctors/me", &token).await).await;
    assert_eq!(json["specialty"], "Feline medicine");
    assert_eq!(json["experienceYears"], 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn same_email_may_exist_in_both_account_kinds(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = register(app.clone(), "adopters", "both@test.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = register(app.clone(), "doctors", "both@test.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = register(app, "doctors", "both@test.com").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn adopter_token_cannot_read_doctor_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "adopters", "ad@test.com").await;

    let response = get_auth(app, "/api/doctors/me", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn directory_lists_doctors_by_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token_b, _) = register_and_login(app.clone(), "doctors", "b@vet.test").await;
    let (token_a, _) = register_and_login(app.clone(), "doctors", "a@vet.test").await;

    put_json_auth(app.clone(), "/api/doctors/me", json!({ "name": "Bayu" }), &token_b).await;
    put_json_auth(app.clone(), "/api/doctors/me", json!({ "name": "Ayu" }), &token_a).await;

    let response = get(app, "/api/doctors").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ayu", "Bayu"]);
    assert!(json[0].get("passwordHash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_doctor_by_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_and_login(app.clone(), "doctors", "one@vet.test").await;
    let me = body_json(get_auth(app.clone(), "/api/doctors/me", &token).await).await;
    let id = me["id"].as_i64().unwrap();

    let response = get(app.clone(), &format!("/api/doctors/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "one@vet.test");

    let response = get(app, "/api/doctors/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn doctor_session_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, cookie) = register_and_login(app.clone(), "doctors", "life@vet.test").await;

    let response = with_cookie(app.clone(), Method::POST, "/api/doctors/token", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(app.clone(), "/api/doctors/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = with_cookie(app.clone(), Method::POST, "/api/doctors/token", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let directory = body_json(get(app, "/api/doctors").await).await;
    assert_eq!(directory, json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn conflicting_profile_update_keeps_old_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "doctors", "taken@vet.test").await;
    let (token, _) = register_and_login(app.clone(), "doctors", "me@vet.test").await;

    let body = json!({
        "email": "taken@vet.test",
        "oldPassword": PASSWORD,
        "newPassword": "new-password-9",
    });
    let response = put_json_auth(app.clone(), "/api/doctors/me", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json!({ "email": "me@vet.test", "password": PASSWORD });
    let response = post_json(app.clone(), "/api/doctors/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "email": "me@vet.test", "password": "new-password-9" });
    let response = post_json(app, "/api/doctors/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
