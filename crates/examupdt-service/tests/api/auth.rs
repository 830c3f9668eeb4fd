use crate::common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, create_admin_server, create_test_server, seed_admin,
};
use anyhow::Result;
use axum::http::StatusCode;
use examupdt_service::test_helpers::test_utils;
use serde_json::{Value, json};

#[tokio::test]
async fn test_login_returns_user_and_token() -> Result<()> {
    let (server, db) = create_test_server();
    seed_admin(db.clone()).await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "Admin@Examupdt.in ", "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(test_utils::count_sessions(&mut db.lock().unwrap()), 1);

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() -> Result<()> {
    let (server, db) = create_test_server();
    seed_admin(db).await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": "guess" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unauthorized");

    Ok(())
}

#[tokio::test]
async fn test_login_requires_both_fields() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Please fill in all required fields: email, password"
    );

    Ok(())
}

#[tokio::test]
async fn test_session_round_trip_and_logout() -> Result<()> {
    let (server, db, token) = create_admin_server().await;

    let response = server
        .get("/api/v1/auth/session")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["name"], "Admin");

    server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    assert_eq!(test_utils::count_sessions(&mut db.lock().unwrap()), 0);

    server
        .get("/api/v1/auth/session")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_reject_missing_and_bogus_tokens() -> Result<()> {
    let (server, _db, _token) = create_admin_server().await;

    let guarded = [
        "/api/v1/admin/posts",
        "/api/v1/contact",
        "/api/v1/analytics",
        "/api/v1/auth/session",
    ];
    for path in guarded {
        server.get(path).await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .get(path)
            .authorization_bearer("not-a-session")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    server
        .post("/api/v1/admin/posts")
        .json(&json!({ "title": "t", "content": "c" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    Ok(())
}
