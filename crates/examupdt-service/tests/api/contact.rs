use crate::common::{create_admin_server, create_test_server};
use anyhow::Result;
use axum::http::StatusCode;
use examupdt_service::test_helpers::test_utils;
use serde_json::{Value, json};

#[tokio::test]
async fn test_visitor_message_is_stored_unread() -> Result<()> {
    let (server, db, token) = create_admin_server().await;

    let response = server
        .post("/api/v1/contact")
        .json(&json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "message": "When are the 3-1 results out?",
            "status": "read",
            "reply": "forged",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();
    assert_eq!(
        test_utils::count_records(&mut db.lock().unwrap(), "contact_messages"),
        1
    );

    let body: Value = server
        .get("/api/v1/contact")
        .authorization_bearer(&token)
        .await
        .json();
    let message = &body["messages"][0];
    assert_eq!(message["id"], id.as_str());
    assert_eq!(message["status"], "unread");
    assert!(message.get("reply").is_none() || message["reply"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_visitor_message_validation() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/v1/contact")
        .json(&json!({ "name": "Ravi", "email": "ravi@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Please fill in all required fields: message");

    server
        .post("/api/v1/contact")
        .json(&json!({ "name": "Ravi", "email": "not-an-email", "message": "hi" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_admin_reads_replies_and_deletes() -> Result<()> {
    let (server, db, token) = create_admin_server().await;
    let response = server
        .post("/api/v1/contact")
        .json(&json!({ "name": "Asha", "email": "asha@example.com", "message": "Syllabus?" }))
        .await;
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let body: Value = server
        .put(&format!("/api/v1/contact/{id}/read"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["message"]["status"], "read");

    server
        .put(&format!("/api/v1/contact/{id}/reply"))
        .authorization_bearer(&token)
        .json(&json!({ "reply": "  " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body: Value = server
        .put(&format!("/api/v1/contact/{id}/reply"))
        .authorization_bearer(&token)
        .json(&json!({ "reply": "Posted on the notes page." }))
        .await
        .json();
    assert_eq!(body["message"]["reply"], "Posted on the notes page.");
    assert!(body["message"]["replied_at"].is_string());

    server
        .delete(&format!("/api/v1/contact/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    assert_eq!(
        test_utils::count_records(&mut db.lock().unwrap(), "contact_messages"),
        0
    );

    server
        .delete(&format!("/api/v1/contact/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    Ok(())
}
