use crate::common::{create_admin_server, create_faulty_server, create_record};
use anyhow::Result;
use axum::http::StatusCode;
use examupdt_service::test_helpers::test_utils;
use serde_json::{Value, json};

#[tokio::test]
async fn test_bulk_delete_removes_every_selected_record() -> Result<()> {
    let (server, db, token) = create_admin_server().await;
    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(
            create_record(&server, &token, "notes", json!({
                "title": format!("N{i}"),
                "subject": "S",
                "file_url": "https://files.example.edu/n.pdf",
            }))
            .await,
        );
    }

    let body: Value = server
        .post("/api/v1/admin/notes/bulk-delete")
        .authorization_bearer(&token)
        .json(&json!({ "ids": &ids[..2] }))
        .await
        .json();
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"].as_array().unwrap().len(), 2);
    assert_eq!(test_utils::count_records(&mut db.lock().unwrap(), "notes"), 1);

    Ok(())
}

#[tokio::test]
async fn test_bulk_delete_requires_a_selection() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;

    server
        .post("/api/v1/admin/notes/bulk-delete")
        .authorization_bearer(&token)
        .json(&json!({ "ids": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_partial_failure_reports_survivors_without_rollback() -> Result<()> {
    let (server, store, token) = create_faulty_server().await;
    let post = |title: &str| json!({ "title": title, "content": "c" });
    let keep = create_record(&server, &token, "posts", post("a")).await;
    let gone = create_record(&server, &token, "posts", post("b")).await;
    store.fail_deletes_of(&keep);

    let response = server
        .post("/api/v1/admin/posts/bulk-delete")
        .authorization_bearer(&token)
        .json(&json!({ "ids": [keep.clone(), gone.clone(), "missing"] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["deleted"], json!([gone]));
    let failed: Vec<&str> = body["failed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(failed, [keep.as_str(), "missing"]);
    assert_eq!(body["error"], "1 deleted, 2 could not be deleted");

    let remaining: Value = server
        .get("/api/v1/admin/posts")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(remaining["total"], 1);
    assert_eq!(remaining["posts"][0]["id"], keep.as_str());

    Ok(())
}
