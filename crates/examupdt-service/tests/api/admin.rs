use crate::common::{create_admin_server, create_record};
use anyhow::Result;
use axum::http::StatusCode;
use examupdt_service::test_helpers::test_utils;
use serde_json::{Value, json};

#[tokio::test]
async fn test_admin_list_includes_drafts_and_pages() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    for i in 0..12 {
        let status = if i % 2 == 0 { "draft" } else { "published" };
        create_record(
            &server,
            &token,
            "posts",
            json!({ "title": format!("Post {i:02}"), "content": "c", "status": status }),
        )
        .await;
    }

    let body: Value = server
        .get("/api/v1/admin/posts")
        .authorization_bearer(&token)
        .add_query_param("sort", "title")
        .add_query_param("page", "2")
        .add_query_param("page_size", "10")
        .await
        .json();
    assert_eq!(body["total"], 12);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["posts"].as_array().unwrap().len(), 2);
    assert_eq!(body["posts"][0]["title"], "Post 10");

    let body: Value = server
        .get("/api/v1/admin/posts")
        .authorization_bearer(&token)
        .add_query_param("status", "draft")
        .await
        .json();
    assert_eq!(body["total"], 6);

    Ok(())
}

#[tokio::test]
async fn test_admin_crud_round_trip() -> Result<()> {
    let (server, db, token) = create_admin_server().await;
    let id = create_record(
        &server,
        &token,
        "jobs",
        json!({ "title": "SDE", "company": "Acme", "location": "Pune", "applicants": 3 }),
    )
    .await;

    let body: Value = server
        .get(&format!("/api/v1/admin/jobs/{id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["record"]["company"], "Acme");
    assert_eq!(body["record"]["status"], "Active");

    let body: Value = server
        .put(&format!("/api/v1/admin/jobs/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "jobMode": "Hybrid", "salary": "12 LPA" }))
        .await
        .json();
    assert_eq!(body["record"]["job_mode"], "Hybrid");
    assert_eq!(body["record"]["applicants"], 3);
    assert!(body["record"]["updated_at"].is_string());

    server
        .delete(&format!("/api/v1/admin/jobs/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    assert_eq!(test_utils::count_records(&mut db.lock().unwrap(), "jobs"), 0);

    server
        .get(&format!("/api/v1/admin/jobs/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_admin_create_validates_before_storing() -> Result<()> {
    let (server, db, token) = create_admin_server().await;

    let response = server
        .post("/api/v1/admin/posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "No body" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Please fill in all required fields: content"
    );

    server
        .post("/api/v1/admin/results")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "R",
            "semester": "1-1",
            "link": "http://localhost/admin",
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/v1/admin/posts")
        .authorization_bearer(&token)
        .json(&json!(["not", "an", "object"]))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let conn = &mut db.lock().unwrap();
    assert_eq!(test_utils::count_records(conn, "posts"), 0);
    assert_eq!(test_utils::count_records(conn, "results"), 0);

    Ok(())
}

#[tokio::test]
async fn test_unknown_and_message_collections_are_not_admin_crud() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;

    for collection in ["widgets", "contact"] {
        server
            .get(&format!("/api/v1/admin/{collection}"))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    Ok(())
}

#[tokio::test]
async fn test_concurrent_edits_are_last_write_wins() -> Result<()> {
    let (server, db, token) = create_admin_server().await;
    let id = create_record(&server, &token, "posts", json!({ "title": "t", "content": "c" })).await;

    for title in ["first edit", "second edit"] {
        server
            .put(&format!("/api/v1/admin/posts/{id}"))
            .authorization_bearer(&token)
            .json(&json!({ "title": title }))
            .await
            .assert_status_ok();
    }

    let row = test_utils::get_record(&mut db.lock().unwrap(), "posts", &id).unwrap();
    let body: Value = serde_json::from_str(&row.body)?;
    assert_eq!(body["title"], "second edit");
    assert_eq!(body["content"], "c");

    Ok(())
}

#[tokio::test]
async fn test_analytics_summarises_the_dashboard() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    create_record(
        &server,
        &token,
        "posts",
        json!({
            "title": "A",
            "content": "c",
            "status": "published",
            "views": 10,
            "category": "Exams",
        }),
    )
    .await;
    create_record(
        &server,
        &token,
        "posts",
        json!({ "title": "B", "content": "c", "views": 5, "category": "Exams" }),
    )
    .await;
    server
        .post("/api/v1/contact")
        .json(&json!({ "name": "N", "email": "n@example.com", "message": "hi" }))
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = server
        .get("/api/v1/analytics")
        .authorization_bearer(&token)
        .await
        .json();
    let analytics = &body["analytics"];
    assert_eq!(analytics["total_posts"], 2);
    assert_eq!(analytics["published_posts"], 1);
    assert_eq!(analytics["draft_posts"], 1);
    assert_eq!(analytics["total_views"], 15);
    assert_eq!(analytics["unread_messages"], 1);
    assert_eq!(analytics["categories"]["Exams"], 2);
    assert_eq!(analytics["trend"].as_array().unwrap().len(), 7);

    Ok(())
}

#[tokio::test]
async fn test_admin_update_with_null_clears_optional_fields() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    let id = create_record(
        &server,
        &token,
        "results",
        json!({
            "title": "B.Tech 3-1 Regular",
            "semester": "3-1",
            "link": "https://results.jntuh.ac.in/3-1",
            "pdf_file": "https://results.jntuh.ac.in/3-1.pdf",
        }),
    )
    .await;

    let body: Value = server
        .put(&format!("/api/v1/admin/results/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "pdf_file": null }))
        .await
        .json();
    assert_eq!(body["success"], true);
    assert!(body["record"].get("pdf_file").is_none());

    let body: Value = server
        .get(&format!("/api/v1/admin/results/{id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert!(body["record"].get("pdf_file").is_none());
    assert_eq!(body["record"]["link"], "https://results.jntuh.ac.in/3-1");

    Ok(())
}
