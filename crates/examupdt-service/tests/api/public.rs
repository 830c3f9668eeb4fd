use crate::common::{create_admin_server, create_record, create_test_server};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

fn titles(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn test_empty_collections_list_cleanly() -> Result<()> {
    let (server, _db) = create_test_server();

    for (path, key) in [
        ("/api/v1/posts", "posts"),
        ("/api/v1/results", "results"),
        ("/api/v1/notes", "notes"),
        ("/api/v1/questions", "questions"),
        ("/api/v1/jobs", "jobs"),
        ("/api/v1/internships", "internships"),
        ("/api/v1/listings", "listings"),
        ("/api/v1/videos", "videos"),
    ] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true, "{path}");
        assert_eq!(body["total"], 0, "{path}");
        assert!(body[key].as_array().unwrap().is_empty(), "{path}");
    }

    Ok(())
}

#[tokio::test]
async fn test_public_posts_hide_drafts_and_sort_newest_first() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;

    for (title, status, date) in [
        ("Old notice", "published", "2024-01-01T00:00:00Z"),
        ("Secret draft", "draft", "2024-06-01T00:00:00Z"),
        ("Fresh notice", "published", "2024-03-01T00:00:00Z"),
    ] {
        create_record(
            &server,
            &token,
            "posts",
            json!({
                "title": title,
                "content": "body",
                "status": status,
                "date": date,
                "category": "Exams",
            }),
        )
        .await;
    }

    let body: Value = server.get("/api/v1/posts").await.json();
    assert_eq!(titles(&body, "posts"), ["Fresh notice", "Old notice"]);

    // A status filter cannot surface drafts.
    let body: Value = server
        .get("/api/v1/posts")
        .add_query_param("status", "draft")
        .await
        .json();
    assert_eq!(body["total"], 2);

    let body: Value = server
        .get("/api/v1/posts")
        .add_query_param("sort", "oldest")
        .await
        .json();
    assert_eq!(titles(&body, "posts"), ["Old notice", "Fresh notice"]);

    let body: Value = server
        .get("/api/v1/posts")
        .add_query_param("search", "FRESH")
        .await
        .json();
    assert_eq!(titles(&body, "posts"), ["Fresh notice"]);

    Ok(())
}

#[tokio::test]
async fn test_post_detail_counts_views_and_guards_drafts() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    let published = create_record(
        &server,
        &token,
        "posts",
        json!({ "title": "Live", "content": "c", "status": "published" }),
    )
    .await;
    let draft = create_record(
        &server,
        &token,
        "posts",
        json!({ "title": "WIP", "content": "c" }),
    )
    .await;

    let path = format!("/api/v1/posts/{published}");
    let first: Value = server.get(&path).await.json();
    let second: Value = server.get(&path).await.json();
    assert_eq!(first["post"]["views"], 1);
    assert_eq!(second["post"]["views"], 2);

    let draft_path = format!("/api/v1/posts/{draft}");
    server
        .get(&draft_path)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&draft_path)
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let missing = server.get("/api/v1/posts/nope").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    let body: Value = missing.json();
    assert_eq!(body["error"], "Post not found");

    Ok(())
}

#[tokio::test]
async fn test_results_exam_filter_splits_type_and_semester() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    for (title, exam_type, semester) in [
        ("R1", "B.Tech", "1-1 Regular"),
        ("R2", "B.Tech", "2-1 Regular"),
        ("R3", "M.Tech", "1-1 Regular"),
    ] {
        create_record(
            &server,
            &token,
            "results",
            json!({
                "title": title,
                "exam_type": exam_type,
                "semester": semester,
                "year": 2024,
                "link": "https://results.example.edu/r",
            }),
        )
        .await;
    }

    let body: Value = server
        .get("/api/v1/results")
        .add_query_param("exam", "B.Tech 1-1")
        .await
        .json();
    assert_eq!(titles(&body, "results"), ["R1"]);
    assert_eq!(body["results"][0]["exam"], "B.Tech 1-1 Regular");

    let body: Value = server
        .get("/api/v1/results")
        .add_query_param("exam", "All")
        .await
        .json();
    assert_eq!(body["total"], 3);

    Ok(())
}

#[tokio::test]
async fn test_notes_are_shelved_by_semester() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    for (title, subject) in [
        ("DS notes", "Semester 3 Data Structures"),
        ("M1", "Semester 1 Maths"),
    ] {
        create_record(
            &server,
            &token,
            "notes",
            json!({
                "title": title,
                "subject": subject,
                "topic": "Unit 1",
                "file_url": "https://files.example.edu/n.pdf",
                "file_size": 2_097_152,
            }),
        )
        .await;
    }

    let body: Value = server
        .get("/api/v1/notes")
        .add_query_param("semester", "semester 3")
        .await
        .json();
    assert_eq!(titles(&body, "notes"), ["DS notes"]);
    assert_eq!(body["notes"][0]["file_size"], "2.0 MB");
    assert_eq!(body["notes"][0]["units"], "Unit 1");

    Ok(())
}

#[tokio::test]
async fn test_listings_merge_active_jobs_and_internships() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    create_record(
        &server,
        &token,
        "jobs",
        json!({
            "title": "SDE",
            "company": "Acme",
            "location": "Pune",
            "jobMode": "Remote",
            "postedDate": "2024-05-01T00:00:00Z",
        }),
    )
    .await;
    create_record(
        &server,
        &token,
        "jobs",
        json!({
            "title": "Closed role",
            "company": "Acme",
            "location": "Pune",
            "status": "Closed",
        }),
    )
    .await;
    create_record(
        &server,
        &token,
        "internships",
        json!({
            "title": "Research intern",
            "company": "Lab",
            "location": "Delhi",
            "duration": "3 months",
            "posted_date": "2024-06-01T00:00:00Z",
        }),
    )
    .await;

    let jobs: Value = server.get("/api/v1/jobs").await.json();
    assert_eq!(titles(&jobs, "jobs"), ["SDE"]);

    let body: Value = server.get("/api/v1/listings").await.json();
    let kinds: Vec<&str> = body["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|listing| listing["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["internship", "job"]);

    let body: Value = server
        .get("/api/v1/listings")
        .add_query_param("kind", "job")
        .await
        .json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["listings"][0]["position"], "SDE");

    Ok(())
}

#[tokio::test]
async fn test_videos_resolve_embed_links() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    create_record(
        &server,
        &token,
        "videos",
        json!({
            "title": "Exam tips",
            "videoLink": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "category": "Tips",
        }),
    )
    .await;

    let body: Value = server.get("/api/v1/videos").await.json();
    let video = &body["videos"][0];
    assert_eq!(video["video_id"], "dQw4w9WgXcQ");
    assert_eq!(video["embed_url"], "https://www.youtube.com/embed/dQw4w9WgXcQ");

    Ok(())
}

#[tokio::test]
async fn test_question_detail_counts_views() -> Result<()> {
    let (server, _db, token) = create_admin_server().await;
    let id = create_record(
        &server,
        &token,
        "questions",
        json!({ "title": "Q1", "subject": "Maths", "topic": "Limits", "content": "Evaluate" }),
    )
    .await;

    let body: Value = server.get(&format!("/api/v1/questions/{id}")).await.json();
    assert_eq!(body["question"]["views"], 1);

    let body: Value = server
        .get("/api/v1/questions")
        .add_query_param("difficulty", "Medium")
        .await
        .json();
    assert_eq!(body["total"], 1);

    Ok(())
}

#[tokio::test]
async fn test_bad_sort_and_paging_are_rejected() -> Result<()> {
    let (server, _db) = create_test_server();

    server
        .get("/api/v1/posts")
        .add_query_param("sort", "loudest")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/v1/posts")
        .add_query_param("page", "-1")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}
