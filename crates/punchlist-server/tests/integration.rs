//! End-to-end integration tests using a real HTTP client.

use std::time::Duration;

use punchlist_server::config::ServerConfig;
use punchlist_server::server::TaskServer;
use punchlist_store::{ConnectionConfig, new_in_memory, run_migrations};
use serde_json::{Value, json};

/// Boot a test server on an ephemeral port and return its base URL.
async fn boot_server() -> (String, TaskServer) {
    let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        let _ = run_migrations(&conn).unwrap();
    }

    let server = TaskServer::new(ServerConfig::default(), pool); // port 0 = auto-assign
    let (addr, _handle) = server.listen().await.unwrap();
    (format!("http://{addr}"), server)
}

/// POST /tasks and return the response envelope.
async fn create_task(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let resp = client
        .post(format!("{base}/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    resp.json().await.unwrap()
}

async fn put_json(client: &reqwest::Client, url: String, body: Value) -> (u16, Value) {
    let resp = client.put(url).json(&body).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_health_reports_task_count() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let _ = create_task(&client, &base, json!({ "title": "one" })).await;
    let _ = create_task(&client, &base, json!({ "title": "two" })).await;

    let resp = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["task_count"], 2);
    assert!(body["uptime_secs"].is_number());

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_task_crud() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    // Create
    let created = create_task(
        &client,
        &base,
        json!({ "title": "Fix the gate latch", "priority": "Low" }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["task"]["status"], "Pending");

    // Get (bare task, no envelope)
    let resp = client
        .get(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert!(fetched.get("task").is_none());
    assert_eq!(fetched["title"], "Fix the gate latch");

    // Update
    let (status, updated) = put_json(
        &client,
        format!("{base}/tasks/{id}"),
        json!({ "title": "Replace the gate latch", "priority": "High" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["task"]["title"], "Replace the gate latch");
    assert_eq!(updated["task"]["priority"], "High");

    // Delete
    let resp = client
        .delete(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Task deleted successfully");

    // Gone
    let resp = client
        .get(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_checklist_then_status_two_phase() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let created = create_task(
        &client,
        &base,
        json!({
            "title": "Lay the patio",
            "todoChecklist": [
                { "text": "level the ground", "completed": false },
                { "text": "set the pavers", "completed": false }
            ]
        }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["task"]["status"], "Pending");

    // Phase one: replace the checklist. Status must not move.
    let (status, updated) = put_json(
        &client,
        format!("{base}/tasks/{id}/todo"),
        json!({ "todoChecklist": [
            { "text": "level the ground", "completed": true },
            { "text": "set the pavers", "completed": false }
        ]}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["task"]["status"], "Pending");
    assert_eq!(updated["task"]["todoChecklist"][0]["completed"], true);

    // Phase two: the client writes the status it derived.
    let (status, updated) = put_json(
        &client,
        format!("{base}/tasks/{id}/status"),
        json!({ "status": "InProgress" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["task"]["status"], "InProgress");

    // Finish the second item the same way.
    let _ = put_json(
        &client,
        format!("{base}/tasks/{id}/todo"),
        json!({ "todoChecklist": [
            { "text": "level the ground", "completed": true },
            { "text": "set the pavers", "completed": true }
        ]}),
    )
    .await;
    let (_, done) = put_json(
        &client,
        format!("{base}/tasks/{id}/status"),
        json!({ "status": "Completed" }),
    )
    .await;
    assert_eq!(done["task"]["status"], "Completed");
    for item in done["task"]["todoChecklist"].as_array().unwrap() {
        assert_eq!(item["completed"], true);
    }

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_status_completed_marks_whole_checklist() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let created = create_task(
        &client,
        &base,
        json!({
            "title": "Sweep the garage",
            "todoChecklist": [
                { "text": "corners", "completed": false },
                { "text": "floor", "completed": false }
            ]
        }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();

    let (status, updated) = put_json(
        &client,
        format!("{base}/tasks/{id}/status"),
        json!({ "status": "Completed" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["task"]["status"], "Completed");
    for item in updated["task"]["todoChecklist"].as_array().unwrap() {
        assert_eq!(item["completed"], true);
    }

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_list_filters_and_paginates() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let _ = create_task(&client, &base, json!({ "title": "first" })).await;
    let _ = create_task(&client, &base, json!({ "title": "second" })).await;
    let _ = create_task(
        &client,
        &base,
        json!({
            "title": "already done",
            "todoChecklist": [{ "text": "x", "completed": true }]
        }),
    )
    .await;

    // Status filter.
    let listed: Value = client
        .get(format!("{base}/tasks?status=Completed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["tasks"][0]["title"], "already done");

    // Pagination: newest first, total counts the whole filtered set.
    let page: Value = client
        .get(format!("{base}/tasks?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["tasks"].as_array().unwrap().len(), 2);

    let rest: Value = client
        .get(format!("{base}/tasks?limit=2&offset=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rest["total"], 3);
    assert_eq!(rest["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(rest["tasks"][0]["title"], "first");

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_missing_task_returns_message_body() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/tasks/task-nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Task not found");

    let resp = client
        .delete(format!("{base}/tasks/task-nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_unknown_status_rejected() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let created = create_task(&client, &base, json!({ "title": "guarded" })).await;
    let id = created["task"]["id"].as_str().unwrap();

    let resp = client
        .put(format!("{base}/tasks/{id}/status"))
        .json(&json!({ "status": "Done" }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_concurrent_creates() {
    let (base, server) = boot_server().await;
    let client = reqwest::Client::new();

    let (a, b, c) = tokio::join!(
        create_task(&client, &base, json!({ "title": "one" })),
        create_task(&client, &base, json!({ "title": "two" })),
        create_task(&client, &base, json!({ "title": "three" })),
    );
    let ids = [
        a["task"]["id"].as_str().unwrap(),
        b["task"]["id"].as_str().unwrap(),
        c["task"]["id"].as_str().unwrap(),
    ];
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);

    let listed: Value = client
        .get(format!("{base}/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["total"], 3);

    server.shutdown().shutdown();
}

#[tokio::test]
async fn e2e_graceful_shutdown() {
    let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        let _ = run_migrations(&conn).unwrap();
    }
    let server = TaskServer::new(ServerConfig::default(), pool);
    let (addr, handle) = server.listen().await.unwrap();

    // Verify the server is working before shutdown.
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert!(resp.status().is_success());

    server.shutdown().shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("shutdown timed out")
        .expect("join error");
}
