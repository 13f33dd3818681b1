mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use keystone_api::database::models::{Role, Settings};
use keystone_api::database::SettingsStore;

async fn project(server: &common::TestServer, token: &str, name: &str) -> Result<String> {
    let res = server
        .post("/api/projects", Some(token))
        .json(&json!({ "name": name, "status": "active" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    Ok(body["data"]["id"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn malformed_project_ids_never_reach_the_store() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, token) = server.user("Ana", Role::Employee).await?;
    let before = server.store.operations();

    let res = server.get("/api/projects/12345", Some(&token)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Invalid project ID format");
    assert_eq!(server.store.operations(), before);

    let res = server
        .get(&format!("/api/projects/{}", Uuid::new_v4()), Some(&token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn managers_create_projects_and_are_expanded() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (pm, pm_token) = server.user("Priya", Role::Pm).await?;
    let (_, employee_token) = server.user("Eve", Role::Employee).await?;

    let res = server
        .post("/api/projects", Some(&employee_token))
        .json(&json!({ "name": "Atlas" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .post("/api/projects", Some(&pm_token))
        .json(&json!({ "name": "  " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let id = project(&server, &pm_token, "Atlas").await?;

    let body: Value = server
        .get(&format!("/api/projects/{}", id), Some(&employee_token))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["name"], "Atlas");
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["projectManager"]["id"], pm.id.to_string());
    assert_eq!(body["data"]["projectManager"]["email"], "priya@example.com");

    let body: Value = server.get("/api/projects", Some(&employee_token)).send().await?.json().await?;
    assert_eq!(body["data"].as_array().map(|p| p.len()), Some(1));
    assert_eq!(body["data"][0]["projectManager"]["name"], "Priya");
    Ok(())
}

#[tokio::test]
async fn allocations_notify_the_allocated_user() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, pm_token) = server.user("Priya", Role::Pm).await?;
    let (dev, dev_token) = server.user("Dev", Role::Employee).await?;
    let project_id = project(&server, &pm_token, "Atlas").await?;

    let body = json!({
        "userId": dev.id,
        "projectId": project_id,
        "percentage": 50,
        "role": "developer",
        "startDate": "2026-01-05",
        "endDate": "2026-06-30"
    });

    let res = server.post("/api/allocations", Some(&dev_token)).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.post("/api/allocations", Some(&pm_token)).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["data"]["percentage"], 50);
    assert_eq!(created["data"]["role"], "developer");

    let inbox: Value = server.get("/api/notifications", Some(&dev_token)).send().await?.json().await?;
    assert_eq!(inbox["totalNotifications"], 1);
    assert_eq!(inbox["data"][0]["link"], format!("/projects/{}", project_id));
    assert!(inbox["data"][0]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("Atlas"));
    Ok(())
}

#[tokio::test]
async fn allocation_input_is_checked() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, pm_token) = server.user("Priya", Role::Pm).await?;
    let (dev, _) = server.user("Dev", Role::Employee).await?;
    let project_id = project(&server, &pm_token, "Atlas").await?;

    server
        .store
        .save_settings(Settings {
            max_allocation_percent: 80,
            ..Settings::default()
        })
        .await?;

    let cases = [
        (json!({ "userId": dev.id, "projectId": project_id, "percentage": 90, "role": "tester" }), StatusCode::BAD_REQUEST),
        (json!({ "userId": dev.id, "projectId": project_id, "percentage": 101, "role": "tester" }), StatusCode::BAD_REQUEST),
        (json!({ "userId": dev.id, "projectId": project_id, "percentage": 40, "role": "wizard" }), StatusCode::BAD_REQUEST),
        (json!({ "userId": "nope", "projectId": project_id, "percentage": 40, "role": "tester" }), StatusCode::BAD_REQUEST),
        (json!({ "userId": Uuid::new_v4(), "projectId": project_id, "percentage": 40, "role": "tester" }), StatusCode::NOT_FOUND),
        (json!({ "userId": dev.id, "projectId": Uuid::new_v4(), "percentage": 40, "role": "tester" }), StatusCode::NOT_FOUND),
        (json!({ "userId": dev.id, "projectId": project_id, "percentage": 80, "role": "tester" }), StatusCode::CREATED),
    ];

    for (body, expected) in cases {
        let res = server.post("/api/allocations", Some(&pm_token)).json(&body).send().await?;
        assert_eq!(res.status(), expected, "{}", body);
    }
    Ok(())
}

#[tokio::test]
async fn allocations_filter_and_delete() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, admin_token) = server.user("Ada", Role::Admin).await?;
    let (ana, ana_token) = server.user("Ana", Role::Employee).await?;
    let (bo, _) = server.user("Bo", Role::Employee).await?;
    let atlas = project(&server, &admin_token, "Atlas").await?;
    let borealis = project(&server, &admin_token, "Borealis").await?;

    for (user, project) in [(ana.id, &atlas), (ana.id, &borealis), (bo.id, &atlas)] {
        let res = server
            .post("/api/allocations", Some(&admin_token))
            .json(&json!({ "userId": user, "projectId": project, "percentage": 30, "role": "analyst" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let body: Value = server.get("/api/allocations", Some(&ana_token)).send().await?.json().await?;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(3));

    let body: Value = server
        .get(&format!("/api/allocations?userId={}", ana.id), Some(&ana_token))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(2));

    let body: Value = server
        .get(&format!("/api/allocations?userId={}&projectId={}", ana.id, atlas), Some(&ana_token))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
    let path = format!("/api/allocations/{}", body["data"][0]["id"].as_str().unwrap_or_default());

    let res = server.get("/api/allocations?projectId=bad", Some(&ana_token)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server.delete(&path, Some(&ana_token)).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = server.delete(&path, Some(&admin_token)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = server.delete(&path, Some(&admin_token)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
