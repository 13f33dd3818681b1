mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use keystone_api::config::AppConfig;
use keystone_api::database::models::Role;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/health", None).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_the_api() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let body: Value = server.get("/", None).send().await?.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Keystone API");
    Ok(())
}

#[tokio::test]
async fn protected_endpoints_reject_missing_sessions_without_touching_the_store() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = uuid::Uuid::new_v4();
    let before = server.store.operations();

    let requests = vec![
        server.get("/api/auth/session", None),
        server.get("/api/notifications", None),
        server.post("/api/notifications/mark-as-read", None),
        server.put(&format!("/api/notifications/{}", id), None).json(&json!({ "isRead": true })),
        server.delete(&format!("/api/notifications/{}", id), None),
        server.get("/api/skills", None),
        server.post("/api/skills", None).json(&json!({ "name": "Rust" })),
        server.get("/api/user-skills", None),
        server.post("/api/bookmarks/check", None).json(&json!({ "propertyId": id })),
        server.post("/api/bookmarks", None).json(&json!({ "propertyId": id })),
        server.get("/api/bookmarks", None),
        server.get("/api/projects", None),
        server.get(&format!("/api/projects/{}", id), None),
        server.get("/api/allocations", None),
        server.get("/api/settings", None),
        server.get("/api/users", None),
        server.post("/api/properties", None).json(&json!({ "name": "Loft" })),
    ];

    for request in requests {
        let res = request.send().await?;
        let url = res.url().to_string();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", url);
        let body: Value = res.json().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    assert_eq!(server.store.operations(), before);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_notification_count_is_zero() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/api/notifications/count", None).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "success": true, "count": 0 }));
    Ok(())
}

#[tokio::test]
async fn tampered_tokens_are_treated_as_no_session() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, token) = server.user("Mallory", Role::Admin).await?;
    let tampered = format!("{}x", token);

    let res = server.get("/api/auth/session", Some(&tampered)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = server
        .get("/api/notifications/count", Some(&tampered))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["count"], 0);
    Ok(())
}

#[tokio::test]
async fn session_resolves_from_bearer_or_cookie() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (user, token) = server.user("Ana", Role::Pm).await?;

    let body: Value = server
        .get("/api/auth/session", Some(&token))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["role"], "pm");
    assert_eq!(body["data"]["profile"]["email"], "ana@example.com");

    let res = server
        .client
        .get(server.url("/api/auth/session"))
        .header("Cookie", format!("theme=dark; session-token={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["name"], "Ana");
    Ok(())
}

#[tokio::test]
async fn role_gates_return_forbidden() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (employee, employee_token) = server.user("Eve", Role::Employee).await?;
    let (_, hr_token) = server.user("Hana", Role::Hr).await?;

    let res = server.get("/api/settings", Some(&employee_token)).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "FORBIDDEN");

    let res = server.get("/api/settings", Some(&hr_token)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    // role changes are admin only
    let res = server
        .put(&format!("/api/users/{}/role", employee.id), Some(&hr_token))
        .json(&json!({ "role": "admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admins_manage_roles_and_settings() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (_, admin_token) = server.user("Ada", Role::Admin).await?;
    let (employee, _) = server.user("Eve", Role::Employee).await?;

    let res = server
        .put(&format!("/api/users/{}/role", employee.id), Some(&admin_token))
        .json(&json!({ "role": "hr" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["role"], "hr");

    let res = server
        .put(&format!("/api/users/{}/role", employee.id), Some(&admin_token))
        .json(&json!({ "role": "wizard" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .put("/api/settings", Some(&admin_token))
        .json(&json!({ "organizationName": "Acme", "maxAllocationPercent": 80 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["organizationName"], "Acme");
    assert_eq!(body["data"]["maxAllocationPercent"], 80);
    assert_eq!(body["data"]["allowSelfAssessment"], true);

    let res = server
        .put("/api/settings", Some(&admin_token))
        .json(&json!({ "maxAllocationPercent": 0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = server.get("/api/users", Some(&admin_token)).send().await?.json().await?;
    assert_eq!(body["data"].as_array().map(|users| users.len()), Some(2));
    Ok(())
}

#[tokio::test]
async fn oversized_bodies_are_refused_and_cors_still_applies() -> Result<()> {
    let mut config = AppConfig::development();
    config.api.max_request_size_bytes = 1024;
    let server = common::TestServer::spawn_with(config).await?;
    let (_, token) = server.user("Ana", Role::Employee).await?;
    let before = server.store.operations();

    let res = server
        .post("/api/properties", Some(&token))
        .header("Content-Type", "application/json")
        .header("Origin", "http://localhost:5173")
        .body(json!({ "name": "x".repeat(4096) }).to_string())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(server.store.operations(), before);

    let res = server
        .get("/health", None)
        .header("Origin", "http://localhost:5173")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    Ok(())
}
