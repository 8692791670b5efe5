//! Generation API integration tests.

mod common;

use common::{TestServer, OWNER};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

fn scenario_button() -> Value {
    json!({
        "id": "b1",
        "type": "button",
        "position": { "x": 120, "y": 40 },
        "size": { "width": 150, "height": 50 },
        "props": { "children": "Click me", "variant": "primary" },
        "styles": {}
    })
}

async fn generate(server: &TestServer, body: &Value) -> reqwest::Response {
    server
        .client()
        .post(server.url("/api/generate"))
        .json(body)
        .send()
        .await
        .expect("send")
}

#[tokio::test]
async fn test_generate_html_without_caller() {
    let server = TestServer::start().await;
    let response = generate(
        &server,
        &json!({ "elements": [scenario_button()], "target": "html" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json");
    assert_eq!(body["data"]["target"], "html");
    let code = body["data"]["code"].as_str().expect("code");
    assert!(code.contains("<button"));
    assert!(code.contains("Click me"));
    assert!(code.contains("left:120px; top:40px; width:150px; height:50px;"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_generate_defaults_to_react() {
    let server = TestServer::start().await;
    let response = generate(&server, &json!({ "elements": [scenario_button()] })).await;
    let body: Value = response.json().await.expect("json");

    assert_eq!(body["data"]["target"], "react");
    assert!(body["data"]["code"]
        .as_str()
        .expect("code")
        .contains("export default function GeneratedComponent()"));
    assert_eq!(body["data"]["dependencies"], json!(["react"]));
    assert!(body["data"]["files"]["GeneratedComponent.tsx"].is_string());

    server.shutdown().await;
}

#[tokio::test]
async fn test_generate_is_deterministic() {
    let server = TestServer::start().await;
    let request = json!({ "elements": [scenario_button()], "target": "site" });
    let first: Value = generate(&server, &request).await.json().await.expect("json");
    let second: Value = generate(&server, &request).await.json().await.expect("json");
    assert_eq!(first, second);
    assert_eq!(first["data"]["files"].as_object().expect("files").len(), 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_target_is_rejected() {
    let server = TestServer::start().await;
    let response = generate(&server, &json!({ "elements": [], "target": "svelte" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["success"], false);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_element_type_renders_placeholder() {
    let server = TestServer::start().await;
    let widget = json!({
        "id": "w1",
        "type": "<img src=x onerror=alert(1)>",
        "position": { "x": 0, "y": 0 },
        "size": { "width": 100, "height": 100 },
        "props": {},
        "styles": {}
    });
    let response = generate(&server, &json!({ "elements": [widget], "target": "html" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("json");
    let code = body["data"]["code"].as_str().expect("code");
    assert!(code.contains("Unknown component"));
    assert!(!code.contains("<img src=x"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_generate_stored_project() {
    let server = TestServer::start().await;
    let created: Value = server
        .request(Method::POST, "/api/projects", OWNER)
        .json(&json!({ "title": "Stored", "elements": [scenario_button()] }))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    let id = created["data"]["id"].as_str().expect("id");

    let response = server
        .request(Method::POST, &format!("/api/projects/{id}/generate"), OWNER)
        .json(&json!({ "target": "css" }))
        .send()
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("json");
    assert!(body["data"]["code"].as_str().expect("code").contains(".el-0"));

    let response = server
        .request(Method::POST, &format!("/api/projects/{id}/generate"), "intruder")
        .json(&json!({}))
        .send()
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    server.shutdown().await;
}
