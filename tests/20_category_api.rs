mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::TestServer;

async fn call(server: &TestServer, method: Method, path: &str, body: Option<Value>) -> Result<reqwest::Response> {
    let mut req = server
        .client
        .request(method, server.url(path))
        .bearer_auth(server.token()?);
    if let Some(body) = body {
        req = req.json(&body);
    }
    Ok(req.send().await?)
}

async fn create(server: &TestServer, name: &str, status: bool) -> Result<Value> {
    let res = call(server, Method::POST, "/api/category", Some(json!({ "name": name, "status": status }))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(res.json().await?)
}

#[tokio::test]
async fn beverages_lifecycle() -> Result<()> {
    let server = TestServer::spawn().await?;

    let created = create(&server, "Beverages", true).await?;
    assert_eq!(created, json!({ "id": 1, "name": "Beverages", "status": true }));

    let res = call(&server, Method::GET, "/api/category/1", None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, created);

    let res = call(&server, Method::PUT, "/api/category/1", Some(json!({ "name": "Drinks", "status": false }))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "id": 1, "name": "Drinks", "status": false }));

    let res = call(&server, Method::DELETE, "/api/category/1", None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "id": 1, "name": "Drinks", "status": false }));

    let res = call(&server, Method::GET, "/api/category/1", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.bytes().await?.is_empty(), "not found should carry no body");
    Ok(())
}

#[tokio::test]
async fn created_record_reads_back_identically() -> Result<()> {
    let server = TestServer::spawn().await?;

    for (name, status) in [("Beverages", true), ("", false), ("Condiments & Sauces", true)] {
        let created = create(&server, name, status).await?;
        let id = created["id"].as_i64().expect("id");

        let fetched: Value = call(&server, Method::GET, &format!("/api/category/{}", id), None)
            .await?
            .json()
            .await?;
        assert_eq!(fetched["name"], name);
        assert_eq!(fetched["status"], status);
    }
    Ok(())
}

#[tokio::test]
async fn client_supplied_id_is_ignored() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = call(&server, Method::POST, "/api/category", Some(json!({ "id": 77, "name": "Produce", "status": true }))).await?;
    let created: Value = res.json().await?;
    assert_eq!(created["id"], 1);

    let res = call(&server, Method::PUT, "/api/category/1", Some(json!({ "id": 5, "name": "Fresh Produce", "status": true }))).await?;
    let updated: Value = res.json().await?;
    assert_eq!(updated["id"], 1, "update must not change the id");
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    create(&server, "Beverages", true).await?;

    for id in ["2", "0", "-1"] {
        let res = call(&server, Method::GET, &format!("/api/category/{}", id), None).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {}", id);
    }
    Ok(())
}

#[tokio::test]
async fn update_of_missing_id_creates_nothing() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = call(&server, Method::PUT, "/api/category/9", Some(json!({ "name": "Ghost", "status": true }))).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let listed: Value = call(&server, Method::GET, "/api/category", None).await?.json().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn delete_of_missing_id_leaves_others() -> Result<()> {
    let server = TestServer::spawn().await?;
    let kept = create(&server, "Beverages", true).await?;

    let res = call(&server, Method::DELETE, "/api/category/42", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let listed: Value = call(&server, Method::GET, "/api/category", None).await?.json().await?;
    assert_eq!(listed, json!([kept]));
    Ok(())
}

#[tokio::test]
async fn list_returns_live_records_once() -> Result<()> {
    let server = TestServer::spawn().await?;

    let a = create(&server, "Beverages", true).await?;
    let b = create(&server, "Snacks", false).await?;
    let c = create(&server, "Dairy", true).await?;

    let res = call(&server, Method::DELETE, &format!("/api/category/{}", b["id"]), None).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let listed: Value = call(&server, Method::GET, "/api/category", None).await?.json().await?;
    assert_eq!(listed, json!([a, c]));
    Ok(())
}

#[tokio::test]
async fn malformed_payloads_are_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = call(&server, Method::POST, "/api/category", Some(json!({ "name": 3, "status": "on" }))).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["name"], "Expected a string");
    assert_eq!(body["field_errors"]["status"], "Expected a boolean");

    let res = server
        .client
        .post(server.url("/api/category"))
        .bearer_auth(server.token()?)
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");

    let listed: Value = call(&server, Method::GET, "/api/category", None).await?.json().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn cors_preflight_allows_any_origin_by_default() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .request(Method::OPTIONS, server.url("/api/category"))
        .header("origin", "http://localhost:4200")
        .header("access-control-request-method", "POST")
        .send()
        .await?;

    assert!(res.status().is_success(), "preflight status {}", res.status());
    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

#[tokio::test]
async fn missing_content_type_is_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/api/category"))
        .bearer_auth(server.token()?)
        .body(json!({ "name": "Beverages", "status": true }).to_string())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "BAD_REQUEST");

    let listed: Value = call(&server, Method::GET, "/api/category", None).await?.json().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn stalled_upload_does_not_block_other_requests() -> Result<()> {
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    let server = TestServer::spawn().await?;
    create(&server, "Beverages", true).await?;

    // Announce a body that never arrives and keep the connection open
    let addr = server.base_url.trim_start_matches("http://").to_string();
    let mut stalled = tokio::net::TcpStream::connect(&addr).await?;
    let head = format!(
        "POST /api/category HTTP/1.1\r\nHost: {}\r\nAuthorization: Bearer {}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{{\"name\":",
        addr,
        server.token()?
    );
    stalled.write_all(head.as_bytes()).await?;
    stalled.flush().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = tokio::time::timeout(
        Duration::from_secs(3),
        call(&server, Method::GET, "/api/category", None),
    )
    .await
    .map_err(|_| anyhow::anyhow!("list blocked behind a stalled upload"))??;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?.as_array().map(Vec::len), Some(1));

    let res = tokio::time::timeout(
        Duration::from_secs(3),
        call(&server, Method::POST, "/api/category", Some(json!({ "name": "Snacks", "status": false }))),
    )
    .await
    .map_err(|_| anyhow::anyhow!("create blocked behind a stalled upload"))??;
    assert_eq!(res.status(), StatusCode::OK);

    drop(stalled);
    Ok(())
}
