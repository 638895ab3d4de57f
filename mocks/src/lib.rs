//! `httptest` servers that speak the PhotoMind backend API.

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;

/// Create an empty mock backend.
pub fn photomind_server() -> Server {
    Server::run()
}

/// Base URL of `server` without a trailing slash.
pub fn base_url(server: &Server) -> String {
    server.url_str("").trim_end_matches('/').to_string()
}

/// Three photos in the shape `/api/search` returns them, newest first.
pub fn photos_body() -> serde_json::Value {
    json!([
        {
            "id": "p1",
            "s3Url": "https://bucket.s3.us-east-1.amazonaws.com/p1_lake.jpg",
            "dateModified": "1700000300.25",
            "userId": "user-1",
            "filename": "lake.jpg",
            "tags": [
                {"name": "Mountain View", "confidence": 98.1},
                {"name": "Lake", "confidence": 91.0}
            ]
        },
        {
            "id": "p2",
            "s3Url": "https://bucket.s3.us-east-1.amazonaws.com/p2_city.jpg",
            "dateModified": "1700000200.0",
            "userId": "user-1",
            "filename": "city.jpg",
            "tags": [{"name": "City", "confidence": 88.4}]
        },
        {
            "id": "p3",
            "s3Url": "https://bucket.s3.us-east-1.amazonaws.com/p3_dog.jpg",
            "dateModified": "1700000100.0",
            "userId": "user-1",
            "filename": "dog.jpg",
            "tags": [
                {"name": "Dog", "confidence": 99.0},
                {"name": "Pet", "confidence": 97.0},
                {"name": "Grass", "confidence": 80.0},
                {"name": "Outdoors", "confidence": 77.0}
            ]
        }
    ])
}

/// Expect any number of `GET /api/search` calls answered with [`photos_body`].
pub fn expect_search(server: &Server) {
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/search"))
            .times(1..)
            .respond_with(json_encoded(photos_body())),
    );
}

/// Expect `GET /api/deepsearch?query=<query>` answered with the double-encoded `tags`.
pub fn expect_deep_search(server: &Server, query: &str, tags: &[(&str, f64)]) {
    let hits: Vec<serde_json::Value> = tags
        .iter()
        .map(|(tag, confidence)| json!({"tag": tag, "confidence": confidence.to_string()}))
        .collect();
    let encoded = serde_json::Value::Array(hits).to_string();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/api/deepsearch"),
            request::query(url_decoded(contains(("query", eq(query.to_string()))))),
        ])
        .times(1..)
        .respond_with(json_encoded(json!({
            "success": true,
            "query": query,
            "results": encoded,
        }))),
    );
}

/// Expect `GET /api/tabs` answered with `names` as tabs of `user-1`.
pub fn expect_tabs(server: &Server, names: &[&str]) {
    let tabs: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"user_id": "user-1", "tab_id": format!("t{}", i + 1), "tab_name": name}))
        .collect();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/tabs"))
            .times(1..)
            .respond_with(json_encoded(json!({ "tabs": tabs }))),
    );
}

/// Expect one `POST /api/tabs` creating `name`.
pub fn expect_add_tab(server: &Server, name: &str) {
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api/tabs"),
            request::body(json_decoded::<serde_json::Value, _>(eq(json!({ "tab_name": name })))),
        ])
        .respond_with(json_encoded(json!({
            "tab": {"user_id": "user-1", "tab_id": "new", "tab_name": name}
        }))),
    );
}

/// Expect exactly `times` uploads, each answered with a new photo.
pub fn expect_uploads(server: &Server, times: usize) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/upload"))
            .times(times)
            .respond_with(json_encoded(json!({
                "id": "uploaded",
                "s3Url": "https://bucket.s3.us-east-1.amazonaws.com/uploaded.jpg",
                "dateModified": "1700000400.0",
                "userId": "user-1",
                "filename": "uploaded.jpg",
                "tags": []
            }))),
    );
}

/// Expect uploads to be rejected with the backend's `{error}` body.
pub fn expect_upload_rejected(server: &Server, message: &str) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/upload"))
            .times(1..)
            .respond_with(
                status_code(500)
                    .insert_header("content-type", "application/json")
                    .body(json!({ "error": message }).to_string()),
            ),
    );
}

/// Expect the health check at `/`.
pub fn expect_health(server: &Server) {
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .respond_with(json_encoded(json!({
                "status": "healthy",
                "service": "PhotoMind Backend",
                "version": "1.0.0"
            }))),
    );
}

/// Accept uploads, except the one whose multipart body names `rejected_file`,
/// which gets a 500 with `{error: message}`.
///
/// The batch may stop early once the rejection arrives, so accepted uploads
/// are expected at most `max_accepted` times.
pub fn expect_upload_batch_with_rejection(
    server: &Server,
    max_accepted: usize,
    rejected_file: &str,
    message: &str,
) {
    let pattern = regex_escape(rejected_file);
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api/upload"),
            request::body(matches(pattern.as_str())),
        ])
        .times(1)
        .respond_with(
            status_code(500)
                .insert_header("content-type", "application/json")
                .body(json!({ "error": message }).to_string()),
        ),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api/upload"),
            request::body(not(matches(pattern.as_str()))),
        ])
        .times(0..=max_accepted)
        .respond_with(json_encoded(json!({"id": "uploaded", "tags": []}))),
    );
}

/// Expect exactly `times` uploads, each answered after `delay`.
pub fn expect_slow_uploads(server: &Server, times: usize, delay: std::time::Duration) {
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/upload"))
            .times(times)
            .respond_with(delay_and_then(delay, json_encoded(json!({"id": "uploaded", "tags": []})))),
    );
}

fn regex_escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if r"\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
